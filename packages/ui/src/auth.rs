//! Session context and hooks for the UI.

use std::rc::Rc;

use api::{AuthError, Session};
use dioxus::core::spawn_forever;
use dioxus::prelude::*;

use crate::platform::{load_config, make_session, AppGuestBridge, AppSession};

/// Reactive mirror of the session store.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub session: Session,
    /// True until the persisted session (if any) has been checked with the
    /// backend. Guards wait instead of redirecting while this is set.
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            session: Session::default(),
            loading: true,
        }
    }
}

/// Shared handles to the session core.
#[derive(Clone)]
pub struct SessionHandle {
    pub store: Rc<AppSession>,
    pub guest: Rc<AppGuestBridge>,
}

/// Get the current session state.
/// Returns a signal that updates on login, logout and user refresh.
pub fn use_session() -> Signal<SessionState> {
    use_context::<Signal<SessionState>>()
}

pub fn use_session_store() -> Rc<AppSession> {
    use_context::<SessionHandle>().store
}

pub fn use_guest_bridge() -> Rc<AppGuestBridge> {
    use_context::<SessionHandle>().guest
}

/// Provider component that owns the session store.
/// Wrap your app with this component to enable sessions.
#[component]
pub fn SessionProvider(children: Element) -> Element {
    let mut state = use_signal(SessionState::default);

    let handle = use_hook(|| match make_session(&load_config()) {
        Ok((store, guest)) => Ok(SessionHandle {
            store: Rc::new(store),
            guest: Rc::new(guest),
        }),
        Err(e) => {
            tracing::error!("Failed to set up the API client: {}", e);
            Err(e.to_string())
        }
    });

    // Mirror every store change into the signal.
    let subscription = use_hook({
        let handle = handle.clone();
        move || {
            handle.as_ref().ok().map(|h| {
                h.store.subscribe(move |session: &Session| {
                    let mut state = state;
                    state.write().session = session.clone();
                })
            })
        }
    });
    use_drop({
        let handle = handle.clone();
        move || {
            if let (Ok(h), Some(id)) = (&handle, subscription) {
                h.store.unsubscribe(id);
            }
        }
    });

    // Check a persisted token on mount
    let restore = handle.clone();
    let _ = use_resource(move || {
        let restore = restore.clone();
        async move {
            if let Ok(h) = restore {
                match h.store.restore().await {
                    Ok(Some(user)) => tracing::info!("Restored session for user {}", user.id),
                    Ok(None) | Err(AuthError::Superseded) => {}
                    Err(AuthError::Unauthorized) => tracing::info!("Stored session has expired"),
                    Err(e) => tracing::warn!("Could not restore session: {}", e),
                }
                state.write().session = h.store.snapshot();
            }
            state.write().loading = false;
        }
    });

    use_context_provider(|| state);

    match handle {
        Ok(h) => {
            use_context_provider(|| h);
            rsx! {
                {children}
            }
        }
        Err(message) => rsx! {
            div {
                class: "config-error",
                h1 { "LearnOnline is misconfigured" }
                p { "{message}" }
            }
        },
    }
}

/// Move any guest progress onto the account that just signed in.
///
/// Runs detached from the calling component: the sign-in usually navigates
/// away (and unmounts the form) before the transfer completes. A failed
/// transfer is logged; the sign-in stands.
pub fn spawn_guest_transfer(store: Rc<AppSession>, guest: Rc<AppGuestBridge>) {
    spawn_forever(async move {
        match guest.transfer_progress(&store).await {
            Ok(Some(_)) => tracing::info!("Guest progress merged into account"),
            Ok(None) => {}
            Err(e) => tracing::warn!("Guest progress transfer failed: {}", e),
        }
    });
}

/// Button to log out the current user.
#[component]
pub fn LogoutButton(
    #[props(default = "Log out".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let store = use_session_store();
    let nav = use_navigator();

    let onclick = move |_| {
        store.logout();
        nav.replace("/login");
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            "{label}"
        }
    }
}
