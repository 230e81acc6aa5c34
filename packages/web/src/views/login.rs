//! Login page with email/password and a password reset request.

use dioxus::prelude::*;
use ui::{spawn_guest_transfer, use_guest_bridge, use_session_store};

use super::sign_in_error;
use crate::Route;

#[component]
pub fn Login() -> Element {
    let store = use_session_store();
    let guest = use_guest_bridge();
    let nav = use_navigator();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut notice = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let login_store = store.clone();
    let handle_login = move |evt: FormEvent| {
        evt.prevent_default();
        let store = login_store.clone();
        let guest = guest.clone();
        spawn(async move {
            error.set(None);
            notice.set(None);

            let e = email().trim().to_string();
            let p = password();

            if e.is_empty() {
                error.set(Some("Please enter your email".to_string()));
                return;
            }
            if p.is_empty() {
                error.set(Some("Please enter your password".to_string()));
                return;
            }

            loading.set(true);
            match store.login(&e, &p).await {
                Ok(_) => {
                    spawn_guest_transfer(store.clone(), guest);
                    nav.replace(Route::Home {});
                }
                Err(err) => {
                    loading.set(false);
                    password.set(String::new());
                    error.set(sign_in_error(&err));
                }
            }
        });
    };

    let handle_reset = move |_| {
        let store = store.clone();
        spawn(async move {
            error.set(None);
            let e = email().trim().to_string();
            if e.is_empty() || !e.contains('@') {
                error.set(Some("Enter your email above first".to_string()));
                return;
            }
            match store.api().request_password_reset(&e).await {
                Ok(_) => notice.set(Some(
                    "If that address has an account, a reset link is on its way.".to_string(),
                )),
                Err(err) => {
                    tracing::error!("Password reset request failed: {}", err);
                    error.set(Some("Could not reach the server. Please try again.".to_string()));
                }
            }
        });
    };

    rsx! {
        div {
            class: "auth-page",

            h1 { "Welcome back" }
            p { class: "muted", "Sign in to continue your quests" }

            form {
                onsubmit: handle_login,
                class: "auth-form",

                if let Some(err) = error() {
                    div { class: "alert alert-error", "{err}" }
                }
                if let Some(message) = notice() {
                    div { class: "alert alert-info", "{message}" }
                }

                input {
                    r#type: "email",
                    placeholder: "Email",
                    autocomplete: "username",
                    value: email(),
                    oninput: move |evt: FormEvent| email.set(evt.value()),
                }

                input {
                    r#type: "password",
                    placeholder: "Password",
                    autocomplete: "current-password",
                    value: password(),
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }

                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Signing in..." } else { "Sign in" }
                }
            }

            button {
                class: "btn btn-link",
                r#type: "button",
                onclick: handle_reset,
                "Forgot your password?"
            }

            p {
                class: "muted",
                "Don't have an account? "
                Link { to: Route::Register {}, "Sign up" }
            }
        }
    }
}
