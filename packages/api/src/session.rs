//! # Session store
//!
//! [`SessionStore`] owns the bearer token and the authenticated
//! [`UserRecord`]. It is the only writer of the `"token"` key in durable
//! storage and the only place that decides a session has ended.
//!
//! ## Lifecycle
//!
//! ```text
//!   empty ──login/register──▶ token only ──fetch_current_user──▶ authenticated
//!     ▲                           │                                   │
//!     └──────── logout / any 401 on an authenticated call ◀───────────┘
//! ```
//!
//! A session is authenticated only once the user record has been fetched
//! with the token; an inline role hint in the login response never counts.
//!
//! ## Observers
//!
//! Anything implementing [`SessionObserver`] (including plain closures) can
//! [`subscribe`](SessionStore::subscribe). Observers receive a snapshot after
//! every state change and may call back into the store; no internal borrow
//! is held while they run.
//!
//! ## Concurrency
//!
//! Single-threaded. State lives in `RefCell`s that are never borrowed across
//! an `.await`. A user fetch that resolves after the token it was issued for
//! has been replaced or cleared is discarded with [`AuthError::Superseded`].

use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use store::KeyValueStore;
use tracing::{debug, info, warn};

use crate::backend::AuthApi;
use crate::error::{ApiError, AuthError};
use crate::models::{Credentials, Registration, UserRecord};

/// Durable storage key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Immutable snapshot of the session.
///
/// `user` is only ever set while `token` is set.
#[derive(Clone, Default, PartialEq)]
pub struct Session {
    token: Option<String>,
    user: Option<UserRecord>,
}

impl Session {
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&UserRecord> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    /// Strict comparison against the normalized role. False without a user.
    pub fn has_role(&self, name: &str) -> bool {
        self.user.as_ref().is_some_and(|user| user.has_role(name))
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(UserRecord::is_admin)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user", &self.user.as_ref().map(|u| &u.email))
            .finish()
    }
}

/// Receives a snapshot after every session change.
pub trait SessionObserver {
    fn session_changed(&self, session: &Session);
}

impl<F: Fn(&Session)> SessionObserver for F {
    fn session_changed(&self, session: &Session) {
        self(session)
    }
}

/// Handle returned by [`SessionStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct SessionStore<A, K> {
    api: A,
    storage: K,
    state: RefCell<Session>,
    observers: RefCell<Vec<(SubscriptionId, Rc<dyn SessionObserver>)>>,
    next_id: Cell<u64>,
}

impl<A: AuthApi, K: KeyValueStore> SessionStore<A, K> {
    /// Create a store, picking up a token left in durable storage by a
    /// previous run. The user record is not loaded until
    /// [`restore`](Self::restore) or [`fetch_current_user`](Self::fetch_current_user).
    pub fn new(api: A, storage: K) -> Self {
        let token = storage
            .get(TOKEN_KEY)
            .filter(|token| !token.trim().is_empty());
        if token.is_some() {
            debug!("Found persisted session token");
        }
        Self {
            api,
            storage,
            state: RefCell::new(Session { token, user: None }),
            observers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn user(&self) -> Option<UserRecord> {
        self.state.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.state.borrow().has_role(name)
    }

    /// Log in with email and password, then load the user record.
    ///
    /// A rejected login leaves the current session untouched. Once the
    /// token is accepted it is persisted before the user fetch starts, so a
    /// failed fetch still leaves a token that [`restore`](Self::restore) can
    /// retry later.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let credentials = Credentials::new(email, password);
        let response = self
            .api
            .login(&credentials)
            .await
            .map_err(|e| match e.status() {
                Some(401 | 403) => AuthError::InvalidCredentials,
                _ => AuthError::NetworkFailure(e.to_string()),
            })?;
        if response.is_admin.is_some() {
            debug!("Ignoring inline admin hint in login response");
        }
        debug!("Login accepted");
        self.accept_token(response.access_token).await
    }

    /// Create an account and sign into it.
    pub async fn register(&self, registration: &Registration) -> Result<Session, AuthError> {
        let response = self
            .api
            .register(registration)
            .await
            .map_err(|e| match e {
                ApiError::Status { status: 409, .. } => AuthError::AccountExists,
                ApiError::Status { status, detail } if (400..500).contains(&status) => {
                    AuthError::Rejected { status, detail }
                }
                other => AuthError::NetworkFailure(other.to_string()),
            })?;
        info!("Registered a new account");
        self.accept_token(response.access_token).await
    }

    async fn accept_token(&self, token: String) -> Result<Session, AuthError> {
        if token.trim().is_empty() {
            return Err(AuthError::NetworkFailure(
                "server returned an empty access token".to_string(),
            ));
        }
        self.storage.set(TOKEN_KEY, &token);
        self.replace(Session {
            token: Some(token),
            user: None,
        });
        self.fetch_current_user().await?;
        Ok(self.snapshot())
    }

    /// Load the authoritative user record for the current token.
    ///
    /// Without a token this fails with [`AuthError::Unauthorized`] and makes
    /// no request. A 401 ends the session.
    pub async fn fetch_current_user(&self) -> Result<UserRecord, AuthError> {
        let token = self.token().ok_or(AuthError::Unauthorized)?;
        let result = self.api.current_user(&token).await;
        if !self.holds(&token) {
            debug!("Discarding user fetch for a replaced session");
            return Err(AuthError::Superseded);
        }
        match result {
            Ok(user) => {
                info!("Session authenticated as user {}", user.id);
                self.replace(Session {
                    token: Some(token),
                    user: Some(user.clone()),
                });
                Ok(user)
            }
            Err(e) => Err(self.intercept(e)),
        }
    }

    /// Start-up helper: validate a persisted token, if there is one.
    pub async fn restore(&self) -> Result<Option<UserRecord>, AuthError> {
        if self.token().is_none() {
            return Ok(None);
        }
        self.fetch_current_user().await.map(Some)
    }

    /// Clear the session in memory and in durable storage. Idempotent.
    pub fn logout(&self) {
        self.storage.remove(TOKEN_KEY);
        let changed = {
            let mut state = self.state.borrow_mut();
            let changed = *state != Session::default();
            *state = Session::default();
            changed
        };
        if changed {
            info!("Logged out");
            self.notify();
        }
    }

    /// Translate a failed authenticated call. A 401 logs the session out.
    pub fn intercept(&self, error: ApiError) -> AuthError {
        if error.is_unauthorized() {
            warn!("Backend rejected the session token, logging out");
            self.logout();
        }
        AuthError::from_authenticated_call(error)
    }

    /// Like [`intercept`](Self::intercept), for a call made with `token`.
    ///
    /// A 401 only ends the session if it still holds that token. Otherwise
    /// the failure belongs to a replaced session and is reported as
    /// [`AuthError::Superseded`].
    pub fn intercept_for(&self, token: &str, error: ApiError) -> AuthError {
        if error.is_unauthorized() && !self.holds(token) {
            debug!("Ignoring 401 for a replaced session");
            return AuthError::Superseded;
        }
        self.intercept(error)
    }

    /// Run an authenticated call with the current token.
    ///
    /// A 401 for the token the call was made with ends the session. If the
    /// session has moved on by the time the call fails, it is left alone and
    /// the call reports [`AuthError::Superseded`].
    pub async fn authorized<T, F, Fut>(&self, call: F) -> Result<T, AuthError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let token = self.token().ok_or(AuthError::Unauthorized)?;
        call(token.clone())
            .await
            .map_err(|e| self.intercept_for(&token, e))
    }

    pub fn subscribe(&self, observer: impl SessionObserver + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.observers.borrow_mut().push((id, Rc::new(observer)));
        id
    }

    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    fn holds(&self, token: &str) -> bool {
        self.state.borrow().token.as_deref() == Some(token)
    }

    fn replace(&self, session: Session) {
        let changed = {
            let mut state = self.state.borrow_mut();
            if *state == session {
                false
            } else {
                *state = session;
                true
            }
        };
        if changed {
            self.notify();
        }
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        let observers: Vec<_> = self
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| Rc::clone(observer))
            .collect();
        for observer in observers {
            observer.session_changed(&snapshot);
        }
    }
}
