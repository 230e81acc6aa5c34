mod home;
pub use home::Home;

mod login;
pub use login::Login;

mod register;
pub use register::Register;

mod units;
pub use units::Units;

mod unit_detail;
pub use unit_detail::UnitDetail;

mod profile;
pub use profile::Profile;

mod admin;
pub use admin::Admin;

mod not_found;
pub use not_found::NotFound;

use api::{ApiError, AuthApi, AuthError, SessionStore};
use store::KeyValueStore;

/// Route a 401 from a page's backend call through the session. Returns true
/// when the page should send the visitor to the login form. A 401 for a
/// token the session no longer holds changes nothing.
pub(crate) fn session_ended<A, K>(
    store: &SessionStore<A, K>,
    token: Option<&str>,
    error: ApiError,
) -> bool
where
    A: AuthApi,
    K: KeyValueStore,
{
    match token {
        Some(token) => !matches!(store.intercept_for(token, error), AuthError::Superseded),
        None => store.token().is_none(),
    }
}

/// Message for a failed sign-in form, or `None` when nothing should be
/// shown. Expired sessions are handled by the guard, never displayed.
pub(crate) fn sign_in_error(error: &AuthError) -> Option<String> {
    match error {
        AuthError::InvalidCredentials => {
            Some("Incorrect email or password. Please try again.".to_string())
        }
        AuthError::AccountExists => {
            Some("An account with this email already exists. Try logging in.".to_string())
        }
        AuthError::Rejected { detail, .. } => Some(
            detail
                .clone()
                .unwrap_or_else(|| "Please check the form and try again.".to_string()),
        ),
        AuthError::NetworkFailure(_) => {
            Some("Could not reach the server. Please try again.".to_string())
        }
        AuthError::Forbidden { .. } => {
            Some("This account is not allowed to sign in.".to_string())
        }
        AuthError::Unauthorized | AuthError::Superseded => None,
    }
}

/// Message for a failed admin action. An expired session is handled by the
/// guard and a replaced one is no longer this page's concern.
pub(crate) fn action_error(error: &AuthError) -> Option<String> {
    match error {
        AuthError::Unauthorized | AuthError::Superseded => None,
        AuthError::Forbidden { detail } => Some(
            detail
                .clone()
                .unwrap_or_else(|| "You do not have permission to do that.".to_string()),
        ),
        other => {
            tracing::error!("Admin request failed: {}", other);
            Some("The request failed. Please try again.".to_string())
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use api::models::{Credentials, LoginResponse, TokenResponse};
    use api::{ApiError, AuthApi, Registration, UserRecord};
    use serde_json::json;

    /// Accepts any password; the token is derived from the email. Emails
    /// starting with `admin` belong to admins.
    pub(crate) struct Backend;

    impl AuthApi for Backend {
        async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
            Ok(LoginResponse {
                access_token: format!("token-{}", credentials.username),
                token_type: None,
                email: None,
                is_admin: None,
            })
        }

        async fn register(&self, _: &Registration) -> Result<TokenResponse, ApiError> {
            Err(ApiError::Status { status: 500, detail: None })
        }

        async fn current_user(&self, token: &str) -> Result<UserRecord, ApiError> {
            let email = token.trim_start_matches("token-");
            Ok(serde_json::from_value(json!({
                "id": email,
                "email": email,
                "is_admin": email.starts_with("admin"),
            }))
            .unwrap())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::Backend;
    use super::*;
    use store::MemoryStore;

    fn unauthorized() -> ApiError {
        ApiError::Status { status: 401, detail: None }
    }

    #[tokio::test]
    async fn test_401_for_current_token_ends_session() {
        let store = SessionStore::new(Backend, MemoryStore::new());
        store.login("a@example.com", "pw").await.unwrap();
        let token = store.token();

        assert!(session_ended(&store, token.as_deref(), unauthorized()));
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_401_for_replaced_token_keeps_newer_session() {
        let store = SessionStore::new(Backend, MemoryStore::new());
        store.login("a@example.com", "pw").await.unwrap();
        let stale = store.token();
        store.logout();
        store.login("b@example.com", "pw").await.unwrap();

        assert!(!session_ended(&store, stale.as_deref(), unauthorized()));
        assert!(store.is_authenticated());
        assert_eq!(store.user().map(|u| u.email), Some("b@example.com".to_string()));
    }

    #[tokio::test]
    async fn test_anonymous_401_after_sign_in_is_ignored() {
        let store = SessionStore::new(Backend, MemoryStore::new());
        assert!(session_ended(&store, None, unauthorized()));

        store.login("a@example.com", "pw").await.unwrap();
        assert!(!session_ended(&store, None, unauthorized()));
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_sign_in_error_messages() {
        assert!(sign_in_error(&AuthError::InvalidCredentials)
            .unwrap()
            .contains("try again"));
        assert_eq!(
            sign_in_error(&AuthError::NetworkFailure("timed out".to_string())).as_deref(),
            Some("Could not reach the server. Please try again.")
        );
        assert_eq!(
            sign_in_error(&AuthError::Rejected {
                status: 422,
                detail: Some("password too short".to_string())
            })
            .as_deref(),
            Some("password too short")
        );
    }

    #[test]
    fn test_unauthorized_is_never_shown() {
        assert_eq!(sign_in_error(&AuthError::Unauthorized), None);
        assert_eq!(sign_in_error(&AuthError::Superseded), None);
    }

    #[test]
    fn test_action_error_messages() {
        assert_eq!(action_error(&AuthError::Unauthorized), None);
        assert_eq!(action_error(&AuthError::Superseded), None);
        assert_eq!(
            action_error(&AuthError::Forbidden {
                detail: Some("Only admin users can sync units".to_string())
            })
            .as_deref(),
            Some("Only admin users can sync units")
        );
        assert_eq!(
            action_error(&AuthError::NetworkFailure("HTTP 500".to_string())).as_deref(),
            Some("The request failed. Please try again.")
        );
    }
}
