//! Error taxonomy.
//!
//! [`ApiError`] is what the transport reports. The session and guest
//! layers translate it into [`AuthError`] / [`ProgressError`], which is
//! what the UI decides presentation from:
//!
//! | Error | Presentation |
//! |-------|--------------|
//! | [`AuthError::InvalidCredentials`] | retry prompt on the login form |
//! | [`AuthError::Unauthorized`] | silent logout and redirect to Login; never shown |
//! | [`AuthError::NetworkFailure`] | generic "try again" message |
//! | [`AuthError::Forbidden`] | permission notice; the session stays |

use thiserror::Error;

/// Failure of a single HTTP exchange with the backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("HTTP {status}{}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    Status { status: u16, detail: Option<String> },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

/// Failure of a session operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    #[error("incorrect email or password")]
    InvalidCredentials,
    #[error("session expired or not authorized")]
    Unauthorized,
    #[error("could not reach the server, please try again")]
    NetworkFailure(String),
    #[error("an account with this email already exists")]
    AccountExists,
    #[error("registration rejected{}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    Rejected { status: u16, detail: Option<String> },
    #[error("session changed while the request was in flight")]
    Superseded,
    #[error("not permitted{}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    Forbidden { detail: Option<String> },
}

impl AuthError {
    /// Translate a non-login failure. A 401 here means the token is stale.
    pub(crate) fn from_authenticated_call(e: ApiError) -> Self {
        match e {
            e if e.is_unauthorized() => AuthError::Unauthorized,
            ApiError::Status { status: 403, detail } => AuthError::Forbidden { detail },
            other => AuthError::NetworkFailure(other.to_string()),
        }
    }
}

/// Failure of a guest progress operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProgressError {
    #[error("no active session to transfer progress to")]
    NoSession,
    #[error("session expired or not authorized")]
    Unauthorized,
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let e = ApiError::Status {
            status: 401,
            detail: Some("Incorrect email or password".to_string()),
        };
        assert_eq!(e.to_string(), "HTTP 401: Incorrect email or password");
        assert!(e.is_unauthorized());

        let e = ApiError::Status { status: 500, detail: None };
        assert_eq!(e.to_string(), "HTTP 500");
        assert!(!e.is_unauthorized());
    }

    #[test]
    fn test_authenticated_call_translation() {
        let stale = ApiError::Status { status: 401, detail: None };
        assert_eq!(AuthError::from_authenticated_call(stale), AuthError::Unauthorized);

        let down = ApiError::Transport("connection refused".to_string());
        assert!(matches!(
            AuthError::from_authenticated_call(down),
            AuthError::NetworkFailure(_)
        ));

        let admin_only = ApiError::Status {
            status: 403,
            detail: Some("Only admin users can sync units".to_string()),
        };
        assert_eq!(
            AuthError::from_authenticated_call(admin_only),
            AuthError::Forbidden {
                detail: Some("Only admin users can sync units".to_string())
            }
        );

        let missing = ApiError::Status { status: 404, detail: None };
        assert!(matches!(
            AuthError::from_authenticated_call(missing),
            AuthError::NetworkFailure(_)
        ));
    }
}
