//! # User and credential models
//!
//! ## [`UserRecord`]
//!
//! The authoritative user returned by `GET /api/auth/me`. It is only ever
//! replaced wholesale. Two fields are normalized on the way in:
//!
//! - `is_admin` (also accepted as `admin_flag`): only `true`, `"true"`, `1`
//!   and `"1"` count as true; see [`normalize_admin_flag`].
//! - `role`: either a plain string or an object with a `name` field.
//!
//! [`UserRecord::role`] folds both into one normalized role name, which is
//! what role checks compare against.
//!
//! ## Login / registration payloads
//!
//! [`Credentials`] is sent form-urlencoded as `username=<email>&password=…`,
//! the backend's OAuth2 password-form contract. [`Registration`] is sent as
//! JSON. Both redact the password in their `Debug` output.
//!
//! [`LoginResponse`] may carry an inline admin hint. It is kept for
//! diagnostics only; authorization always uses the record fetched afterwards.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::de::{null_as_default, string_or_number};

pub const ADMIN_ROLE: &str = "admin";

/// Normalize a boolean-like admin flag.
///
/// `true`, `"true"`, `1` and `"1"` are true. Everything else, including
/// `"yes"`, `"TRUE"`, `2`, `1.0` and `null`, is false.
pub fn normalize_admin_flag(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(s) => s == "true" || s == "1",
        Value::Number(n) => n.as_u64() == Some(1),
        _ => false,
    }
}

fn admin_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(normalize_admin_flag(&Value::deserialize(deserializer)?))
}

fn role_name<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Object(map) => map
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    })
}

/// Player level: numeric on profile endpoints, a named tier
/// (`"player"`, `"mentor"`) on others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Level {
    Rank(u32),
    Tier(String),
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Rank(n) => write!(f, "{n}"),
            Level::Tier(name) => f.write_str(name),
        }
    }
}

/// Authenticated user as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default, alias = "admin_flag", deserialize_with = "admin_flag")]
    pub is_admin: bool,
    #[serde(default, deserialize_with = "role_name")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experience_points: i64,
    #[serde(default)]
    pub level: Option<Level>,
}

impl UserRecord {
    /// Normalized role: `"admin"` when the admin flag is set, otherwise the
    /// role name as sent.
    pub fn role(&self) -> Option<&str> {
        if self.is_admin {
            Some(ADMIN_ROLE)
        } else {
            self.role.as_deref()
        }
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.role() == Some(name)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }

    /// Full name, then username, then email.
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !full.is_empty() {
            return full;
        }
        match self.username.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.email.clone(),
        }
    }
}

/// Login form body.
#[derive(Clone, Serialize)]
pub struct Credentials {
    /// The backend's form field is `username` but it holds the email.
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: email.into().trim().to_string(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration JSON body.
#[derive(Clone, Default, Serialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

/// `POST /api/auth/login` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Inline admin hint. Never used for authorization.
    #[serde(default, alias = "admin_flag")]
    pub is_admin: Option<Value>,
}

/// Registration token. The backend has answered both `{"access_token": …}`
/// and `{"token": {"access_token": …}}`; either is accepted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "TokenShape")]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
}

#[derive(Deserialize)]
struct TokenBody {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TokenShape {
    Flat(TokenBody),
    Nested { token: TokenBody },
}

impl From<TokenShape> for TokenResponse {
    fn from(shape: TokenShape) -> Self {
        let body = match shape {
            TokenShape::Flat(body) | TokenShape::Nested { token: body } => body,
        };
        Self {
            access_token: body.access_token,
            token_type: body.token_type,
        }
    }
}
