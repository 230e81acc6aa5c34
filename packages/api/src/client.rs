//! # Typed HTTP client
//!
//! [`ApiClient`] is the only way the workspace talks to the backend. It owns
//! one `reqwest::Client` configured from [`ApiConfig`] and resolves every
//! endpoint against the configured base URL, so a deployment under a path
//! prefix (`https://host/learn/`) works without touching call sites.
//!
//! Bearer tokens are passed per call rather than stored here; the
//! [`SessionStore`](crate::SessionStore) owns the token and decides what to
//! do when a call comes back 401.
//!
//! Non-2xx responses become [`ApiError::Status`]. FastAPI error bodies are
//! either `{"detail": "text"}` or, for validation failures,
//! `{"detail": [{"msg": "text", ...}]}`; both are folded into `detail`.

use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::backend::{AuthApi, ProgressApi};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::models::{
    Ack, CatalogueKind, CataloguePage, Credentials, DownloadJob, GuestProgress,
    GuestProgressUpdate, JobStatus, LoginResponse, Quest, Registration, TokenResponse,
    TransferRequest, Unit, UnitElements, UnitQuery, UserRecord,
};

const LOGIN: &str = "api/auth/login";
const REGISTER: &str = "api/auth/register";
const CURRENT_USER: &str = "api/auth/me";
const PASSWORD_RESET: &str = "api/auth/reset-password-request";
const GUEST_PROGRESS: &str = "api/public/quest-progress";
const TRANSFER_PROGRESS: &str = "api/public/transfer-progress";
const INTRO_QUESTS: &str = "api/public/quests/introductory";
const UNIT_SEARCH: &str = "api/units/search";
const UNITS: &str = "api/units";

#[derive(Clone, Debug)]
pub struct ApiClient {
    base: Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base = parse_base(&config.base_url)?;

        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(std::time::Duration::from_secs(config.timeout_secs));
        let http = builder.build()?;

        Ok(Self { base, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve an endpoint path against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        Ok(self.http.request(method, self.endpoint(path)?))
    }

    /// Full-text unit search. Anonymous visitors may search too.
    pub async fn search_units(
        &self,
        token: Option<&str>,
        query: &UnitQuery,
    ) -> Result<Vec<Unit>, ApiError> {
        let mut request = self.request(Method::GET, UNIT_SEARCH)?.query(&query.params());
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        read_json(request.send().await?).await
    }

    pub async fn get_unit(&self, token: Option<&str>, id: &str) -> Result<Unit, ApiError> {
        let mut request = self.request(Method::GET, &format!("{UNITS}/{}", segment(id)))?;
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        read_json(request.send().await?).await
    }

    /// Elements and performance criteria of a unit, by unit id.
    pub async fn unit_elements(
        &self,
        token: Option<&str>,
        id: &str,
    ) -> Result<UnitElements, ApiError> {
        let path = format!("{UNITS}/{}/elements-with-pc", segment(id));
        let mut request = self.request(Method::GET, &path)?;
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        read_json(request.send().await?).await
    }

    pub async fn introductory_quests(&self) -> Result<Vec<Quest>, ApiError> {
        let response = self.request(Method::GET, INTRO_QUESTS)?.send().await?;
        read_json(response).await
    }

    /// Ask the backend to email a reset link. The response does not reveal
    /// whether the address is registered.
    pub async fn request_password_reset(&self, email: &str) -> Result<Ack, ApiError> {
        let response = self
            .request(Method::POST, PASSWORD_RESET)?
            .json(&serde_json::json!({ "email": email.trim() }))
            .send()
            .await?;
        read_ack(response).await
    }
}

/// Admin-only catalogue management. The backend answers 403 for other
/// accounts; callers route these through
/// [`SessionStore::authorized`](crate::SessionStore::authorized).
impl ApiClient {
    /// Re-import one unit from the national register, by unit code.
    pub async fn sync_unit(&self, token: &str, code: &str) -> Result<Ack, ApiError> {
        let path = format!("{UNITS}/{}/sync", segment(code));
        let response = self
            .request(Method::POST, &path)?
            .bearer_auth(token)
            .send()
            .await?;
        read_ack(response).await
    }

    /// What the register offers, with import state. `package` narrows the
    /// unit listing to one training package and is ignored for packages.
    pub async fn available(
        &self,
        token: &str,
        kind: CatalogueKind,
        page: u32,
        package: Option<&str>,
    ) -> Result<CataloguePage, ApiError> {
        let mut params = vec![
            ("page", page.max(1).to_string()),
            ("page_size", crate::models::CATALOGUE_PAGE_SIZE.to_string()),
        ];
        if let (CatalogueKind::Units, Some(code)) = (kind, package.map(str::trim)) {
            if !code.is_empty() {
                params.push(("training_package_code", code.to_string()));
            }
        }
        let response = self
            .request(Method::GET, &format!("{}/available", kind.path()))?
            .bearer_auth(token)
            .query(&params)
            .send()
            .await?;
        read_json(response).await
    }

    /// Queue a background import of `codes`.
    pub async fn bulk_download(
        &self,
        token: &str,
        kind: CatalogueKind,
        codes: &[String],
    ) -> Result<DownloadJob, ApiError> {
        let response = self
            .request(Method::POST, &format!("{}/bulk-download", kind.path()))?
            .bearer_auth(token)
            .json(codes)
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn download_status(
        &self,
        token: &str,
        kind: CatalogueKind,
        job_id: &str,
    ) -> Result<JobStatus, ApiError> {
        let path = format!("{}/download-status/{}", kind.path(), segment(job_id));
        let response = self
            .request(Method::GET, &path)?
            .bearer_auth(token)
            .send()
            .await?;
        read_json(response).await
    }
}

impl AuthApi for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let response = self
            .request(Method::POST, LOGIN)?
            .form(credentials)
            .send()
            .await?;
        read_json(response).await
    }

    async fn register(&self, registration: &Registration) -> Result<TokenResponse, ApiError> {
        let response = self
            .request(Method::POST, REGISTER)?
            .json(registration)
            .send()
            .await?;
        read_json(response).await
    }

    async fn current_user(&self, token: &str) -> Result<UserRecord, ApiError> {
        let response = self
            .request(Method::GET, CURRENT_USER)?
            .bearer_auth(token)
            .send()
            .await?;
        read_json(response).await
    }
}

impl ProgressApi for ApiClient {
    async fn save_guest_progress(&self, update: &GuestProgressUpdate) -> Result<Ack, ApiError> {
        let response = self
            .request(Method::POST, GUEST_PROGRESS)?
            .json(update)
            .send()
            .await?;
        read_ack(response).await
    }

    async fn guest_progress(&self, guest_id: &str) -> Result<GuestProgress, ApiError> {
        let path = format!("{GUEST_PROGRESS}/{}", segment(guest_id));
        let response = self.request(Method::GET, &path)?.send().await?;
        read_json(response).await
    }

    async fn transfer_guest_progress(&self, token: &str, guest_id: &str) -> Result<Ack, ApiError> {
        let response = self
            .request(Method::POST, TRANSFER_PROGRESS)?
            .bearer_auth(token)
            .json(&TransferRequest {
                guest_id: guest_id.to_string(),
            })
            .send()
            .await?;
        read_ack(response).await
    }
}

fn parse_base(raw: &str) -> Result<Url, ApiError> {
    let mut base = Url::parse(raw.trim()).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))?;
    if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
        return Err(ApiError::InvalidUrl(format!("{raw}: expected an http(s) URL")));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

/// Keep ids from escaping their path segment.
fn segment(id: &str) -> String {
    id.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect()
}

async fn checked(response: Response) -> Result<String, ApiError> {
    let status = response.status();
    let url = response.url().path().to_string();
    let body = response.text().await?;
    if status.is_success() {
        return Ok(body);
    }
    if status.is_server_error() {
        tracing::error!("{} returned HTTP {}", url, status.as_u16());
    }
    Err(ApiError::Status {
        status: status.as_u16(),
        detail: extract_detail(&body),
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = checked(response).await?;
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Acknowledgements may come back with an empty body.
async fn read_ack(response: Response) -> Result<Ack, ApiError> {
    let body = checked(response).await?;
    if body.trim().is_empty() {
        return Ok(Ack::default());
    }
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(text) => Some(text.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_resolution() {
        let api = client("http://localhost:8000");
        assert_eq!(
            api.endpoint(LOGIN).unwrap().as_str(),
            "http://localhost:8000/api/auth/login"
        );
        assert_eq!(
            api.endpoint("/api/auth/me").unwrap().as_str(),
            "http://localhost:8000/api/auth/me"
        );
    }

    #[test]
    fn test_endpoint_keeps_path_prefix() {
        for base in ["https://example.org/learn", "https://example.org/learn/"] {
            let api = client(base);
            assert_eq!(
                api.endpoint(CURRENT_USER).unwrap().as_str(),
                "https://example.org/learn/api/auth/me"
            );
        }
    }

    #[test]
    fn test_invalid_base_url() {
        for base in ["", "localhost:8000/api", "not a url", "ftp://example.org"] {
            let result = ApiClient::new(&ApiConfig {
                base_url: base.to_string(),
                timeout_secs: 5,
            });
            assert!(
                matches!(result, Err(ApiError::InvalidUrl(_))),
                "{base:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_catalogue_endpoints_under_prefix() {
        let api = client("https://example.org/learn");
        assert_eq!(
            api.endpoint(&format!("{}/available", CatalogueKind::TrainingPackages.path()))
                .unwrap()
                .as_str(),
            "https://example.org/learn/api/training-packages/available"
        );
        assert_eq!(
            api.endpoint(&format!("{UNITS}/{}/sync", segment("BSB/CMM411")))
                .unwrap()
                .as_str(),
            "https://example.org/learn/api/units/BSBCMM411/sync"
        );
    }

    #[test]
    fn test_segment_strips_separators() {
        assert_eq!(segment("5f0c-11"), "5f0c-11");
        assert_eq!(segment("../admin"), "..admin");
        assert_eq!(segment("a/b?c#d"), "abcd");
    }

    #[test]
    fn test_extract_detail() {
        assert_eq!(
            extract_detail(r#"{"detail":"Incorrect email or password"}"#).as_deref(),
            Some("Incorrect email or password")
        );
        assert_eq!(
            extract_detail(
                r#"{"detail":[{"loc":["body","email"],"msg":"field required"},{"msg":"too short"}]}"#
            )
            .as_deref(),
            Some("field required; too short")
        );
        assert_eq!(extract_detail(r#"{"detail":[]}"#), None);
        assert_eq!(extract_detail(r#"{"error":"x"}"#), None);
        assert_eq!(extract_detail("<html>Bad Gateway</html>"), None);
    }
}
