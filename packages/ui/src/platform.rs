//! Platform wiring for the session core.
//!
//! Picks the storage backends the session store and guest bridge run on:
//! - **Web** (WASM + `web` feature): `localStorage` and `document.cookie`
//! - **Desktop / Mobile** (native): files under `<data_dir>/learnonline/`,
//!   with cookies persisted as JSON records through [`store::KvCookieJar`]

use api::{ApiClient, ApiError, ClientConfig, GuestProgressBridge, SessionStore};

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub type PlatformStore = store::LocalStorageStore;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub type PlatformCookies = store::DocumentCookieJar;

#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
pub type PlatformStore = store::FileStore;
#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
pub type PlatformCookies = store::KvCookieJar<store::FileStore>;

pub type AppSession = SessionStore<ApiClient, PlatformStore>;
pub type AppGuestBridge = GuestProgressBridge<ApiClient, PlatformCookies>;

/// `<data_dir>/learnonline`, or `./learnonline` when the platform has no
/// data directory.
#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
pub fn data_dir() -> std::path::PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("learnonline")
}

/// Load configuration for this platform.
///
/// Native builds read `<data_dir>/learnonline/learnonline.toml` if present,
/// then apply `.env` and environment overrides. Browser builds use the
/// defaults, with the API URL optionally baked in at compile time through
/// `LEARNONLINE_API_URL`. An unusable file or override is logged and skipped.
pub fn load_config() -> ClientConfig {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        ClientConfig::default()
            .with_overrides(|var| match var {
                api::config::API_URL_VAR => option_env!("LEARNONLINE_API_URL").map(String::from),
                _ => None,
            })
            .unwrap_or_else(|e| {
                tracing::warn!("Ignoring build-time API override: {}", e);
                ClientConfig::default()
            })
    }
    #[cfg(not(all(target_arch = "wasm32", feature = "web")))]
    {
        let path = data_dir().join(ClientConfig::filename());
        let config = match std::fs::read_to_string(&path) {
            Ok(text) => ClientConfig::from_toml(&text).unwrap_or_else(|e| {
                tracing::warn!("Ignoring {}: {}", path.display(), e);
                ClientConfig::default()
            }),
            Err(_) => ClientConfig::default(),
        };
        config.clone().apply_env().unwrap_or_else(|e| {
            tracing::warn!("Ignoring environment override: {}", e);
            config
        })
    }
}

/// Build the session store and guest bridge on the platform backends. Both
/// share one HTTP client.
pub fn make_session(config: &ClientConfig) -> Result<(AppSession, AppGuestBridge), ApiError> {
    let client = ApiClient::new(&config.api)?;
    tracing::info!("Using API at {}", client.base_url());

    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    let (storage, cookies) = (store::LocalStorageStore::new(), store::DocumentCookieJar::new());
    #[cfg(not(all(target_arch = "wasm32", feature = "web")))]
    let (storage, cookies) = {
        let base = data_dir();
        (
            store::FileStore::new(base.clone()),
            store::KvCookieJar::new(store::FileStore::new(base)),
        )
    };

    let session = SessionStore::new(client.clone(), storage);
    let guest = GuestProgressBridge::with_config(client, cookies, &config.guest);
    Ok((session, guest))
}
