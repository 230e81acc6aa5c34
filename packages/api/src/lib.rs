//! # API crate: session, route authorization and backend access for LearnOnline
//!
//! Everything the front end needs to know about who is signed in lives here,
//! independent of any UI framework so it can be tested with in-memory fakes.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`session`] | [`SessionStore`]: bearer token + user record, login/register/logout, change notifications |
//! | [`guard`] | Pure route authorizer and the [`RouteTable`] it resolves paths against |
//! | [`guest`] | [`GuestProgressBridge`]: cookie-backed guest id and progress transfer after sign-in |
//! | [`client`] | [`ApiClient`], the single typed HTTP client |
//! | [`backend`] | [`AuthApi`] / [`ProgressApi`] seams between the core and the HTTP client |
//! | [`models`] | Wire types, including admin-flag normalization on [`UserRecord`] |
//! | [`config`] | `learnonline.toml` and environment overrides |
//! | [`error`] | [`ApiError`], [`AuthError`], [`ProgressError`] |
//!
//! ## Typical wiring
//!
//! ```ignore
//! let config = ClientConfig::from_env()?;
//! let client = ApiClient::new(&config.api)?;
//! let session = Rc::new(SessionStore::new(client.clone(), storage));
//! let guest = GuestProgressBridge::with_config(client, cookies, &config.guest);
//!
//! session.login(email, password).await?;
//! if let Err(e) = guest.transfer_progress(&session).await {
//!     tracing::warn!("Guest progress transfer failed: {}", e);
//! }
//! ```

pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod guard;
pub mod guest;
pub mod models;
pub mod session;

pub use backend::{AuthApi, ProgressApi};
pub use client::ApiClient;
pub use config::{ApiConfig, ClientConfig, ConfigError, GuestConfig};
pub use error::{ApiError, AuthError, ProgressError};
pub use guard::{authorize, Navigation, RouteDescriptor, RouteTable};
pub use guest::{GuestIdentity, GuestProgressBridge, GUEST_COOKIE};
pub use models::{
    CatalogueEntry, CatalogueKind, CataloguePage, DownloadJob, GuestProgress, JobState, JobStatus,
    Level, Quest, Registration, Unit, UnitElements, UnitQuery, UserRecord,
};
pub use session::{Session, SessionObserver, SessionStore, SubscriptionId, TOKEN_KEY};
