//! This crate contains all shared UI for the workspace.

mod platform;
pub use platform::{load_config, make_session, AppGuestBridge, AppSession, PlatformCookies, PlatformStore};
#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
pub use platform::data_dir;

mod auth;
pub use auth::{
    spawn_guest_transfer, use_guest_bridge, use_session, use_session_store, LogoutButton,
    SessionHandle, SessionProvider, SessionState,
};

mod navbar;
pub use navbar::Navbar;
