//! Client-side persistence for LearnOnline.
//!
//! Two small abstractions sit here, each with a browser-backed and a native
//! implementation:
//!
//! | Trait | Browser | Native | Tests |
//! |-------|---------|--------|-------|
//! | [`KeyValueStore`] | [`LocalStorageStore`] | [`FileStore`] | [`MemoryStore`] |
//! | [`CookieJar`] | [`DocumentCookieJar`] | [`KvCookieJar`] over a [`FileStore`] | [`MemoryCookieJar`] |
//!
//! Both traits are synchronous: `localStorage` and `document.cookie` are
//! synchronous in the browser, and callers (logout in particular) rely on a
//! write being visible as soon as the call returns.

pub mod jar;
pub mod kv;

mod file_store;
mod memory;
pub use file_store::FileStore;
pub use memory::{MemoryCookieJar, MemoryStore};

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod browser;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use browser::{DocumentCookieJar, LocalStorageStore};

pub use cookie::{Cookie, SameSite};
pub use jar::{days_from_now, removal, site_cookie, CookieJar, KvCookieJar};
pub use kv::KeyValueStore;
