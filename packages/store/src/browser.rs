//! # Browser storage: `localStorage` and `document.cookie`
//!
//! Thin wrappers over the Web Storage and cookie APIs via [`web_sys`].
//! Both are zero-size and look up `window` on every call, so they are
//! `Clone`-friendly and safe to construct before the document is ready.
//!
//! Errors are swallowed like every other store in this crate: an
//! unavailable `localStorage` (private browsing, sandboxed iframe) reads as
//! empty and write failures are logged.

use wasm_bindgen::JsCast;
use web_sys::{HtmlDocument, Storage};

use cookie::Cookie;

use crate::jar::{find_cookie, removal, CookieJar};
use crate::kv::KeyValueStore;

/// `window.localStorage`-backed KeyValueStore.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        let Some(storage) = Self::storage() else {
            tracing::warn!("localStorage unavailable; {} not persisted", key);
            return;
        };
        if storage.set_item(key, value).is_err() {
            tracing::warn!("localStorage rejected write for {}", key);
        }
    }

    fn remove(&self, key: &str) {
        let Some(storage) = Self::storage() else {
            tracing::warn!("localStorage unavailable; {} not removed", key);
            return;
        };
        if storage.remove_item(key).is_err() {
            tracing::warn!("localStorage rejected removal of {}", key);
        }
    }
}

/// `document.cookie`-backed CookieJar.
#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentCookieJar;

impl DocumentCookieJar {
    pub fn new() -> Self {
        Self
    }

    fn document() -> Option<HtmlDocument> {
        web_sys::window()?
            .document()?
            .dyn_into::<HtmlDocument>()
            .ok()
    }
}

impl CookieJar for DocumentCookieJar {
    fn get(&self, name: &str) -> Option<String> {
        let header = Self::document()?.cookie().ok()?;
        find_cookie(&header, name)
    }

    fn set(&self, cookie: Cookie<'static>) {
        let Some(document) = Self::document() else {
            tracing::warn!("document unavailable; cookie {} not set", cookie.name());
            return;
        };
        if document.set_cookie(&cookie.to_string()).is_err() {
            tracing::warn!("Browser rejected cookie {}", cookie.name());
        }
    }

    fn remove(&self, name: &str) {
        self.set(removal(name));
    }
}
