use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cookie::Cookie;

use crate::jar::{is_expired, CookieJar};
use crate::kv::KeyValueStore;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory KeyValueStore for testing and as a non-persistent fallback.
/// Clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        lock(&self.entries).insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        lock(&self.entries).remove(key);
    }
}

/// In-memory CookieJar. Keeps the full [`Cookie`] so expiry is honoured.
#[derive(Clone, Debug, Default)]
pub struct MemoryCookieJar {
    cookies: Arc<Mutex<HashMap<String, Cookie<'static>>>>,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored cookie with all attributes, expired or not.
    pub fn raw(&self, name: &str) -> Option<Cookie<'static>> {
        lock(&self.cookies).get(name).cloned()
    }
}

impl CookieJar for MemoryCookieJar {
    fn get(&self, name: &str) -> Option<String> {
        let mut cookies = lock(&self.cookies);
        match cookies.get(name) {
            Some(cookie) if is_expired(cookie) => {
                cookies.remove(name);
                None
            }
            Some(cookie) => Some(cookie.value().to_string()),
            None => None,
        }
    }

    fn set(&self, cookie: Cookie<'static>) {
        let mut cookies = lock(&self.cookies);
        if is_expired(&cookie) {
            cookies.remove(cookie.name());
        } else {
            cookies.insert(cookie.name().to_string(), cookie);
        }
    }

    fn remove(&self, name: &str) {
        lock(&self.cookies).remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jar::{days_from_now, removal, site_cookie};
    use cookie::SameSite;
    use time::{Duration, OffsetDateTime};

    #[test]
    fn test_memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get("token"), None);

        store.set("token", "abc");
        assert_eq!(store.get("token"), Some("abc".to_string()));

        store.set("token", "def");
        assert_eq!(store.get("token"), Some("def".to_string()));
        assert_eq!(store.len(), 1);

        store.remove("token");
        assert_eq!(store.get("token"), None);

        // Removing a missing key is a no-op
        store.remove("token");
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_store_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("token", "abc");
        assert_eq!(other.get("token"), Some("abc".to_string()));
    }

    #[test]
    fn test_cookie_jar_keeps_attributes() {
        let jar = MemoryCookieJar::new();
        jar.set(site_cookie("guest_id", "g-1").expires(days_from_now(30)).build());

        assert_eq!(jar.get("guest_id"), Some("g-1".to_string()));
        let raw = jar.raw("guest_id").unwrap();
        assert_eq!(raw.path(), Some("/"));
        assert_eq!(raw.same_site(), Some(SameSite::Lax));
        assert!(raw.expires_datetime().is_some());
    }

    #[test]
    fn test_cookie_jar_hides_expired() {
        let jar = MemoryCookieJar::new();
        jar.set(site_cookie("guest_id", "g-1").expires(days_from_now(30)).build());
        {
            let mut cookies = lock(&jar.cookies);
            let cookie = cookies.get_mut("guest_id").unwrap();
            cookie.set_expires(OffsetDateTime::now_utc() - Duration::seconds(1));
        }
        assert_eq!(jar.get("guest_id"), None);
        assert!(jar.raw("guest_id").is_none());
    }

    #[test]
    fn test_cookie_jar_removal_cookie_deletes() {
        let jar = MemoryCookieJar::new();
        jar.set(site_cookie("guest_id", "g-1").build());
        jar.set(removal("guest_id"));
        assert_eq!(jar.get("guest_id"), None);
    }
}
