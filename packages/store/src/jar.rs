//! # Cookie jars
//!
//! Cookies are plain [`cookie::Cookie`] values. Every cookie this client
//! sets goes through [`site_cookie`], which fixes `path=/` and
//! `SameSite=Lax`. [`CookieJar`] is the storage seam; [`KvCookieJar`]
//! gives native builds a persistent jar on top of any [`KeyValueStore`].

use cookie::{Cookie, CookieBuilder, SameSite};
use time::{Duration, OffsetDateTime};

use crate::kv::KeyValueStore;

const KV_PREFIX: &str = "cookie:";

/// A cookie builder with the attributes shared by every client-set cookie.
/// Without an expiry the result is a session cookie.
pub fn site_cookie(name: impl Into<String>, value: impl Into<String>) -> CookieBuilder<'static> {
    Cookie::build((name.into(), value.into()))
        .path("/")
        .same_site(SameSite::Lax)
}

pub fn days_from_now(days: i64) -> OffsetDateTime {
    OffsetDateTime::now_utc() + Duration::days(days)
}

/// An already-expired, empty cookie; writing it deletes `name`.
pub fn removal(name: impl Into<String>) -> Cookie<'static> {
    site_cookie(name, "")
        .expires(OffsetDateTime::UNIX_EPOCH)
        .build()
}

pub fn is_expired_at(cookie: &Cookie<'_>, now: OffsetDateTime) -> bool {
    matches!(cookie.expires_datetime(), Some(expires) if expires <= now)
}

pub fn is_expired(cookie: &Cookie<'_>) -> bool {
    is_expired_at(cookie, OffsetDateTime::now_utc())
}

/// Find `name` in a `Cookie:`-style header (`a=1; b=2`). Empty values
/// count as absent.
pub fn find_cookie(header: &str, name: &str) -> Option<String> {
    Cookie::split_parse(header)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

/// Storage for client-set cookies.
pub trait CookieJar {
    /// The live (unexpired) value of `name`.
    fn get(&self, name: &str) -> Option<String>;
    fn set(&self, cookie: Cookie<'static>);
    fn remove(&self, name: &str);
}

impl<T: CookieJar + ?Sized> CookieJar for std::rc::Rc<T> {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }

    fn set(&self, cookie: Cookie<'static>) {
        (**self).set(cookie)
    }

    fn remove(&self, name: &str) {
        (**self).remove(name)
    }
}

/// Cookie jar persisted through a [`KeyValueStore`], one `Set-Cookie`
/// string per cookie under `cookie:<name>`. Expired records are dropped on
/// read.
#[derive(Clone, Debug)]
pub struct KvCookieJar<K> {
    kv: K,
}

impl<K: KeyValueStore> KvCookieJar<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    fn key(name: &str) -> String {
        format!("{KV_PREFIX}{name}")
    }
}

impl<K: KeyValueStore> CookieJar for KvCookieJar<K> {
    fn get(&self, name: &str) -> Option<String> {
        let key = Self::key(name);
        let raw = self.kv.get(&key)?;
        let cookie = match Cookie::parse(raw.as_str()) {
            Ok(cookie) => cookie,
            Err(e) => {
                tracing::warn!("Discarding unreadable cookie record {}: {}", name, e);
                self.kv.remove(&key);
                return None;
            }
        };
        if is_expired(&cookie) {
            self.kv.remove(&key);
            return None;
        }
        Some(cookie.value().to_string())
    }

    fn set(&self, cookie: Cookie<'static>) {
        let key = Self::key(cookie.name());
        if is_expired(&cookie) {
            self.kv.remove(&key);
            return;
        }
        self.kv.set(&key, &cookie.to_string());
    }

    fn remove(&self, name: &str) {
        self.kv.remove(&Self::key(name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use time::macros::datetime;

    #[test]
    fn test_site_cookie_attributes() {
        let cookie = site_cookie("guest_id", "abc")
            .expires(datetime!(2026-11-17 08:30 UTC))
            .build();
        let rendered = cookie.to_string();
        assert!(rendered.starts_with("guest_id=abc"));
        assert!(rendered.contains("Path=/"));
        assert!(rendered.contains("SameSite=Lax"));
        assert!(rendered.contains("Expires=Tue, 17 Nov 2026 08:30:00 GMT"));
    }

    #[test]
    fn test_removal_cookie_is_epoch() {
        let cookie = removal("guest_id");
        assert!(is_expired(&cookie));
        assert_eq!(cookie.value(), "");
        assert!(cookie
            .to_string()
            .contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
    }

    #[test]
    fn test_days_from_now() {
        let cookie = site_cookie("guest_id", "abc")
            .expires(days_from_now(30))
            .build();
        let expires = cookie.expires_datetime().unwrap();
        let days = (expires - OffsetDateTime::now_utc()).whole_days();
        assert!((29..=30).contains(&days));
        assert!(!is_expired(&cookie));
    }

    #[test]
    fn test_session_cookie_never_expires() {
        let cookie = site_cookie("guest_id", "abc").build();
        assert!(!is_expired_at(&cookie, datetime!(2100-01-01 00:00 UTC)));
    }

    #[test]
    fn test_find_cookie() {
        let header = "theme=dark; guest_id=1234; empty=";
        assert_eq!(find_cookie(header, "guest_id"), Some("1234".to_string()));
        assert_eq!(find_cookie(header, "theme"), Some("dark".to_string()));
        assert_eq!(find_cookie(header, "empty"), None);
        assert_eq!(find_cookie(header, "guest"), None);
        assert_eq!(find_cookie("", "guest_id"), None);
    }

    #[test]
    fn test_kv_jar_roundtrip_and_namespacing() {
        let kv = MemoryStore::new();
        let jar = KvCookieJar::new(kv.clone());

        jar.set(site_cookie("guest_id", "g-1").expires(days_from_now(30)).build());
        assert_eq!(jar.get("guest_id"), Some("g-1".to_string()));
        assert!(kv.get("cookie:guest_id").is_some());
        assert!(kv.get("guest_id").is_none());

        jar.remove("guest_id");
        assert_eq!(jar.get("guest_id"), None);
        assert!(kv.get("cookie:guest_id").is_none());
    }

    #[test]
    fn test_kv_jar_drops_expired() {
        let kv = MemoryStore::new();
        let jar = KvCookieJar::new(kv.clone());

        let stale = site_cookie("guest_id", "old")
            .expires(days_from_now(-1))
            .build();
        kv.set("cookie:guest_id", &stale.to_string());

        assert_eq!(jar.get("guest_id"), None);
        assert!(kv.get("cookie:guest_id").is_none());
    }

    #[test]
    fn test_kv_jar_setting_removal_deletes() {
        let jar = KvCookieJar::new(MemoryStore::new());
        jar.set(site_cookie("guest_id", "g-1").build());
        jar.set(removal("guest_id"));
        assert_eq!(jar.get("guest_id"), None);
    }

    #[test]
    fn test_kv_jar_discards_garbage() {
        let kv = MemoryStore::new();
        kv.set("cookie:guest_id", "not a cookie");
        let jar = KvCookieJar::new(kv.clone());
        assert_eq!(jar.get("guest_id"), None);
        assert!(kv.get("cookie:guest_id").is_none());
    }
}
