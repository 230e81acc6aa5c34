//! # Durable key-value storage
//!
//! [`KeyValueStore`] mirrors the browser's `localStorage` contract: string
//! keys, string values, and writes that are visible as soon as the call
//! returns. Implementations never fail loudly; a backend that cannot be
//! read degrades to "nothing stored" and write failures are logged.

/// String-keyed durable storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::rc::Rc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}
