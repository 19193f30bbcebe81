//! Session persistence seam.
//!
//! [`crate::RestBackend`] serializes the current session to JSON and hands it
//! to a [`SessionStorage`]. The browser build plugs in `localStorage`; native
//! builds and tests use [`MemoryStorage`].

use std::sync::Mutex;

/// Key/value store for the serialized session.
pub trait SessionStorage: Send + Sync {
    fn load(&self, key: &str) -> Option<String>;
    fn store(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Process-local storage; sessions do not survive a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entry: Mutex<Option<(String, String)>>,
}

impl SessionStorage for MemoryStorage {
    fn load(&self, key: &str) -> Option<String> {
        let entry = self.entry.lock().ok()?;
        entry.as_ref().filter(|(k, _)| k == key).map(|(_, v)| v.clone())
    }

    fn store(&self, key: &str, value: &str) {
        if let Ok(mut entry) = self.entry.lock() {
            *entry = Some((key.to_owned(), value.to_owned()));
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entry) = self.entry.lock() {
            if entry.as_ref().is_some_and(|(k, _)| k == key) {
                *entry = None;
            }
        }
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
