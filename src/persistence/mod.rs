//! Best-effort persistence of the committed counter value
//!
//! Layout: one key (`counter-value`), value is the decimal integer as text.
//! Storage failures degrade to an in-memory counter and are only logged.

#[cfg(target_arch = "wasm32")]
pub mod local;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::StoreError;

/// Durable key-value surface
pub trait Store {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store. Clones share the same entries, so a clone kept aside
/// outlives a dropped counter the way LocalStorage outlives a page.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects every read and write
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Raw stored text, bypassing availability
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable);
        }
        Ok(self.peek(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable);
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Parse stored text as an integer count.
///
/// Accepts decimal integers and finite whole numbers (`"7.0"`, `"1e2"`).
pub fn parse_stored(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(value) = raw.parse::<i64>() {
        return Some(value);
    }
    let value = raw.parse::<f64>().ok()?;
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    if value.is_finite() && value.fract() == 0.0 && in_range {
        Some(value as i64)
    } else {
        None
    }
}

/// A store bound to one key, with the hydration guard
pub struct Persistence {
    store: Box<dyn Store>,
    key: String,
    hydrated: bool,
}

impl Persistence {
    pub fn new(store: Box<dyn Store>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            hydrated: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Read the stored value once. Writes are refused until this has run.
    pub fn hydrate(&mut self) -> Option<i64> {
        self.hydrated = true;

        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::info!("No stored value under '{}'", self.key);
                return None;
            }
            Err(e) => {
                log::warn!("{} - counter will not persist", e);
                return None;
            }
        };

        match parse_stored(&raw) {
            Some(value) => {
                log::info!("Loaded stored value {} from '{}'", value, self.key);
                Some(value)
            }
            None => {
                if !raw.trim().is_empty() {
                    log::warn!("Ignoring unparseable stored value {:?}", raw);
                }
                None
            }
        }
    }

    /// Write a committed value
    pub fn commit(&mut self, value: i64) {
        if !self.hydrated {
            log::warn!("Refusing to write '{}' before hydration", self.key);
            return;
        }
        if let Err(e) = self.store.set(&self.key, &value.to_string()) {
            log::warn!("Failed to persist counter value: {}", e);
        }
    }
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence")
            .field("key", &self.key)
            .field("hydrated", &self.hydrated)
            .finish()
    }
}
