//! Key-value cache interface shared by the Term Cache and the Document Cache,
//! plus an in-process implementation.

use instant::Instant;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::linker::error::{LinkerError, Result};

/// String key-value store with optional expiry.
///
/// `ttl: None` keeps the value until it is deleted.
pub trait KeyValueCache: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()>;
    fn delete(&self, key: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
struct Slot {
    value: String,
    expires_at: Option<Instant>,
}

impl Slot {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

/// In-process cache. An expired slot is evicted when it is read, and every
/// write sweeps the rest; slots without a TTL stay until deleted.
#[derive(Debug, Default)]
pub struct MemoryCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) slots
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.slots
            .lock()
            .map(|slots| slots.values().filter(|s| !s.is_expired(now)).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) -> Result<()> {
        self.lock()?.clear();
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Slot>>> {
        self.slots
            .lock()
            .map_err(|_| LinkerError::cache("memory cache lock poisoned"))
    }
}

impl KeyValueCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut slots = self.lock()?;
        match slots.get(key) {
            Some(slot) if slot.is_expired(Instant::now()) => {
                slots.remove(key);
                Ok(None)
            }
            Some(slot) => Ok(Some(slot.value.clone())),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let now = Instant::now();
        let expires_at = ttl.map(|ttl| now + ttl);
        let mut slots = self.lock()?;
        slots.retain(|_, slot| !slot.is_expired(now));
        slots.insert(
            key.to_string(),
            Slot {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
