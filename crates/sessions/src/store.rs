//! Session store contract + in-memory implementation.
//!
//! The store is the only shared mutable resource in the system. Writes
//! are last-write-wins and reads carry no lock or re-validation; the
//! flows are written to stay correct when two events for the same
//! customer interleave (the loser of a consume race sees "absent").

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use sf_domain::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Contract
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Shared key-value store with per-entry TTL.
///
/// The TTL is an explicit parameter on every write so each key family
/// carries its own expiry policy; there is no ambient default.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read a value, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, unconditionally replacing any existing one.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Delete a value. Deleting an absent key is a no-op.
    async fn delete(&self, key: &str) -> Result<()>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// In-memory store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

struct Entry {
    value: String,
    expires_at: DateTime<Utc>,
}

/// In-memory `SessionStore` with lazy expiry.
///
/// Expired entries are dropped on the read path rather than by a
/// background sweeper; the entry count here is bounded by the number of
/// customers mid-flow.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = Utc::now();

        // Fast path: live entry under the read lock.
        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if entry.expires_at > now => {
                    return Ok(Some(entry.value.clone()));
                }
                Some(_) => {} // expired, fall through to remove
            }
        }

        let mut entries = self.entries.write();
        if let Some(entry) = entries.get(key) {
            if entry.expires_at <= now {
                entries.remove(key);
                tracing::debug!(key = %key, "expired session entry dropped");
            }
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| Error::Store(format!("ttl out of range: {e}")))?;
        let entry = Entry {
            value: value.to_owned(),
            expires_at: Utc::now() + ttl,
        };
        self.entries.write().insert(key.to_owned(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
