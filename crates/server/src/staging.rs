//! In-memory staging cache for merge results.
//!
//! Staged merges are explicitly non-durable intermediate artifacts: entries
//! live in process memory under a fresh UUID key with a TTL, and are lost on
//! restart. An expired entry is indistinguishable from one that never existed;
//! callers observe both as absent. Do not add caller-visible expiry tracking;
//! the commit contract depends on the ambiguity.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use uuid::Uuid;

struct StagedEntry {
    payload: String,
    expires_at: Instant,
}

/// Process-wide keyed cache with per-entry expiration.
#[derive(Clone)]
pub struct StagingCache {
    entries: Arc<Mutex<HashMap<Uuid, StagedEntry>>>,
}

impl Default for StagingCache {
    fn default() -> Self {
        Self::new()
    }
}

impl StagingCache {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Store a payload under `key`, expiring after `ttl`.
    ///
    /// Overwriting an existing key is allowed but never exercised by the merge
    /// pipeline, which generates a fresh key per request.
    pub fn put(&self, key: Uuid, payload: String, ttl: Duration) {
        let entry = StagedEntry {
            payload,
            expires_at: Instant::now() + ttl,
        };
        self.entries
            .lock()
            .expect("staging cache lock poisoned")
            .insert(key, entry);
    }

    /// Fetch the payload under `key`, or `None` if absent or expired.
    ///
    /// Expired entries are dropped on observation.
    pub fn get(&self, key: Uuid) -> Option<String> {
        let mut entries = self.entries.lock().expect("staging cache lock poisoned");
        match entries.get(&key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.payload.clone()),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    /// Delete the entry under `key`. Deleting an absent key is not an error.
    pub fn delete(&self, key: Uuid) {
        self.entries
            .lock()
            .expect("staging cache lock poisoned")
            .remove(&key);
    }

    /// Number of live (possibly expired-but-unswept) entries.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .expect("staging cache lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all expired entries now.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock().expect("staging cache lock poisoned");
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    /// Spawn a background task that sweeps expired entries periodically, so
    /// abandoned merges do not accumulate until someone happens to `get` them.
    pub fn spawn_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                let swept = cache.sweep();
                if swept > 0 {
                    tracing::debug!(swept, "Swept expired staged merges");
                }
            }
        })
    }
}
