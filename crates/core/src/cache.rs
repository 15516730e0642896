//! Concurrent TTL cache.
//!
//! Used for statistics and assessments that are expensive to recompute but
//! only meaningful for a bounded window. Entries are lazily expired on read
//! and can be swept in bulk by a background task.

use std::hash::Hash;
use std::time::{Duration, Instant};

use dashmap::DashMap;

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

/// A concurrent map whose entries expire after a fixed time-to-live.
///
/// Reads of expired entries behave as misses and remove the entry. Writers
/// always overwrite, resetting the clock.
pub struct TtlCache<K, V> {
    entries: DashMap<K, Entry<V>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Creates an empty cache with the given time-to-live.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Returns a clone of the live value for `key`, if any.
    ///
    /// An expired entry is removed and reported as a miss.
    pub fn get(&self, key: &K) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key);
        }
        None
    }

    /// Inserts or replaces the value for `key`, resetting its TTL.
    pub fn insert(&self, key: K, value: V) {
        self.entries.insert(
            key,
            Entry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Removes the entry for `key`, returning its value if it was live.
    pub fn remove(&self, key: &K) -> Option<V> {
        let (_, entry) = self.entries.remove(key)?;
        if entry.inserted_at.elapsed() < self.ttl {
            Some(entry.value)
        } else {
            None
        }
    }

    /// Drops every expired entry. Returns the number removed.
    pub fn sweep(&self) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.inserted_at.elapsed() < self.ttl);
        before - self.entries.len()
    }

    /// Number of entries currently stored, including not-yet-swept expired
    /// ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }
}
