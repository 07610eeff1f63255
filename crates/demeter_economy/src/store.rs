//! # Row-Locked Tables
//!
//! The in-memory equivalent of `SELECT ... FOR UPDATE`: each record sits
//! behind its own mutex, and a unit of work holds every row lock it needs
//! until it commits or aborts.
//!
//! The table map itself is only locked long enough to fetch the row's
//! `Arc` - never across a row lock - so map contention stays negligible
//! and the only blocking that matters is per row.
//!
//! Deadlock safety is by convention, not machinery: every unit of work
//! acquires rows in the fixed order user, land, inventory.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

/// A keyed set of independently lockable rows.
#[derive(Debug)]
pub struct Table<K, V> {
    rows: RwLock<HashMap<K, Arc<Mutex<V>>>>,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Copy, V> Table<K, V> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts a row. Returns false (and leaves the table unchanged) if
    /// the key is already present - rows are never silently replaced.
    pub fn insert(&self, key: K, value: V) -> bool {
        let mut rows = self.rows.write();
        if rows.contains_key(&key) {
            return false;
        }
        rows.insert(key, Arc::new(Mutex::new(value)));
        true
    }

    /// Fetches the row handle for a key.
    ///
    /// The map guard is dropped before returning; the caller locks the
    /// row itself.
    #[must_use]
    pub fn row(&self, key: K) -> Option<Arc<Mutex<V>>> {
        self.rows.read().get(&key).cloned()
    }

    /// True if the key exists.
    #[must_use]
    pub fn contains(&self, key: K) -> bool {
        self.rows.read().contains_key(&key)
    }

    /// Snapshot of all keys. Rows inserted afterwards are not included;
    /// bulk sweeps tolerate that by construction.
    #[must_use]
    pub fn keys(&self) -> Vec<K> {
        self.rows.read().keys().copied().collect()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    /// True if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}
