use dashmap::DashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

/// Keyed rows that remember insertion order. Overwriting a row keeps its
/// original position.
pub(crate) struct Table<K: Eq + Hash, V> {
    rows: DashMap<K, (u64, V)>,
    sequence: AtomicU64,
}

impl<K: Eq + Hash + Clone, V: Clone> Table<K, V> {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn upsert(&self, key: K, value: V) {
        self.rows
            .entry(key)
            .and_modify(|(_, row)| *row = value.clone())
            .or_insert_with(|| (self.sequence.fetch_add(1, Ordering::SeqCst), value.clone()));
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.rows.get(key).map(|r| r.1.clone())
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.rows.remove(key).map(|(_, (_, v))| v)
    }

    pub fn find(&self, predicate: impl Fn(&V) -> bool) -> Option<V> {
        self.rows
            .iter()
            .find(|r| predicate(&r.value().1))
            .map(|r| r.value().1.clone())
    }

    /// Rows in insertion order
    pub fn values(&self) -> Vec<V> {
        let mut rows: Vec<(u64, V)> = self.rows.iter().map(|r| r.value().clone()).collect();
        rows.sort_by_key(|(seq, _)| *seq);
        rows.into_iter().map(|(_, v)| v).collect()
    }
}
