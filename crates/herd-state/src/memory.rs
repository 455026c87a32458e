use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{StateError, StateResult};
use crate::iter::{KeyValue, StateIterator, VecStateIterator};
use crate::traits::WorldState;

/// In-memory, `BTreeMap`-based world state.
///
/// Intended for tests, embedding, and the local CLI. Range iterators copy the
/// requested range at open time and are counted until closed, so callers can
/// verify that every cursor they opened was released.
pub struct InMemoryWorldState {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
    open_cursors: Arc<AtomicUsize>,
}

impl InMemoryWorldState {
    /// Create a new empty world state.
    pub fn new() -> Self {
        Self::from_entries(BTreeMap::new())
    }

    /// Create a world state pre-populated with `entries`.
    pub fn from_entries(entries: BTreeMap<String, Vec<u8>>) -> Self {
        Self {
            entries: RwLock::new(entries),
            open_cursors: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> StateResult<usize> {
        Ok(self.read_map()?.len())
    }

    /// Returns `true` if no keys are stored.
    pub fn is_empty(&self) -> StateResult<bool> {
        Ok(self.read_map()?.is_empty())
    }

    /// All keys in ascending order.
    pub fn keys(&self) -> StateResult<Vec<String>> {
        Ok(self.read_map()?.keys().cloned().collect())
    }

    /// A copy of every stored entry.
    pub fn raw_entries(&self) -> StateResult<BTreeMap<String, Vec<u8>>> {
        Ok(self.read_map()?.clone())
    }

    /// Number of range iterators opened and not yet closed.
    pub fn open_iterators(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    fn read_map(&self) -> StateResult<RwLockReadGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.entries
            .read()
            .map_err(|e| StateError::Unavailable(format!("lock poisoned: {e}")))
    }

    fn write_map(&self) -> StateResult<RwLockWriteGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.entries
            .write()
            .map_err(|e| StateError::Unavailable(format!("lock poisoned: {e}")))
    }
}

impl Default for InMemoryWorldState {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_key(key: &str) -> StateResult<()> {
    if key.is_empty() {
        return Err(StateError::EmptyKey);
    }
    Ok(())
}

fn lower_bound(start: &str) -> Bound<&str> {
    if start.is_empty() {
        Bound::Unbounded
    } else {
        Bound::Included(start)
    }
}

fn upper_bound(end: &str) -> Bound<&str> {
    if end.is_empty() {
        Bound::Unbounded
    } else {
        Bound::Excluded(end)
    }
}

impl WorldState for InMemoryWorldState {
    fn get_state(&self, key: &str) -> StateResult<Option<Vec<u8>>> {
        validate_key(key)?;
        Ok(self.read_map()?.get(key).cloned())
    }

    fn put_state(&self, key: &str, value: &[u8]) -> StateResult<()> {
        validate_key(key)?;
        self.write_map()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete_state(&self, key: &str) -> StateResult<()> {
        validate_key(key)?;
        self.write_map()?.remove(key);
        Ok(())
    }

    fn get_state_by_range(
        &self,
        start: &str,
        end: &str,
    ) -> StateResult<Box<dyn StateIterator + '_>> {
        let map = self.read_map()?;
        // BTreeMap::range panics on inverted bounds.
        let entries = if !start.is_empty() && !end.is_empty() && start >= end {
            Vec::new()
        } else {
            map.range::<str, _>((lower_bound(start), upper_bound(end)))
                .map(|(k, v)| KeyValue::new(k.clone(), v.clone()))
                .collect()
        };
        tracing::debug!(start, end, count = entries.len(), "opened range iterator");
        Ok(Box::new(VecStateIterator::tracked(
            entries,
            Arc::clone(&self.open_cursors),
        )))
    }
}

impl std::fmt::Debug for InMemoryWorldState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryWorldState")
            .field("key_count", &self.len().ok())
            .field("open_iterators", &self.open_iterators())
            .finish()
    }
}
