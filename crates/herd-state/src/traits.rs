use crate::error::StateResult;
use crate::iter::StateIterator;

/// Accessor for the ordered key-value world state.
///
/// All implementations must satisfy these invariants:
/// - `get_state` on an absent key returns `Ok(None)`, never an error.
/// - Range scans yield entries in ascending byte order of their keys.
/// - `start` is inclusive, `end` is exclusive; an empty string leaves that
///   side of the range unbounded.
/// - Iterators returned by `get_state_by_range` hold a backend resource until
///   [`StateIterator::close`] is called.
pub trait WorldState: Send + Sync {
    /// Read the value stored under `key`.
    fn get_state(&self, key: &str) -> StateResult<Option<Vec<u8>>>;

    /// Write `value` under `key`, replacing any previous value.
    fn put_state(&self, key: &str, value: &[u8]) -> StateResult<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn delete_state(&self, key: &str) -> StateResult<()>;

    /// Open an ordered iterator over `[start, end)`.
    fn get_state_by_range(
        &self,
        start: &str,
        end: &str,
    ) -> StateResult<Box<dyn StateIterator + '_>>;
}
