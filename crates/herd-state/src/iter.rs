use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::{StateError, StateResult};

/// One entry yielded by a range scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Cursor over a range of the world state.
///
/// The cursor holds a backend resource from the moment it is opened until
/// `close` is called. Callers must close it on every exit path.
pub trait StateIterator {
    /// Next entry in key order, or `Ok(None)` once the range is exhausted.
    fn next_entry(&mut self) -> StateResult<Option<KeyValue>>;

    /// Release the cursor. Calling `close` more than once is a no-op.
    fn close(&mut self) -> StateResult<()>;

    fn is_closed(&self) -> bool;
}

/// Iterator over a pre-materialized list of entries.
///
/// When built with an open-cursor counter, the counter is decremented exactly
/// once, on the first `close`.
#[derive(Debug)]
pub struct VecStateIterator {
    entries: std::vec::IntoIter<KeyValue>,
    open_cursors: Option<Arc<AtomicUsize>>,
    closed: bool,
}

impl VecStateIterator {
    pub fn new(entries: Vec<KeyValue>) -> Self {
        Self {
            entries: entries.into_iter(),
            open_cursors: None,
            closed: false,
        }
    }

    /// Build an iterator that registers itself in `open_cursors`.
    pub fn tracked(entries: Vec<KeyValue>, open_cursors: Arc<AtomicUsize>) -> Self {
        open_cursors.fetch_add(1, Ordering::SeqCst);
        Self {
            entries: entries.into_iter(),
            open_cursors: Some(open_cursors),
            closed: false,
        }
    }
}

impl StateIterator for VecStateIterator {
    fn next_entry(&mut self) -> StateResult<Option<KeyValue>> {
        if self.closed {
            return Err(StateError::Iterator("iterator already closed".into()));
        }
        Ok(self.entries.next())
    }

    fn close(&mut self) -> StateResult<()> {
        if !self.closed {
            self.closed = true;
            if let Some(counter) = self.open_cursors.take() {
                counter.fetch_sub(1, Ordering::SeqCst);
            }
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
