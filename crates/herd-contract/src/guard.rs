use herd_state::{KeyValue, StateIterator, StateResult, WorldState};

/// Scoped owner of a range iterator.
///
/// The cursor is closed by [`ScanGuard::finish`] on the success path and by
/// `Drop` on every other path (early `?` return, panic unwind).
pub struct ScanGuard<'a> {
    inner: Box<dyn StateIterator + 'a>,
}

impl<'a> ScanGuard<'a> {
    /// Open `[start, end)` on `state`.
    pub fn open(state: &'a dyn WorldState, start: &str, end: &str) -> StateResult<Self> {
        Ok(Self {
            inner: state.get_state_by_range(start, end)?,
        })
    }

    pub fn next_entry(&mut self) -> StateResult<Option<KeyValue>> {
        self.inner.next_entry()
    }

    /// Close the cursor and surface any error from doing so.
    pub fn finish(mut self) -> StateResult<()> {
        self.inner.close()
    }
}

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        if self.inner.is_closed() {
            return;
        }
        if let Err(e) = self.inner.close() {
            tracing::warn!(error = %e, "failed to close range iterator");
        }
    }
}
