use herd_state::WorldState;

/// Per-invocation handle on the world state.
///
/// The execution environment builds a fresh `Context` for every call and the
/// contract never retains it.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    stub: &'a dyn WorldState,
}

impl<'a> Context<'a> {
    pub fn new(stub: &'a dyn WorldState) -> Self {
        Self { stub }
    }

    /// The world-state accessor for this invocation.
    pub fn stub(&self) -> &'a dyn WorldState {
        self.stub
    }
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context").finish_non_exhaustive()
    }
}
