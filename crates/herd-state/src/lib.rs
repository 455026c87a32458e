//! World-state access for Herdbook.
//!
//! The world state is an ordered mapping from string keys to opaque byte
//! values. It is owned by the execution environment and lent to the contract
//! for the duration of one invocation.
//!
//! # Backends
//!
//! All backends implement the [`WorldState`] trait:
//!
//! - [`InMemoryWorldState`] -- `BTreeMap`-based state for tests, embedding,
//!   and the snapshot-backed CLI
//!
//! # Design Rules
//!
//! 1. The state never interprets values -- it is a pure key-value store.
//! 2. Range scans yield keys in ascending byte order.
//! 3. Every iterator handed out must be closed; closing twice is a no-op.
//! 4. All backend errors are propagated, never silently ignored.

pub mod error;
pub mod iter;
pub mod memory;
pub mod snapshot;
pub mod traits;

pub use error::{StateError, StateResult};
pub use iter::{KeyValue, StateIterator, VecStateIterator};
pub use memory::InMemoryWorldState;
pub use snapshot::StateSnapshot;
pub use traits::WorldState;
