//! Animal record contract for Herdbook.
//!
//! [`AnimalContract`] is a thin facade over a [`herd_state::WorldState`]
//! borrowed through a per-invocation [`Context`]. It provides:
//! - Existence-gated create, update, and delete
//! - Raw and decoded single-record reads
//! - Full-range enumeration that degrades undecodable values to raw bytes
//! - Transaction metadata and a string-argument dispatcher ([`invoke()`])

pub mod context;
pub mod contract;
pub mod error;
pub mod guard;
pub mod invoke;
pub mod metadata;

pub use context::Context;
pub use contract::AnimalContract;
pub use error::{ContractError, ContractResult};
pub use guard::ScanGuard;
pub use invoke::{invoke, InvokeError, InvokeResponse};
pub use metadata::{TransactionInfo, TransactionKind, TRANSACTIONS};

pub use herd_types::{Animal, AnimalFields, RecordDigest, RecordEntry};
