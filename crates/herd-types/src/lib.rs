//! Foundation types for Herdbook.
//!
//! This crate defines the record shape kept in the world state and the
//! canonical byte form every other crate writes and compares.
//!
//! # Key Types
//!
//! - [`Animal`] — The stored record, keyed by its `ID`
//! - [`AnimalFields`] — The seven non-key attributes supplied on create/update
//! - [`RecordDigest`] — Domain-separated BLAKE3 hash of a canonical encoding
//! - [`RecordEntry`] — A scanned value: decoded record or raw passthrough

pub mod animal;
pub mod digest;
pub mod entry;
pub mod error;

pub use animal::{Animal, AnimalFields};
pub use digest::RecordDigest;
pub use entry::RecordEntry;
pub use error::TypeError;
