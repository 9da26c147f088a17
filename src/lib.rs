//! Warren - a type-partitioned object store with stable, validity-checked
//! handles and reference-counted composite values.
//!
//! This crate re-exports all layers of the Warren system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: warren_storage    — slot allocation, handle-checked store, relations
//! Layer 0: warren_foundation — core types (Handle, Error)
//! ```

pub use warren_foundation as foundation;
pub use warren_storage as storage;
