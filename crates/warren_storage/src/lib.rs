//! Slot allocation and the handle-checked object store for Warren.
//!
//! This crate provides:
//! - [`SlotVec`] - Dense storage with stable slots and hole reuse
//! - [`Store`] - Type-partitioned store with stamped, owner-counted records
//! - [`Storable`], [`Plain`], [`Relation`] - value-category declarations
//! - [`relation!`] - declaration macro for composite value types

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod relation;
mod slot;
mod store;

pub use relation::{Plain, Relation, Storable};
pub use slot::SlotVec;
pub use store::Store;
pub use warren_foundation::{Error, ErrorKind, Handle, Result};
