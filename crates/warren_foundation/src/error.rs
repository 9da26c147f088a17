//! Error types for the Warren system.
//!
//! Uses `thiserror` for ergonomic error definition.
//!
//! Expected failures (stale handles, still-referenced removals) are
//! surfaced by the store as `Option`/`bool` results so they stay cheap
//! to check in hot loops; the `Result`-returning operation variants use
//! these types to report why a check failed.

use thiserror::Error;

/// Convenience alias for results carrying a warren [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Warren operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Creates an invalid slot error.
    #[must_use]
    pub fn invalid_slot(slot: u64, len: u64) -> Self {
        Self::new(ErrorKind::InvalidSlot { slot, len })
    }

    /// Creates a handle not found error.
    #[must_use]
    pub fn handle_not_found(slot: u64, stamp: u64) -> Self {
        Self::new(ErrorKind::HandleNotFound { slot, stamp })
    }

    /// Creates a stale handle error.
    #[must_use]
    pub fn stale_handle(slot: u64, stamp: u64, current: u64) -> Self {
        Self::new(ErrorKind::StaleHandle {
            slot,
            stamp,
            current,
        })
    }

    /// Creates a still-referenced error.
    #[must_use]
    pub fn still_referenced(slot: u64, owners: u32) -> Self {
        Self::new(ErrorKind::StillReferenced { slot, owners })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Direct slot access hit a hole or ran past the backing length.
    ///
    /// This is internal to the slot allocator layer; the handle-checked
    /// store never surfaces it.
    #[error("invalid slot: {slot} (backing length {len})")]
    InvalidSlot {
        /// The slot that was accessed.
        slot: u64,
        /// The backing length of the allocator, holes included.
        len: u64,
    },

    /// Handle points at a slot that is not live.
    #[error("handle not found: slot {slot}, stamp {stamp}")]
    HandleNotFound {
        /// The slot the handle points at.
        slot: u64,
        /// The stamp the handle carries.
        stamp: u64,
    },

    /// Handle's slot is live but was reclaimed by a later insertion.
    #[error("stale handle: slot {slot} holds stamp {current}, handle carries {stamp}")]
    StaleHandle {
        /// The slot the handle points at.
        slot: u64,
        /// The stamp the handle carries.
        stamp: u64,
        /// The stamp of the value currently occupying the slot.
        current: u64,
    },

    /// Removal refused because relations still own the value.
    #[error("still referenced: slot {slot} is owned by {owners} relation(s)")]
    StillReferenced {
        /// The slot the handle points at.
        slot: u64,
        /// The number of relations currently owning the value.
        owners: u32,
    },

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}
