//! Typed handles with creation stamps.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Copyable reference to a value stored in a warren store.
///
/// A handle pairs the slot position where the value lives with the
/// creation stamp it was minted under. Stamps are drawn from a
/// store-global monotonic counter and never reused, so a handle whose
/// slot has been reclaimed by a later insertion reads as stale rather
/// than silently pointing at the new occupant.
///
/// Handles do not own anything and are `Copy` regardless of `T`.
///
/// # Layout
/// - `stamp`: 64-bit creation stamp
/// - `slot`: 64-bit slot position within the value type's column
pub struct Handle<T> {
    stamp: u64,
    slot: u64,
    marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// Creates a handle from a creation stamp and a slot position.
    #[must_use]
    pub const fn new(stamp: u64, slot: u64) -> Self {
        Self {
            stamp,
            slot,
            marker: PhantomData,
        }
    }

    /// Returns a sentinel value referring to no stored value.
    ///
    /// This uses `u64::MAX` as the slot, which is never allocated.
    #[must_use]
    pub const fn null() -> Self {
        Self::new(0, u64::MAX)
    }

    /// Returns true if this is the null sentinel value.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.slot == u64::MAX
    }

    /// The creation stamp this handle was minted under.
    #[must_use]
    pub const fn stamp(self) -> u64 {
        self.stamp
    }

    /// The slot position this handle points at.
    #[must_use]
    pub const fn slot(self) -> u64 {
        self.slot
    }
}

// Manual impls so `Handle<T>` is a plain value type even when `T` is not.

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.stamp == other.stamp && self.slot == other.slot
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.stamp.hash(state);
        self.slot.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Handle(null)")
        } else {
            write!(f, "Handle({}@{})", self.slot, self.stamp)
        }
    }
}

impl<T> fmt::Display for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Handle(null)")
        } else {
            write!(f, "Handle({})", self.slot)
        }
    }
}
