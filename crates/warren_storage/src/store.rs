//! The handle-checked, type-partitioned store.
//!
//! A [`Store`] owns one [`SlotVec`] column per stored value type. Every
//! element is wrapped in a record carrying a creation stamp (drawn from
//! a store-global monotonic counter) and an owner count (the number of
//! relations currently holding the value). Handles are validated by
//! comparing both slot and stamp, so a slot reclaimed by a later
//! insertion reads as stale rather than aliasing the new occupant.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use warren_foundation::{Error, Handle, Result};

use crate::relation::{Plain, Relation, Storable};
use crate::slot::SlotVec;

/// The stored unit: a payload plus its stamp and owner count.
#[derive(Clone, Debug)]
struct Record<S> {
    stamp: u64,
    owners: u32,
    payload: S,
}

/// Type-partitioned object store with stable, validity-checked handles.
///
/// Values are partitioned into per-type columns created lazily on first
/// insert. Which types participate is fixed at declaration time: plain
/// leaf types opt in via [`Plain`], composites via the
/// [`relation!`](crate::relation!) macro. There is no runtime schema.
///
/// Expected failures (stale handle, still-owned value) come back as
/// `Option`/`bool`; the `validate`/`try_remove` variants report the
/// reason as an [`Error`].
pub struct Store {
    columns: HashMap<TypeId, Box<dyn Any>>,
    next_stamp: u64,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            columns: HashMap::new(),
            next_stamp: 0,
        }
    }

    /// Inserts a value and returns a handle to it.
    ///
    /// The value starts with no owners, so it can be removed directly.
    /// Inserting a relation first inserts each of its constituents
    /// (bottom-up, each owned by the relation under construction), then
    /// stores the tuple of child handles as the relation's payload.
    pub fn insert<K: Storable>(&mut self, value: K) -> Handle<K> {
        self.insert_with_owners(value, 0)
    }

    /// Inserts a value that starts owned by one relation.
    ///
    /// This is the composition hook used by
    /// [`Storable::decompose`] for constituents; a value inserted this
    /// way cannot be removed through its own handle until its owning
    /// relation releases it.
    pub fn insert_owned<K: Storable>(&mut self, value: K) -> Handle<K> {
        self.insert_with_owners(value, 1)
    }

    fn insert_with_owners<K: Storable>(&mut self, value: K, owners: u32) -> Handle<K> {
        // Constituents are inserted (and stamped) here, before the
        // parent record exists, so a half-built parent is never
        // observable through any handle.
        let payload = value.decompose(self);
        let stamp = self.next_stamp;
        self.next_stamp += 1;
        let slot = self.column_or_insert::<K>().add(Record {
            stamp,
            owners,
            payload,
        });
        Handle::new(stamp, slot)
    }

    /// Returns a copy of the value behind the handle.
    ///
    /// Relations are recomposed recursively from their constituents.
    /// Returns `None` for a stale or unknown handle, and for a relation
    /// any of whose child handles no longer resolve (the latter would
    /// mean the ownership invariant was broken).
    #[must_use]
    pub fn get<K: Storable>(&self, handle: Handle<K>) -> Option<K> {
        let record = self.record(handle)?;
        K::recompose(self, &record.payload)
    }

    /// Returns a mutable reference to a plain value.
    ///
    /// The borrow is scoped to the caller's use site; the borrow checker
    /// rules out holding it across a structural mutation of the store.
    /// Relations have no in-place form to borrow - use [`Store::refs`]
    /// and resolve each constituent at its point of use.
    #[must_use]
    pub fn get_mut<P: Plain>(&mut self, handle: Handle<P>) -> Option<&mut P> {
        let column = self.column_mut::<P>()?;
        let record = column.get_mut(handle.slot()).ok()?;
        if record.stamp == handle.stamp() {
            Some(&mut record.payload)
        } else {
            None
        }
    }

    /// Returns a relation's stored form: one handle per constituent, in
    /// declared field order.
    ///
    /// The returned struct is `Copy` and does not borrow the store.
    /// Constituents that are themselves relations appear as handles;
    /// another `refs` call descends one level.
    #[must_use]
    pub fn refs<R: Relation>(&self, handle: Handle<R>) -> Option<R::Stored> {
        self.record(handle).map(|record| record.payload.clone())
    }

    /// Returns whether the handle currently resolves to a live value.
    ///
    /// This is the staleness oracle: the slot must be live and the
    /// stored stamp must equal the handle's stamp.
    #[must_use]
    pub fn contains<K: Storable>(&self, handle: Handle<K>) -> bool {
        self.record(handle).is_some()
    }

    /// Checks a handle like [`Store::contains`], reporting why it fails.
    ///
    /// # Errors
    ///
    /// Returns `HandleNotFound` if the slot is free or was never
    /// allocated, `StaleHandle` if the slot was reclaimed by a later
    /// insertion.
    pub fn validate<K: Storable>(&self, handle: Handle<K>) -> Result<()> {
        let record = self
            .column::<K>()
            .and_then(|column| column.get(handle.slot()).ok())
            .ok_or_else(|| Error::handle_not_found(handle.slot(), handle.stamp()))?;
        if record.stamp == handle.stamp() {
            Ok(())
        } else {
            Err(Error::stale_handle(
                handle.slot(),
                handle.stamp(),
                record.stamp,
            ))
        }
    }

    /// Returns the number of relations currently owning the value.
    ///
    /// This is useful for debugging and testing.
    #[must_use]
    pub fn owners<K: Storable>(&self, handle: Handle<K>) -> Option<u32> {
        self.record(handle).map(|record| record.owners)
    }

    /// Removes the value behind the handle.
    ///
    /// Returns false, with no mutation, if the handle is stale or the
    /// value is still owned by a relation. Removing a relation frees its
    /// own slot first, then releases each constituent: the constituent's
    /// owner count is decremented, and it is removed (recursively) when
    /// the count reaches zero. A second removal of the same handle
    /// always returns false.
    pub fn remove<K: Storable>(&mut self, handle: Handle<K>) -> bool {
        self.try_remove(handle).is_ok()
    }

    /// Removes like [`Store::remove`], reporting why a removal fails.
    ///
    /// # Errors
    ///
    /// Returns `HandleNotFound`/`StaleHandle` when the handle does not
    /// resolve, `StillReferenced` when the value is owned by a relation.
    ///
    /// # Panics
    ///
    /// Panics only on internal column bookkeeping corruption.
    pub fn try_remove<K: Storable>(&mut self, handle: Handle<K>) -> Result<()> {
        let children = {
            let record = self
                .column::<K>()
                .and_then(|column| column.get(handle.slot()).ok())
                .ok_or_else(|| Error::handle_not_found(handle.slot(), handle.stamp()))?;
            if record.stamp != handle.stamp() {
                return Err(Error::stale_handle(
                    handle.slot(),
                    handle.stamp(),
                    record.stamp,
                ));
            }
            if record.owners > 0 {
                return Err(Error::still_referenced(handle.slot(), record.owners));
            }
            K::COMPOSITE.then(|| record.payload.clone())
        };

        // The relation's own slot is freed before any constituent is
        // touched, so the cascade never sees a half-removed parent.
        self.column_mut::<K>()
            .expect("column vanished during removal")
            .remove(handle.slot());

        if let Some(stored) = children {
            K::discard(self, &stored);
        }
        Ok(())
    }

    /// Drops one ownership of the value; removes it when none remain.
    ///
    /// This is the cascade hook used by [`Storable::discard`]. Calling
    /// it with a handle that was not obtained from a relation's stored
    /// form breaks the ownership invariant for the relation that still
    /// counts on it. Releasing a stale handle is a no-op.
    pub fn release<K: Storable>(&mut self, handle: Handle<K>) {
        let Some(record) = self.record_mut(handle) else {
            return;
        };
        record.owners = record.owners.saturating_sub(1);
        if record.owners == 0 {
            let _ = self.try_remove(handle);
        }
    }

    /// Visits every live value of a type, resolved to its owned form.
    ///
    /// Relations are recomposed before the visitor sees them; an element
    /// whose constituents fail to resolve is skipped.
    pub fn for_each<K: Storable>(&self, mut visit: impl FnMut(K)) {
        let Some(column) = self.column::<K>() else {
            return;
        };
        for (_, record) in column.iter() {
            if let Some(value) = K::recompose(self, &record.payload) {
                visit(value);
            }
        }
    }

    /// Visits every live value of a plain type by reference.
    pub fn for_each_ref<P: Plain>(&self, mut visit: impl FnMut(&P)) {
        let Some(column) = self.column::<P>() else {
            return;
        };
        for (_, record) in column.iter() {
            visit(&record.payload);
        }
    }

    /// Visits every live value of a plain type mutably, in place.
    pub fn for_each_mut<P: Plain>(&mut self, mut visit: impl FnMut(&mut P)) {
        let Some(column) = self.column_mut::<P>() else {
            return;
        };
        for (_, record) in column.iter_mut() {
            visit(&mut record.payload);
        }
    }

    /// Iterates over the handles of all live values of a type, in
    /// ascending slot order.
    pub fn handles<K: Storable>(&self) -> impl Iterator<Item = Handle<K>> + '_ {
        self.column::<K>().into_iter().flat_map(|column| {
            column
                .iter()
                .map(|(slot, record)| Handle::new(record.stamp, slot))
        })
    }

    /// Returns the number of live values of a type.
    #[must_use]
    pub fn count<K: Storable>(&self) -> usize {
        self.column::<K>().map_or(0, SlotVec::len)
    }

    /// Returns true if no live value of the type exists.
    #[must_use]
    pub fn is_empty<K: Storable>(&self) -> bool {
        self.count::<K>() == 0
    }

    /// Returns the number of types that have been inserted so far.
    #[must_use]
    pub fn types(&self) -> usize {
        self.columns.len()
    }

    fn column<K: Storable>(&self) -> Option<&SlotVec<Record<K::Stored>>> {
        self.columns
            .get(&TypeId::of::<K>())
            .and_then(|column| column.downcast_ref())
    }

    fn column_mut<K: Storable>(&mut self) -> Option<&mut SlotVec<Record<K::Stored>>> {
        self.columns
            .get_mut(&TypeId::of::<K>())
            .and_then(|column| column.downcast_mut())
    }

    fn column_or_insert<K: Storable>(&mut self) -> &mut SlotVec<Record<K::Stored>> {
        self.columns
            .entry(TypeId::of::<K>())
            .or_insert_with(|| Box::new(SlotVec::<Record<K::Stored>>::new()))
            .downcast_mut()
            .expect("column registered under the wrong type id")
    }

    fn record<K: Storable>(&self, handle: Handle<K>) -> Option<&Record<K::Stored>> {
        let column = self.column::<K>()?;
        let record = column.get(handle.slot()).ok()?;
        (record.stamp == handle.stamp()).then_some(record)
    }

    fn record_mut<K: Storable>(&mut self, handle: Handle<K>) -> Option<&mut Record<K::Stored>> {
        let column = self.column_mut::<K>()?;
        let record = column.get_mut(handle.slot()).ok()?;
        (record.stamp == handle.stamp()).then_some(record)
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("types", &self.columns.len())
            .field("next_stamp", &self.next_stamp)
            .finish_non_exhaustive()
    }
}
