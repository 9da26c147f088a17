//! Value-category declarations: plain leaf types and relations.
//!
//! A store distinguishes exactly two categories of value, fixed at
//! declaration time:
//!
//! - **Plain** types opt in via the [`Plain`] marker and are stored
//!   as-is.
//! - **Relations** are declared with the [`relation!`](crate::relation!)
//!   macro and are stored as a tuple of handles to their constituents,
//!   which the store inserts, resolves, and releases recursively.
//!
//! Both categories funnel through the [`Storable`] trait; the store has
//! one code path per operation and the category difference lives in the
//! trait impl, not in runtime tags.

use crate::store::Store;

/// A value the store can hold.
///
/// Do not implement this directly: plain types get it through the
/// blanket impl over [`Plain`], composite types through the
/// [`relation!`](crate::relation!) macro.
pub trait Storable: Sized + 'static {
    /// The representation kept in the column slot: the value itself for
    /// plain types, a struct of constituent handles for relations.
    type Stored: Clone + 'static;

    /// Whether the stored form holds child handles that must cascade on
    /// removal.
    const COMPOSITE: bool;

    /// Converts the value into its stored form, inserting constituents
    /// into the store bottom-up.
    fn decompose(self, store: &mut Store) -> Self::Stored;

    /// Rebuilds an owned value from the stored form, resolving
    /// constituents recursively. `None` if any constituent handle no
    /// longer resolves.
    fn recompose(store: &Store, stored: &Self::Stored) -> Option<Self>;

    /// Releases whatever the stored form owns. Called by the store
    /// after the value's own slot has been freed.
    fn discard(store: &mut Store, stored: &Self::Stored);
}

/// Marker for plain leaf value types, stored by value.
///
/// Implementing `Plain` is the declaration that a type participates in
/// a store as a leaf. Scalar primitives and `String` are pre-declared.
pub trait Plain: Clone + 'static {}

impl<T: Plain> Storable for T {
    type Stored = T;
    const COMPOSITE: bool = false;

    fn decompose(self, _store: &mut Store) -> T {
        self
    }

    fn recompose(_store: &Store, stored: &T) -> Option<T> {
        Some(stored.clone())
    }

    fn discard(_store: &mut Store, _stored: &T) {}
}

/// Marker for composite types declared with
/// [`relation!`](crate::relation!).
///
/// A type is a relation purely by carrying this declaration; the store
/// keeps no runtime tag.
pub trait Relation: Storable {}

macro_rules! impl_plain {
    ($($ty:ty),* $(,)?) => {
        $(impl Plain for $ty {})*
    };
}

impl_plain!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, String,
);

/// Declares a composite value type stored as handles to its
/// constituents.
///
/// Generates three things: the value struct itself (public fields, for
/// construction and recomposition), a `Copy` stored-form struct with one
/// [`Handle`](crate::Handle) per field in declared order, and the
/// [`Storable`] + [`Relation`] impls wiring both into a
/// [`Store`](crate::Store).
///
/// Constituent types must be declared themselves, either [`Plain`] or
/// via another `relation!` (relations nest arbitrarily).
///
/// # Example
///
/// ```
/// use warren_storage::{Plain, Store};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Position { x: f32, y: f32 }
/// impl Plain for Position {}
///
/// warren_storage::relation! {
///     /// A named thing at a position.
///     pub struct Marker => MarkerRefs {
///         label: String,
///         position: Position,
///     }
/// }
///
/// let mut store = Store::new();
/// let marker = store.insert(Marker {
///     label: "camp".to_string(),
///     position: Position { x: 1.0, y: 2.0 },
/// });
/// let refs = store.refs(marker).unwrap();
/// assert_eq!(store.get(refs.label).as_deref(), Some("camp"));
/// ```
#[macro_export]
macro_rules! relation {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident => $refs:ident {
            $( $(#[$field_meta:meta])* $field:ident : $constituent:ty ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq)]
        $vis struct $name {
            $( $(#[$field_meta])* pub $field : $constituent, )+
        }

        #[doc = concat!(
            "Stored form of [`", stringify!($name),
            "`]: one handle per constituent, in declared order."
        )]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        $vis struct $refs {
            $(
                #[doc = concat!("Handle to the `", stringify!($field), "` constituent.")]
                pub $field : $crate::Handle<$constituent>,
            )+
        }

        impl $crate::Storable for $name {
            type Stored = $refs;
            const COMPOSITE: bool = true;

            fn decompose(self, store: &mut $crate::Store) -> Self::Stored {
                $refs {
                    $( $field : store.insert_owned(self.$field), )+
                }
            }

            fn recompose(store: &$crate::Store, stored: &Self::Stored) -> Option<Self> {
                Some(Self {
                    $( $field : store.get(stored.$field)?, )+
                })
            }

            fn discard(store: &mut $crate::Store, stored: &Self::Stored) {
                $( store.release(stored.$field); )+
            }
        }

        impl $crate::Relation for $name {}
    };
}
