//! Orderings a tree can be built with.
//!
//! Trees are generic over a [`Compare`] implementation chosen once at
//! construction. [`Natural`] (the default) uses the item's [`Ord`] impl,
//! any `Fn(&T, &T) -> Ordering` closure works as a custom comparator, and
//! [`PartialOrdered`] admits [`PartialOrd`] items such as floats.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

pub use compare::{natural, Compare, Natural};

/// Orders items through their [`PartialOrd`] impl.
///
/// Items that do not compare (for example `f64::NAN` against anything) are a
/// caller error, not a tree state.
///
/// # Panics
///
/// [`compare`](Compare::compare) panics when `partial_cmp` returns `None`.
///
/// ```
/// use avl_core::{AvlTree, PartialOrdered};
///
/// let mut tree = AvlTree::with_comparator(PartialOrdered::new());
/// tree.insert(2.5_f64);
/// tree.insert(-1.0);
/// assert_eq!(tree.in_order().copied().collect::<Vec<_>>(), [-1.0, 2.5]);
/// ```
pub struct PartialOrdered<T: PartialOrd + ?Sized>(PhantomData<fn(&T, &T)>);

impl<T: PartialOrd + ?Sized> PartialOrdered<T> {
    pub fn new() -> Self {
        PartialOrdered(PhantomData)
    }
}

impl<T: PartialOrd + ?Sized> Compare<T> for PartialOrdered<T> {
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        match lhs.partial_cmp(rhs) {
            Some(ordering) => ordering,
            None => panic!("incomparable items"),
        }
    }
}

impl<T: PartialOrd + ?Sized> Default for PartialOrdered<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Derives would require `T: Clone` and `T: Debug`.
impl<T: PartialOrd + ?Sized> Clone for PartialOrdered<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: PartialOrd + ?Sized> Copy for PartialOrdered<T> {}

impl<T: PartialOrd + ?Sized> fmt::Debug for PartialOrdered<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("PartialOrdered")
    }
}
