//! Ordered containers of unique items built in two layers.
//!
//! [`OrderedTree`] is a plain binary search tree: structural insert, find
//! and delete (replacing a node with two children by its in-order
//! predecessor), plus in-order and level-order traversal.
//! [`AvlTree`] wraps it, keeps a height in every node and restores the AVL
//! balance with single and double rotations after each mutation, bounding
//! every operation to O(log n).
//!
//! Both trees are ordered by a [`Compare`] implementation fixed at
//! construction: [`Natural`] by default, a closure, or [`PartialOrdered`].
//!
//! ```
//! use avl_core::AvlTree;
//!
//! let mut tree = AvlTree::new();
//! for key in [20, 10, 5, 3, 1] {
//!     assert!(tree.insert(key));
//! }
//! assert!(!tree.insert(5));
//! assert_eq!(tree.len(), 5);
//! assert_eq!(tree.in_order().copied().collect::<Vec<_>>(), [1, 3, 5, 10, 20]);
//! assert!(tree.validate().is_ok());
//! ```
//!
//! # Features
//!
//! - `consistency_check`: validate every invariant after each mutation.
//! - `stats`: count the rotations performed by an [`AvlTree`].

mod avl;
mod bst;
mod check;
pub mod iter;
mod node;
pub mod ordering;
#[cfg(feature = "stats")]
mod stats;

pub use avl::AvlTree;
pub use bst::OrderedTree;
pub use check::InvariantViolation;
pub use ordering::{Compare, Natural, PartialOrdered};
#[cfg(feature = "stats")]
pub use stats::RotationStats;
