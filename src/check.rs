//! Invariant checks for both trees.
//!
//! None of this runs on the hot path unless the `consistency_check` feature
//! asks for it; the test suite calls it after every mutation.

use std::cmp::{self, Ordering};

use compare::Compare;
use thiserror::Error;

use crate::bst::OrderedTree;
use crate::node::{height, NodePtr};

/// A broken tree invariant.
///
/// Positions count nodes in pre-order from the root at 0, except for
/// [`OutOfOrder`](Self::OutOfOrder) which counts in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("root node has a parent link")]
    RootHasParent,
    #[error("child of node {position} does not link back to it")]
    ParentMismatch { position: usize },
    #[error("item {position} in ascending order is not greater than its predecessor")]
    OutOfOrder { position: usize },
    #[error("node {position} stores height {stored}, expected {expected}")]
    HeightMismatch {
        position: usize,
        stored: usize,
        expected: usize,
    },
    #[error("node {position} has balance factor {balance}")]
    Unbalanced { position: usize, balance: isize },
    #[error("tree records {recorded} nodes but {counted} are reachable")]
    CountMismatch { recorded: usize, counted: usize },
}

impl<T, C: Compare<T>> OrderedTree<T, C> {
    /// Checks ordering, parent links and the node count.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        self.validate_structure(false)
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        if let Err(violation) = self.validate() {
            panic!("inconsistent tree: {violation}");
        }
    }

    /// Walks every node; with `balanced` set, stored heights and balance
    /// factors are checked too.
    pub(crate) fn validate_structure(&self, balanced: bool) -> Result<(), InvariantViolation> {
        if let Some(root_ptr) = self.root {
            if unsafe { root_ptr.as_ref().parent }.is_some() {
                return Err(InvariantViolation::RootHasParent);
            }
        }

        let mut counted = 0;
        let mut pending: Vec<NodePtr<T>> = self.root.into_iter().collect();
        while let Some(node_ptr) = pending.pop() {
            let position = counted;
            counted += 1;

            let node = unsafe { node_ptr.as_ref() };
            for child_ptr in node.left.iter().chain(node.right.iter()) {
                if unsafe { child_ptr.as_ref().parent } != Some(node_ptr) {
                    return Err(InvariantViolation::ParentMismatch { position });
                }
            }

            if balanced {
                let left_height = height(node.left);
                let right_height = height(node.right);
                let expected = cmp::max(left_height, right_height) + 1;
                if node.height != expected {
                    return Err(InvariantViolation::HeightMismatch {
                        position,
                        stored: node.height,
                        expected,
                    });
                }
                let balance = right_height as isize - left_height as isize;
                if !(-1..=1).contains(&balance) {
                    return Err(InvariantViolation::Unbalanced { position, balance });
                }
            }

            // Right first so the left subtree is visited next
            pending.extend(node.right);
            pending.extend(node.left);
        }

        if counted != self.num_nodes {
            return Err(InvariantViolation::CountMismatch {
                recorded: self.num_nodes,
                counted,
            });
        }

        // Strictly ascending in-order sequence is equivalent to the search-tree property
        let mut items = self.in_order();
        if let Some(mut previous) = items.next() {
            for (index, item) in items.enumerate() {
                if self.compare(previous, item) != Ordering::Less {
                    return Err(InvariantViolation::OutOfOrder {
                        position: index + 1,
                    });
                }
                previous = item;
            }
        }

        Ok(())
    }
}
