//! The AVL balancing layer.

use std::fmt;
use std::iter::FromIterator;

use compare::{natural, Compare, Natural};

use crate::bst::{OrderedTree, Removed};
use crate::check::InvariantViolation;
use crate::iter::{InOrder, IntoIter, LevelOrder};
use crate::node::{adjust_height, balance_factor, height, Link, NodePtr};
#[cfg(feature = "stats")]
use crate::stats::RotationStats;

/// An ordered set of unique items kept balanced as an AVL tree.
///
/// The heights of the two subtrees of every node differ by at most one, so
/// insert, find and delete take O(log n) in the worst case. Structural edits
/// are done by the wrapped [`OrderedTree`]; this layer maintains heights and
/// repairs the balance with rotations afterwards.
///
/// ```
/// use avl_core::AvlTree;
/// let mut tree = AvlTree::new();
/// for item in 1..=7 {
///     tree.insert(item);
/// }
/// assert_eq!(tree.height(), 3);
/// assert_eq!(tree.level_order().copied().collect::<Vec<_>>(), [4, 2, 6, 1, 3, 5, 7]);
/// assert!(tree.delete(&4));
/// assert_eq!(tree.find(&4), None);
/// ```
pub struct AvlTree<T, C = Natural<T>> {
    pub(crate) tree: OrderedTree<T, C>,
    #[cfg(feature = "stats")]
    stats: RotationStats,
}

impl<T: Ord> AvlTree<T> {
    /// Creates an empty tree ordered by `T`'s [`Ord`] impl.
    /// No memory is allocated until the first item is inserted.
    pub fn new() -> Self {
        Self::with_comparator(natural())
    }
}

impl<T, C> AvlTree<T, C> {
    /// Returns true if the tree contains no items.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the number of items in the tree.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns the number of levels, 0 for an empty tree.
    pub fn height(&self) -> usize {
        height(self.tree.root)
    }

    /// Returns the comparator that orders this tree.
    pub fn comparator(&self) -> &C {
        self.tree.comparator()
    }

    /// Removes all items, deallocating all memory.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the smallest item.
    pub fn first(&self) -> Option<&T> {
        self.tree.first()
    }

    /// Returns the largest item.
    pub fn last(&self) -> Option<&T> {
        self.tree.last()
    }

    /// Gets an iterator over the items in ascending order.
    pub fn in_order(&self) -> InOrder<'_, T> {
        self.tree.in_order()
    }

    /// Gets an iterator over the items level by level, from the root down
    /// and left to right within a level.
    pub fn level_order(&self) -> LevelOrder<'_, T> {
        self.tree.level_order()
    }

    /// Same as [`in_order`](Self::in_order).
    pub fn iter(&self) -> InOrder<'_, T> {
        self.tree.in_order()
    }

    /// Returns how many rotations of each kind this tree has performed.
    #[cfg(feature = "stats")]
    pub fn rotation_stats(&self) -> &RotationStats {
        &self.stats
    }
}

impl<T, C: Compare<T>> AvlTree<T, C> {
    /// Creates an empty tree ordered by `cmp`.
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            tree: OrderedTree::with_comparator(cmp),
            #[cfg(feature = "stats")]
            stats: RotationStats::default(),
        }
    }

    /// Inserts an item.
    /// Returns false, dropping `item`, if an equal item is already present.
    pub fn insert(&mut self, item: T) -> bool {
        let node_ptr = match self.tree.insert_node(item) {
            Some(node_ptr) => node_ptr,
            None => return false,
        };
        self.rebalance_once(unsafe { node_ptr.as_ref().parent });
        #[cfg(feature = "consistency_check")]
        self.check_consistency();
        true
    }

    /// Returns a reference to the stored item equal to `item`.
    pub fn find(&self, item: &T) -> Option<&T> {
        self.tree.find(item)
    }

    /// Returns true if an item equal to `item` is present.
    pub fn contains(&self, item: &T) -> bool {
        self.tree.contains(item)
    }

    /// Removes the item equal to `item`.
    /// Returns whether such an item was present.
    pub fn delete(&mut self, item: &T) -> bool {
        self.take(item).is_some()
    }

    /// Removes the item equal to `item` and returns it.
    pub fn take(&mut self, item: &T) -> Option<T> {
        let Removed { item, repair_from } = self.tree.remove_node(item)?;
        self.rebalance(repair_from);
        #[cfg(feature = "consistency_check")]
        self.check_consistency();
        Some(item)
    }

    /// Checks ordering, parent links, node count, stored heights and the AVL
    /// balance of every node.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        self.tree.validate_structure(true)
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        if let Err(violation) = self.validate() {
            panic!("inconsistent tree: {violation}");
        }
    }

    /// Rebalances nodes starting from given position up to the root node.
    /// A removal can shrink a subtree even after a rotation fixed it, so
    /// every ancestor is visited.
    fn rebalance(&mut self, start_from: Link<T>) {
        let mut current = start_from;
        while let Some(node_ptr) = current {
            let parent = unsafe { node_ptr.as_ref().parent };
            self.rebalance_node(node_ptr);
            current = parent;
        }
    }

    /// Rebalances nodes starting from given position up to the root node.
    /// Stops once a subtree height is unchanged or after the first rotation,
    /// which is enough to restore balance after a single insert.
    fn rebalance_once(&mut self, start_from: Link<T>) {
        let mut current = start_from;
        while let Some(node_ptr) = current {
            let parent = unsafe { node_ptr.as_ref().parent };
            adjust_height(node_ptr);
            match balance_factor(node_ptr) {
                0 => break,
                -1 | 1 => current = parent,
                _ => {
                    self.rebalance_node(node_ptr);
                    break;
                }
            }
        }
    }

    /// Adjusts the height of given node and restores its balance if necessary.
    fn rebalance_node(&mut self, node_ptr: NodePtr<T>) {
        adjust_height(node_ptr);
        let (left, right) = unsafe { (node_ptr.as_ref().left, node_ptr.as_ref().right) };
        match (balance_factor(node_ptr), left, right) {
            (-2, Some(left_ptr), _) => {
                if balance_factor(left_ptr) <= 0 {
                    self.rotate_right(node_ptr);
                } else {
                    self.rotate_left_right(node_ptr);
                }
            }
            (2, _, Some(right_ptr)) => {
                if balance_factor(right_ptr) >= 0 {
                    self.rotate_left(node_ptr);
                } else {
                    self.rotate_right_left(node_ptr);
                }
            }
            (balance, _, _) => debug_assert!((-1..=1).contains(&balance)),
        }
    }

    fn rotate_left(&mut self, mut node_ptr: NodePtr<T>) {
        unsafe {
            if let Some(mut right_ptr) = node_ptr.as_ref().right {
                log::trace!("rotate left, subtree height {}", node_ptr.as_ref().height);
                #[cfg(feature = "stats")]
                {
                    self.stats.left += 1;
                }

                node_ptr.as_mut().right = right_ptr.as_ref().left;
                if let Some(mut right_left_ptr) = right_ptr.as_ref().left {
                    right_left_ptr.as_mut().parent = Some(node_ptr);
                }

                let parent = node_ptr.as_ref().parent;
                self.tree.replace_child(parent, node_ptr, Some(right_ptr));

                right_ptr.as_mut().left = Some(node_ptr);
                node_ptr.as_mut().parent = Some(right_ptr);

                adjust_height(node_ptr);
                adjust_height(right_ptr);
            }
        }
    }

    fn rotate_right(&mut self, mut node_ptr: NodePtr<T>) {
        unsafe {
            if let Some(mut left_ptr) = node_ptr.as_ref().left {
                log::trace!("rotate right, subtree height {}", node_ptr.as_ref().height);
                #[cfg(feature = "stats")]
                {
                    self.stats.right += 1;
                }

                node_ptr.as_mut().left = left_ptr.as_ref().right;
                if let Some(mut left_right_ptr) = left_ptr.as_ref().right {
                    left_right_ptr.as_mut().parent = Some(node_ptr);
                }

                let parent = node_ptr.as_ref().parent;
                self.tree.replace_child(parent, node_ptr, Some(left_ptr));

                left_ptr.as_mut().right = Some(node_ptr);
                node_ptr.as_mut().parent = Some(left_ptr);

                adjust_height(node_ptr);
                adjust_height(left_ptr);
            }
        }
    }

    //       N            F
    //      / \         /   \
    //     B   d  ->   B     N
    //    / \         / \   / \
    //   a   F       a   b c   d
    //      / \
    //     b   c
    fn rotate_left_right(&mut self, mut node_ptr: NodePtr<T>) {
        unsafe {
            let Some(mut left_ptr) = node_ptr.as_ref().left else {
                return;
            };
            let Some(mut pivot_ptr) = left_ptr.as_ref().right else {
                return;
            };
            log::trace!("rotate left-right, subtree height {}", node_ptr.as_ref().height);
            #[cfg(feature = "stats")]
            {
                self.stats.left_right += 1;
            }

            let parent = node_ptr.as_ref().parent;
            self.tree.replace_child(parent, node_ptr, Some(pivot_ptr));

            left_ptr.as_mut().right = pivot_ptr.as_ref().left;
            if let Some(mut moved_ptr) = pivot_ptr.as_ref().left {
                moved_ptr.as_mut().parent = Some(left_ptr);
            }
            node_ptr.as_mut().left = pivot_ptr.as_ref().right;
            if let Some(mut moved_ptr) = pivot_ptr.as_ref().right {
                moved_ptr.as_mut().parent = Some(node_ptr);
            }

            pivot_ptr.as_mut().left = Some(left_ptr);
            left_ptr.as_mut().parent = Some(pivot_ptr);
            pivot_ptr.as_mut().right = Some(node_ptr);
            node_ptr.as_mut().parent = Some(pivot_ptr);

            adjust_height(node_ptr);
            adjust_height(left_ptr);
            if !(-1..=1).contains(&balance_factor(left_ptr)) {
                self.repair_pivot_child(left_ptr);
            }
            adjust_height(pivot_ptr);
        }
    }

    //     N              F
    //    / \           /   \
    //   a   B    ->   N     B
    //      / \       / \   / \
    //     F   d     a   b c   d
    //    / \
    //   b   c
    fn rotate_right_left(&mut self, mut node_ptr: NodePtr<T>) {
        unsafe {
            let Some(mut right_ptr) = node_ptr.as_ref().right else {
                return;
            };
            let Some(mut pivot_ptr) = right_ptr.as_ref().left else {
                return;
            };
            log::trace!("rotate right-left, subtree height {}", node_ptr.as_ref().height);
            #[cfg(feature = "stats")]
            {
                self.stats.right_left += 1;
            }

            let parent = node_ptr.as_ref().parent;
            self.tree.replace_child(parent, node_ptr, Some(pivot_ptr));

            right_ptr.as_mut().left = pivot_ptr.as_ref().right;
            if let Some(mut moved_ptr) = pivot_ptr.as_ref().right {
                moved_ptr.as_mut().parent = Some(right_ptr);
            }
            node_ptr.as_mut().right = pivot_ptr.as_ref().left;
            if let Some(mut moved_ptr) = pivot_ptr.as_ref().left {
                moved_ptr.as_mut().parent = Some(node_ptr);
            }

            pivot_ptr.as_mut().right = Some(right_ptr);
            right_ptr.as_mut().parent = Some(pivot_ptr);
            pivot_ptr.as_mut().left = Some(node_ptr);
            node_ptr.as_mut().parent = Some(pivot_ptr);

            adjust_height(node_ptr);
            adjust_height(right_ptr);
            if !(-1..=1).contains(&balance_factor(right_ptr)) {
                self.repair_pivot_child(right_ptr);
            }
            adjust_height(pivot_ptr);
        }
    }

    // Outer node of a double rotation still out of balance.
    fn repair_pivot_child(&mut self, node_ptr: NodePtr<T>) {
        log::trace!("repairing outer node of a double rotation");
        #[cfg(feature = "stats")]
        {
            self.stats.nested_repairs += 1;
        }
        self.rebalance_node(node_ptr);
    }
}

impl<T: Ord> Default for AvlTree<T> {
    /// Creates an empty tree.
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, C: Clone> Clone for AvlTree<T, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
            #[cfg(feature = "stats")]
            stats: self.stats,
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for AvlTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.in_order()).finish()
    }
}

impl<T: Ord> FromIterator<T> for AvlTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<T, C: Compare<T>> Extend<T> for AvlTree<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(move |item| {
            self.insert(item);
        });
    }
}

impl<'a, T, C> IntoIterator for &'a AvlTree<T, C> {
    type Item = &'a T;
    type IntoIter = InOrder<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.in_order()
    }
}

impl<T, C> IntoIterator for AvlTree<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;
    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_iter()
    }
}
