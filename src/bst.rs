//! The structural binary search tree.

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

use compare::{natural, Compare, Natural};

use crate::iter::{InOrder, IntoIter, LevelOrder};
use crate::node::{Direction, Link, LinkPtr, Node, NodePtr};

/// An unbalanced binary search tree of unique items.
///
/// Items are ordered by the comparator `C` fixed at construction. Equal items
/// are rejected on insert. The tree keeps no balance, so a sorted insert
/// sequence degenerates it into a list; [`AvlTree`](crate::AvlTree) adds the
/// balancing on top of these structural operations.
///
/// ```
/// use avl_core::OrderedTree;
/// let mut tree = OrderedTree::new();
/// assert!(tree.insert(2));
/// assert!(tree.insert(1));
/// assert!(!tree.insert(2));
/// assert_eq!(tree.find(&1), Some(&1));
/// assert!(tree.delete(&1));
/// assert!(tree.find(&1).is_none());
/// ```
pub struct OrderedTree<T, C = Natural<T>> {
    pub(crate) root: Link<T>,
    pub(crate) num_nodes: usize,
    cmp: C,
    _marker: PhantomData<Box<Node<T>>>,
}

/// What a structural delete leaves behind.
pub(crate) struct Removed<T> {
    pub(crate) item: T,
    /// Lowest node whose subtree changed shape; height repair starts here.
    pub(crate) repair_from: Link<T>,
}

impl<T: Ord> OrderedTree<T> {
    /// Creates an empty tree ordered by `T`'s [`Ord`] impl.
    /// No memory is allocated until the first item is inserted.
    pub fn new() -> Self {
        Self::with_comparator(natural())
    }
}

impl<T, C> OrderedTree<T, C> {
    /// Returns true if the tree contains no items.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of items in the tree.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns the number of levels, 0 for an empty tree.
    ///
    /// The plain tree stores no heights, so this walks every node.
    pub fn height(&self) -> usize {
        let mut levels = 0;
        let mut queue = VecDeque::new();
        if let Some(root_ptr) = self.root {
            queue.push_back(root_ptr);
        }
        while !queue.is_empty() {
            levels += 1;
            for _ in 0..queue.len() {
                if let Some(node_ptr) = queue.pop_front() {
                    let node = unsafe { node_ptr.as_ref() };
                    queue.extend(node.left);
                    queue.extend(node.right);
                }
            }
        }
        levels
    }

    /// Returns the comparator that orders this tree.
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Removes all items, deallocating all memory.
    pub fn clear(&mut self) {
        self.postorder(|node_ptr| {
            drop(unsafe { Node::destroy(node_ptr) });
        });
        self.root = None;
        self.num_nodes = 0;
    }

    /// Returns the smallest item.
    pub fn first(&self) -> Option<&T> {
        let mut node_ptr = self.root?;
        while let Some(left_ptr) = unsafe { node_ptr.as_ref().left } {
            node_ptr = left_ptr;
        }
        Some(&unsafe { &*node_ptr.as_ptr() }.item)
    }

    /// Returns the largest item.
    pub fn last(&self) -> Option<&T> {
        let mut node_ptr = self.root?;
        while let Some(right_ptr) = unsafe { node_ptr.as_ref().right } {
            node_ptr = right_ptr;
        }
        Some(&unsafe { &*node_ptr.as_ptr() }.item)
    }

    /// Gets an iterator over the items in ascending order.
    pub fn in_order(&self) -> InOrder<'_, T> {
        InOrder::new(self.root, self.num_nodes)
    }

    /// Gets an iterator over the items level by level, from the root down
    /// and left to right within a level.
    pub fn level_order(&self) -> LevelOrder<'_, T> {
        LevelOrder::new(self.root, self.num_nodes)
    }

    /// Same as [`in_order`](Self::in_order).
    pub fn iter(&self) -> InOrder<'_, T> {
        self.in_order()
    }

    /// Replaces `old` in the child slot of `parent` (or the root slot) by `new`
    /// and points `new` back at `parent`.
    pub(crate) fn replace_child(&mut self, parent: Link<T>, old: NodePtr<T>, new: Link<T>) {
        unsafe {
            match parent {
                None => self.root = new,
                Some(mut parent_ptr) => {
                    if parent_ptr.as_ref().left == Some(old) {
                        parent_ptr.as_mut().left = new;
                    } else {
                        debug_assert!(parent_ptr.as_ref().right == Some(old));
                        parent_ptr.as_mut().right = new;
                    }
                }
            }
            if let Some(mut new_ptr) = new {
                new_ptr.as_mut().parent = parent;
            }
        }
    }

    pub(crate) fn postorder<F: FnMut(NodePtr<T>)>(&self, f: F) {
        self.traverse(|_| {}, |_| {}, f);
    }

    fn traverse<Pre, In, Post>(&self, mut preorder: Pre, mut inorder: In, mut postorder: Post)
    where
        Pre: FnMut(NodePtr<T>),
        In: FnMut(NodePtr<T>),
        Post: FnMut(NodePtr<T>),
    {
        if let Some(mut node_ptr) = self.root {
            let mut dir = Direction::FromParent;
            loop {
                match dir {
                    Direction::FromParent => {
                        preorder(node_ptr);
                        if let Some(left_ptr) = unsafe { node_ptr.as_ref().left } {
                            node_ptr = left_ptr;
                        } else {
                            dir = Direction::FromLeft;
                        }
                    }
                    Direction::FromLeft => {
                        inorder(node_ptr);
                        if let Some(right_ptr) = unsafe { node_ptr.as_ref().right } {
                            node_ptr = right_ptr;
                            dir = Direction::FromParent;
                        } else {
                            dir = Direction::FromRight;
                        }
                    }
                    Direction::FromRight => {
                        // Post order traversal is used for node deletion,
                        // so make sure not to use node pointer after postorder call.
                        if let Some(parent_ptr) = unsafe { node_ptr.as_ref().parent } {
                            if Some(node_ptr) == unsafe { parent_ptr.as_ref().left } {
                                dir = Direction::FromLeft;
                            } else {
                                dir = Direction::FromRight;
                            }
                            postorder(node_ptr);
                            node_ptr = parent_ptr;
                        } else {
                            postorder(node_ptr);
                            break;
                        }
                    }
                }
            }
        }
    }
}

impl<T, C: Compare<T>> OrderedTree<T, C> {
    /// Creates an empty tree ordered by `cmp`.
    ///
    /// ```
    /// use avl_core::OrderedTree;
    /// let mut tree = OrderedTree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// tree.extend([1, 3, 2]);
    /// assert_eq!(tree.in_order().copied().collect::<Vec<_>>(), [3, 2, 1]);
    /// ```
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            root: None,
            num_nodes: 0,
            cmp,
            _marker: PhantomData,
        }
    }

    /// Inserts an item.
    /// Returns false, dropping `item`, if an equal item is already present.
    pub fn insert(&mut self, item: T) -> bool {
        let inserted = self.insert_node(item).is_some();
        #[cfg(feature = "consistency_check")]
        self.check_consistency();
        inserted
    }

    /// Returns a reference to the stored item equal to `item`.
    pub fn find(&self, item: &T) -> Option<&T> {
        self.find_node(item)
            .map(|node_ptr| &unsafe { &*node_ptr.as_ptr() }.item)
    }

    /// Returns true if an item equal to `item` is present.
    pub fn contains(&self, item: &T) -> bool {
        self.find_node(item).is_some()
    }

    /// Removes the item equal to `item`.
    /// Returns whether such an item was present.
    pub fn delete(&mut self, item: &T) -> bool {
        self.take(item).is_some()
    }

    /// Removes the item equal to `item` and returns it.
    pub fn take(&mut self, item: &T) -> Option<T> {
        let removed = self.remove_node(item).map(|removed| removed.item);
        #[cfg(feature = "consistency_check")]
        self.check_consistency();
        removed
    }

    pub(crate) fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        self.cmp.compare(lhs, rhs)
    }

    pub(crate) fn find_node(&self, item: &T) -> Link<T> {
        let mut current = self.root;
        while let Some(node_ptr) = current {
            current = unsafe {
                match self.cmp.compare(item, &node_ptr.as_ref().item) {
                    Ordering::Equal => break,
                    Ordering::Less => node_ptr.as_ref().left,
                    Ordering::Greater => node_ptr.as_ref().right,
                }
            }
        }
        current
    }

    /// Attaches `item` as a new leaf and returns it, or `None` on a duplicate.
    pub(crate) fn insert_node(&mut self, item: T) -> Link<T> {
        let (parent, mut link_ptr) = self.find_insert_pos(&item)?;
        let node_ptr = Node::create(parent, item);
        unsafe {
            *link_ptr.as_mut() = Some(node_ptr);
        }
        self.num_nodes += 1;
        Some(node_ptr)
    }

    /// Unlinks and frees the node equal to `item`.
    pub(crate) fn remove_node(&mut self, item: &T) -> Option<Removed<T>> {
        let node_ptr = self.find_node(item)?;
        debug_assert!(self.num_nodes >= 1);
        let repair_from = self.unlink_node(node_ptr);
        let item = unsafe { Node::destroy(node_ptr) };
        self.num_nodes -= 1;
        Some(Removed { item, repair_from })
    }

    fn find_insert_pos(&mut self, item: &T) -> Option<(Link<T>, LinkPtr<T>)> {
        let mut parent: Link<T> = None;
        let mut link_ptr: LinkPtr<T> = NonNull::from(&mut self.root);
        unsafe {
            while let Some(mut node_ptr) = *link_ptr.as_ref() {
                parent = Some(node_ptr);
                link_ptr = match self.cmp.compare(item, &node_ptr.as_ref().item) {
                    Ordering::Equal => return None,
                    Ordering::Less => NonNull::from(&mut node_ptr.as_mut().left),
                    Ordering::Greater => NonNull::from(&mut node_ptr.as_mut().right),
                };
            }
        }
        Some((parent, link_ptr))
    }

    /// Takes `node_ptr` out of the tree and returns where height repair has to start.
    fn unlink_node(&mut self, node_ptr: NodePtr<T>) -> Link<T> {
        let (parent, left, right) = unsafe {
            let node = node_ptr.as_ref();
            (node.parent, node.left, node.right)
        };
        match (left, right) {
            (None, None) => {
                log::trace!("unlinking leaf");
                self.replace_child(parent, node_ptr, None);
                parent
            }
            (Some(child_ptr), None) | (None, Some(child_ptr)) => {
                log::trace!("unlinking node with a single child");
                self.replace_child(parent, node_ptr, Some(child_ptr));
                parent
            }
            (Some(mut left_ptr), Some(mut right_ptr)) => unsafe {
                // In-order predecessor: rightmost node of the left subtree
                let mut pred_ptr = left_ptr;
                while let Some(next_ptr) = pred_ptr.as_ref().right {
                    pred_ptr = next_ptr;
                }

                let repair_from = if pred_ptr == left_ptr {
                    // Predecessor keeps its left subtree and moves up one level
                    log::trace!("unlinking node with two children, predecessor is left child");
                    Some(pred_ptr)
                } else {
                    // Predecessor is a right child with at most a left child
                    log::trace!("unlinking node with two children, predecessor is deeper");
                    let pred_parent = pred_ptr.as_ref().parent;
                    self.replace_child(pred_parent, pred_ptr, pred_ptr.as_ref().left);
                    pred_ptr.as_mut().left = Some(left_ptr);
                    left_ptr.as_mut().parent = Some(pred_ptr);
                    pred_parent
                };

                pred_ptr.as_mut().right = Some(right_ptr);
                right_ptr.as_mut().parent = Some(pred_ptr);
                self.replace_child(parent, node_ptr, Some(pred_ptr));
                repair_from
            },
        }
    }
}

impl<T, C> Drop for OrderedTree<T, C> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: Ord> Default for OrderedTree<T> {
    /// Creates an empty tree.
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, C: Clone> Clone for OrderedTree<T, C> {
    fn clone(&self) -> Self {
        let mut tree = Self {
            root: None,
            num_nodes: 0,
            cmp: self.cmp.clone(),
            _marker: PhantomData,
        };

        // (source node, slot to fill in the copy, parent of that slot)
        let mut pending: Vec<(NodePtr<T>, LinkPtr<T>, Link<T>)> = Vec::new();
        if let Some(root_ptr) = self.root {
            pending.push((root_ptr, NonNull::from(&mut tree.root), None));
        }
        while let Some((source_ptr, mut slot_ptr, parent)) = pending.pop() {
            unsafe {
                let source = source_ptr.as_ref();
                let mut copy_ptr = Node::create(parent, source.item.clone());
                copy_ptr.as_mut().height = source.height;
                *slot_ptr.as_mut() = Some(copy_ptr);
                tree.num_nodes += 1;
                if let Some(left_ptr) = source.left {
                    let slot = NonNull::from(&mut copy_ptr.as_mut().left);
                    pending.push((left_ptr, slot, Some(copy_ptr)));
                }
                if let Some(right_ptr) = source.right {
                    let slot = NonNull::from(&mut copy_ptr.as_mut().right);
                    pending.push((right_ptr, slot, Some(copy_ptr)));
                }
            }
        }
        tree
    }
}

impl<T: fmt::Debug, C> fmt::Debug for OrderedTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.in_order()).finish()
    }
}

impl<T: Ord> FromIterator<T> for OrderedTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<T, C: Compare<T>> Extend<T> for OrderedTree<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(move |item| {
            self.insert(item);
        });
    }
}

impl<'a, T, C> IntoIterator for &'a OrderedTree<T, C> {
    type Item = &'a T;
    type IntoIter = InOrder<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.in_order()
    }
}

impl<T, C> IntoIterator for OrderedTree<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;
    fn into_iter(mut self) -> Self::IntoIter {
        let root = self.root.take();
        let len = std::mem::replace(&mut self.num_nodes, 0);
        IntoIter::new(root, len)
    }
}

// The tree owns its nodes exclusively, like a `Box<T>` would.
unsafe impl<T: Send, C: Send> Send for OrderedTree<T, C> {}
unsafe impl<T: Sync, C: Sync> Sync for OrderedTree<T, C> {}
