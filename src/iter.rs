//! Traversal iterators shared by both trees.

use std::collections::VecDeque;
use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::node::{Link, Node, NodePtr};

/// An iterator over the items of a tree in ascending order.
///
/// Walks with an explicit stack of pending ancestors, never recursing.
pub struct InOrder<'a, T> {
    stack: Vec<NodePtr<T>>,
    remaining: usize,
    _marker: PhantomData<&'a T>,
}

/// An iterator over the items of a tree in breadth-first order.
pub struct LevelOrder<'a, T> {
    queue: VecDeque<NodePtr<T>>,
    remaining: usize,
    _marker: PhantomData<&'a T>,
}

/// An owning iterator over the items of a tree in ascending order.
///
/// Nodes are freed as soon as their item has been handed out.
pub struct IntoIter<T> {
    stack: Vec<NodePtr<T>>,
    remaining: usize,
    _marker: PhantomData<Box<Node<T>>>,
}

fn push_left_spine<T>(stack: &mut Vec<NodePtr<T>>, mut link: Link<T>) {
    while let Some(node_ptr) = link {
        stack.push(node_ptr);
        link = unsafe { node_ptr.as_ref().left };
    }
}

impl<'a, T> InOrder<'a, T> {
    pub(crate) fn new(root: Link<T>, len: usize) -> Self {
        let mut stack = Vec::new();
        push_left_spine(&mut stack, root);
        Self {
            stack,
            remaining: len,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for InOrder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node_ptr = self.stack.pop()?;
        let node = unsafe { &*node_ptr.as_ptr() };
        push_left_spine(&mut self.stack, node.right);
        self.remaining -= 1;
        Some(&node.item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for InOrder<'_, T> {}

impl<T> FusedIterator for InOrder<'_, T> {}

// Auto derived clone seems to have an invalid type bound of T: Clone
impl<T> Clone for InOrder<'_, T> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            remaining: self.remaining,
            _marker: PhantomData,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for InOrder<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T> LevelOrder<'a, T> {
    pub(crate) fn new(root: Link<T>, len: usize) -> Self {
        // An empty tree must not seed the queue
        let queue = root.into_iter().collect();
        Self {
            queue,
            remaining: len,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for LevelOrder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node_ptr = self.queue.pop_front()?;
        let node = unsafe { &*node_ptr.as_ptr() };
        self.queue.extend(node.left);
        self.queue.extend(node.right);
        self.remaining -= 1;
        Some(&node.item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for LevelOrder<'_, T> {}

impl<T> FusedIterator for LevelOrder<'_, T> {}

impl<T> Clone for LevelOrder<'_, T> {
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
            remaining: self.remaining,
            _marker: PhantomData,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for LevelOrder<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<T> IntoIter<T> {
    pub(crate) fn new(root: Link<T>, len: usize) -> Self {
        let mut stack = Vec::new();
        push_left_spine(&mut stack, root);
        Self {
            stack,
            remaining: len,
            _marker: PhantomData,
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let node_ptr = self.stack.pop()?;
        // The left subtree is gone already and the right one is read before the node is freed
        push_left_spine(&mut self.stack, unsafe { node_ptr.as_ref().right });
        self.remaining -= 1;
        Some(unsafe { Node::destroy(node_ptr) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        self.by_ref().for_each(drop);
    }
}

impl<T> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("IntoIter")
            .field("remaining", &self.remaining)
            .finish()
    }
}

unsafe impl<T: Sync> Send for InOrder<'_, T> {}
unsafe impl<T: Sync> Sync for InOrder<'_, T> {}
unsafe impl<T: Sync> Send for LevelOrder<'_, T> {}
unsafe impl<T: Sync> Sync for LevelOrder<'_, T> {}
unsafe impl<T: Send> Send for IntoIter<T> {}
unsafe impl<T: Sync> Sync for IntoIter<T> {}
