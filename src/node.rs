use std::cmp;
use std::ptr::NonNull;

pub(crate) type NodePtr<T> = NonNull<Node<T>>;
pub(crate) type Link<T> = Option<NodePtr<T>>;
pub(crate) type LinkPtr<T> = NonNull<Link<T>>;

/// A tree vertex.
///
/// `left` and `right` are owned by the tree through this node, `parent` is a
/// navigational back-reference only and never frees anything.
pub(crate) struct Node<T> {
    pub(crate) item: T,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
    pub(crate) parent: Link<T>,
    // Leaf height is 1, an absent child counts as 0.
    pub(crate) height: usize,
}

impl<T> Node<T> {
    pub(crate) fn create(parent: Link<T>, item: T) -> NodePtr<T> {
        let boxed = Box::new(Node {
            item,
            parent,
            left: None,
            right: None,
            height: 1,
        });
        NonNull::from(Box::leak(boxed))
    }

    /// Frees the node and hands back its item.
    ///
    /// # Safety
    ///
    /// `node_ptr` must come from [`Node::create`], must already be unlinked
    /// from its tree and must not be used afterwards.
    pub(crate) unsafe fn destroy(node_ptr: NodePtr<T>) -> T {
        Box::from_raw(node_ptr.as_ptr()).item
    }
}

pub(crate) fn height<T>(link: Link<T>) -> usize {
    match link {
        None => 0,
        Some(node_ptr) => unsafe { node_ptr.as_ref().height },
    }
}

pub(crate) fn left_height<T>(node_ptr: NodePtr<T>) -> usize {
    height(unsafe { node_ptr.as_ref().left })
}

pub(crate) fn right_height<T>(node_ptr: NodePtr<T>) -> usize {
    height(unsafe { node_ptr.as_ref().right })
}

/// Height of the right subtree minus height of the left subtree.
pub(crate) fn balance_factor<T>(node_ptr: NodePtr<T>) -> isize {
    right_height(node_ptr) as isize - left_height(node_ptr) as isize
}

pub(crate) fn adjust_height<T>(mut node_ptr: NodePtr<T>) {
    let height = cmp::max(left_height(node_ptr), right_height(node_ptr)) + 1;
    unsafe { node_ptr.as_mut().height = height };
}

#[allow(clippy::enum_variant_names)]
pub(crate) enum Direction {
    FromParent,
    FromLeft,
    FromRight,
}
