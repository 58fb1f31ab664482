use avl_core::{AvlTree, OrderedTree};

fn main() {
    let keys = [1, 2, 3, 4, 5, 6];

    let bst: OrderedTree<i32> = keys.iter().copied().collect();
    println!("Level-order traversal of the plain tree (height {}):", bst.height());
    for key in bst.level_order() {
        println!("Key: {}", key);
    }

    let avl: AvlTree<i32> = keys.iter().copied().collect();
    println!("Level-order traversal of the AVL tree (height {}):", avl.height());
    for key in avl.level_order() {
        println!("Key: {}", key);
    }
}
