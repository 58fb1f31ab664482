use avl_core::{AvlTree, PartialOrdered};

#[derive(Debug)]
struct Entry {
    key: u32,
    name: &'static str,
}

fn main() {
    let mut tree = AvlTree::with_comparator(|a: &Entry, b: &Entry| a.key.cmp(&b.key));
    tree.insert(Entry { key: 0, name: "zero" });
    tree.insert(Entry { key: 1, name: "one" });
    tree.insert(Entry { key: 2, name: "two" });
    assert!(!tree.insert(Entry { key: 2, name: "deux" }));
    tree.insert(Entry { key: 3, name: "three" });

    let probe = Entry { key: 1, name: "" };
    assert_eq!(tree.find(&probe).map(|e| e.name), Some("one"));
    tree.delete(&probe);
    assert!(tree.find(&probe).is_none());

    for entry in &tree {
        println!("{} => {}", entry.key, entry.name);
    }

    let mut floats = AvlTree::with_comparator(PartialOrdered::new());
    for x in [0.5, 2.25, -1.0] {
        floats.insert(x);
    }
    println!("{:?}", floats);
}
