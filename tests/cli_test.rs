//! Command helpers shared by `jtree walk` and `jtree sort`.

use jtree::cli::commands::{drain_sorted, walk};
use jtree::config::TraversalOrder;
use jtree::{BTree, TreeBuilder};
use rstest::{fixture, rstest};

#[fixture]
fn outline() -> jtree::Tree<String> {
    jtree::util::testing::init_test_setup();
    TreeBuilder::default()
        .build_from_str("A\n  B\n  C\n    D\n    E\n")
        .unwrap()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[rstest]
fn given_outline_when_walked_preorder_with_removal_then_reports_both_lists(
    mut outline: jtree::Tree<String>,
) {
    let (visited, removed) = walk(&mut outline, TraversalOrder::Pre, &strings(&["C"])).unwrap();

    assert_eq!(visited, strings(&["A", "B", "C", "D", "E"]));
    assert_eq!(removed, strings(&["C"]));
    assert_eq!(outline.node_count(), 4);
}

#[rstest]
fn given_outline_when_walked_postorder_then_children_first(mut outline: jtree::Tree<String>) {
    let (visited, removed) = walk(&mut outline, TraversalOrder::Post, &strings(&["A"])).unwrap();

    assert_eq!(visited, strings(&["B", "D", "E", "C", "A"]));
    assert_eq!(removed, strings(&["A"]));
    let root = outline.root().unwrap();
    assert_eq!(outline.element(root).map(String::as_str), Some("C"));
}

#[test]
fn given_values_when_drained_then_sorted_and_removed_values_reported() {
    let mut tree = BTree::new();
    for v in [40, -3, 12, 7] {
        tree.insert(v);
    }

    let (sorted, removed) = drain_sorted(&mut tree, &[7, 99]).unwrap();

    assert_eq!(sorted, vec![-3, 7, 12, 40]);
    assert_eq!(removed, vec![7]);
    assert_eq!(tree.to_vec(), vec![-3, 12, 40]);
}
