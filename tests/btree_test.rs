//! B-tree construction, insertion, removal and in-order iteration.

use jtree::{BTree, BTreeNode, TreeError};
use rstest::{fixture, rstest};

/// [3] over [1, 2] and [4, 5]
#[fixture]
fn two_level() -> BTree<i32> {
    jtree::util::testing::init_test_setup();
    let left = BTreeNode::leaf(vec![1, 2]).unwrap();
    let right = BTreeNode::leaf(vec![4, 5]).unwrap();
    BTree::from_root(BTreeNode::internal(vec![3], vec![left, right]).unwrap())
}

#[rstest]
fn given_two_level_tree_when_iterated_then_subtrees_interleave_with_entries(
    mut two_level: BTree<i32>,
) {
    let values: Vec<_> = two_level.in_order_iter().collect();
    assert_eq!(values, vec![1, 2, 3, 4, 5]);
    assert_eq!(two_level.len(), 5);
    assert_eq!(two_level.depth(), 2);
}

#[test]
fn given_three_level_tree_when_iterated_then_values_ascend() {
    let inner = BTreeNode::internal(
        vec![20, 30],
        vec![
            BTreeNode::leaf(vec![15]).unwrap(),
            BTreeNode::leaf(vec![25]).unwrap(),
            BTreeNode::leaf(vec![35, 40]).unwrap(),
        ],
    )
    .unwrap();
    let root = BTreeNode::internal(vec![10], vec![BTreeNode::leaf(vec![1, 5]).unwrap(), inner]).unwrap();
    let mut tree = BTree::from_root(root);

    assert_eq!(tree.depth(), 3);
    assert_eq!(
        tree.in_order_iter().collect::<Vec<_>>(),
        vec![1, 5, 10, 15, 20, 25, 30, 35, 40]
    );
}

#[rstest]
#[case(vec![5, 3, 8, 1, 4], vec![1, 3, 4, 5, 8])]
#[case(vec![-2, 7, 0], vec![-2, 0, 7])]
#[case(vec![9], vec![9])]
fn given_values_when_inserted_then_iterated_in_order(#[case] input: Vec<i32>, #[case] expected: Vec<i32>) {
    let mut tree = BTree::new();
    for v in input {
        assert!(tree.insert(v));
    }
    assert_eq!(tree.to_vec(), expected);
    assert_eq!(tree.in_order_iter().len(), expected.len());
}

#[rstest]
fn given_existing_value_when_inserted_again_then_rejected(mut two_level: BTree<i32>) {
    assert!(!two_level.insert(3));
    assert!(!two_level.insert(4));
    assert_eq!(two_level.len(), 5);
}

#[rstest]
fn given_two_level_tree_when_inserting_then_value_lands_in_covering_leaf(mut two_level: BTree<i32>) {
    assert!(two_level.insert(0));
    assert!(two_level.insert(6));
    let root = two_level.root().unwrap();
    assert_eq!(root.entries(), &[3]);
    assert_eq!(root.children()[0].entries(), &[0, 1, 2]);
    assert_eq!(root.children()[1].entries(), &[4, 5, 6]);
}

#[rstest]
fn given_internal_value_when_removed_mid_walk_then_queue_is_not_resynced(mut two_level: BTree<i32>) {
    let mut seen = Vec::new();
    {
        let mut iter = two_level.in_order_iter();
        while iter.has_next() {
            let value = iter.try_next().unwrap();
            seen.push(value);
            if value == 3 {
                assert!(iter.remove().unwrap());
                assert!(!iter.tree().contains(&3));
                // the predecessor moved up but the queued order is the old one
                assert_eq!(iter.len(), 2);
            }
        }
    }
    assert_eq!(seen, vec![1, 2, 3, 4, 5]);
    assert_eq!(two_level.to_vec(), vec![1, 2, 4, 5]);
    assert_eq!(two_level.root().unwrap().entries(), &[2]);
}

#[rstest]
fn given_every_value_removed_when_walking_then_tree_is_empty(mut two_level: BTree<i32>) {
    {
        let mut iter = two_level.in_order_iter();
        while iter.has_next() {
            iter.try_next().unwrap();
            assert!(iter.remove().unwrap());
        }
    }
    assert!(two_level.is_empty());
    assert!(two_level.root().is_none());
    assert_eq!(two_level.depth(), 0);
}

#[rstest]
fn given_no_next_when_removing_then_illegal_state(mut two_level: BTree<i32>) {
    let mut iter = two_level.in_order_iter();
    assert!(matches!(iter.remove(), Err(TreeError::IllegalState(_))));

    iter.try_next().unwrap();
    iter.remove().unwrap();
    assert!(matches!(iter.remove(), Err(TreeError::IllegalState(_))));
}

#[test]
fn given_empty_tree_when_iterated_then_exhausted() {
    let mut tree: BTree<u8> = BTree::new();
    let mut iter = tree.in_order_iter();
    assert!(!iter.has_next());
    assert_eq!(iter.try_next(), Err(TreeError::Exhausted));
    assert_eq!(iter.next(), None);
}

#[rstest]
fn given_missing_value_when_removed_then_false(mut two_level: BTree<i32>) {
    assert!(!two_level.remove(&42));
    assert_eq!(two_level.len(), 5);
}

#[rstest]
#[case::unsorted_entries(vec![2, 1], vec![])]
#[case::duplicate_entries(vec![1, 1], vec![])]
#[case::too_few_children(vec![3], vec![vec![1]])]
#[case::too_many_children(vec![3], vec![vec![1], vec![4], vec![5]])]
#[case::left_subtree_too_large(vec![3], vec![vec![4], vec![5]])]
#[case::right_subtree_too_small(vec![3], vec![vec![1], vec![2]])]
fn given_malformed_node_when_built_then_invalid_argument(
    #[case] entries: Vec<i32>,
    #[case] children: Vec<Vec<i32>>,
) {
    let children = children
        .into_iter()
        .map(|c| BTreeNode::leaf(c).unwrap())
        .collect();
    assert!(matches!(
        BTreeNode::internal(entries, children),
        Err(TreeError::InvalidArgument(_))
    ));
}
