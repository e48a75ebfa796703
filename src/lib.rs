//! # jtree
//!
//! Generic ordered trees with traversal iterators that keep working while
//! the tree is being edited underneath them.
//!
//! - [`Tree`] / [`TreeNode`]: arena-backed, single-root tree. Nodes are
//!   addressed by generational [`NodeId`] handles; every child keeps a
//!   non-owning handle to its parent.
//! - [`PreorderTreeIterator`] / [`PostorderTreeIterator`]: depth-first walks
//!   whose `remove()` splices the visited node out of the tree, promoting
//!   its first (pre-order) or last (post-order) child into the freed slot.
//! - [`BTree`] / [`BTreeInOrderIterator`]: ordered multi-way tree without
//!   balancing, with an eagerly flattened in-order iterator.
//!
//! None of the types are thread-safe.
//!
//! ```
//! use jtree::Tree;
//!
//! let mut tree = Tree::with_root("A");
//! let a = tree.root().unwrap();
//! tree.create_child(a, "B").unwrap();
//! let c = tree.create_child(a, "C").unwrap();
//! tree.create_child(c, "D").unwrap();
//! tree.create_child(c, "E").unwrap();
//!
//! let mut iter = tree.preorder_iter();
//! let mut seen = Vec::new();
//! while iter.has_next() {
//!     let element = *iter.try_next().unwrap();
//!     if element == "C" {
//!         iter.remove().unwrap();
//!     }
//!     seen.push(element);
//! }
//! assert_eq!(seen, ["A", "B", "C", "D", "E"]);
//! assert_eq!(tree.node_count(), 4);
//! ```

pub mod arena;
pub mod btree;
pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod exitcode;
pub mod postorder;
pub mod preorder;
pub mod tree_traits;
pub mod util;

pub use arena::{NodeId, Tree, TreeNode};
pub use btree::{BTree, BTreeInOrderIterator, BTreeNode};
pub use builder::{write_outline, BuildError, TreeBuilder};
pub use error::{TreeError, TreeResult};
pub use postorder::PostorderTreeIterator;
pub use preorder::PreorderTreeIterator;
pub use tree_traits::TreeNodeConvert;
