//! Builds trees from indented outlines and writes them back.
//!
//! One element per line; the indentation width decides the depth. Tabs
//! count as one level. Blank lines and lines starting with `#` are skipped.
//!
//! ```text
//! A
//!   B
//!   C
//!     D
//!     E
//! ```

use std::fmt::{Display, Write};
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, instrument};

use crate::arena::{NodeId, Tree};
use crate::error::TreeError;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("line {line}: {reason}")]
    InvalidFormat { line: usize, reason: String },

    #[error("failed to read outline {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to format outline")]
    Write(#[from] std::fmt::Error),

    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Result type for outline parsing.
pub type BuildResult<T> = Result<T, BuildError>;

/// Constructs trees from outline text.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    indent: usize,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

impl TreeBuilder {
    /// `indent` is the number of spaces per level; zero is treated as one.
    pub fn new(indent: usize) -> Self {
        Self {
            indent: indent.max(1),
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn build_from_file(&self, path: &Path) -> BuildResult<Tree<String>> {
        let content = fs::read_to_string(path).map_err(|source| BuildError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.build_from_str(&content)
    }

    /// Parses an outline. Empty input gives an empty tree.
    #[instrument(level = "debug", skip_all)]
    pub fn build_from_str(&self, text: &str) -> BuildResult<Tree<String>> {
        let mut tree = Tree::new();
        // open ancestors of the next line as (depth, node)
        let mut stack: Vec<(usize, NodeId)> = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let element = raw.trim();
            if element.is_empty() || element.starts_with('#') {
                continue;
            }
            let depth = self.depth_of(raw, line)?;

            if tree.is_empty() {
                if depth != 0 {
                    return Err(invalid(line, "the first element must not be indented"));
                }
                let root = tree.create_node(element.to_string());
                tree.set_root(Some(root))?;
                stack.push((0, root));
                continue;
            }
            if depth == 0 {
                return Err(invalid(line, "an outline has exactly one root"));
            }

            while stack.last().is_some_and(|&(d, _)| d >= depth) {
                stack.pop();
            }
            let &(parent_depth, parent) = stack
                .last()
                .ok_or_else(|| invalid(line, "element has no parent"))?;
            if parent_depth + 1 != depth {
                return Err(invalid(line, "indentation skips a level"));
            }

            let node = tree.add_child_element(parent, element.to_string())?;
            stack.push((depth, node));
        }

        debug!(nodes = tree.node_count(), "built tree from outline");
        Ok(tree)
    }

    fn depth_of(&self, raw: &str, line: usize) -> BuildResult<usize> {
        let mut width = 0;
        for c in raw.chars().take_while(|c| c.is_whitespace()) {
            width += if c == '\t' { self.indent } else { 1 };
        }
        if width % self.indent != 0 {
            return Err(invalid(
                line,
                &format!(
                    "indentation of {} is not a multiple of {}",
                    width, self.indent
                ),
            ));
        }
        Ok(width / self.indent)
    }
}

fn invalid(line: usize, reason: &str) -> BuildError {
    BuildError::InvalidFormat {
        line,
        reason: reason.to_string(),
    }
}

/// Writes `tree` as an outline that [`TreeBuilder::new`] with the same
/// `indent` reads back. `indent` is clamped to at least one space.
///
/// Elements that would not survive the trip are rejected with
/// [`BuildError::InvalidFormat`] naming the outline line they would have
/// landed on: empty labels, labels with surrounding whitespace, labels
/// starting with `#` and labels containing a line break.
#[instrument(level = "debug", skip(tree))]
pub fn write_outline<E: Display>(tree: &Tree<E>, indent: usize) -> BuildResult<String> {
    let indent = indent.max(1);
    let mut out = String::new();
    let mut stack: Vec<(NodeId, usize)> = tree.root().into_iter().map(|r| (r, 0)).collect();
    let mut line = 0;

    while let Some((node, depth)) = stack.pop() {
        if let Some(element) = tree.element(node) {
            line += 1;
            let mut label = String::new();
            write!(label, "{}", element)?;
            check_label(&label, line)?;
            writeln!(out, "{:width$}{}", "", label, width = depth * indent)?;
        }
        for &child in tree.children(node).iter().rev() {
            stack.push((child, depth + 1));
        }
    }
    debug!(lines = line, "wrote outline");
    Ok(out)
}

fn check_label(label: &str, line: usize) -> BuildResult<()> {
    let reason = if label.is_empty() {
        "an empty element cannot be written"
    } else if label.contains(['\n', '\r']) {
        "element contains a line break"
    } else if label.trim() != label {
        "element has leading or trailing whitespace"
    } else if label.starts_with('#') {
        "element starting with '#' would read back as a comment"
    } else {
        return Ok(());
    };
    Err(invalid(line, reason))
}
