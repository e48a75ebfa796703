//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::config::TraversalOrder;

/// Inspect and edit outline trees with mutation-safe traversals
#[derive(Parser, Debug)]
#[command(name = "jtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Spaces per outline level (overrides config)
    #[arg(long, global = true)]
    pub indent: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render an outline as a tree
    Show {
        /// Outline file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Walk an outline depth-first, optionally removing nodes on the way
    Walk {
        /// Outline file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Traversal order (default from config)
        #[arg(short, long, value_enum)]
        order: Option<TraversalOrder>,
        /// Remove every node holding this element when it is visited
        #[arg(short, long)]
        remove: Vec<String>,
        /// Print the resulting tree
        #[arg(short, long)]
        show: bool,
    },

    /// List leaf elements
    Leaves {
        /// Outline file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print node count, depth and leaf count
    Stats {
        /// Outline file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Load integers into a B-tree and print them in order
    Sort {
        /// Values to insert
        #[arg(allow_negative_numbers = true)]
        values: Vec<i64>,
        /// Read whitespace separated values from a file as well
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Remove this value when it is visited
        #[arg(short, long, allow_negative_numbers = true)]
        remove: Vec<i64>,
        /// Print the resulting B-tree
        #[arg(short, long)]
        show: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a commented template
    Template,
    /// Show config file locations
    Path,
}
