use std::fs;
use std::io;
use std::path::Path;

use clap::CommandFactory;
use config::ConfigError;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::arena::{NodeId, Tree};
use crate::btree::BTree;
use crate::builder::{BuildError, TreeBuilder};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings, TraversalOrder};
use crate::error::{TreeError, TreeResult};
use crate::postorder::PostorderTreeIterator;
use crate::preorder::PreorderTreeIterator;
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    execute_with(cli, Settings::load)
}

/// Dispatches `cli`, loading settings through `load` only for the commands
/// that read them. `config path`, `config template` and `completion` keep
/// working when a config file is broken.
fn execute_with<F>(cli: &Cli, load: F) -> CliResult<()>
where
    F: Fn() -> Result<Settings, ConfigError>,
{
    let settings = || effective_settings(cli, &load);

    match &cli.command {
        Some(Commands::Show { file }) => _show(&settings()?, file),
        Some(Commands::Walk {
            file,
            order,
            remove,
            show,
        }) => {
            let settings = settings()?;
            let order = order.unwrap_or(settings.order);
            _walk(&settings, file, order, remove, *show)
        }
        Some(Commands::Leaves { file }) => _leaves(&settings()?, file),
        Some(Commands::Stats { file }) => _stats(&settings()?, file),
        Some(Commands::Sort {
            values,
            file,
            remove,
            show,
        }) => _sort(&settings()?, values, file.as_deref(), remove, *show),
        Some(Commands::Config { command }) => _config(command, settings),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "jtree", &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

fn effective_settings<F>(cli: &Cli, load: &F) -> CliResult<Settings>
where
    F: Fn() -> Result<Settings, ConfigError>,
{
    let mut settings = load()?;
    if let Some(indent) = cli.indent {
        if indent == 0 {
            return Err(CliError::InvalidArgs("--indent must be at least 1".into()));
        }
        settings.indent = indent;
    }
    debug!(?settings, "effective settings");
    Ok(settings)
}

fn load_outline(settings: &Settings, file: &Path) -> CliResult<Tree<String>> {
    Ok(TreeBuilder::new(settings.indent).build_from_file(file)?)
}

#[instrument(skip(settings))]
fn _show(settings: &Settings, file: &Path) -> CliResult<()> {
    let tree = load_outline(settings, file)?;
    output::info(&tree.to_tree_string());
    Ok(())
}

#[instrument(skip(settings))]
fn _walk(
    settings: &Settings,
    file: &Path,
    order: TraversalOrder,
    remove: &[String],
    show: bool,
) -> CliResult<()> {
    let mut tree = load_outline(settings, file)?;
    let (visited, removed) = walk(&mut tree, order, remove)?;

    output::info(&visited.iter().join(" "));
    for element in &removed {
        output::removed(element);
    }
    if show || settings.show_tree {
        output::info(&tree.to_tree_string());
    }
    Ok(())
}

/// Visits `tree` in `order`, removing nodes whose element is listed in
/// `remove` through the iterator. Returns the visited and the removed
/// elements.
pub fn walk(
    tree: &mut Tree<String>,
    order: TraversalOrder,
    remove: &[String],
) -> CliResult<(Vec<String>, Vec<String>)> {
    match order {
        TraversalOrder::Pre => drain_walk(tree.preorder_iter(), remove),
        TraversalOrder::Post => drain_walk(tree.postorder_iter(), remove),
    }
}

/// Depth-first walk able to splice out the node it just returned.
trait SplicingWalk: Iterator<Item = NodeId> {
    fn element(&self, node: NodeId) -> Option<&String>;
    fn remove_current(&mut self) -> TreeResult<()>;
}

impl SplicingWalk for PreorderTreeIterator<'_, String> {
    fn element(&self, node: NodeId) -> Option<&String> {
        self.tree().element(node)
    }

    fn remove_current(&mut self) -> TreeResult<()> {
        self.remove()
    }
}

impl SplicingWalk for PostorderTreeIterator<'_, String> {
    fn element(&self, node: NodeId) -> Option<&String> {
        self.tree().element(node)
    }

    fn remove_current(&mut self) -> TreeResult<()> {
        self.remove()
    }
}

fn drain_walk<W: SplicingWalk>(
    mut iter: W,
    remove: &[String],
) -> CliResult<(Vec<String>, Vec<String>)> {
    let mut visited = Vec::new();
    let mut removed = Vec::new();
    while let Some(node) = iter.next() {
        let element = iter
            .element(node)
            .cloned()
            .ok_or_else(|| TreeError::NoSuchElement(format!("{} vanished during iteration", node)))?;
        if remove.contains(&element) {
            iter.remove_current()?;
            removed.push(element.clone());
        }
        visited.push(element);
    }
    Ok((visited, removed))
}

#[instrument(skip(settings))]
fn _leaves(settings: &Settings, file: &Path) -> CliResult<()> {
    let tree = load_outline(settings, file)?;
    for leaf in tree.leaf_nodes() {
        if let Some(element) = tree.element(leaf) {
            output::info(element);
        }
    }
    Ok(())
}

#[instrument(skip(settings))]
fn _stats(settings: &Settings, file: &Path) -> CliResult<()> {
    let tree = load_outline(settings, file)?;
    output::action("nodes", &tree.node_count());
    output::action("depth", &tree.depth());
    output::action("leaves", &tree.leaf_nodes().len());
    Ok(())
}

#[instrument(skip(settings))]
fn _sort(
    settings: &Settings,
    values: &[i64],
    file: Option<&Path>,
    remove: &[i64],
    show: bool,
) -> CliResult<()> {
    let mut all = values.to_vec();
    if let Some(path) = file {
        all.extend(read_values(path)?);
    }
    if all.is_empty() {
        return Err(CliError::InvalidArgs("nothing to sort".into()));
    }

    let mut tree = BTree::new();
    for value in all {
        if !tree.insert(value) {
            output::warning(&format!("duplicate value {} ignored", value));
        }
    }

    let (sorted, removed) = drain_sorted(&mut tree, remove)?;
    output::info(&sorted.iter().join(" "));
    for value in &removed {
        output::removed(value);
    }
    if show || settings.show_tree {
        output::info(&tree.to_tree_string());
    }
    Ok(())
}

/// Walks `tree` in order, removing the values listed in `remove`.
pub fn drain_sorted(tree: &mut BTree<i64>, remove: &[i64]) -> CliResult<(Vec<i64>, Vec<i64>)> {
    let mut sorted = Vec::with_capacity(tree.len());
    let mut removed = Vec::new();
    let mut iter = tree.in_order_iter();
    while iter.has_next() {
        let value = iter.try_next()?;
        if remove.contains(&value) && iter.remove()? {
            removed.push(value);
        }
        sorted.push(value);
    }
    Ok((sorted, removed))
}

fn read_values(path: &Path) -> CliResult<Vec<i64>> {
    let content = fs::read_to_string(path).map_err(|source| BuildError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut values = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        for token in line.split_whitespace() {
            let value = token.parse::<i64>().map_err(|_| BuildError::InvalidFormat {
                line: idx + 1,
                reason: format!("'{}' is not an integer", token),
            })?;
            values.push(value);
        }
    }
    Ok(values)
}

#[instrument(skip(settings))]
fn _config<F>(command: &ConfigCommands, settings: F) -> CliResult<()>
where
    F: FnOnce() -> CliResult<Settings>,
{
    match command {
        ConfigCommands::Show => output::info(&settings()?.to_toml()?),
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            output::header("Config files");
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::warning("no global config directory on this platform"),
            }
            if let Ok(dir) = std::env::current_dir() {
                output::action("local", &local_config_path(&dir).display());
            }
        }
    }
    Ok(())
}
