//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/jtree/jtree.toml`
//! 3. Local config: `./.jtree.toml`
//! 4. Environment variables: `JTREE_*` prefix

use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Depth-first visiting order used by `walk`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TraversalOrder {
    /// Node before its children
    #[default]
    Pre,
    /// Children before their node
    Post,
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraversalOrder::Pre => write!(f, "pre"),
            TraversalOrder::Post => write!(f, "post"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Spaces per level in outline files
    pub indent: usize,
    /// Default order for `walk`
    pub order: TraversalOrder,
    /// Print the resulting tree after a walk or sort
    pub show_tree: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            indent: 2,
            order: TraversalOrder::Pre,
            show_tree: false,
        }
    }
}

/// Get the XDG config directory for jtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "jtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("jtree.toml"))
}

/// Get the path to the local config file in `dir`.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".jtree.toml")
}

impl Settings {
    /// Load settings from the standard locations.
    pub fn load() -> Result<Self, ConfigError> {
        let local = std::env::current_dir()
            .ok()
            .map(|dir| local_config_path(&dir));
        Self::load_from(global_config_path().as_deref(), local.as_deref())
    }

    /// Load settings with explicit config file locations.
    ///
    /// Missing files are skipped. Environment variables always apply last.
    #[instrument(level = "debug")]
    pub fn load_from(global: Option<&Path>, local: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("indent", defaults.indent as i64)?
            .set_default("order", defaults.order.to_string())?
            .set_default("show_tree", defaults.show_tree)?;

        for path in [global, local].into_iter().flatten() {
            if path.exists() {
                debug!(path = %path.display(), "adding config file");
                builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
            }
        }

        builder = builder.add_source(Environment::with_prefix("JTREE").try_parsing(true));

        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.indent == 0 {
            return Err(ConfigError::Message(
                "indent must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("serialize config: {e}")))
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# jtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/jtree/jtree.toml
#   Local:  ./.jtree.toml
#   Env:    JTREE_* environment variables

# Spaces per nesting level in outline files (tabs always count as one level)
# indent = 2

# Default traversal order for `jtree walk`: "pre" or "post"
# order = "pre"

# Print the resulting tree after `walk` and `sort`
# show_tree = false
"#
        .to_string()
    }
}
