//! Layered settings loading from global and local files.

use std::fs;

use jtree::config::{local_config_path, Settings, TraversalOrder};
use rstest::{fixture, rstest};
use tempfile::TempDir;

#[fixture]
fn dirs() -> (TempDir, TempDir) {
    (TempDir::new().unwrap(), TempDir::new().unwrap())
}

#[rstest]
fn given_local_file_when_loading_then_it_overrides_defaults(dirs: (TempDir, TempDir)) {
    let (_, local_dir) = dirs;
    let local = local_config_path(local_dir.path());
    fs::write(&local, "indent = 4\norder = \"post\"\n").unwrap();

    let settings = Settings::load_from(None, Some(&local)).unwrap();

    assert_eq!(settings.indent, 4);
    assert_eq!(settings.order, TraversalOrder::Post);
    assert!(!settings.show_tree);
}

#[rstest]
fn given_global_and_local_when_loading_then_local_wins_per_key(dirs: (TempDir, TempDir)) {
    let (global_dir, local_dir) = dirs;
    let global = global_dir.path().join("jtree.toml");
    let local = local_config_path(local_dir.path());
    fs::write(&global, "indent = 8\nshow_tree = true\n").unwrap();
    fs::write(&local, "indent = 3\n").unwrap();

    let settings = Settings::load_from(Some(&global), Some(&local)).unwrap();

    assert_eq!(settings.indent, 3);
    assert!(settings.show_tree);
    assert_eq!(settings.order, TraversalOrder::Pre);
}

#[rstest]
fn given_missing_files_when_loading_then_defaults_apply(dirs: (TempDir, TempDir)) {
    let (global_dir, local_dir) = dirs;
    let settings = Settings::load_from(
        Some(&global_dir.path().join("jtree.toml")),
        Some(&local_config_path(local_dir.path())),
    )
    .unwrap();
    assert_eq!(settings, Settings::default());
}

#[rstest]
fn given_zero_indent_when_loading_then_error(dirs: (TempDir, TempDir)) {
    let (_, local_dir) = dirs;
    let local = local_config_path(local_dir.path());
    fs::write(&local, "indent = 0\n").unwrap();

    let err = Settings::load_from(None, Some(&local)).unwrap_err();
    assert!(err.to_string().contains("indent"));
}

#[rstest]
fn given_unknown_order_when_loading_then_error(dirs: (TempDir, TempDir)) {
    let (_, local_dir) = dirs;
    let local = local_config_path(local_dir.path());
    fs::write(&local, "order = \"sideways\"\n").unwrap();

    assert!(Settings::load_from(None, Some(&local)).is_err());
}
