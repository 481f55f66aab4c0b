use anyhow::{Context, Result};
use family_tree::{FamilyTree, LayoutConfig, Snapshot};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Load and validate a family tree saved as a RON snapshot
pub fn load_tree(path: &Path) -> Result<FamilyTree> {
    info!("Loading family tree from {path:?}");
    let snapshot: Snapshot = read_ron(path)?;
    let tree = FamilyTree::from_snapshot(snapshot)
        .with_context(|| format!("{} is not a consistent family tree", path.display()))?;
    info!("Loaded {} people", tree.len());
    Ok(tree)
}

/// Layout settings from a RON file, or the defaults
pub fn load_config(path: Option<&Path>) -> Result<LayoutConfig> {
    match path {
        Some(path) => {
            info!("Loading layout config from {path:?}");
            read_ron(path)
        }
        None => Ok(LayoutConfig::default()),
    }
}

/// Pretty RON, to the file if given, to stdout otherwise
pub fn write_ron<T: Serialize>(value: &T, path: Option<&Path>) -> Result<()> {
    let text = to_pretty_ron(value)?;
    match path {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Saved {path:?}");
        }
        None => println!("{text}"),
    }
    Ok(())
}

pub fn to_pretty_ron<T: Serialize>(value: &T) -> Result<String> {
    ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())
        .context("Failed to serialize to RON")
}

fn read_ron<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    ron::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}
