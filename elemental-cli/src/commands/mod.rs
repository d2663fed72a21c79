//! CLI command implementations.

pub mod aggregates;
pub mod element;
pub mod list;
pub mod relationships;
pub mod schema;
pub mod stats;

pub use aggregates::{show_css_properties, show_prefixes};
pub use element::show_element;
pub use list::list_elements;
pub use relationships::show_relationships;
pub use schema::show_schema;
pub use stats::show_stats;

use anyhow::{Context, Result};
use elemental_registry::{ElementRegistry, RegistryConfig};
use std::path::Path;

/// Load configuration, build the registry and perform the initial reload.
///
/// A missing config file falls back to defaults rooted at `root` (or the
/// current directory).
pub fn open_registry(config_path: &Path, root: Option<&Path>) -> Result<ElementRegistry> {
    let mut config = if config_path.is_file() {
        RegistryConfig::from_file(config_path)
            .with_context(|| format!("Failed to load configuration {:?}", config_path))?
    } else {
        tracing::debug!(path = ?config_path, "no config file, using defaults");
        RegistryConfig::default()
    };

    if let Some(root) = root {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        config.workspace = cwd.join(root);
    }

    let registry = ElementRegistry::from_config(&config);
    let epoch = registry
        .reload()
        .with_context(|| format!("Failed to load workspace {:?}", config.workspace_dir()))?;
    tracing::debug!(epoch = %epoch, "workspace loaded");

    Ok(registry)
}
