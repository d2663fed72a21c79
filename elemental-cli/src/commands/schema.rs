//! Manifest schema query.

use anyhow::{Context, Result};
use elemental_registry::ElementRegistry;

pub fn show_schema(registry: &ElementRegistry, versions_only: bool) -> Result<()> {
    if versions_only {
        for version in registry.manifest_schema_versions() {
            println!("{version}");
        }
        return Ok(());
    }

    let schema = registry
        .manifest_schema()
        .context("Failed to load manifest schema")?;
    println!("{}", serde_json::to_string_pretty(&schema)?);

    Ok(())
}
