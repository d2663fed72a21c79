//! Workspace-wide aggregate views.

use anyhow::Result;
use elemental_registry::ElementRegistry;

pub fn show_prefixes(registry: &ElementRegistry) -> Result<()> {
    for prefix in registry.common_tag_prefixes() {
        println!("{prefix}");
    }
    Ok(())
}

pub fn show_css_properties(registry: &ElementRegistry) -> Result<()> {
    for name in registry.all_css_custom_properties() {
        println!("{name}");
    }
    Ok(())
}
