//! Show a single element in structured form.

use crate::output::{self, ElementData};
use anyhow::Result;
use elemental_registry::ElementRegistry;

pub fn show_element(registry: &ElementRegistry, tag: &str) -> Result<()> {
    let info = registry.element_info(tag)?;

    output::print_json(
        "element.info",
        ElementData {
            info: &info,
            relationships: registry.relationships_for(tag),
        },
    )
}
