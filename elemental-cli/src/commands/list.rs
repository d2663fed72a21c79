//! List the elements of the workspace.

use crate::output::{self, ElementSummary};
use anyhow::Result;
use elemental_registry::ElementRegistry;

pub fn list_elements(registry: &ElementRegistry, json: bool) -> Result<()> {
    let elements = registry.get_all_elements();

    if json {
        let summaries: Vec<ElementSummary> = elements
            .values()
            .map(|info| ElementSummary::from_info(info))
            .collect();
        return output::print_json("element.list", summaries);
    }

    if elements.is_empty() {
        println!("No elements found");
        return Ok(());
    }

    let width = elements.keys().map(String::len).max().unwrap_or(0);
    for (tag, info) in &elements {
        if info.summary.is_empty() {
            println!("{:<width$}  {}", tag, info.module);
        } else {
            println!("{:<width$}  {}  {}", tag, info.module, info.summary);
        }
    }

    Ok(())
}
