//! Exercise every query once and report registry metrics.

use crate::output::{self, StatsData};
use anyhow::Result;
use elemental_registry::ElementRegistry;

pub fn show_stats(registry: &ElementRegistry, json: bool) -> Result<()> {
    let elements = registry.get_all_elements();
    for tag in elements.keys() {
        registry.relationships_for(tag);
    }
    // second pass is served from cache
    let common_prefixes = registry.common_tag_prefixes().len();
    let css_properties = registry.all_css_custom_properties().len();
    registry.common_tag_prefixes();
    registry.all_css_custom_properties();

    let stats = StatsData {
        epoch: registry.epoch(),
        elements: elements.len(),
        common_prefixes,
        css_properties,
        metrics: registry.metrics().snapshot(),
    };

    if json {
        return output::print_json("registry.stats", stats);
    }

    println!("Epoch: {}", stats.epoch);
    println!(
        "{} elements, {} common prefixes, {} CSS properties",
        stats.elements, stats.common_prefixes, stats.css_properties
    );
    print!("{}", stats.metrics);

    Ok(())
}
