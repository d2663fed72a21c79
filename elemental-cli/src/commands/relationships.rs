//! Relationship queries.

use crate::output::{self, RelationshipData, RelationshipEntry};
use anyhow::Result;
use elemental_registry::{ElementRegistry, RegistryError};

pub fn show_relationships(registry: &ElementRegistry, tag: &str, json: bool) -> Result<()> {
    if !registry.contains(tag) {
        return Err(RegistryError::NotFound {
            tag: tag.to_string(),
        }
        .into());
    }

    let relationships = registry.relationships_for(tag);

    if json {
        return output::print_json(
            "element.relationships",
            RelationshipData {
                tag: tag.to_string(),
                relationships: relationships.into_iter().map(RelationshipEntry::from).collect(),
            },
        );
    }

    if relationships.is_empty() {
        println!("No relationships for <{}>", tag);
        return Ok(());
    }

    println!("Relationships for <{}>:", tag);
    for rel in &relationships {
        println!("  {:<12} {:<24} {}", rel.kind, rel.target, rel.label());
    }

    Ok(())
}
