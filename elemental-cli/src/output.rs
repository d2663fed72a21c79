//! Shared JSON shapes for machine-readable command output.

use elemental_registry::{EnrichedElementInfo, Epoch, MetricsSnapshot, Relationship};
use serde::Serialize;

pub const SCHEMA_VERSION: &str = "elemental-v1";

/// Standard envelope for machine-consumable responses.
#[derive(Serialize)]
pub struct Envelope<T> {
    pub schema_version: &'static str,
    pub kind: &'static str,
    pub data: T,
}

pub fn envelope<T>(kind: &'static str, data: T) -> Envelope<T> {
    Envelope {
        schema_version: SCHEMA_VERSION,
        kind,
        data,
    }
}

/// Print an envelope as pretty JSON on stdout
pub fn print_json<T: Serialize>(kind: &'static str, data: T) -> anyhow::Result<()> {
    let payload = envelope(kind, data);
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSummary {
    pub tag_name: String,
    pub name: String,
    pub summary: String,
    pub module: String,
    pub package: String,
}

impl ElementSummary {
    pub fn from_info(info: &EnrichedElementInfo) -> Self {
        ElementSummary {
            tag_name: info.tag_name.clone(),
            name: info.name.clone(),
            summary: info.summary.clone(),
            module: info.module.clone(),
            package: info.package.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct ElementData<'a> {
    #[serde(flatten)]
    pub info: &'a EnrichedElementInfo,
    pub relationships: Vec<Relationship>,
}

#[derive(Serialize)]
pub struct RelationshipData {
    pub tag: String,
    pub relationships: Vec<RelationshipEntry>,
}

#[derive(Serialize)]
pub struct RelationshipEntry {
    #[serde(flatten)]
    pub relationship: Relationship,
    pub label: String,
}

impl From<Relationship> for RelationshipEntry {
    fn from(relationship: Relationship) -> Self {
        RelationshipEntry {
            label: relationship.label(),
            relationship,
        }
    }
}

#[derive(Serialize)]
pub struct StatsData {
    pub epoch: Epoch,
    pub elements: usize,
    pub common_prefixes: usize,
    pub css_properties: usize,
    pub metrics: MetricsSnapshot,
}
