//! Manifest JSON schemas
//!
//! Schemas are not on the concurrency-critical path: the registry only
//! picks a version from the loaded manifests and asks a provider for it.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Schema version served when no manifest declares one
pub const DEFAULT_SCHEMA_VERSION: &str = "2.1.1-speculative";

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("No schema available for version {0}")]
    NotFound(String),

    #[error("Failed to read schema {version}: {source}")]
    Io {
        version: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse schema {version}: {source}")]
    Parse {
        version: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Source of raw schema bytes by version
pub trait SchemaProvider: Send + Sync {
    fn schema(&self, version: &str) -> Result<Vec<u8>, SchemaError>;
}

/// Reads `<dir>/<version>.json`
#[derive(Debug, Clone)]
pub struct DirSchemaProvider {
    dir: PathBuf,
}

impl DirSchemaProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirSchemaProvider { dir: dir.into() }
    }
}

impl SchemaProvider for DirSchemaProvider {
    fn schema(&self, version: &str) -> Result<Vec<u8>, SchemaError> {
        // versions come from manifest contents; keep them inside the directory
        if version.is_empty() || version.contains(['/', '\\']) || version.contains("..") {
            return Err(SchemaError::NotFound(version.to_string()));
        }

        let path = self.dir.join(format!("{version}.json"));
        std::fs::read(&path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => SchemaError::NotFound(version.to_string()),
            _ => SchemaError::Io {
                version: version.to_string(),
                source,
            },
        })
    }
}

/// Schemas held in memory
#[derive(Debug, Default)]
pub struct MemorySchemaProvider {
    schemas: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemorySchemaProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, version: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.schemas.write().insert(version.into(), bytes.into());
    }
}

impl SchemaProvider for MemorySchemaProvider {
    fn schema(&self, version: &str) -> Result<Vec<u8>, SchemaError> {
        self.schemas
            .read()
            .get(version)
            .cloned()
            .ok_or_else(|| SchemaError::NotFound(version.to_string()))
    }
}

/// Provider with no schemas at all
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSchemaProvider;

impl SchemaProvider for NoSchemaProvider {
    fn schema(&self, version: &str) -> Result<Vec<u8>, SchemaError> {
        Err(SchemaError::NotFound(version.to_string()))
    }
}

/// Pick the schema version to serve for a set of manifest versions.
///
/// Speculative versions are preferred, then the lexicographically highest.
pub fn select_schema_version(versions: &[String]) -> &str {
    let candidates = versions.iter().map(String::as_str).filter(|v| !v.is_empty());

    let speculative = candidates.clone().filter(|v| v.contains("speculative")).max();
    speculative
        .or_else(|| candidates.max())
        .unwrap_or(DEFAULT_SCHEMA_VERSION)
}

/// Fetch and parse a schema
pub fn load_schema(
    provider: &dyn SchemaProvider,
    version: &str,
) -> Result<serde_json::Value, SchemaError> {
    let bytes = provider.schema(version)?;
    serde_json::from_slice(&bytes).map_err(|source| SchemaError::Parse {
        version: version.to_string(),
        source,
    })
}
