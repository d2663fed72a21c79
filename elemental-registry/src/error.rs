//! Registry errors

use crate::convert::ConvertError;
use crate::loader::LoadError;
use crate::schema::SchemaError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Element not found: {tag}")]
    NotFound { tag: String },

    #[error("Failed to load workspace {}: {source}", .root.display())]
    Load {
        root: PathBuf,
        #[source]
        source: LoadError,
    },

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl RegistryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound { .. })
    }
}

pub type Result<T, E = RegistryError> = std::result::Result<T, E>;
