//! Configuration parsing and management.

use crate::convert::{ConvertOptions, DEFAULT_MAX_DESCRIPTION_LENGTH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Conventional configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "elemental.yml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// What a failed reload does to the epoch being served
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReloadFailurePolicy {
    /// Keep serving the last successfully loaded epoch
    #[default]
    KeepLastGood,
    /// Start a new, empty epoch
    Clear,
}

/// Registry configuration matching the elemental.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Workspace root holding package.json / custom-elements.json
    #[serde(default = "default_workspace")]
    pub workspace: PathBuf,

    /// Additional manifests, relative to the workspace root
    #[serde(default)]
    pub manifests: Vec<PathBuf>,

    /// Directory of `<version>.json` schema files
    #[serde(default)]
    pub schemas: Option<PathBuf>,

    #[serde(default = "default_max_description_length")]
    pub max_description_length: usize,

    #[serde(default)]
    pub reload_failure: ReloadFailurePolicy,

    // path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

fn default_workspace() -> PathBuf {
    PathBuf::from(".")
}

fn default_max_description_length() -> usize {
    DEFAULT_MAX_DESCRIPTION_LENGTH
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            workspace: default_workspace(),
            manifests: Vec::new(),
            schemas: None,
            max_description_length: default_max_description_length(),
            reload_failure: ReloadFailurePolicy::default(),
            config_path: None,
        }
    }
}

impl RegistryConfig {
    /// Default configuration rooted at `workspace`
    pub fn for_workspace(workspace: impl Into<PathBuf>) -> Self {
        RegistryConfig {
            workspace: workspace.into(),
            ..Default::default()
        }
    }

    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&contents)?;

        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: RegistryConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_description_length == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_description_length",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Get the workspace directory, resolved relative to config file
    pub fn workspace_dir(&self) -> PathBuf {
        self.resolve_path(&self.workspace)
    }

    /// Get the schema directory, if configured
    pub fn schemas_dir(&self) -> Option<PathBuf> {
        self.schemas.as_ref().map(|p| self.resolve_path(p))
    }

    /// Extra manifest paths; relative ones stay relative to the workspace
    pub fn manifest_paths(&self) -> &[PathBuf] {
        &self.manifests
    }

    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            max_description_length: self.max_description_length,
        }
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match self.config_path.as_deref().and_then(Path::parent) {
            Some(parent) => parent.join(path),
            None => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::from_yaml("{}").unwrap();

        assert_eq!(config.workspace, PathBuf::from("."));
        assert!(config.manifests.is_empty());
        assert_eq!(config.max_description_length, 2000);
        assert_eq!(config.reload_failure, ReloadFailurePolicy::KeepLastGood);
    }

    #[test]
    fn test_parse_full() {
        let config = RegistryConfig::from_yaml(
            r#"
workspace: packages/ui
manifests:
  - vendor/custom-elements.json
schemas: schemas
max_description_length: 500
reload_failure: clear
"#,
        )
        .unwrap();

        assert_eq!(config.workspace, PathBuf::from("packages/ui"));
        assert_eq!(config.manifest_paths(), [PathBuf::from("vendor/custom-elements.json")]);
        assert_eq!(config.convert_options().max_description_length, 500);
        assert_eq!(config.reload_failure, ReloadFailurePolicy::Clear);
    }

    #[test]
    fn test_rejects_zero_description_length() {
        let err = RegistryConfig::from_yaml("max_description_length: 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_rejects_unknown_policy() {
        let err = RegistryConfig::from_yaml("reload_failure: retry").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_paths_resolve_relative_to_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("elemental.yml");
        std::fs::write(&path, "workspace: ui\nschemas: /opt/schemas\n").unwrap();

        let config = RegistryConfig::from_file(&path).unwrap();
        assert_eq!(config.workspace_dir(), dir.path().join("ui"));
        assert_eq!(config.schemas_dir(), Some(PathBuf::from("/opt/schemas")));
    }

    #[test]
    fn test_missing_file() {
        let err = RegistryConfig::from_file("/nonexistent/elemental.yml").unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_)));
    }
}
