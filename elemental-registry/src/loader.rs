//! Workspace loaders
//!
//! A loader is the collaborator that knows where manifests live. The
//! registry calls [`WorkspaceLoader::load`] on every reload and builds a
//! fresh [`ElementStore`](crate::store::ElementStore) from the result.

use crate::fingerprint::Fingerprint;
use elemental_types::Package;
use parking_lot::RwLock;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Conventional manifest file name at a package root
pub const DEFAULT_MANIFEST_FILE: &str = "custom-elements.json";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("No custom elements manifest found in {}", .root.display())]
    NoManifest { root: PathBuf },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode manifest: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Workspace unavailable: {0}")]
    Unavailable(String),
}

/// One manifest as delivered by a loader
#[derive(Debug, Clone)]
pub struct LoadedManifest {
    /// File the manifest came from, if any
    pub source: Option<PathBuf>,

    /// npm package name owning the manifest
    pub package_name: Option<String>,

    pub package: Package,

    pub fingerprint: Fingerprint,
}

impl LoadedManifest {
    /// Wrap an in-memory package, fingerprinting its JSON encoding
    pub fn from_package(
        source: Option<PathBuf>,
        package_name: Option<String>,
        package: Package,
    ) -> Result<Self, LoadError> {
        let bytes = serde_json::to_vec(&package).map_err(LoadError::Encode)?;
        Ok(LoadedManifest {
            source,
            package_name,
            package,
            fingerprint: Fingerprint::from_bytes(&bytes),
        })
    }

    /// Parse a manifest from the bytes of a file
    pub fn from_bytes(
        path: &Path,
        package_name: Option<String>,
        bytes: &[u8],
    ) -> Result<Self, LoadError> {
        let package: Package = serde_json::from_slice(bytes).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(LoadedManifest {
            source: Some(path.to_path_buf()),
            package_name,
            package,
            fingerprint: Fingerprint::from_bytes(bytes),
        })
    }
}

/// Source of manifests for a workspace
pub trait WorkspaceLoader: Send + Sync {
    /// Workspace root, for diagnostics
    fn root(&self) -> &Path;

    /// Load every manifest of the workspace
    fn load(&self) -> Result<Vec<LoadedManifest>, LoadError>;
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson {
    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    custom_elements: Option<String>,
}

/// Loads manifests from a directory on disk
///
/// The root manifest is the one named by `package.json`'s `customElements`
/// field, falling back to `custom-elements.json`. Extra manifest paths are
/// resolved relative to the root.
#[derive(Debug, Clone)]
pub struct FsWorkspaceLoader {
    root: PathBuf,
    extra_manifests: Vec<PathBuf>,
}

impl FsWorkspaceLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsWorkspaceLoader {
            root: root.into(),
            extra_manifests: Vec::new(),
        }
    }

    /// Add manifests to load after the root manifest
    pub fn with_manifests(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.extra_manifests.extend(paths);
        self
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn read_package_json(&self) -> Result<Option<PackageJson>, LoadError> {
        let path = self.root.join("package.json");
        if !path.is_file() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        let package_json = serde_json::from_slice(&bytes)
            .map_err(|source| LoadError::Parse { path, source })?;
        Ok(Some(package_json))
    }

    fn read_manifest(
        path: &Path,
        package_name: Option<String>,
    ) -> Result<LoadedManifest, LoadError> {
        let bytes = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = LoadedManifest::from_bytes(path, package_name, &bytes)?;

        tracing::debug!(
            path = %path.display(),
            modules = manifest.package.modules.len(),
            "loaded manifest"
        );
        Ok(manifest)
    }
}

impl WorkspaceLoader for FsWorkspaceLoader {
    fn root(&self) -> &Path {
        &self.root
    }

    fn load(&self) -> Result<Vec<LoadedManifest>, LoadError> {
        let package_json = self.read_package_json()?.unwrap_or_default();

        let root_manifest = match &package_json.custom_elements {
            Some(path) => self.resolve(Path::new(path)),
            None => self.root.join(DEFAULT_MANIFEST_FILE),
        };

        let mut manifests = Vec::new();
        if root_manifest.is_file() {
            manifests.push(Self::read_manifest(&root_manifest, package_json.name.clone())?);
        } else {
            tracing::debug!(path = %root_manifest.display(), "no workspace manifest");
        }

        for extra in &self.extra_manifests {
            let path = self.resolve(extra);
            if path == root_manifest {
                continue;
            }
            manifests.push(Self::read_manifest(&path, None)?);
        }

        if manifests.is_empty() {
            return Err(LoadError::NoManifest {
                root: self.root.clone(),
            });
        }

        Ok(manifests)
    }
}

/// In-memory loader whose contents can be swapped between reloads
#[derive(Debug, Default)]
pub struct MemoryLoader {
    root: PathBuf,
    packages: RwLock<Vec<(Option<String>, Package)>>,
    failure: RwLock<Option<String>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        MemoryLoader {
            root: PathBuf::from("<memory>"),
            ..Default::default()
        }
    }

    /// Create a loader serving a single package
    pub fn with_package(package_name: Option<&str>, package: Package) -> Self {
        let loader = Self::new();
        loader.set_packages(vec![(package_name.map(str::to_string), package)]);
        loader
    }

    /// Replace the packages served by the next load
    pub fn set_packages(&self, packages: Vec<(Option<String>, Package)>) {
        *self.packages.write() = packages;
    }

    pub fn push_package(&self, package_name: Option<&str>, package: Package) {
        self.packages
            .write()
            .push((package_name.map(str::to_string), package));
    }

    /// Make subsequent loads fail with the given message
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.write() = Some(message.into());
    }

    pub fn clear_failure(&self) {
        *self.failure.write() = None;
    }
}

impl WorkspaceLoader for MemoryLoader {
    fn root(&self) -> &Path {
        &self.root
    }

    fn load(&self) -> Result<Vec<LoadedManifest>, LoadError> {
        if let Some(message) = self.failure.read().clone() {
            return Err(LoadError::Unavailable(message));
        }

        self.packages
            .read()
            .iter()
            .map(|(name, package)| {
                LoadedManifest::from_package(None, name.clone(), package.clone())
            })
            .collect()
    }
}
