//! The element registry
//!
//! [`ElementRegistry`] owns the current epoch (element store, relationship
//! detector and lazily filled caches) behind a single reader/writer lock.
//!
//! Lock discipline:
//!
//! - queries that only read cached state take the shared lock;
//! - swapping in a new epoch, writing a memo entry and committing an
//!   aggregate take the exclusive lock, and only for the swap or commit;
//! - conversion and aggregate computation run with no lock held, over values
//!   captured earlier, and are committed only if their epoch is still current.
//!
//! Reloads are serialized by a separate mutex so that loading from disk
//! never blocks readers.

use crate::config::{RegistryConfig, ReloadFailurePolicy};
use crate::convert::{convert_element, ConvertOptions};
use crate::epoch::{Epoch, Revision};
use crate::error::{RegistryError, Result};
use crate::item::EnrichedElementInfo;
use crate::loader::{FsWorkspaceLoader, WorkspaceLoader};
use crate::memo::{AggregateKind, CommitOutcome, EpochCache};
use crate::metrics::RegistryMetrics;
use crate::relationships::{Relationship, RelationshipDetector};
use crate::schema::{
    load_schema, select_schema_version, DirSchemaProvider, NoSchemaProvider, SchemaProvider,
};
use crate::snapshot::Snapshot;
use crate::store::ElementStore;
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Everything that belongs to one epoch
struct RegistryState {
    store: Arc<ElementStore>,
    relationships: Arc<RelationshipDetector>,
    cache: EpochCache,
}

impl RegistryState {
    fn empty() -> Self {
        RegistryState {
            store: Arc::new(ElementStore::empty()),
            relationships: Arc::new(RelationshipDetector::new()),
            cache: EpochCache::new(Revision::ZERO),
        }
    }

    fn epoch(&self) -> Epoch {
        Epoch {
            revision: self.cache.revision(),
            fingerprint: self.store.fingerprint(),
            element_count: self.store.len(),
        }
    }
}

/// Concurrent, reloadable registry of custom elements
pub struct ElementRegistry {
    loader: Arc<dyn WorkspaceLoader>,
    schemas: Arc<dyn SchemaProvider>,
    options: ConvertOptions,
    reload_failure: ReloadFailurePolicy,
    state: RwLock<RegistryState>,
    reload_lock: Mutex<()>,
    metrics: RegistryMetrics,
}

impl ElementRegistry {
    /// Create an empty registry; call [`reload`](Self::reload) to populate it
    pub fn new(loader: Arc<dyn WorkspaceLoader>) -> Self {
        ElementRegistry {
            loader,
            schemas: Arc::new(NoSchemaProvider),
            options: ConvertOptions::default(),
            reload_failure: ReloadFailurePolicy::default(),
            state: RwLock::new(RegistryState::empty()),
            reload_lock: Mutex::new(()),
            metrics: RegistryMetrics::new(),
        }
    }

    /// Create a registry for an on-disk workspace described by `config`
    pub fn from_config(config: &RegistryConfig) -> Self {
        let loader = FsWorkspaceLoader::new(config.workspace_dir())
            .with_manifests(config.manifest_paths().iter().cloned());
        let schemas: Arc<dyn SchemaProvider> = match config.schemas_dir() {
            Some(dir) => Arc::new(DirSchemaProvider::new(dir)),
            None => Arc::new(NoSchemaProvider),
        };

        Self::new(Arc::new(loader))
            .with_schema_provider(schemas)
            .with_convert_options(config.convert_options())
            .with_reload_failure(config.reload_failure)
    }

    pub fn with_schema_provider(mut self, schemas: Arc<dyn SchemaProvider>) -> Self {
        self.schemas = schemas;
        self
    }

    pub fn with_convert_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_reload_failure(mut self, policy: ReloadFailurePolicy) -> Self {
        self.reload_failure = policy;
        self
    }

    pub fn root(&self) -> &Path {
        self.loader.root()
    }

    pub fn metrics(&self) -> &RegistryMetrics {
        &self.metrics
    }

    /// The epoch currently being served
    pub fn epoch(&self) -> Epoch {
        self.state.read().epoch()
    }

    pub fn revision(&self) -> Revision {
        self.state.read().cache.revision()
    }

    pub fn len(&self) -> usize {
        self.state.read().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().store.is_empty()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.state.read().store.contains(tag)
    }

    /// Tag names of the current epoch, sorted
    pub fn tags(&self) -> Vec<String> {
        self.state.read().store.tags().map(str::to_string).collect()
    }

    /// Reload the workspace and start a new epoch.
    ///
    /// The load runs without the state lock; the new store, relationship
    /// detector and emptied caches are then swapped in under one exclusive
    /// lock, so a reader sees either the old epoch or the new one.
    #[instrument(skip(self), fields(root = %self.loader.root().display()))]
    pub fn reload(&self) -> Result<Epoch> {
        let _reload = self.reload_lock.lock();
        let start = Instant::now();

        match self.loader.load() {
            Ok(manifests) => {
                let store = Arc::new(ElementStore::from_manifests(manifests));
                let relationships = Arc::new(RelationshipDetector::build(&store));
                let epoch = self.commit_epoch(store, relationships);

                self.metrics.record_reload(start.elapsed(), true);
                Ok(epoch)
            }
            Err(source) => {
                self.metrics.record_reload(start.elapsed(), false);
                let error = RegistryError::Load {
                    root: self.loader.root().to_path_buf(),
                    source,
                };

                match self.reload_failure {
                    ReloadFailurePolicy::KeepLastGood => {
                        tracing::warn!(
                            error = %error,
                            revision = %self.revision(),
                            "reload failed, keeping last good epoch"
                        );
                    }
                    ReloadFailurePolicy::Clear => {
                        let epoch = self.commit_epoch(
                            Arc::new(ElementStore::empty()),
                            Arc::new(RelationshipDetector::new()),
                        );
                        tracing::warn!(
                            error = %error,
                            revision = %epoch.revision,
                            "reload failed, registry cleared"
                        );
                    }
                }

                Err(error)
            }
        }
    }

    fn commit_epoch(
        &self,
        store: Arc<ElementStore>,
        relationships: Arc<RelationshipDetector>,
    ) -> Epoch {
        let (epoch, previous) = {
            let mut state = self.state.write();
            let previous = state.store.fingerprint();
            let revision = state.cache.revision().next();

            state.store = store;
            state.relationships = relationships;
            state.cache.advance(revision);
            (state.epoch(), previous)
        };

        if epoch.fingerprint == previous {
            tracing::info!(epoch = %epoch, "reloaded, workspace unchanged");
        } else {
            tracing::info!(epoch = %epoch, "reloaded");
        }
        epoch
    }

    /// Look up an element, converting and memoizing it on first access
    pub fn get_element(&self, tag: &str) -> Option<Arc<EnrichedElementInfo>> {
        match self.element_info(tag) {
            Ok(info) => Some(info),
            Err(RegistryError::NotFound { .. }) => None,
            Err(err) => {
                tracing::warn!(tag = %tag, error = %err, "element conversion failed");
                None
            }
        }
    }

    /// Like [`get_element`](Self::get_element) but reports why a lookup failed
    pub fn element_info(&self, tag: &str) -> Result<Arc<EnrichedElementInfo>> {
        let (element, revision) = {
            let state = self.state.read();
            if let Some(info) = state.cache.element(tag) {
                self.metrics.record_element_hit();
                return Ok(Arc::clone(info));
            }
            let element = state.store.get(tag).ok_or_else(|| RegistryError::NotFound {
                tag: tag.to_string(),
            })?;
            (Arc::clone(element), state.cache.revision())
        };

        self.metrics.record_element_miss();
        let info = Arc::new(convert_element(&element, &self.options)?);
        self.metrics.record_conversions(1);

        let outcome = self.state.write().cache.insert_element(revision, Arc::clone(&info));
        if outcome == CommitOutcome::Stale {
            self.metrics.record_stale_commit();
            tracing::debug!(
                tag = %tag,
                computed_at = %revision,
                "dropping element converted for a replaced epoch"
            );
        }

        Ok(info)
    }

    /// Every element of the current epoch, keyed by tag name
    pub fn get_all_elements(&self) -> BTreeMap<String, Arc<EnrichedElementInfo>> {
        let tags = self.tags();

        tags.into_iter()
            .filter_map(|tag| {
                let info = self.get_element(&tag)?;
                Some((tag, info))
            })
            .collect()
    }

    /// Tag-name prefixes shared by at least two elements
    pub fn common_tag_prefixes(&self) -> Vec<String> {
        self.aggregate(AggregateKind::CommonPrefixes)
    }

    /// Union of the CSS custom property names of all elements
    pub fn all_css_custom_properties(&self) -> Vec<String> {
        self.aggregate(AggregateKind::CssProperties)
    }

    fn aggregate(&self, kind: AggregateKind) -> Vec<String> {
        if let Some(value) = self.state.read().cache.aggregate(kind) {
            self.metrics.record_aggregate_hit();
            return value.to_vec();
        }

        let snapshot = {
            let mut state = self.state.write();
            // another caller may have committed while we waited
            if let Some(value) = state.cache.aggregate(kind) {
                self.metrics.record_aggregate_hit();
                return value.to_vec();
            }

            let revision = state.cache.revision();
            let captured =
                Snapshot::capture(revision, &state.store, state.cache.elements(), &self.options);
            match captured {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    tracing::warn!(
                        aggregate = %kind,
                        error = %err,
                        "snapshot failed, serving empty aggregate"
                    );
                    state.cache.commit_aggregate(kind, revision, Arc::new(Vec::new()));
                    return Vec::new();
                }
            }
        };

        self.metrics.record_conversions(snapshot.converted() as u64);
        self.metrics.record_aggregate_recompute();
        let value = Arc::new(kind.compute(&snapshot));

        let outcome = self
            .state
            .write()
            .cache
            .commit_aggregate(kind, snapshot.revision(), Arc::clone(&value));
        match outcome {
            CommitOutcome::Committed => {
                tracing::debug!(
                    aggregate = %kind,
                    revision = %snapshot.revision(),
                    len = value.len(),
                    "aggregate cached"
                );
            }
            CommitOutcome::AlreadyValid => {}
            CommitOutcome::Stale => {
                self.metrics.record_stale_commit();
                tracing::debug!(
                    aggregate = %kind,
                    computed_at = %snapshot.revision(),
                    "dropping aggregate computed for a replaced epoch"
                );
            }
        }

        value.to_vec()
    }

    /// Relationships of an element; empty when the tag is unknown
    pub fn relationships_for(&self, tag: &str) -> Vec<Relationship> {
        self.state.read().relationships.relationships_for(tag)
    }

    /// Schema versions declared by the loaded manifests
    pub fn manifest_schema_versions(&self) -> Vec<String> {
        self.state.read().store.schema_versions()
    }

    /// JSON schema matching the loaded manifests
    pub fn manifest_schema(&self) -> Result<serde_json::Value> {
        let versions = self.manifest_schema_versions();
        let version = select_schema_version(&versions);
        tracing::debug!(version = %version, "loading manifest schema");

        Ok(load_schema(self.schemas.as_ref(), version)?)
    }
}

impl std::fmt::Debug for ElementRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementRegistry")
            .field("root", &self.loader.root())
            .field("epoch", &self.epoch())
            .field("reload_failure", &self.reload_failure)
            .finish_non_exhaustive()
    }
}
