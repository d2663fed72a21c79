//! Elemental element registry
//!
//! This crate provides a concurrent, reloadable registry over the custom
//! elements described by one or more custom elements manifests. It serves
//! many concurrent readers while the workspace can be re-indexed at any time
//! from another thread.
//!
//! # Architecture
//!
//! ```text
//! WorkspaceLoader → ElementStore → RelationshipDetector
//!                        │
//!                        ├─ convert_element → EnrichedElementInfo (memoized per epoch)
//!                        └─ Snapshot → common prefixes / CSS properties (cached per epoch)
//! ```
//!
//! Every successful reload starts a new epoch. Derived values are computed
//! lazily, outside the registry lock, and committed only if the epoch they
//! were computed for is still current; a reader never sees values from two
//! different epochs in one lookup.
//!
//! # Example
//!
//! ```rust,ignore
//! use elemental_registry::{ElementRegistry, RegistryConfig};
//!
//! let registry = ElementRegistry::from_config(&RegistryConfig::for_workspace("."));
//! registry.reload()?;
//!
//! if let Some(button) = registry.get_element("pf-button") {
//!     println!("{} has {} attributes", button.tag_name, button.attributes().count());
//! }
//! println!("prefixes: {:?}", registry.common_tag_prefixes());
//! ```

pub mod config;
pub mod convert;
pub mod epoch;
pub mod error;
pub mod fingerprint;
pub mod item;
pub mod loader;
pub mod memo;
pub mod metrics;
pub mod registry;
pub mod relationships;
pub mod schema;
pub mod snapshot;
pub mod store;

pub use config::{ConfigError, RegistryConfig, ReloadFailurePolicy, DEFAULT_CONFIG_FILE};
pub use convert::{convert_element, ConvertError, ConvertOptions};
pub use epoch::{Epoch, Revision};
pub use error::{RegistryError, Result};
pub use fingerprint::Fingerprint;
pub use item::{
    AttributeItem, CssPartItem, CssPropertyItem, CssStateItem, Defaultable, ElementItem,
    EnrichedElementInfo, Enumerable, EventItem, Example, Item, ItemKind, SlotItem, Typed,
};
pub use loader::{FsWorkspaceLoader, LoadError, LoadedManifest, MemoryLoader, WorkspaceLoader};
pub use metrics::{MetricsSnapshot, RegistryMetrics};
pub use registry::ElementRegistry;
pub use relationships::{Relationship, RelationshipDetector, RelationshipKind};
pub use schema::{
    DirSchemaProvider, MemorySchemaProvider, NoSchemaProvider, SchemaError, SchemaProvider,
};
pub use snapshot::Snapshot;
pub use store::ElementStore;

/// Prelude for common imports
pub mod prelude {
    pub use crate::item::{Defaultable, Enumerable, Item, Typed};
    pub use crate::{ElementRegistry, RegistryConfig, RegistryError, WorkspaceLoader};
}
