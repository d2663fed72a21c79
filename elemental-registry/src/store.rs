//! Element store
//!
//! An immutable index of the elements of one epoch, built from whatever a
//! [`WorkspaceLoader`](crate::loader::WorkspaceLoader) returned. The
//! registry never mutates a store; a reload swaps in a new one.

use crate::fingerprint::Fingerprint;
use crate::loader::LoadedManifest;
use elemental_types::{ClassDeclaration, Element};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug)]
pub struct ElementStore {
    elements: BTreeMap<String, Arc<Element>>,
    manifests: Vec<LoadedManifest>,
    fingerprint: Fingerprint,
}

impl ElementStore {
    /// Store with no elements, used before the first successful reload
    pub fn empty() -> Self {
        ElementStore {
            elements: BTreeMap::new(),
            manifests: Vec::new(),
            fingerprint: Fingerprint::empty(),
        }
    }

    /// Index the custom elements of the given manifests by tag name.
    ///
    /// Manifests are processed in order; an element redefined by a later
    /// manifest replaces the earlier one.
    pub fn from_manifests(manifests: Vec<LoadedManifest>) -> Self {
        let mut elements = BTreeMap::new();

        for manifest in &manifests {
            let package_name = manifest.package_name.as_deref();
            for (module_path, decl) in manifest.package.custom_elements() {
                let Some(element) = Element::from_declaration(decl, module_path, package_name)
                else {
                    continue;
                };

                let tag = element.tag_name.clone();
                if let Some(previous) = elements.insert(tag.clone(), Arc::new(element)) {
                    tracing::debug!(
                        tag = %tag,
                        previous_module = %previous.module_path,
                        module = %module_path,
                        "element redefined by later declaration"
                    );
                }
            }
        }

        let fingerprint = Fingerprint::combine(manifests.iter().map(|m| &m.fingerprint));

        ElementStore {
            elements,
            manifests,
            fingerprint,
        }
    }

    /// Index already built elements, bypassing declaration parsing
    #[cfg(test)]
    pub(crate) fn from_elements(elements: impl IntoIterator<Item = Element>) -> Self {
        ElementStore {
            elements: elements
                .into_iter()
                .map(|element| (element.tag_name.clone(), Arc::new(element)))
                .collect(),
            manifests: Vec::new(),
            fingerprint: Fingerprint::empty(),
        }
    }

    pub fn get(&self, tag: &str) -> Option<&Arc<Element>> {
        self.elements.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.elements.contains_key(tag)
    }

    /// Tag names in sorted order
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    pub fn elements(&self) -> impl Iterator<Item = &Arc<Element>> {
        self.elements.values()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn manifests(&self) -> &[LoadedManifest] {
        &self.manifests
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// Every custom element declaration in load order, duplicates included
    pub fn declarations(&self) -> impl Iterator<Item = (&str, &ClassDeclaration)> {
        self.manifests
            .iter()
            .flat_map(|manifest| manifest.package.custom_elements())
    }

    /// Unique non-empty schema versions of the loaded manifests, in load order
    pub fn schema_versions(&self) -> Vec<String> {
        let mut versions: Vec<String> = Vec::new();
        for manifest in &self.manifests {
            let version = &manifest.package.schema_version;
            if !version.is_empty() && !versions.contains(version) {
                versions.push(version.clone());
            }
        }
        versions
    }
}

impl Default for ElementStore {
    fn default() -> Self {
        Self::empty()
    }
}
