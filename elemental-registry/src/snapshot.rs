//! Snapshots and the aggregate functions computed over them
//!
//! A [`Snapshot`] is captured while the registry holds its lock and is
//! immutable afterwards, so the aggregates can be computed with no lock held.

use crate::convert::{convert_element, ConvertError, ConvertOptions};
use crate::epoch::Revision;
use crate::item::EnrichedElementInfo;
use crate::store::ElementStore;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

/// Minimum number of elements that must share a prefix for it to count
const COMMON_PREFIX_THRESHOLD: usize = 2;

/// Point-in-time copy of every converted element of one epoch
#[derive(Debug, Clone)]
pub struct Snapshot {
    revision: Revision,
    elements: BTreeMap<String, Arc<EnrichedElementInfo>>,
    converted: usize,
}

impl Snapshot {
    /// Capture every element of `store`, reusing memoized conversions and
    /// converting the rest inline.
    ///
    /// The caller must hold the lock guarding `store` and `memo` for the
    /// duration of the call.
    pub fn capture(
        revision: Revision,
        store: &ElementStore,
        memo: &HashMap<String, Arc<EnrichedElementInfo>>,
        options: &ConvertOptions,
    ) -> Result<Self, ConvertError> {
        let mut elements = BTreeMap::new();
        let mut converted = 0;

        for element in store.elements() {
            let info = match memo.get(&element.tag_name) {
                Some(info) => Arc::clone(info),
                None => {
                    converted += 1;
                    Arc::new(convert_element(element, options)?)
                }
            };
            elements.insert(element.tag_name.clone(), info);
        }

        Ok(Snapshot {
            revision,
            elements,
            converted,
        })
    }

    /// Build a snapshot directly from converted elements
    pub fn from_elements(
        revision: Revision,
        elements: impl IntoIterator<Item = EnrichedElementInfo>,
    ) -> Self {
        Snapshot {
            revision,
            elements: elements
                .into_iter()
                .map(|info| (info.tag_name.clone(), Arc::new(info)))
                .collect(),
            converted: 0,
        }
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Number of elements converted during capture rather than reused
    pub fn converted(&self) -> usize {
        self.converted
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, tag: &str) -> Option<&Arc<EnrichedElementInfo>> {
        self.elements.get(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<EnrichedElementInfo>)> {
        self.elements.iter().map(|(tag, info)| (tag.as_str(), info))
    }
}

/// Tag-name prefixes (text before the first `-`) shared by more than one
/// element, sorted.
pub fn common_tag_prefixes(snapshot: &Snapshot) -> Vec<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for (tag, _) in snapshot.iter() {
        if let Some((prefix, _)) = tag.split_once('-') {
            *counts.entry(prefix).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count >= COMMON_PREFIX_THRESHOLD)
        .map(|(prefix, _)| prefix.to_string())
        .collect()
}

/// Union of every element's CSS custom property names, sorted
pub fn all_css_custom_properties(snapshot: &Snapshot) -> Vec<String> {
    let names: BTreeSet<&str> = snapshot
        .iter()
        .flat_map(|(_, info)| info.css_properties())
        .map(|prop| prop.doc.name.as_str())
        .collect();

    names.into_iter().map(str::to_string).collect()
}
