//! Epoch-scoped memoization
//!
//! [`EpochCache`] holds everything the registry derives lazily from one
//! epoch: converted elements and the aggregate views. Every write names the
//! revision it was computed for and is refused when that revision is no
//! longer current.

use crate::epoch::Revision;
use crate::item::EnrichedElementInfo;
use crate::snapshot::{all_css_custom_properties, common_tag_prefixes, Snapshot};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Aggregate views computed over a whole snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateKind {
    CommonPrefixes,
    CssProperties,
}

impl AggregateKind {
    pub const ALL: [AggregateKind; 2] =
        [AggregateKind::CommonPrefixes, AggregateKind::CssProperties];

    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateKind::CommonPrefixes => "common-prefixes",
            AggregateKind::CssProperties => "css-properties",
        }
    }

    /// Run the aggregate function; pure, takes no locks
    pub fn compute(&self, snapshot: &Snapshot) -> Vec<String> {
        match self {
            AggregateKind::CommonPrefixes => common_tag_prefixes(snapshot),
            AggregateKind::CssProperties => all_css_custom_properties(snapshot),
        }
    }

    fn slot(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of offering a value to the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    /// Another caller committed for this epoch first
    AlreadyValid,
    /// The value belongs to an epoch that has since been replaced
    Stale,
}

#[derive(Debug)]
pub struct EpochCache {
    revision: Revision,
    elements: HashMap<String, Arc<EnrichedElementInfo>>,
    aggregates: [Option<Arc<Vec<String>>>; 2],
}

impl EpochCache {
    /// Create an empty cache for the given epoch
    pub fn new(revision: Revision) -> Self {
        EpochCache {
            revision,
            elements: HashMap::new(),
            aggregates: [None, None],
        }
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Drop everything and start caching for `revision`
    pub fn advance(&mut self, revision: Revision) {
        debug_assert!(revision > self.revision);
        self.revision = revision;
        self.elements.clear();
        self.aggregates = [None, None];
    }

    pub fn element(&self, tag: &str) -> Option<&Arc<EnrichedElementInfo>> {
        self.elements.get(tag)
    }

    pub fn elements(&self) -> &HashMap<String, Arc<EnrichedElementInfo>> {
        &self.elements
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Memoize a converted element. Last write wins within an epoch.
    pub fn insert_element(
        &mut self,
        computed_at: Revision,
        info: Arc<EnrichedElementInfo>,
    ) -> CommitOutcome {
        if computed_at != self.revision {
            return CommitOutcome::Stale;
        }
        self.elements.insert(info.tag_name.clone(), info);
        CommitOutcome::Committed
    }

    /// Cached aggregate, if valid for the current epoch
    pub fn aggregate(&self, kind: AggregateKind) -> Option<&Arc<Vec<String>>> {
        self.aggregates[kind.slot()].as_ref()
    }

    pub fn commit_aggregate(
        &mut self,
        kind: AggregateKind,
        computed_at: Revision,
        value: Arc<Vec<String>>,
    ) -> CommitOutcome {
        if computed_at != self.revision {
            return CommitOutcome::Stale;
        }
        let slot = &mut self.aggregates[kind.slot()];
        if slot.is_some() {
            return CommitOutcome::AlreadyValid;
        }
        *slot = Some(value);
        CommitOutcome::Committed
    }
}
