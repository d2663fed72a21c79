//! Element relationship detection
//!
//! The detector is rebuilt from the full declaration set on every reload and
//! answers "what is this element related to" with a pure lookup. Edges are
//! reported in priority order: inheritance first, then mixins, then
//! co-location in a module or package.

use crate::store::ElementStore;
use elemental_types::{ClassDeclaration, Reference};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Kind of relationship between two elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
    /// The element extends the target
    Superclass,
    /// The target extends the element
    Subclass,
    /// The element applies the target mixin
    Mixin,
    /// Both elements apply the same mixin
    SharedMixin,
    /// Both elements are declared in the same module
    Module,
    /// Both elements ship in the same package
    Package,
}

impl RelationshipKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipKind::Superclass => "superclass",
            RelationshipKind::Subclass => "subclass",
            RelationshipKind::Mixin => "mixin",
            RelationshipKind::SharedMixin => "shared-mixin",
            RelationshipKind::Module => "module",
            RelationshipKind::Package => "package",
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A directed edge from a queried element to `target`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relationship {
    /// Tag name of the related element, or a class/mixin name when the
    /// target is not a registered element
    pub target: String,

    #[serde(rename = "type")]
    pub kind: RelationshipKind,

    /// Class, mixin, module or package through which the elements relate
    #[serde(skip_serializing_if = "String::is_empty")]
    pub via: String,
}

impl Relationship {
    fn new(target: impl Into<String>, kind: RelationshipKind, via: impl Into<String>) -> Self {
        Relationship {
            target: target.into(),
            kind,
            via: via.into(),
        }
    }

    /// Short human-readable label
    pub fn label(&self) -> String {
        match self.kind {
            RelationshipKind::Superclass => format!("extends {}", self.via),
            RelationshipKind::Subclass => format!("extended by {}", self.target),
            RelationshipKind::Mixin => format!("uses {}", self.via),
            RelationshipKind::SharedMixin => format!("shares {}", self.via),
            RelationshipKind::Module => "same module".to_string(),
            RelationshipKind::Package => "same package".to_string(),
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.target, self.label())
    }
}

/// What the detector needs to know about one element
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    pub tag_name: String,
    pub class_name: String,
    pub superclass: Option<Reference>,
    pub mixins: Vec<Reference>,
    pub module_path: String,
    pub package_name: String,
}

#[derive(Debug, Default)]
pub struct RelationshipDetector {
    elements: BTreeMap<String, ElementData>,
    class_to_tag: HashMap<String, String>,
    module_to_tags: HashMap<String, Vec<String>>,
    package_to_tags: HashMap<String, Vec<String>>,
    mixin_to_tags: HashMap<String, Vec<String>>,
}

impl RelationshipDetector {
    /// Create a new empty detector
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a detector from the elements of a store.
    ///
    /// Tag, class, module and package come from the element the store kept.
    /// When several declarations claim the same tag name, superclass and
    /// mixins come from the first of them in load order.
    pub fn build(store: &ElementStore) -> Self {
        let mut decl_by_tag: HashMap<&str, &ClassDeclaration> = HashMap::new();
        for (module_path, decl) in store.declarations() {
            let Some(tag) = decl.tag() else { continue };
            if decl_by_tag.contains_key(tag) {
                tracing::debug!(
                    tag = %tag,
                    module = %module_path,
                    "ignoring inheritance of duplicate declaration"
                );
                continue;
            }
            decl_by_tag.insert(tag, decl);
        }

        let mut detector = Self::new();
        for element in store.elements() {
            let (superclass, mixins) = match decl_by_tag.get(element.tag_name.as_str()) {
                Some(decl) => (decl.superclass.clone(), decl.mixins.clone()),
                None => (element.superclass.clone(), element.mixins.clone()),
            };

            detector.add_element(ElementData {
                tag_name: element.tag_name.clone(),
                class_name: element.class_name.clone(),
                superclass,
                mixins,
                module_path: element.module_path.clone(),
                package_name: element.package_name.clone().unwrap_or_default(),
            });
        }

        detector
    }

    pub fn add_element(&mut self, data: ElementData) {
        let tag = data.tag_name.clone();

        if !data.class_name.is_empty() {
            self.class_to_tag.insert(data.class_name.clone(), tag.clone());
        }
        if !data.module_path.is_empty() {
            self.module_to_tags
                .entry(data.module_path.clone())
                .or_default()
                .push(tag.clone());
        }
        if !data.package_name.is_empty() {
            self.package_to_tags
                .entry(data.package_name.clone())
                .or_default()
                .push(tag.clone());
        }
        for mixin in &data.mixins {
            self.mixin_to_tags
                .entry(mixin.name.clone())
                .or_default()
                .push(tag.clone());
        }

        self.elements.insert(tag, data);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Relationships of the given element; empty for unknown tags
    pub fn relationships_for(&self, tag: &str) -> Vec<Relationship> {
        let Some(data) = self.elements.get(tag) else {
            return Vec::new();
        };

        let mut rels = Vec::new();

        if let Some(superclass) = data.superclass.as_ref().filter(|s| !s.name.is_empty()) {
            match self.class_to_tag.get(&superclass.name) {
                Some(target) if target == tag => {}
                Some(target) => rels.push(Relationship::new(
                    target.clone(),
                    RelationshipKind::Superclass,
                    superclass.name.clone(),
                )),
                None => rels.push(Relationship::new(
                    superclass.name.clone(),
                    RelationshipKind::Superclass,
                    superclass.name.clone(),
                )),
            }
        }

        if !data.class_name.is_empty() {
            for other in self.elements.values() {
                if other.tag_name == tag {
                    continue;
                }
                if other
                    .superclass
                    .as_ref()
                    .is_some_and(|s| s.name == data.class_name)
                {
                    rels.push(Relationship::new(
                        other.tag_name.clone(),
                        RelationshipKind::Subclass,
                        data.class_name.clone(),
                    ));
                }
            }
        }

        for mixin in data.mixins.iter().filter(|m| !m.name.is_empty()) {
            if !contains(&rels, &mixin.name, RelationshipKind::Mixin) {
                rels.push(Relationship::new(
                    mixin.name.clone(),
                    RelationshipKind::Mixin,
                    mixin.name.clone(),
                ));
            }
        }

        for mixin in &data.mixins {
            for other in self.mixin_to_tags.get(&mixin.name).into_iter().flatten() {
                if other == tag || contains(&rels, other, RelationshipKind::SharedMixin) {
                    continue;
                }
                rels.push(Relationship::new(
                    other.clone(),
                    RelationshipKind::SharedMixin,
                    mixin.name.clone(),
                ));
            }
        }

        for other in self.module_to_tags.get(&data.module_path).into_iter().flatten() {
            if other == tag {
                continue;
            }
            let related = [
                RelationshipKind::Superclass,
                RelationshipKind::Subclass,
                RelationshipKind::SharedMixin,
            ]
            .into_iter()
            .any(|kind| contains(&rels, other, kind));
            if !related {
                rels.push(Relationship::new(
                    other.clone(),
                    RelationshipKind::Module,
                    data.module_path.clone(),
                ));
            }
        }

        for other in self.package_to_tags.get(&data.package_name).into_iter().flatten() {
            if other == tag || rels.iter().any(|r| &r.target == other) {
                continue;
            }
            rels.push(Relationship::new(
                other.clone(),
                RelationshipKind::Package,
                data.package_name.clone(),
            ));
        }

        rels
    }
}

fn contains(rels: &[Relationship], target: &str, kind: RelationshipKind) -> bool {
    rels.iter().any(|r| r.target == target && r.kind == kind)
}
