//! Element items and their capabilities
//!
//! Attributes, slots, events and the CSS surface of an element overlap in
//! what they carry: everything has a name and documentation, some things
//! are typed, some have defaults, attributes can be enumerated. Each
//! capability is a narrow trait; the concrete item types implement the
//! ones that apply, and [`ElementItem`] tags them for storage and JSON.

use serde::Serialize;
use std::fmt;

/// Kind of an element item, as it appears in JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKind {
    Attribute,
    Slot,
    Event,
    CssProperty,
    CssPart,
    CssState,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Attribute => "attribute",
            ItemKind::Slot => "slot",
            ItemKind::Event => "event",
            ItemKind::CssProperty => "css-property",
            ItemKind::CssPart => "css-part",
            ItemKind::CssState => "css-state",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "attribute" => Some(ItemKind::Attribute),
            "slot" => Some(ItemKind::Slot),
            "event" => Some(ItemKind::Event),
            "css-property" => Some(ItemKind::CssProperty),
            "css-part" => Some(ItemKind::CssPart),
            "css-state" => Some(ItemKind::CssState),
            _ => None,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability shared by every item
pub trait Item {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn guidelines(&self) -> &[String];
    fn examples(&self) -> &[String];
    fn kind(&self) -> ItemKind;
}

/// Items carrying a type annotation (attributes, events)
pub trait Typed: Item {
    fn type_text(&self) -> &str;
}

/// Items with a default value
pub trait Defaultable: Item {
    fn default_value(&self) -> Option<&str>;
}

/// Items restricted to a set of literal values
pub trait Enumerable: Item {
    fn values(&self) -> &[String];
}

/// Documentation common to all items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ItemDoc {
    pub name: String,
    pub description: String,
    pub guidelines: Vec<String>,
    pub examples: Vec<String>,
}

impl ItemDoc {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        ItemDoc {
            name: name.into(),
            description: description.into(),
            guidelines: Vec::new(),
            examples: Vec::new(),
        }
    }

    pub fn with_guidelines(mut self, guidelines: Vec<String>) -> Self {
        self.guidelines = guidelines;
        self
    }
}

macro_rules! impl_item {
    ($ty:ty, $kind:expr) => {
        impl Item for $ty {
            fn name(&self) -> &str {
                &self.doc.name
            }

            fn description(&self) -> &str {
                &self.doc.description
            }

            fn guidelines(&self) -> &[String] {
                &self.doc.guidelines
            }

            fn examples(&self) -> &[String] {
                &self.doc.examples
            }

            fn kind(&self) -> ItemKind {
                $kind
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeItem {
    #[serde(flatten)]
    pub doc: ItemDoc,

    #[serde(rename = "type")]
    pub type_text: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    pub required: bool,
    pub values: Vec<String>,
}

impl AttributeItem {
    pub fn required(&self) -> bool {
        self.required
    }
}

impl_item!(AttributeItem, ItemKind::Attribute);

impl Typed for AttributeItem {
    fn type_text(&self) -> &str {
        &self.type_text
    }
}

impl Defaultable for AttributeItem {
    fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }
}

impl Enumerable for AttributeItem {
    fn values(&self) -> &[String] {
        &self.values
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotItem {
    #[serde(flatten)]
    pub doc: ItemDoc,
}

impl SlotItem {
    /// The default (unnamed) slot
    pub fn is_default(&self) -> bool {
        self.doc.name.is_empty()
    }
}

impl_item!(SlotItem, ItemKind::Slot);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventItem {
    #[serde(flatten)]
    pub doc: ItemDoc,

    #[serde(rename = "type")]
    pub type_text: String,
}

impl_item!(EventItem, ItemKind::Event);

impl Typed for EventItem {
    fn type_text(&self) -> &str {
        &self.type_text
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CssPropertyItem {
    #[serde(flatten)]
    pub doc: ItemDoc,

    pub syntax: String,
    pub inherits: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial: Option<String>,
}

impl CssPropertyItem {
    pub fn syntax(&self) -> &str {
        &self.syntax
    }

    pub fn inherits(&self) -> bool {
        self.inherits
    }

    pub fn initial(&self) -> Option<&str> {
        self.initial.as_deref()
    }
}

impl_item!(CssPropertyItem, ItemKind::CssProperty);

impl Defaultable for CssPropertyItem {
    fn default_value(&self) -> Option<&str> {
        self.initial.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CssPartItem {
    #[serde(flatten)]
    pub doc: ItemDoc,
}

impl_item!(CssPartItem, ItemKind::CssPart);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CssStateItem {
    #[serde(flatten)]
    pub doc: ItemDoc,
}

impl_item!(CssStateItem, ItemKind::CssState);

/// One documented item of an element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ElementItem {
    Attribute(AttributeItem),
    Slot(SlotItem),
    Event(EventItem),
    CssProperty(CssPropertyItem),
    CssPart(CssPartItem),
    CssState(CssStateItem),
}

impl ElementItem {
    fn inner(&self) -> &dyn Item {
        match self {
            ElementItem::Attribute(item) => item,
            ElementItem::Slot(item) => item,
            ElementItem::Event(item) => item,
            ElementItem::CssProperty(item) => item,
            ElementItem::CssPart(item) => item,
            ElementItem::CssState(item) => item,
        }
    }

    /// View this item through its type capability, if it has one
    pub fn as_typed(&self) -> Option<&dyn Typed> {
        match self {
            ElementItem::Attribute(item) => Some(item),
            ElementItem::Event(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_defaultable(&self) -> Option<&dyn Defaultable> {
        match self {
            ElementItem::Attribute(item) => Some(item),
            ElementItem::CssProperty(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_enumerable(&self) -> Option<&dyn Enumerable> {
        match self {
            ElementItem::Attribute(item) => Some(item),
            _ => None,
        }
    }
}

impl Item for ElementItem {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn description(&self) -> &str {
        self.inner().description()
    }

    fn guidelines(&self) -> &[String] {
        self.inner().guidelines()
    }

    fn examples(&self) -> &[String] {
        self.inner().examples()
    }

    fn kind(&self) -> ItemKind {
        self.inner().kind()
    }
}

/// A rendered usage example
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Example {
    pub title: String,
    pub description: String,
    pub code: String,
    pub language: String,
}

/// An element decorated with derived guidelines, examples and typed items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedElementInfo {
    pub tag_name: String,
    pub name: String,
    pub description: String,
    pub summary: String,
    pub module: String,
    pub package: String,
    pub items: Vec<ElementItem>,
    pub guidelines: Vec<String>,
    pub examples: Vec<Example>,
}

impl EnrichedElementInfo {
    pub fn attributes(&self) -> impl Iterator<Item = &AttributeItem> {
        self.items.iter().filter_map(|item| match item {
            ElementItem::Attribute(attr) => Some(attr),
            _ => None,
        })
    }

    pub fn slots(&self) -> impl Iterator<Item = &SlotItem> {
        self.items.iter().filter_map(|item| match item {
            ElementItem::Slot(slot) => Some(slot),
            _ => None,
        })
    }

    pub fn events(&self) -> impl Iterator<Item = &EventItem> {
        self.items.iter().filter_map(|item| match item {
            ElementItem::Event(event) => Some(event),
            _ => None,
        })
    }

    pub fn css_properties(&self) -> impl Iterator<Item = &CssPropertyItem> {
        self.items.iter().filter_map(|item| match item {
            ElementItem::CssProperty(prop) => Some(prop),
            _ => None,
        })
    }

    pub fn css_parts(&self) -> impl Iterator<Item = &CssPartItem> {
        self.items.iter().filter_map(|item| match item {
            ElementItem::CssPart(part) => Some(part),
            _ => None,
        })
    }

    pub fn css_states(&self) -> impl Iterator<Item = &CssStateItem> {
        self.items.iter().filter_map(|item| match item {
            ElementItem::CssState(state) => Some(state),
            _ => None,
        })
    }

    pub fn items_by_kind(&self, kind: ItemKind) -> impl Iterator<Item = &ElementItem> {
        self.items.iter().filter(move |item| item.kind() == kind)
    }
}
