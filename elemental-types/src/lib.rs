//! Shared types for elemental
//!
//! This crate provides the custom elements manifest data model as produced
//! by an external analyzer, plus the flattened [`Element`] record that the
//! registry works with.

use serde::{Deserialize, Serialize};

/// A parsed custom elements manifest (`custom-elements.json`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    #[serde(default)]
    pub schema_version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,

    #[serde(default)]
    pub modules: Vec<Module>,
}

impl Package {
    /// Iterate over every class declaration that registers a tag name,
    /// together with the path of the module declaring it.
    pub fn custom_elements(&self) -> impl Iterator<Item = (&str, &ClassDeclaration)> {
        self.modules.iter().flat_map(|module| {
            module.declarations.iter().filter_map(move |decl| match decl {
                Declaration::Class(class) if class.is_custom_element() => {
                    Some((module.path.as_str(), class))
                }
                _ => None,
            })
        })
    }
}

/// A JavaScript module described by the manifest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Module {
    #[serde(default)]
    pub kind: String,

    #[serde(default)]
    pub path: String,

    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

/// A module-level declaration, discriminated by its `kind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Declaration {
    Class(ClassDeclaration),
    Mixin(ClassDeclaration),
    /// Functions, variables and anything else the registry ignores
    #[serde(other)]
    Other,
}

/// Class (or mixin) declaration, possibly defining a custom element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDeclaration {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub summary: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,

    #[serde(default)]
    pub custom_element: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superclass: Option<Reference>,

    #[serde(default)]
    pub mixins: Vec<Reference>,

    #[serde(default)]
    pub attributes: Vec<Attribute>,

    #[serde(default)]
    pub events: Vec<Event>,

    #[serde(default)]
    pub slots: Vec<Slot>,

    #[serde(default)]
    pub css_parts: Vec<CssPart>,

    #[serde(default)]
    pub css_properties: Vec<CssCustomProperty>,

    #[serde(default)]
    pub css_states: Vec<CssCustomState>,
}

impl ClassDeclaration {
    /// Non-empty tag name, if this class registers one
    pub fn tag(&self) -> Option<&str> {
        self.tag_name.as_deref().filter(|tag| !tag.is_empty())
    }

    pub fn is_custom_element(&self) -> bool {
        self.tag().is_some()
    }
}

/// Reference to a class or mixin by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
}

impl Reference {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: None,
            module: None,
        }
    }
}

/// Type annotation as written in source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeText {
    #[serde(default)]
    pub text: String,
}

impl TypeText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// HTML attribute accepted by an element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeText>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
}

impl Attribute {
    /// Type text, or the empty string when untyped
    pub fn type_text(&self) -> &str {
        self.ty.as_ref().map(|t| t.text.as_str()).unwrap_or("")
    }
}

/// DOM event fired by an element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeText>,
}

impl Event {
    pub fn type_text(&self) -> &str {
        self.ty.as_ref().map(|t| t.text.as_str()).unwrap_or("")
    }
}

/// Content slot; the default slot has an empty name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,
}

/// Shadow part exposed for `::part()` styling
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CssPart {
    pub name: String,

    #[serde(default)]
    pub description: String,
}

/// CSS custom property (`--name`) read by an element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CssCustomProperty {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syntax: Option<String>,

    #[serde(default)]
    pub inherits: bool,

    /// Initial value; the manifest calls this `default`
    #[serde(default, alias = "initialValue", skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// Custom state exposed for `:state()` styling
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CssCustomState {
    pub name: String,

    #[serde(default)]
    pub description: String,
}

/// Flattened description of one custom element, keyed by its tag name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub tag_name: String,
    pub class_name: String,
    pub description: String,
    pub summary: String,
    pub attributes: Vec<Attribute>,
    pub slots: Vec<Slot>,
    pub events: Vec<Event>,
    pub css_properties: Vec<CssCustomProperty>,
    pub css_parts: Vec<CssPart>,
    pub css_states: Vec<CssCustomState>,
    pub superclass: Option<Reference>,
    pub mixins: Vec<Reference>,
    pub module_path: String,
    pub package_name: Option<String>,
}

impl Element {
    /// Build an element from a class declaration.
    ///
    /// Returns `None` for classes that do not register a tag name.
    pub fn from_declaration(
        decl: &ClassDeclaration,
        module_path: &str,
        package_name: Option<&str>,
    ) -> Option<Self> {
        let tag_name = decl.tag()?.to_string();

        Some(Element {
            tag_name,
            class_name: decl.name.clone(),
            description: decl.description.clone(),
            summary: decl.summary.clone(),
            attributes: decl.attributes.clone(),
            slots: decl.slots.clone(),
            events: decl.events.clone(),
            css_properties: decl.css_properties.clone(),
            css_parts: decl.css_parts.clone(),
            css_states: decl.css_states.clone(),
            superclass: decl.superclass.clone(),
            mixins: decl.mixins.clone(),
            module_path: module_path.to_string(),
            package_name: package_name.map(str::to_string),
        })
    }

    /// Convenience constructor for an element with only a tag name
    pub fn new(tag_name: impl Into<String>) -> Self {
        Element {
            tag_name: tag_name.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "schemaVersion": "2.1.0",
        "modules": [{
            "kind": "javascript-module",
            "path": "elements/pf-button.js",
            "declarations": [
                {
                    "kind": "class",
                    "name": "PfButton",
                    "tagName": "pf-button",
                    "customElement": true,
                    "superclass": { "name": "LitElement", "package": "lit" },
                    "attributes": [
                        { "name": "variant", "type": { "text": "'primary' | 'secondary'" }, "default": "'primary'" }
                    ],
                    "cssProperties": [
                        { "name": "--pf-button-color", "syntax": "<color>", "default": "red" }
                    ]
                },
                { "kind": "function", "name": "helper", "parameters": [] },
                { "kind": "class", "name": "NotAnElement" }
            ]
        }]
    }"#;

    #[test]
    fn test_parse_manifest() {
        let package: Package = serde_json::from_str(MANIFEST).unwrap();
        assert_eq!(package.schema_version, "2.1.0");
        assert_eq!(package.modules[0].declarations.len(), 3);
        assert_eq!(package.modules[0].declarations[1], Declaration::Other);
    }

    #[test]
    fn test_custom_elements_skips_plain_classes() {
        let package: Package = serde_json::from_str(MANIFEST).unwrap();
        let found: Vec<_> = package.custom_elements().collect();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, "elements/pf-button.js");
        assert_eq!(found[0].1.name, "PfButton");
    }

    #[test]
    fn test_element_from_declaration() {
        let package: Package = serde_json::from_str(MANIFEST).unwrap();
        let (path, decl) = package.custom_elements().next().unwrap();
        let element = Element::from_declaration(decl, path, Some("@pf/elements")).unwrap();

        assert_eq!(element.tag_name, "pf-button");
        assert_eq!(element.class_name, "PfButton");
        assert_eq!(element.module_path, "elements/pf-button.js");
        assert_eq!(element.package_name.as_deref(), Some("@pf/elements"));
        assert_eq!(element.attributes[0].type_text(), "'primary' | 'secondary'");
        assert_eq!(element.css_properties[0].default.as_deref(), Some("red"));
        assert_eq!(element.superclass.as_ref().unwrap().name, "LitElement");
    }

    #[test]
    fn test_empty_tag_name_is_not_an_element() {
        let decl = ClassDeclaration {
            name: "Base".into(),
            tag_name: Some(String::new()),
            ..Default::default()
        };
        assert!(!decl.is_custom_element());
        assert!(Element::from_declaration(&decl, "base.js", None).is_none());
    }
}
