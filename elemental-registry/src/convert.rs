//! Conversion pipeline
//!
//! Turns a raw [`Element`] into an [`EnrichedElementInfo`]: sanitized
//! descriptions, guideline sentences, enum values of union-typed
//! attributes, and generated usage examples.
//!
//! Everything here is a pure function of its inputs. Nothing in this module
//! touches registry state, which is what lets the registry run conversions
//! without holding its lock.

use crate::item::{
    AttributeItem, CssPartItem, CssPropertyItem, CssStateItem, ElementItem, EnrichedElementInfo,
    EventItem, Example, ItemDoc, SlotItem,
};
use elemental_types::Element;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Default cap on description length, in characters
pub const DEFAULT_MAX_DESCRIPTION_LENGTH: usize = 2000;

const TEMPLATE_PLACEHOLDER: &str = "[Description removed: contains template syntax]";

const GUIDELINE_KEYWORDS: [&str; 4] = ["should", "must", "use", "avoid"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error("Element has no tag name")]
    MissingTagName,
}

/// Knobs for the conversion pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    pub max_description_length: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            max_description_length: DEFAULT_MAX_DESCRIPTION_LENGTH,
        }
    }
}

/// Convert a raw element into its enriched form
pub fn convert_element(
    element: &Element,
    options: &ConvertOptions,
) -> Result<EnrichedElementInfo, ConvertError> {
    if element.tag_name.is_empty() {
        return Err(ConvertError::MissingTagName);
    }

    let max = options.max_description_length;
    let doc = |name: &str, description: &str| {
        let description = sanitize_description(description, max);
        let guidelines = extract_guidelines(&description);
        ItemDoc::new(name, description).with_guidelines(guidelines)
    };

    let mut items = Vec::with_capacity(
        element.attributes.len()
            + element.slots.len()
            + element.events.len()
            + element.css_properties.len()
            + element.css_parts.len()
            + element.css_states.len(),
    );

    for attr in &element.attributes {
        items.push(ElementItem::Attribute(AttributeItem {
            doc: doc(&attr.name, &attr.description),
            type_text: attr.type_text().to_string(),
            default: attr.default.clone().filter(|d| !d.is_empty()),
            required: attr.required,
            values: enum_values(attr.type_text()),
        }));
    }

    for slot in &element.slots {
        items.push(ElementItem::Slot(SlotItem {
            doc: doc(&slot.name, &slot.description),
        }));
    }

    for event in &element.events {
        items.push(ElementItem::Event(EventItem {
            doc: doc(&event.name, &event.description),
            type_text: event.type_text().to_string(),
        }));
    }

    for prop in &element.css_properties {
        items.push(ElementItem::CssProperty(CssPropertyItem {
            doc: doc(&prop.name, &prop.description),
            syntax: prop.syntax.clone().unwrap_or_default(),
            inherits: prop.inherits,
            initial: prop.default.clone().filter(|d| !d.is_empty()),
        }));
    }

    for part in &element.css_parts {
        items.push(ElementItem::CssPart(CssPartItem {
            doc: doc(&part.name, &part.description),
        }));
    }

    for state in &element.css_states {
        items.push(ElementItem::CssState(CssStateItem {
            doc: doc(&state.name, &state.description),
        }));
    }

    let name = if element.class_name.is_empty() {
        element.tag_name.clone()
    } else {
        element.class_name.clone()
    };

    Ok(EnrichedElementInfo {
        tag_name: element.tag_name.clone(),
        name,
        description: sanitize_description(&element.description, max),
        summary: sanitize_description(&element.summary, max),
        module: element.module_path.clone(),
        package: element.package_name.clone().unwrap_or_default(),
        guidelines: element_guidelines(element, max),
        examples: build_examples(element),
        items,
    })
}

/// Guidelines for the element as a whole: sentences from its description,
/// then one line per documented attribute.
pub fn element_guidelines(element: &Element, max_description_length: usize) -> Vec<String> {
    let description = sanitize_description(&element.description, max_description_length);
    let mut guidelines = extract_guidelines(&description);

    for attr in &element.attributes {
        if attr.description.is_empty() {
            continue;
        }
        let text = sanitize_description(&attr.description, max_description_length);
        guidelines.push(format!("{}: {}", attr.name, text));
    }

    guidelines
}

/// Keep sentences that read like usage advice
pub fn extract_guidelines(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    text.split('.')
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .filter(|sentence| {
            let lower = sentence.to_lowercase();
            GUIDELINE_KEYWORDS.iter().any(|kw| lower.contains(kw))
        })
        .map(|sentence| format!("{sentence}."))
        .collect()
}

/// Literal members of a union type such as `"red" | "green"`
pub fn enum_values(type_text: &str) -> Vec<String> {
    if !type_text.contains('|') {
        return Vec::new();
    }

    type_text
        .split('|')
        .map(|part| part.trim().trim_matches(|c| c == '"' || c == '\''))
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Make a description safe to hand to template renderers and HTML
pub fn sanitize_description(description: &str, max_length: usize) -> String {
    if description.is_empty() {
        return String::new();
    }

    let mut text = truncate_chars(description, max_length);

    if contains_template_syntax(&text) {
        return TEMPLATE_PLACEHOLDER.to_string();
    }

    text = escape_html(&text);

    static WHITESPACE_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

fn truncate_chars(text: &str, max_length: usize) -> String {
    match text.char_indices().nth(max_length) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Detect `{{ ... }}` template actions, including ones obfuscated with
/// whitespace or HTML comments between the braces.
pub fn contains_template_syntax(text: &str) -> bool {
    static COMMENT_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"));
    static OPEN_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\{\s*\{").expect("valid open delimiter regex"));
    static CLOSE_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\}\s*\}").expect("valid close delimiter regex"));

    let has_pattern = |s: &str| s.contains("{{") && s.contains("}}");
    if has_pattern(text) {
        return true;
    }

    let normalized = COMMENT_RE.replace_all(text, "");
    let normalized = OPEN_RE.replace_all(&normalized, "{{");
    let normalized = CLOSE_RE.replace_all(&normalized, "}}");
    has_pattern(&normalized)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&#34;"),
            _ => out.push(c),
        }
    }
    out
}

/// Generate HTML usage snippets for an element
pub fn build_examples(element: &Element) -> Vec<Example> {
    let tag = &element.tag_name;
    let mut examples = vec![Example {
        title: "Basic Usage".into(),
        description: format!("Standard implementation of {tag}"),
        code: format!("<{tag}></{tag}>"),
        language: "html".into(),
    }];

    let attr_parts: Vec<String> = element
        .attributes
        .iter()
        .take(3)
        .map(|attr| match attr.default.as_deref().filter(|d| !d.is_empty()) {
            Some(default) => format!(r#"{}="{}""#, attr.name, default),
            None => match attr.type_text() {
                "boolean" => attr.name.clone(),
                "string" => format!(r#"{}="example""#, attr.name),
                "number" => format!(r#"{}="0""#, attr.name),
                _ => format!(r#"{}="value""#, attr.name),
            },
        })
        .collect();

    if !attr_parts.is_empty() {
        examples.push(Example {
            title: "With Attributes".into(),
            description: format!("Using {tag} with common attributes"),
            code: format!("<{tag} {}></{tag}>", attr_parts.join(" ")),
            language: "html".into(),
        });
    }

    let slot_content: Vec<String> = element
        .slots
        .iter()
        .take(2)
        .map(|slot| {
            if slot.name.is_empty() {
                "Default content".to_string()
            } else {
                format!(r#"<span slot="{0}">{0} content</span>"#, slot.name)
            }
        })
        .collect();

    if !slot_content.is_empty() {
        examples.push(Example {
            title: "With Content Slots".into(),
            description: format!("Using {tag} with slotted content"),
            code: format!("<{tag}>\n  {}\n</{tag}>", slot_content.join("\n  ")),
            language: "html".into(),
        });
    }

    examples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Defaultable, Enumerable, Item, ItemKind};
    use elemental_types::{Attribute, CssCustomProperty, Slot, TypeText};

    fn button() -> Element {
        Element {
            tag_name: "pf-button".into(),
            class_name: "PfButton".into(),
            description: "A button. Use it for actions. It is blue.".into(),
            attributes: vec![
                Attribute {
                    name: "variant".into(),
                    description: "Visual style. Avoid mixing variants in a group.".into(),
                    ty: Some(TypeText::new(r#""primary" | "secondary""#)),
                    default: Some("primary".into()),
                    ..Default::default()
                },
                Attribute {
                    name: "disabled".into(),
                    ty: Some(TypeText::new("boolean")),
                    required: true,
                    ..Default::default()
                },
            ],
            slots: vec![
                Slot::default(),
                Slot {
                    name: "icon".into(),
                    description: String::new(),
                },
            ],
            css_properties: vec![CssCustomProperty {
                name: "--pf-button-color".into(),
                syntax: Some("<color>".into()),
                default: Some("blue".into()),
                ..Default::default()
            }],
            module_path: "elements/pf-button.js".into(),
            package_name: Some("@pf/elements".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_convert_element() {
        let info = convert_element(&button(), &ConvertOptions::default()).unwrap();

        assert_eq!(info.tag_name, "pf-button");
        assert_eq!(info.name, "PfButton");
        assert_eq!(info.module, "elements/pf-button.js");
        assert_eq!(info.package, "@pf/elements");
        assert_eq!(info.items.len(), 5);

        let variant = info.attributes().next().unwrap();
        assert_eq!(variant.values(), ["primary", "secondary"]);
        assert_eq!(variant.default_value(), Some("primary"));
        assert_eq!(variant.guidelines(), ["Avoid mixing variants in a group."]);

        let disabled = info.attributes().nth(1).unwrap();
        assert!(disabled.required());

        let prop = info.css_properties().next().unwrap();
        assert_eq!(prop.syntax(), "<color>");
        assert_eq!(prop.initial(), Some("blue"));
        assert_eq!(prop.kind(), ItemKind::CssProperty);
    }

    #[test]
    fn test_missing_tag_name() {
        let element = Element::default();
        assert_eq!(
            convert_element(&element, &ConvertOptions::default()),
            Err(ConvertError::MissingTagName)
        );
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let element = button();
        let options = ConvertOptions::default();
        assert_eq!(
            convert_element(&element, &options),
            convert_element(&element, &options)
        );
    }

    #[test]
    fn test_element_guidelines() {
        let guidelines = element_guidelines(&button(), DEFAULT_MAX_DESCRIPTION_LENGTH);
        assert_eq!(
            guidelines,
            vec![
                "Use it for actions.".to_string(),
                "variant: Visual style. Avoid mixing variants in a group.".to_string(),
            ]
        );
    }

    #[test]
    fn test_extract_guidelines_keywords() {
        let text = "You should set a label. This is decoration. Never nest buttons";
        assert_eq!(extract_guidelines(text), vec!["You should set a label."]);
        assert!(extract_guidelines("").is_empty());
    }

    #[test]
    fn test_enum_values() {
        assert_eq!(enum_values("'sm' | 'md' | 'lg'"), vec!["sm", "md", "lg"]);
        assert_eq!(enum_values("string | undefined"), vec!["string", "undefined"]);
        assert!(enum_values("string").is_empty());
        assert!(enum_values("").is_empty());
    }

    #[test]
    fn test_sanitize_escapes_and_collapses() {
        assert_eq!(
            sanitize_description("  <b>bold</b>\n\n  text  ", 100),
            "&lt;b&gt;bold&lt;/b&gt; text"
        );
    }

    #[test]
    fn test_sanitize_truncates_on_char_boundary() {
        let text = "é".repeat(10);
        assert_eq!(sanitize_description(&text, 4), "éééé...");
    }

    #[test]
    fn test_sanitize_rejects_templates() {
        insta::assert_snapshot!(
            sanitize_description("Hello {{ .Secret }}", 100),
            @"[Description removed: contains template syntax]"
        );
        assert!(contains_template_syntax("{ { .X } }"));
        assert!(contains_template_syntax("{<!-- x -->{ .X }}"));
        assert!(!contains_template_syntax("a {single} brace"));
    }

    #[test]
    fn test_examples() {
        let examples = build_examples(&button());
        assert_eq!(examples.len(), 3);
        assert_eq!(examples[0].code, "<pf-button></pf-button>");
        assert_eq!(
            examples[1].code,
            r#"<pf-button variant="primary" disabled></pf-button>"#
        );
        assert_eq!(
            examples[2].code,
            "<pf-button>\n  Default content\n  <span slot=\"icon\">icon content</span>\n</pf-button>"
        );
    }

    #[test]
    fn test_examples_without_members() {
        let examples = build_examples(&Element::new("x-empty"));
        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].title, "Basic Usage");
    }
}
