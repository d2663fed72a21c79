//! Integration tests for the element registry

use elemental_registry::prelude::*;
use elemental_registry::{
    FsWorkspaceLoader, MemoryLoader, RelationshipKind, ReloadFailurePolicy, Revision,
};
use elemental_types::{ClassDeclaration, CssCustomProperty, Declaration, Module, Package, Reference};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn class(tag: &str, css_properties: &[&str]) -> ClassDeclaration {
    ClassDeclaration {
        name: tag
            .split('-')
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect(),
        tag_name: Some(tag.to_string()),
        custom_element: true,
        css_properties: css_properties
            .iter()
            .map(|name| CssCustomProperty {
                name: name.to_string(),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

fn package(classes: Vec<ClassDeclaration>) -> Package {
    Package {
        schema_version: "2.1.0".into(),
        readme: None,
        modules: classes
            .into_iter()
            .map(|decl| Module {
                kind: "javascript-module".into(),
                path: format!("elements/{}.js", decl.tag_name.clone().unwrap_or_default()),
                declarations: vec![Declaration::Class(decl)],
            })
            .collect(),
    }
}

fn registry_with(classes: Vec<ClassDeclaration>) -> (Arc<MemoryLoader>, ElementRegistry) {
    let loader = Arc::new(MemoryLoader::with_package(Some("@acme/ui"), package(classes)));
    let registry = ElementRegistry::new(loader.clone());
    registry.reload().unwrap();
    (loader, registry)
}

#[test]
fn test_every_loaded_tag_is_found() {
    let (_, registry) = registry_with(vec![
        class("foo-bar", &[]),
        class("foo-baz", &[]),
        class("widget-x", &[]),
    ]);

    for tag in registry.tags() {
        let info = registry.get_element(&tag).unwrap();
        assert_eq!(info.tag_name, tag);
    }
    assert_eq!(registry.get_all_elements().len(), 3);
}

#[test]
fn test_common_prefixes() {
    let (_, registry) = registry_with(vec![
        class("foo-bar", &[]),
        class("foo-baz", &[]),
        class("widget-x", &[]),
    ]);

    let prefixes = registry.common_tag_prefixes();
    assert!(prefixes.contains(&"foo".to_string()));
    assert!(!prefixes.contains(&"widget".to_string()));

    // idempotent without an intervening reload
    assert_eq!(registry.common_tag_prefixes(), prefixes);
}

#[test]
fn test_css_property_union_is_order_independent() {
    let (_, registry) = registry_with(vec![
        class("x-a", &["--a", "--b"]),
        class("x-b", &["--b", "--c"]),
    ]);

    // warm one element first so the snapshot mixes memoized and fresh conversions
    registry.get_element("x-b").unwrap();

    let props: BTreeSet<String> = registry.all_css_custom_properties().into_iter().collect();
    let expected: BTreeSet<String> = ["--a", "--b", "--c"].iter().map(|s| s.to_string()).collect();
    assert_eq!(props, expected);
}

#[test]
fn test_empty_registry_aggregates_are_empty() {
    let registry = ElementRegistry::new(Arc::new(MemoryLoader::new()));
    registry.reload().unwrap();

    assert!(registry.common_tag_prefixes().is_empty());
    assert!(registry.all_css_custom_properties().is_empty());
    assert!(registry.relationships_for("unknown-tag").is_empty());
}

#[test]
fn test_reload_changes_aggregates() {
    let (loader, registry) = registry_with(vec![class("foo-a", &["--x"]), class("foo-b", &[])]);
    assert_eq!(registry.common_tag_prefixes(), vec!["foo"]);
    assert_eq!(registry.all_css_custom_properties(), vec!["--x"]);

    loader.set_packages(vec![(
        None,
        package(vec![class("bar-a", &["--y"]), class("bar-b", &[]), class("foo-a", &[])]),
    )]);
    registry.reload().unwrap();

    assert_eq!(registry.common_tag_prefixes(), vec!["bar"]);
    assert_eq!(registry.all_css_custom_properties(), vec!["--y"]);
    assert!(registry.get_element("foo-b").is_none());
}

#[test]
fn test_relationships() {
    let base = class("acme-base", &[]);
    let button = ClassDeclaration {
        superclass: Some(Reference::new("AcmeBase")),
        mixins: vec![Reference::new("FocusMixin")],
        ..class("acme-button", &[])
    };
    let link = ClassDeclaration {
        mixins: vec![Reference::new("FocusMixin")],
        ..class("acme-link", &[])
    };
    let (_, registry) = registry_with(vec![base, button, link]);

    let rels = registry.relationships_for("acme-button");
    let kinds: Vec<_> = rels.iter().map(|r| (r.target.as_str(), r.kind)).collect();
    assert_eq!(
        kinds,
        vec![
            ("acme-base", RelationshipKind::Superclass),
            ("FocusMixin", RelationshipKind::Mixin),
            ("acme-link", RelationshipKind::SharedMixin),
        ]
    );

    let rels = registry.relationships_for("acme-base");
    assert_eq!(rels[0].kind, RelationshipKind::Subclass);
    // the package edge to acme-link comes last
    assert_eq!(rels.last().unwrap().kind, RelationshipKind::Package);
}

#[test]
fn test_enriched_shape_serializes_empty_arrays() {
    let (_, registry) = registry_with(vec![class("x-empty", &[])]);
    let info = registry.get_element("x-empty").unwrap();

    let json = serde_json::to_value(&*info).unwrap();
    assert_eq!(json["tagName"], "x-empty");
    assert_eq!(json["items"], serde_json::json!([]));
    assert_eq!(json["guidelines"], serde_json::json!([]));
    assert_eq!(json["package"], "@acme/ui");
}

#[test]
fn test_filesystem_workspace() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("package.json"),
        r#"{ "name": "@acme/ui", "customElements": "custom-elements.json" }"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("custom-elements.json"),
        serde_json::to_string(&package(vec![class("acme-card", &["--card-bg"])])).unwrap(),
    )
    .unwrap();

    let registry = ElementRegistry::new(Arc::new(FsWorkspaceLoader::new(dir.path())));
    let epoch = registry.reload().unwrap();
    assert_eq!(epoch.element_count, 1);

    let card = registry.get_element("acme-card").unwrap();
    assert_eq!(card.package, "@acme/ui");
    assert_eq!(card.name, "AcmeCard");
    assert_eq!(registry.all_css_custom_properties(), vec!["--card-bg"]);

    // a broken manifest keeps the last good epoch
    std::fs::write(dir.path().join("custom-elements.json"), "{").unwrap();
    assert!(registry.reload().is_err());
    assert_eq!(registry.revision(), epoch.revision);
    assert!(registry.get_element("acme-card").is_some());
}

#[test]
fn test_failed_reload_with_clear_policy() {
    let loader = Arc::new(MemoryLoader::with_package(None, package(vec![class("x-a", &["--a"])])));
    let registry =
        ElementRegistry::new(loader.clone()).with_reload_failure(ReloadFailurePolicy::Clear);
    registry.reload().unwrap();
    assert_eq!(registry.all_css_custom_properties(), vec!["--a"]);

    loader.fail_with("workspace removed");
    let err = registry.reload().unwrap_err();
    assert!(err.to_string().contains("workspace removed"));

    assert!(registry.is_empty());
    assert!(registry.all_css_custom_properties().is_empty());
    assert!(registry.get_element("x-a").is_none());
}

/// Many readers race a reloading thread; no reader may ever observe an
/// aggregate built from zero elements once the first reload has completed.
#[test]
fn test_concurrent_reads_during_reload() {
    let generation_a = package(vec![
        class("foo-a", &["--a", "--b"]),
        class("foo-b", &["--b", "--c"]),
        class("bar-a", &[]),
    ]);
    let generation_b = package(vec![
        class("bar-a", &["--d"]),
        class("bar-b", &[]),
        class("foo-a", &["--a"]),
    ]);

    let loader = Arc::new(MemoryLoader::with_package(None, generation_a.clone()));
    let registry = Arc::new(ElementRegistry::new(loader.clone()));
    registry.reload().unwrap();

    let stop = Arc::new(AtomicBool::new(false));
    let reloader = {
        let registry = Arc::clone(&registry);
        let loader = Arc::clone(&loader);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut flip = false;
            let deadline = Instant::now() + Duration::from_millis(500);
            while Instant::now() < deadline {
                let next = if flip { generation_a.clone() } else { generation_b.clone() };
                loader.set_packages(vec![(None, next)]);
                registry.reload().unwrap();
                flip = !flip;
                thread::sleep(Duration::from_millis(5));
            }
            stop.store(true, Ordering::SeqCst);
        })
    };

    let readers: Vec<_> = (0..8)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let mut iterations = 0;
                while !stop.load(Ordering::SeqCst) || iterations < 100 {
                    let prefixes = registry.common_tag_prefixes();
                    let props = registry.all_css_custom_properties();
                    assert!(!prefixes.is_empty());
                    assert!(!props.is_empty());

                    let tag = if i % 2 == 0 { "foo-a" } else { "bar-a" };
                    let info = registry.get_element(tag).unwrap();
                    assert_eq!(info.tag_name, tag);

                    // whichever epoch we saw, the prefix set is one of the two
                    assert!(prefixes == ["foo"] || prefixes == ["bar"], "{prefixes:?}");
                    iterations += 1;
                }
            })
        })
        .collect();

    reloader.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    assert!(registry.revision() > Revision(1));
}

/// Reload while aggregates are being recomputed; results committed must
/// always belong to the epoch that is current at the time of the read.
#[test]
fn test_aggregate_invalidation_race() {
    let (loader, registry) =
        registry_with(vec![class("foo-a", &["--a"]), class("foo-b", &["--b"])]);
    let registry = Arc::new(registry);

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let loader = Arc::clone(&loader);
            thread::spawn(move || {
                for j in 0..20 {
                    if i == 0 && j % 5 == 0 {
                        loader.set_packages(vec![(
                            None,
                            package(vec![class("foo-a", &["--a"]), class("foo-b", &["--b"])]),
                        )]);
                        registry.reload().unwrap();
                    }
                    assert_eq!(registry.common_tag_prefixes(), vec!["foo"]);
                    assert_eq!(registry.all_css_custom_properties(), vec!["--a", "--b"]);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // after the dust settles a fresh read reflects a cached, current value
    let before = registry.metrics().snapshot().aggregate_recomputes;
    registry.common_tag_prefixes();
    assert_eq!(registry.metrics().snapshot().aggregate_recomputes, before);
}
