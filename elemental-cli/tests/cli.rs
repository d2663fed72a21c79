use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const MANIFEST: &str = r#"{
  "schemaVersion": "2.1.0",
  "modules": [
    {
      "kind": "javascript-module",
      "path": "elements/acme-button.js",
      "declarations": [
        {
          "kind": "class",
          "name": "AcmeButton",
          "tagName": "acme-button",
          "customElement": true,
          "summary": "A button",
          "description": "Buttons trigger actions. Use one primary button per view.",
          "superclass": { "name": "AcmeBase" },
          "attributes": [
            { "name": "variant", "type": { "text": "'primary' | 'secondary'" }, "default": "primary" }
          ],
          "cssProperties": [{ "name": "--acme-button-color" }]
        },
        {
          "kind": "class",
          "name": "AcmeBase",
          "tagName": "acme-base",
          "customElement": true,
          "cssProperties": [{ "name": "--acme-font" }]
        }
      ]
    },
    {
      "kind": "javascript-module",
      "path": "elements/widget-card.js",
      "declarations": [
        { "kind": "class", "name": "WidgetCard", "tagName": "widget-card", "customElement": true }
      ]
    }
  ]
}"#;

fn workspace(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    fs::write(dir.join("package.json"), r#"{ "name": "@acme/ui" }"#)?;
    fs::write(dir.join("custom-elements.json"), MANIFEST)?;
    Ok(())
}

#[allow(deprecated)]
fn elemental(dir: &Path) -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("elemental")?;
    cmd.current_dir(dir).env_remove("ELEMENTAL_ROOT");
    Ok(cmd)
}

#[test]
fn list_json_outputs_every_element() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    workspace(dir.path())?;

    let assert = elemental(dir.path())?.args(["list", "--json"]).assert().success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    let value: Value = serde_json::from_str(&stdout)?;
    assert_eq!(value["kind"], "element.list");
    let tags: Vec<&str> = value["data"]
        .as_array()
        .expect("json array")
        .iter()
        .filter_map(|e| e["tagName"].as_str())
        .collect();
    assert_eq!(tags, vec!["acme-base", "acme-button", "widget-card"]);
    assert_eq!(value["data"][1]["package"], "@acme/ui");

    Ok(())
}

#[test]
fn element_outputs_items_and_relationships() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    workspace(dir.path())?;

    let assert = elemental(dir.path())?
        .args(["element", "acme-button"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    let value: Value = serde_json::from_str(&stdout)?;
    let data = &value["data"];
    assert_eq!(data["tagName"], "acme-button");
    assert_eq!(data["name"], "AcmeButton");
    assert_eq!(data["items"][0]["kind"], "attribute");
    assert_eq!(data["items"][0]["values"], serde_json::json!(["primary", "secondary"]));
    assert_eq!(data["relationships"][0]["target"], "acme-base");
    assert_eq!(data["relationships"][0]["type"], "superclass");

    Ok(())
}

#[test]
fn unknown_element_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    workspace(dir.path())?;

    elemental(dir.path())?
        .args(["element", "nope-nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Element not found: nope-nope"));

    elemental(dir.path())?
        .args(["relationships", "nope-nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Element not found"));

    Ok(())
}

#[test]
fn aggregates_print_one_per_line() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    workspace(dir.path())?;

    elemental(dir.path())?
        .arg("prefixes")
        .assert()
        .success()
        .stdout("acme\n");

    elemental(dir.path())?
        .arg("css-properties")
        .assert()
        .success()
        .stdout("--acme-button-color\n--acme-font\n");

    Ok(())
}

#[test]
fn root_flag_and_config_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let ui = dir.path().join("packages/ui");
    fs::create_dir_all(&ui)?;
    workspace(&ui)?;

    // --root points at the workspace directly
    elemental(dir.path())?
        .args(["--root", "packages/ui", "prefixes"])
        .assert()
        .success()
        .stdout("acme\n");

    // a config file resolves the workspace relative to itself
    fs::write(dir.path().join("elemental.yml"), "workspace: packages/ui\n")?;
    elemental(dir.path())?
        .args(["schema", "--versions"])
        .assert()
        .success()
        .stdout("2.1.0\n");

    Ok(())
}

#[test]
fn schema_from_configured_directory() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    workspace(dir.path())?;
    fs::create_dir_all(dir.path().join("schemas"))?;
    fs::write(
        dir.path().join("schemas/2.1.0.json"),
        r#"{ "$schema": "http://json-schema.org/draft-07/schema#", "title": "Package" }"#,
    )?;
    fs::write(dir.path().join("elemental.yml"), "schemas: schemas\n")?;

    let assert = elemental(dir.path())?.arg("schema").assert().success();
    let value: Value = serde_json::from_slice(&assert.get_output().stdout)?;
    assert_eq!(value["title"], "Package");

    Ok(())
}

#[test]
fn missing_workspace_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    elemental(dir.path())?
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No custom elements manifest found"));

    Ok(())
}

#[test]
fn stats_reports_metrics() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    workspace(dir.path())?;

    let assert = elemental(dir.path())?.args(["stats", "--json"]).assert().success();
    let value: Value = serde_json::from_slice(&assert.get_output().stdout)?;
    let data = &value["data"];
    assert_eq!(data["elements"], 3);
    assert_eq!(data["epoch"]["revision"], 1);
    assert_eq!(data["metrics"]["reloads"], 1);
    assert_eq!(data["metrics"]["aggregate_recomputes"], 2);

    Ok(())
}
