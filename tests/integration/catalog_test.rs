use std::fs;

use regdump::build_catalog;
use serde_json::{Value, json};
use tempfile::TempDir;

use crate::utils::serve;

#[test]
fn test_catalog_from_local_indexes() {
    let dir = TempDir::new().unwrap();
    let write = |name: &str, value: Value| {
        let path = dir.path().join(name);
        fs::write(&path, value.to_string()).unwrap();
        path.display().to_string()
    };
    let first = write("lv.json", json!({"name": "lv_business_register", "title": "Old", "entity_count": 1}));
    let second = write("cy.json", json!({"name": "cy_companies", "entity_count": 5}));
    let third = write("lv2.json", json!({"name": "lv_business_register", "title": "New", "entity_count": 2}));
    let nameless = write("none.json", json!({"title": "No name"}));
    let missing = dir.path().join("missing.json").display().to_string();

    let input = dir.path().join("indexes.txt");
    fs::write(&input, [first, second, missing, nameless, third].join("\n")).unwrap();
    let output = dir.path().join("out").join("catalog.json");

    let catalog = build_catalog(&input, &output).unwrap();
    let names: Vec<_> = catalog.datasets.iter().map(|d| d["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["cy_companies", "lv_business_register"]);
    assert_eq!(catalog.datasets[1]["title"], "New");

    let written: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written["datasets"].as_array().unwrap().len(), 2);
    assert!(written["updated_at"].is_string());
}

#[test]
fn test_catalog_requires_input_list() {
    let dir = TempDir::new().unwrap();
    assert!(build_catalog(&dir.path().join("nope.txt"), &dir.path().join("catalog.json")).is_err());
}

#[tokio::test]
async fn test_catalog_inside_runtime_fetches_urls() {
    let dir = TempDir::new().unwrap();
    let body = br#"{"name": "ee_ariregister", "entity_count": 3}"#.to_vec();
    let url = format!("{}/index.json", serve(body, "application/json", 1));
    let input = dir.path().join("indexes.txt");
    fs::write(&input, format!("{url}\n")).unwrap();
    let output = dir.path().join("catalog.json");

    let catalog = build_catalog(&input, &output).unwrap();
    assert_eq!(catalog.datasets.len(), 1);
    assert_eq!(catalog.datasets[0]["name"], "ee_ariregister");
    assert_eq!(catalog.datasets[0]["entity_count"], 3);
}
