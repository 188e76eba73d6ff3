use std::fs;

use regdump::config::DatasetMetadata;
use regdump::context::INDEX_FILE;
use regdump::{DATASET_NAMES, IngestError, dataset_from_name, run_dataset, run_datasets};
use serde_json::Value;

use crate::utils::{Workspace, write_zip};

fn ee_workspace() -> Workspace {
    let ws = Workspace::new();
    write_zip(
        &ws.resource_dir("ee_ariregister").join("data.zip"),
        &[(
            "ettevotja_rekvisiidid_2024.csv",
            "nimi;ariregistri_kood;ettevotja_oiguslik_vorm;kmkr_nr\nNäidis OÜ;10000001;Osaühing;\n",
        )],
    );
    ws
}

#[test]
fn test_every_dataset_resolves() {
    for name in DATASET_NAMES {
        let dataset = dataset_from_name(name).unwrap();
        assert_eq!(dataset.name(), *name);
    }
    assert!(matches!(
        dataset_from_name("xx_unknown"),
        Err(IngestError::UnknownDataset(_))
    ));
}

#[test]
fn test_run_writes_index() {
    let ws = ee_workspace();
    let summary = ws.run("ee_ariregister");
    assert_eq!(summary.entities, 1);

    let index_path = ws.output_dir().join("ee_ariregister").join(INDEX_FILE);
    let index: Value = serde_json::from_str(&fs::read_to_string(index_path).unwrap()).unwrap();
    assert_eq!(index["name"], "ee_ariregister");
    assert_eq!(index["entity_count"], 1);
    assert_eq!(index["schemata"]["Company"], 1);
    assert!(index["updated_at"].is_string());
}

#[test]
fn test_metadata_override() {
    let ws = ee_workspace();
    let overlay = DatasetMetadata::from_yaml("name: ee_ariregister\ntitle: Estonian companies\nprefix: est\n").unwrap();
    let dataset = dataset_from_name("ee_ariregister").unwrap();
    run_dataset(dataset.as_ref(), &ws.config(), Some(overlay)).unwrap();
    let entities = ws.entities("ee_ariregister");
    assert_eq!(entities[0].id.as_deref(), Some("est-10000001"));
}

#[test]
fn test_run_datasets_keeps_order_and_reports_failures() {
    let ws = ee_workspace();
    // No source files for the Cyprus register and fetching is off
    let names = vec!["ee_ariregister".to_string(), "cy_companies".to_string()];
    let err = run_datasets(&names, &ws.config()).unwrap_err();
    assert!(matches!(err, IngestError::MissingResource(_)));

    let summaries = run_datasets(&names[..1], &ws.config()).unwrap();
    assert_eq!(summaries[0].dataset, "ee_ariregister");
    assert!(run_datasets(&["nope".to_string()], &ws.config()).is_err());
}
