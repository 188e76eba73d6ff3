use std::fs;

use regdump::{Schema, dataset_from_name, run_dataset};

use crate::utils::{Workspace, of_schema, serve, write_xlsx};

const HEADER: &[&str] = &[
    "Nr",
    "Denumirea completă",
    "IDNO/ Cod fiscal",
    "Forma org./jur.",
    "Data înregistrării",
    "Statutul",
    "Adresa",
    "Lista conducătorilor",
    "Lista fondatorilor",
];

const ROWS: &[&[&str]] = &[
    &["Registrul de stat al unităților de drept"],
    &[],
    HEADER,
    &[
        "1",
        "ALFA S.R.L.",
        "1003600012345",
        "Societate cu răspundere limitată",
        "2004-03-15",
        "înregistrat",
        "MD-2001, mun. Chișinău, str. Ştefan cel Mare 1",
        "POPESCU ION",
        "POPESCU ION, BETA S.A.",
    ],
    &[],
    &["2", "GAMMA COOP", "", "", "", "lichidat", "", "", ""],
];

fn write_workbook(ws: &Workspace) {
    write_xlsx(
        &ws.resource_dir("md_companies").join("data.xlsx"),
        "Company",
        ROWS,
    );
}

#[test]
fn test_companies_directors_and_founders() {
    let ws = Workspace::new();
    write_workbook(&ws);
    let summary = ws.run("md_companies");
    assert_eq!(summary.schemata.get(&Schema::Company), Some(&2));

    let entities = ws.entities("md_companies");
    let alfa = &entities[0];
    assert_eq!(alfa.id.as_deref(), Some("oc-companies-md-1003600012345"));
    assert_eq!(alfa.first("name"), Some("ALFA S.R.L."));
    assert_eq!(alfa.first("registrationNumber"), Some("1003600012345"));
    assert_eq!(alfa.first("incorporationDate"), Some("2004-03-15"));
    assert_eq!(alfa.first("jurisdiction"), Some("md"));

    let directors = of_schema(&entities, Schema::Person);
    assert_eq!(directors.len(), 1);
    assert_eq!(directors[0].first("name"), Some("POPESCU ION"));
    let directorships = of_schema(&entities, Schema::Directorship);
    assert_eq!(directorships.len(), 1);
    assert_eq!(directorships[0].first("director"), directors[0].id.as_deref());
    assert_eq!(directorships[0].first("organization"), alfa.id.as_deref());

    let ownerships = of_schema(&entities, Schema::Ownership);
    assert_eq!(ownerships.len(), 2);
    assert!(ownerships.iter().all(|o| o.first("asset") == alfa.id.as_deref()));
    assert!(ownerships.iter().all(|o| o.first("role") == Some("founder")));

    // Without a fiscal code the company id comes from its name
    let gamma = entities
        .iter()
        .find(|e| e.first("name") == Some("GAMMA COOP"))
        .unwrap();
    assert!(gamma.id.as_deref().unwrap().starts_with("md-company-"));
    assert_eq!(gamma.first("status"), Some("lichidat"));
}

#[test]
fn test_workbook_found_through_portal_pages() {
    let ws = Workspace::new();
    let scratch = ws.dir.path().join("scratch.xlsx");
    write_xlsx(&scratch, "Company", ROWS);
    let base = serve(
        fs::read(&scratch).unwrap(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        1,
    );

    // Cached portal pages; the workbook itself has to be downloaded
    ws.write_resource(
        "md_companies",
        "dataset.html",
        &format!(
            r#"<a href="{base}/dataset/1/resource/old">2022</a>
<a href="{base}/dataset/1/resource/old/download/old.xlsx">Download</a>
<a href="{base}/dataset/1/resource/new">2024</a>"#
        ),
    );
    ws.write_resource(
        "md_companies",
        "resource.html",
        &format!(r#"<a class="btn" href="{base}/dataset/1/resource/new/download/data.xlsx">Descarcă</a>"#),
    );

    let dataset = dataset_from_name("md_companies").unwrap();
    let summary = run_dataset(dataset.as_ref(), &ws.config().with_fetch(true), None).unwrap();
    assert_eq!(summary.schemata.get(&Schema::Company), Some(&2));
    assert!(ws.resource_dir("md_companies").join("data.xlsx").is_file());
}

#[test]
fn test_missing_workbook_offline() {
    let ws = Workspace::new();
    let dataset = dataset_from_name("md_companies").unwrap();
    assert!(run_dataset(dataset.as_ref(), &ws.config(), None).is_err());
}
