use regdump::Schema;

use crate::utils::{Workspace, merged, of_schema};

const DATASET: &str = "us_corpwatch";

fn table(ws: &Workspace, name: &str, content: &str) {
    ws.write_resource(DATASET, &format!("src/corpwatch_api_tables_csv/{name}"), content);
}

#[test]
fn test_fragments_merge_by_cw_id() {
    let ws = Workspace::new();
    table(&ws, "companies.csv", "cw_id\tcompany_name\n1\tACME CORP\n2\tACME \"EUROPE\" BV\n");
    table(
        &ws,
        "company_info.csv",
        "cw_id\tcompany_name\tindustry_name\tsector_name\tirs_number\n1\tACME CORP\tNULL\tMANUFACTURING\t123456789\n",
    );
    table(
        &ws,
        "company_names.csv",
        "cw_id\tcompany_name\tsource\tcountry_code\n1\tACME INDUSTRIES\tcik_former_name\tUS\n",
    );
    table(
        &ws,
        "company_locations.csv",
        "cw_id\tcountry_code\tstreet_1\tstreet_2\tcity\tstate\tpostal_code\n2\tNL\tKeizersgracht 1\tNULL\tAmsterdam\tNULL\t1015\n",
    );
    table(&ws, "company_relations.csv", "source_cw_id\ttarget_cw_id\n1\t2\n");
    table(
        &ws,
        "relationships.csv",
        "cw_id\tparent_cw_id\tyear\tpercent\tignore_record\n2\t1\t2008\t100\t0\n2\t1\t2009\tNULL\t1\n",
    );
    let summary = ws.run(DATASET);
    let entities = ws.entities(DATASET);
    assert_eq!(summary.entities, entities.len());

    let acme = merged(&entities, "us-cw-1").unwrap();
    assert_eq!(acme.first("name"), Some("ACME CORP"));
    assert_eq!(acme.first("previousName"), Some("ACME INDUSTRIES"));
    assert_eq!(acme.first("registrationNumber"), Some("123456789"));
    assert_eq!(acme.get("sector"), ["MANUFACTURING".to_string()]);

    let europe = merged(&entities, "us-cw-2").unwrap();
    assert_eq!(europe.first("name"), Some("ACME \"EUROPE\" BV"));
    assert_eq!(europe.first("parent"), Some("us-cw-1"));
    assert_eq!(europe.first("address"), Some("Keizersgracht 1, 1015 Amsterdam, Netherlands"));

    let ownerships = of_schema(&entities, Schema::Ownership);
    assert_eq!(ownerships.len(), 1);
    assert_eq!(ownerships[0].first("percentage"), Some("100"));
}
