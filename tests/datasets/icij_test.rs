use regdump::Schema;

use crate::utils::{Workspace, of_schema, write_zip};

const ENTITIES: &str = "node_id,name,original_name,former_name,jurisdiction,jurisdiction_description,company_type,address,internal_id,incorporation_date,inactivation_date,struck_off_date,dorm_date,status,service_provider,ibcRUC,country_codes,countries,note,valid_until,sourceID
10,ALPHA HOLDINGS LTD.,ALPHA HOLDINGS LTD.,BETA LTD.,BVI,British Virgin Islands,,,1001,23-MAR-2006,,,15-JAN-2012,Active,Mossack Fonseca,12345,VGB,British Virgin Islands,,Panama Papers data is current through 2015,Panama Papers
11,GAMMA TRUST,,,NEV,Nevis,,,1002,00/00/0000,,,,Defaulted,Mossack Fonseca,,KNA,St. Kitts and Nevis,,,Panama Papers
";

const OFFICERS: &str = "node_id,name,countries,country_codes,valid_until,note,sourceID
20,John Smith,United Kingdom,GBR,Panama Papers data is current through 2015,,Panama Papers
21,Jane Doe,Channel Islands,,,,Panama Papers
";

const INTERMEDIARIES: &str = "node_id,name,status,internal_id,address,countries,country_codes,valid_until,note,sourceID
30,MOSSACK AGENTS S.A.,ACTIVE,9001,,Panama,PAN,,,Panama Papers
";

const ADDRESSES: &str = "node_id,address,name,countries,country_codes,valid_until,note,sourceID
40,\"1 Main Street, Road Town\",,British Virgin Islands,VGB,,,Panama Papers
";

const RELATIONSHIPS: &str = "node_id_start,node_id_end,rel_type,link,status,start_date,end_date,sourceID
20,10,officer_of,shareholder of,,01-FEB-2007,,Panama Papers
21,10,officer_of,director of,Active,,,Panama Papers
30,10,intermediary_of,intermediary of,,,,Panama Papers
10,11,officer_of,shareholder of,,,,Panama Papers
20,40,registered_address,registered address,,,,Panama Papers
30,40,officer_of,director of,,,,Panama Papers
20,21,similar,same name as,,,,Panama Papers
20,10,weird,made up link,,,,Panama Papers
20,99,officer_of,shareholder of,,,,Panama Papers
";

fn workspace_with(addresses: &str) -> Workspace {
    let ws = Workspace::new();
    write_zip(
        &ws.resource_dir("icij_offshoreleaks").join("full-oldb.zip"),
        &[
            ("nodes-entities.csv", ENTITIES),
            ("nodes-officers.csv", OFFICERS),
            ("nodes-intermediaries.csv", INTERMEDIARIES),
            ("nodes-addresses.csv", addresses),
            ("relationships.csv", RELATIONSHIPS),
        ],
    );
    ws
}

fn workspace() -> Workspace {
    workspace_with(ADDRESSES)
}

#[test]
fn test_nodes_are_merged_and_dumped_once() {
    let ws = workspace();
    ws.run("icij_offshoreleaks");
    let entities = ws.entities("icij_offshoreleaks");

    // Relationships come first, nodes are dumped at the end
    let first_node = entities.iter().position(|e| !e.schema.is_edge()).unwrap();
    assert!(entities[first_node..].iter().all(|e| !e.schema.is_edge()));

    let nodes = &entities[first_node..];
    let ids: Vec<_> = nodes.iter().filter_map(|e| e.id.as_deref()).collect();
    assert_eq!(ids, ["icijol-10", "icijol-11", "icijol-20", "icijol-21", "icijol-30"]);
    assert!(of_schema(&entities, Schema::Address).is_empty());

    let alpha = &nodes[0];
    assert_eq!(alpha.schema, Schema::Company);
    assert_eq!(alpha.first("incorporationDate"), Some("2006-03-23"));
    assert_eq!(alpha.first("dissolutionDate"), Some("2012-01-15"));
    assert_eq!(alpha.first("previousName"), Some("BETA LTD."));
    assert_eq!(alpha.first("jurisdiction"), Some("vg"));
    assert_eq!(alpha.first("topics"), Some("corp.offshore"));
    assert_eq!(alpha.first("sourceUrl"), Some("https://offshoreleaks.icij.org/nodes/10"));

    let gamma = &nodes[1];
    assert_eq!(gamma.first("jurisdiction"), Some("kn"));
    assert!(!gamma.has("incorporationDate"));
}

#[test]
fn test_relationship_endpoints_and_addresses() {
    let ws = workspace();
    ws.run("icij_offshoreleaks");
    let entities = ws.entities("icij_offshoreleaks");
    let node = |id: &str| entities.iter().find(|e| e.id.as_deref() == Some(id) && !e.schema.is_edge()).unwrap();

    // An owning company becomes a Company, not a bare LegalEntity
    assert_eq!(node("icijol-10").schema, Schema::Company);
    assert_eq!(node("icijol-20").schema, Schema::LegalEntity);
    assert_eq!(node("icijol-21").get("country"), ["gg".to_string(), "je".to_string()]);

    // The registered address folds into the officer
    let smith = node("icijol-20");
    assert_eq!(smith.first("address"), Some("1 Main Street, Road Town"));
    assert!(smith.get("country").contains(&"vg".to_string()));

    // Any known link ending in an address folds it in too
    let mossack = node("icijol-30");
    assert_eq!(mossack.first("address"), Some("1 Main Street, Road Town"));
    assert!(mossack.get("country").contains(&"vg".to_string()));

    let ownerships = of_schema(&entities, Schema::Ownership);
    assert_eq!(ownerships.len(), 2);
    let shareholder = ownerships[0];
    assert_eq!(shareholder.id.as_deref(), Some("icijol-20-10-shareholder-of"));
    assert_eq!(shareholder.first("owner"), Some("icijol-20"));
    assert_eq!(shareholder.first("asset"), Some("icijol-10"));
    assert_eq!(shareholder.first("role"), Some("shareholder of"));
    assert_eq!(shareholder.first("startDate"), Some("2007-02-01"));

    let directorships = of_schema(&entities, Schema::Directorship);
    assert_eq!(directorships.len(), 1);
    assert_eq!(directorships[0].first("status"), Some("Active"));
    assert_eq!(of_schema(&entities, Schema::Representation).len(), 1);
    assert_eq!(of_schema(&entities, Schema::UnknownLink).len(), 1);
}

#[test]
fn test_conflicting_node_keeps_first_schema() {
    // Address node 10 collides with the company of the same id
    let addresses = format!("{ADDRESSES}10,\"9 Clash Road\",,Panama,PAN,,,Panama Papers\n");
    let ws = workspace_with(&addresses);
    ws.run("icij_offshoreleaks");
    let entities = ws.entities("icij_offshoreleaks");

    let alphas: Vec<_> = entities
        .iter()
        .filter(|e| e.id.as_deref() == Some("icijol-10") && !e.schema.is_edge())
        .collect();
    assert_eq!(alphas.len(), 1);
    assert_eq!(alphas[0].schema, Schema::Company);
    assert_eq!(alphas[0].first("name"), Some("ALPHA HOLDINGS LTD."));
    assert!(!alphas[0].has("address"));
    assert_eq!(of_schema(&entities, Schema::Ownership).len(), 2);
}
