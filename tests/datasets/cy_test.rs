use regdump::Schema;

use crate::utils::{Workspace, merged, of_schema, write_zip};

const ORGANISATIONS: &str = "\u{feff}ORGANISATION_TYPE_CODE,ORGANISATION_TYPE,ORGANISATION_SUB_TYPE,REGISTRATION_NO,ORGANISATION_NAME,REGISTRATION_DATE,ORGANISATION_STATUS,ORGANISATION_STATUS_DATE,ADDRESS_SEQ_NO
C,Εταιρεία,Ιδιωτική,12345,ALPHA LIMITED,05/11/1999,Εγγεγραμμένη,01/02/2020,77
O,Αλλοδαπή Εταιρεία,,99,BETA INC,12/03/2005,Εγγεγραμμένη,,
Εμπορική Επωνυμία,,,,TRADE NAME,,,,
X,Unknown,,1,GAMMA,,,,
";

const OFFICIALS: &str = "\u{feff}ORGANISATION_TYPE_CODE,REGISTRATION_NO,ORGANISATION_NAME,PERSON_OR_ORGANISATION_NAME,OFFICIAL_POSITION
C,12345,ALPHA LIMITED,ANDREAS GEORGIOU,Διευθυντής
C,12345,ALPHA LIMITED,ANDREAS GEORGIOU,Γραμματέας
";

const ADDRESSES: &str = "\u{feff}ADDRESS_SEQ_NO,STREET,BUILDING,TERRITORY
77,Μακαρίου 1,Alpha House,Λευκωσία
";

fn workspace() -> Workspace {
    let ws = Workspace::new();
    let path = ws.resource_dir("cy_companies").join("data.zip");
    write_zip(
        &path,
        &[
            ("organisations_2024.csv", ORGANISATIONS),
            ("organisation_officials_2024.csv", OFFICIALS),
            ("registered_office_2024.csv", ADDRESSES),
            ("readme.txt", "ignored"),
        ],
    );
    ws
}

#[test]
fn test_companies_and_officials() {
    let ws = workspace();
    let summary = ws.run("cy_companies");
    let entities = ws.entities("cy_companies");
    assert_eq!(summary.entities, entities.len());

    let alpha = merged(&entities, "oc-companies-cy-he12345").unwrap();
    assert_eq!(alpha.first("name"), Some("ALPHA LIMITED"));
    assert_eq!(alpha.first("jurisdiction"), Some("cy"));
    assert_eq!(alpha.first("incorporationDate"), Some("1999-11-05"));
    assert_eq!(alpha.first("legalForm"), Some("Εταιρεία - Ιδιωτική"));
    assert_eq!(alpha.first("addressEntity"), Some("cy-address-seq-77"));

    // Overseas companies carry the country, not the jurisdiction
    let beta = merged(&entities, "oc-companies-cy-ae99").unwrap();
    assert_eq!(beta.first("country"), Some("cy"));
    assert!(!beta.has("jurisdiction"));

    assert_eq!(of_schema(&entities, Schema::Company).len(), 2);
    assert_eq!(of_schema(&entities, Schema::LegalEntity).len(), 2);
    let directorships = of_schema(&entities, Schema::Directorship);
    assert_eq!(directorships.len(), 2);
    assert_ne!(directorships[0].id, directorships[1].id);
    assert_eq!(directorships[0].first("organization"), Some("oc-companies-cy-he12345"));

    let address = merged(&entities, "cy-address-seq-77").unwrap();
    assert_eq!(address.first("full"), Some("Alpha House, Μακαρίου 1, Λευκωσία"));
}
