use regdump::Schema;

use crate::utils::{Workspace, merged, of_schema, write_zip};

const BASE: &str = "CompanyName, CompanyNumber,RegAddress.CareOf,RegAddress.POBox,RegAddress.AddressLine1, RegAddress.AddressLine2,RegAddress.PostTown,RegAddress.County,RegAddress.Country,RegAddress.PostCode,CompanyCategory,CompanyStatus,CountryOfOrigin,DissolutionDate,IncorporationDate,SICCode.SicText_1,SICCode.SicText_2,PreviousName_1.CONDATE, PreviousName_1.CompanyName,URI
\"ACME WIDGETS LTD\",\"01234567\",\"\",\"\",\"1 HIGH STREET\",\"\",\"LONDON\",\"\",\"\",\"EC1A 1AA\",\"Private Limited Company\",\"Active\",\"United Kingdom\",\"\",\"23/03/2006\",\"62012 - Business and domestic software development\",\"None Supplied\",\"01/01/2010\",\"ACME GADGETS LTD\",\"http://business.data.gov.uk/id/company/01234567\"
";

const PSC: &str = r#"{"company_number":"01234567","data":{"etag":"x","kind":"individual-person-with-significant-control","links":{"self":"/company/01234567/persons-with-significant-control/individual/abcDEF123"},"name":"Mr John Smith","name_elements":{"title":"Mr","forename":"John","surname":"Smith"},"nationality":"British","country_of_residence":"England","date_of_birth":{"month":4,"year":1970},"address":{"premises":"1","address_line_1":"High Street","locality":"London","postal_code":"EC1A 1AA","country":"England"},"natures_of_control":["ownership-of-shares-75-to-100-percent"],"notified_on":"2016-04-06"}}

{"company_number":"01234567","data":{"kind":"corporate-entity-person-with-significant-control","links":{"self":"/company/01234567/persons-with-significant-control/corporate-entity/xyz9"},"name":"HOLDCO SA","identification":{"registration_number":"B123","legal_form":"Société anonyme","country_registered":"Luxembourg"},"is_sanctioned":true,"natures_of_control":["voting-rights-25-to-50-percent"]}}
{"company_number":"01234567","data":{"kind":"persons-with-significant-control-statement","statement":"no-individual-or-entity-with-signficant-control"}}
{"company_number":"07654321","data":{"kind":"exemptions"}}
"#;

fn workspace() -> Workspace {
    let ws = Workspace::new();
    let dir = ws.resource_dir("gb_coh_psc");
    write_zip(&dir.join("base_data.zip"), &[("BasicCompanyDataAsOneFile-2024-01-01.csv", BASE)]);
    write_zip(&dir.join("psc_data.zip"), &[("persons-with-significant-control-snapshot-2024-01-01.txt", PSC)]);
    ws
}

#[test]
fn test_base_data_and_psc() {
    let ws = workspace();
    ws.run("gb_coh_psc");
    let entities = ws.entities("gb_coh_psc");

    let company = merged(&entities, "oc-companies-gb-01234567").unwrap();
    assert_eq!(company.first("name"), Some("ACME WIDGETS LTD"));
    assert_eq!(company.first("previousName"), Some("ACME GADGETS LTD"));
    assert_eq!(company.first("incorporationDate"), Some("2006-03-23"));
    assert_eq!(company.get("sector"), ["Business and domestic software development".to_string()]);
    assert_eq!(company.first("address"), Some("1 HIGH STREET, EC1A 1AA LONDON, United Kingdom"));
    assert!(company.has("addressEntity"));

    let people = of_schema(&entities, Schema::Person);
    assert_eq!(people.len(), 1);
    let person = people[0];
    assert_eq!(person.id.as_deref(), Some("gb-coh-psc-01234567-abcdef123"));
    assert_eq!(person.first("nationality"), Some("gb"));
    assert_eq!(person.first("birthDate"), Some("1970-04"));
    assert_eq!(person.first("firstName"), Some("John"));

    let holdco = merged(&entities, "gb-coh-psc-01234567-xyz9").unwrap();
    assert_eq!(holdco.schema, Schema::Company);
    assert_eq!(holdco.first("jurisdiction"), Some("lu"));
    assert_eq!(holdco.first("topics"), Some("sanction"));

    let ownerships = of_schema(&entities, Schema::Ownership);
    assert_eq!(ownerships.len(), 2);
    assert_eq!(ownerships[0].first("asset"), Some("oc-companies-gb-01234567"));
    assert_eq!(ownerships[0].first("role"), Some("Ownership of shares 75 to 100 percent"));
    assert_eq!(ownerships[0].first("startDate"), Some("2016-04-06"));
}
