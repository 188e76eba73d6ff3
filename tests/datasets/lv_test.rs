use regdump::Schema;

use crate::utils::{Workspace, merged, of_schema};

const REGISTER: &str = "id;regcode;sepa;name;name_before_quotes;name_in_quotes;name_after_quotes;without_quotes;regtype;regtype_text;type;type_text;registered;terminated;closed;address;index;addressid;region;city;atvk;reregistration_term
1;40003000001;LV80BANK0000435195001;SIA \"Alfa\";SIA;Alfa;;0;K;Komercreģistrs;SIA;Sabiedrība ar ierobežotu atbildību;1991-09-25;;;Rīga, Brīvības iela 1;LV-1010;100;;;0100000;
";

const NAME_HISTORY: &str = "id;regcode;name;date_to\n5;40003000001;SIA \"Vecā Alfa\";2001-01-01\n";

const BENEFICIAL_OWNERS: &str = "id;legal_entity_registration_number;forename;surname;latvian_identity_number_masked;birth_date;nationality;residence;registered_on
9;40003000001;Jānis;Bērziņš;010180-*****;1980-01-01;LV;LV;2018-01-02
";

const MEMBERS: &str = "id;at_legal_entity_registration_number;entity_type;name;forename;surname;latvian_identity_number_masked;legal_entity_registration_number;number_of_shares;share_nominal_value;share_currency;date_from
500;40003000001;JOINT_OWNERS;;;;;;100;1;EUR;2010-01-01
501;40003000001;LEGAL_ENTITY;AS Beta;;;;40003999999;900;1;EUR;2010-01-01
";

const JOINT_OWNERS: &str = "id;member_id;entity_type;forename;surname;latvian_identity_number_masked\n9001;500;NATURAL_PERSON;Anna;Liepa;020290-*****\n";

#[test]
fn test_register_tables() {
    let ws = Workspace::new();
    ws.write_resource("lv_business_register", "src/register.csv", REGISTER);
    ws.write_resource("lv_business_register", "src/register_name_history.csv", NAME_HISTORY);
    ws.write_resource("lv_business_register", "src/beneficial_owners.csv", BENEFICIAL_OWNERS);
    ws.write_resource("lv_business_register", "src/members.csv", MEMBERS);
    ws.write_resource("lv_business_register", "src/members_joint_owners.csv", JOINT_OWNERS);
    // officers.csv is optional
    ws.run("lv_business_register");
    let entities = ws.entities("lv_business_register");

    let company = merged(&entities, "oc-companies-lv-40003000001").unwrap();
    assert_eq!(company.first("name"), Some("SIA \"Alfa\""));
    assert_eq!(company.first("previousName"), Some("SIA \"Vecā Alfa\""));
    assert_eq!(company.first("incorporationDate"), Some("1991-09-25"));

    let accounts = of_schema(&entities, Schema::BankAccount);
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].first("iban"), Some("LV80BANK0000435195001"));

    let owner = merged(&entities, "lv-officer-010180-janis-berzins").unwrap();
    assert_eq!(owner.first("nationality"), Some("lv"));
    assert_eq!(owner.first("birthDate"), Some("1980-01-01"));

    // The joint ownership row and its owners share one relation id
    let joint = merged(&entities, "lv-owner-500").unwrap();
    assert_eq!(joint.first("asset"), Some("oc-companies-lv-40003000001"));
    assert_eq!(joint.first("sharesCount"), Some("100"));
    assert!(joint.first("owner").unwrap().starts_with("lv-officer-020290"));

    let beta = merged(&entities, "oc-companies-lv-40003999999").unwrap();
    assert_eq!(beta.schema, Schema::LegalEntity);
    assert_eq!(beta.first("name"), Some("AS Beta"));
}

#[test]
fn test_missing_required_table_fails() {
    let ws = Workspace::new();
    ws.write_resource("lv_business_register", "src/register.csv", REGISTER);
    let dataset = regdump::dataset_from_name("lv_business_register").unwrap();
    assert!(regdump::run_dataset(dataset.as_ref(), &ws.config(), None).is_err());
}
