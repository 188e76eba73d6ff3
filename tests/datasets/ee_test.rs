use regdump::Schema;

use crate::utils::{Workspace, write_zip};

const HOLDERS: &str = "\u{feff}nimi;ariregistri_kood;ettevotja_oiguslik_vorm;ettevotja_oigusliku_vormi_alaliik;kmkr_nr;ettevotja_staatus;ettevotja_staatus_tekstina;ettevotja_esmakande_kpv;ettevotja_aadress;asukoht_ettevotja_aadressis;asukoha_ehak_kood;asukoha_ehak_tekstina;indeks_ettevotja_aadressis;ads_adr_id;ads_ads_oid;ads_normaliseeritud_taisaadress;teabesysteemi_link
Näidis OÜ;10000001;Osaühing;;EE100000001;R;Registrisse kantud;01.09.1995;;;;;;;;Harju maakond, Tallinn, Pikk tn 1;https://ariregister.rik.ee/est/company/10000001
Tallinna Loomaaed;75000003;Kohaliku omavalitsuse asutus;;;R;Registrisse kantud;15.01.2001;;;;;;;;;
";

#[test]
fn test_holders_by_legal_form() {
    let ws = Workspace::new();
    write_zip(
        &ws.resource_dir("ee_ariregister").join("data.zip"),
        &[("ettevotja_rekvisiidid_2024-01-01.csv", HOLDERS)],
    );
    let summary = ws.run("ee_ariregister");
    assert_eq!(summary.entities, 2);
    assert_eq!(summary.schemata.get(&Schema::PublicBody), Some(&1));

    let entities = ws.entities("ee_ariregister");
    let company = &entities[0];
    assert_eq!(company.id.as_deref(), Some("ee-vat-ee100000001"));
    assert_eq!(company.schema, Schema::Company);
    assert_eq!(company.first("incorporationDate"), Some("1995-09-01"));
    assert_eq!(
        company.first("sourceUrl"),
        Some("https://ariregister.rik.ee/est/company/10000001")
    );
    assert_eq!(entities[1].id.as_deref(), Some("ee-75000003"));
}
