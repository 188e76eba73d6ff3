use regdump::Schema;

use crate::utils::{Workspace, of_schema, write_tar_gz};

fn document(ico: &str, name: &str, member: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<are:Ares_odpovedi xmlns:are="http://wwwinfo.mfcr.cz/ares/xml_doc/schemas/ares/ares_answer_vreo/v_1.0.0">
  <are:Odpoved><are:Vypis_VREO>
    <are:Zakladni_udaje>
      <are:ObchodniFirma>{name}</are:ObchodniFirma>
      <are:ICO>{ico}</are:ICO>
      <are:DatumZapisu>2001-05-04</are:DatumZapisu>
      <are:DatumVymazu>2019-12-31</are:DatumVymazu>
    </are:Zakladni_udaje>
    <are:Statutarni_organ>
      <are:Clen>
        <are:funkce><are:nazev>předseda představenstva</are:nazev></are:funkce>
        <are:fosoba><are:jmeno>{member}</are:jmeno><are:prijmeni>Dvořák</are:prijmeni></are:fosoba>
      </are:Clen>
    </are:Statutarni_organ>
  </are:Vypis_VREO></are:Odpoved>
</are:Ares_odpovedi>"#
    )
}

#[test]
fn test_documents_in_tarball() {
    let ws = Workspace::new();
    let first = document("11111111", "Alfa a.s.", "Petr");
    let second = document("22222222", "Beta a.s.", "Pavel");
    write_tar_gz(
        &ws.resource_dir("cz_business_register").join("data.tar.gz"),
        &[
            ("vreo/11111111.xml", first.as_str()),
            ("vreo/broken.xml", "<are:Ares_odpovedi><unclosed>"),
            ("vreo/22222222.xml", second.as_str()),
        ],
    );
    let summary = ws.run("cz_business_register");
    assert_eq!(summary.schemata.get(&Schema::Company), Some(&2));

    let entities = ws.entities("cz_business_register");
    let companies = of_schema(&entities, Schema::Company);
    assert_eq!(companies[0].id.as_deref(), Some("oc-companies-cz-11111111"));
    assert_eq!(companies[0].first("dissolutionDate"), Some("2019-12-31"));

    let people = of_schema(&entities, Schema::Person);
    assert_eq!(people.len(), 2);
    assert_eq!(people[1].first("name"), Some("Pavel Dvořák"));

    let rels = of_schema(&entities, Schema::Directorship);
    assert_eq!(rels.len(), 2);
    assert_eq!(rels[0].first("director"), people[0].id.as_deref());
}
