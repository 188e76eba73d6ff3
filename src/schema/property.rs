//! Property definitions for each schema.

use super::Schema;
use super::types::PropertyType;

/// A named, typed property of a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Property {
    pub name: &'static str,
    pub kind: PropertyType,
    /// Target schema for entity references
    pub range: Option<Schema>,
}

const fn prop(name: &'static str, kind: PropertyType) -> Property {
    Property {
        name,
        kind,
        range: None,
    }
}

const fn link(name: &'static str, range: Schema) -> Property {
    Property {
        name,
        kind: PropertyType::Entity,
        range: Some(range),
    }
}

use super::types::PropertyType as T;

const THING: &[Property] = &[
    prop("name", T::Name),
    prop("alias", T::Name),
    prop("previousName", T::Name),
    prop("weakAlias", T::Name),
    prop("summary", T::Text),
    prop("description", T::Text),
    prop("notes", T::Text),
    prop("country", T::Country),
    prop("sourceUrl", T::Url),
    prop("publisher", T::String),
    prop("publisherUrl", T::Url),
    prop("address", T::Address),
    link("addressEntity", Schema::Address),
    prop("program", T::String),
    prop("topics", T::Topic),
    prop("keywords", T::String),
    prop("createdAt", T::Date),
    prop("modifiedAt", T::Date),
    prop("retrievedAt", T::Date),
];

const INTERVAL: &[Property] = &[
    prop("startDate", T::Date),
    prop("endDate", T::Date),
    prop("date", T::Date),
    prop("summary", T::Text),
    prop("description", T::Text),
    prop("recordId", T::Identifier),
    prop("sourceUrl", T::Url),
    prop("publisher", T::String),
    prop("publisherUrl", T::Url),
    prop("modifiedAt", T::Date),
];

const LEGAL_ENTITY: &[Property] = &[
    prop("email", T::Email),
    prop("phone", T::Phone),
    prop("website", T::Url),
    prop("legalForm", T::String),
    prop("incorporationDate", T::Date),
    prop("dissolutionDate", T::Date),
    prop("status", T::String),
    prop("sector", T::String),
    prop("classification", T::String),
    prop("registrationNumber", T::Identifier),
    prop("idNumber", T::Identifier),
    prop("taxNumber", T::Identifier),
    prop("vatCode", T::Identifier),
    prop("jurisdiction", T::Country),
    prop("mainCountry", T::Country),
    prop("opencorporatesUrl", T::Url),
    prop("icijId", T::Identifier),
    link("parent", Schema::LegalEntity),
];

const COMPANY: &[Property] = &[prop("capital", T::String)];

const PERSON: &[Property] = &[
    prop("title", T::String),
    prop("firstName", T::Name),
    prop("middleName", T::Name),
    prop("lastName", T::Name),
    prop("birthDate", T::Date),
    prop("birthPlace", T::String),
    prop("deathDate", T::Date),
    prop("nationality", T::Country),
    prop("gender", T::String),
    prop("position", T::String),
];

const ASSET: &[Property] = &[prop("amount", T::Number), prop("currency", T::String)];

const ADDRESS: &[Property] = &[
    prop("full", T::Address),
    prop("remarks", T::Text),
    prop("postOfficeBox", T::String),
    prop("street", T::String),
    prop("street2", T::String),
    prop("city", T::String),
    prop("postalCode", T::Identifier),
    prop("region", T::String),
    prop("state", T::String),
    prop("latitude", T::Number),
    prop("longitude", T::Number),
];

const BANK_ACCOUNT: &[Property] = &[
    prop("iban", T::Iban),
    prop("accountNumber", T::Identifier),
    prop("bankName", T::String),
    prop("bic", T::Identifier),
];

const INTEREST: &[Property] = &[prop("role", T::String), prop("status", T::String)];

const OWNERSHIP: &[Property] = &[
    link("owner", Schema::LegalEntity),
    link("asset", Schema::Asset),
    prop("percentage", T::String),
    prop("sharesCount", T::String),
    prop("sharesValue", T::String),
    prop("sharesCurrency", T::String),
    prop("sharesType", T::String),
    prop("ownershipType", T::String),
];

const DIRECTORSHIP: &[Property] = &[
    link("director", Schema::LegalEntity),
    link("organization", Schema::Organization),
];

const REPRESENTATION: &[Property] = &[
    link("agent", Schema::LegalEntity),
    link("client", Schema::LegalEntity),
];

const UNKNOWN_LINK: &[Property] = &[
    link("subject", Schema::Thing),
    link("object", Schema::Thing),
];

pub(super) fn own_properties(schema: Schema) -> &'static [Property] {
    match schema {
        Schema::Thing => THING,
        Schema::Interval => INTERVAL,
        Schema::LegalEntity => LEGAL_ENTITY,
        Schema::Organization | Schema::PublicBody => &[],
        Schema::Company => COMPANY,
        Schema::Person => PERSON,
        Schema::Asset => ASSET,
        Schema::Address => ADDRESS,
        Schema::BankAccount => BANK_ACCOUNT,
        Schema::Interest => INTEREST,
        Schema::Ownership => OWNERSHIP,
        Schema::Directorship => DIRECTORSHIP,
        Schema::Representation => REPRESENTATION,
        Schema::UnknownLink => UNKNOWN_LINK,
    }
}
