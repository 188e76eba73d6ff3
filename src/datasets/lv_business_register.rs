//! Latvian Register of Enterprises open data.
//!
//! The register publishes several `;`-separated CSV tables keyed on the
//! company registration code. Each table contributes fragments of the same
//! company ids, which downstream aggregation merges.

use super::Dataset;
use super::common::{for_each_file_row, make_oc_company_id, oc_url};
use crate::audit::audit_row;
use crate::config::DatasetMetadata;
use crate::context::Context;
use crate::entity::Entity;
use crate::error::Result;
use crate::reader::{CsvOptions, Row};
use crate::schema::Schema;
use crate::utils::text::join_text;

type RowHandler = fn(&mut Context, Row) -> Result<()>;

/// Source tables under the resource directory, their handler and whether they must exist
const TABLES: &[(&str, RowHandler, bool)] = &[
    ("src/register.csv", parse_register, true),
    ("src/register_name_history.csv", parse_old_names, true),
    ("src/beneficial_owners.csv", parse_beneficial_owners, true),
    ("src/members.csv", parse_members, true),
    ("src/members_joint_owners.csv", parse_joint_members, true),
    ("src/officers.csv", parse_officers, false),
];

pub struct LvBusinessRegister;

fn company_id(reg_nr: &str) -> String {
    make_oc_company_id("lv", reg_nr)
}

/// Schema for an `entity_type` or `position` code
fn type_schema(code: Option<&str>) -> Option<Schema> {
    match code? {
        "FOREIGN_ENTITY" | "LEGAL_ENTITY" => Some(Schema::LegalEntity),
        "NATURAL_PERSON" => Some(Schema::Person),
        "OWNER" | "CO_OWNER" => Some(Schema::Ownership),
        _ => None,
    }
}

fn make_bank_account(context: &Context, iban: &str) -> Result<Entity> {
    let mut account = context.make(Schema::BankAccount);
    account.id = context.make_slug(["iban", iban]);
    account.add("iban", iban)?;
    Ok(account)
}

pub(crate) fn parse_register(context: &mut Context, mut row: Row) -> Result<()> {
    let Some(reg_nr) = row.pop("regcode") else {
        return Ok(());
    };
    let mut company = context.make(Schema::Company);
    company.id = Some(company_id(&reg_nr));
    company.add("name", row.pop("name"))?;
    company.add("registrationNumber", reg_nr.as_str())?;
    company.add("legalForm", row.pop("type_text"))?;
    company.add("incorporationDate", row.pop("registered"))?;
    company.add("address", row.pop("address"))?;
    company.add("jurisdiction", "lv")?;
    company.add("opencorporatesUrl", oc_url("lv", &reg_nr))?;

    let closed = row.pop("closed");
    if let Some(terminated) = row.pop("terminated") {
        company.add("dissolutionDate", terminated)?;
        company.add("status", closed)?;
    }

    if let Some(iban) = row.pop("sepa") {
        let account = make_bank_account(context, &iban)?;
        let mut ownership = context.make(Schema::Ownership);
        ownership.id = context.make_slug([
            "bankaccountholder",
            company.id.as_deref().unwrap_or_default(),
            account.id.as_deref().unwrap_or_default(),
        ]);
        ownership.add("owner", &company)?;
        ownership.add("asset", &account)?;
        context.emit(&account)?;
        context.emit(&ownership)?;
    }

    audit_row(context.name(), &row, &["type", "regtype", "regtype_text", "index", "addressid", "atvk", "reregistration_term", "id"]);
    context.emit(&company)
}

pub(crate) fn parse_old_names(context: &mut Context, mut row: Row) -> Result<()> {
    let Some(reg_nr) = row.pop("regcode") else {
        return Ok(());
    };
    let mut company = context.make(Schema::Company);
    company.id = Some(company_id(&reg_nr));
    company.add("previousName", row.pop("name"))?;
    context.emit(&company)
}

/// Build the officer, owner or member described by a row
fn make_officer(context: &Context, row: &mut Row) -> Result<Entity> {
    let schema = type_schema(row.get("entity_type")).unwrap_or(Schema::Person);
    row.pop("entity_type");
    let mut officer = context.make(schema);
    if schema == Schema::Person {
        let ident = row.pop("latvian_identity_number_masked");
        officer.add("birthDate", row.pop("birth_date"))?;
        let first_name = row.pop("forename");
        let last_name = row.pop("surname");
        if first_name.is_some() || last_name.is_some() {
            officer.add("firstName", first_name.as_deref())?;
            officer.add("lastName", last_name.as_deref())?;
            officer.add("name", join_text([first_name, last_name].into_iter().flatten(), " "))?;
        }
        officer.add("name", row.pop("name"))?;
        officer.add("idNumber", ident.as_deref())?;
        let key = ident.or_else(|| row.pop("id")).unwrap_or_default();
        let caption = officer.caption().unwrap_or_default();
        officer.id = context.make_slug(["officer", key.as_str(), caption.as_str()]);
    } else {
        let name = row.pop("name");
        officer.id = match row.pop("legal_entity_registration_number") {
            Some(reg_nr) => Some(company_id(&reg_nr)),
            None => context.make_slug([
                "officer",
                row.get("id").unwrap_or_default(),
                name.as_deref().unwrap_or_default(),
            ]),
        };
        officer.add("name", name)?;
    }
    Ok(officer)
}

pub(crate) fn parse_officers(context: &mut Context, mut row: Row) -> Result<()> {
    let position = row.pop("position");
    let schema = match type_schema(position.as_deref()) {
        Some(Schema::Ownership) => Schema::Ownership,
        _ => Schema::Directorship,
    };
    let Some(company_nr) = row.pop("at_legal_entity_registration_number") else {
        return Ok(());
    };
    let officer = make_officer(context, &mut row)?;
    context.emit(&officer)?;

    let cid = company_id(&company_nr);
    let mut rel = context.make(schema);
    rel.id = context.make_slug([schema.name(), officer.id.as_deref().unwrap_or_default(), cid.as_str()]);
    rel.add("role", position)?;
    rel.add("role", row.pop("governing_body"))?;
    rel.add("startDate", row.pop("registered_on"))?;
    if schema == Schema::Ownership {
        rel.add("owner", &officer)?;
        rel.add("asset", cid)?;
    } else {
        rel.add("director", &officer)?;
        rel.add("organization", cid)?;
    }
    context.emit(&rel)
}

pub(crate) fn parse_beneficial_owners(context: &mut Context, mut row: Row) -> Result<()> {
    // In this table the registration number is the owned company's
    let Some(company_nr) = row.pop("legal_entity_registration_number") else {
        return Ok(());
    };
    let mut officer = make_officer(context, &mut row)?;
    officer.add_quiet("nationality", row.pop("nationality"));
    officer.add("country", row.pop("residence"))?;

    let cid = company_id(&company_nr);
    let mut rel = context.make(Schema::Ownership);
    rel.id = context.make_slug(["OWNER", officer.id.as_deref().unwrap_or_default(), cid.as_str()]);
    rel.add("role", "OWNER")?;
    rel.add("startDate", row.pop("registered_on"))?;
    rel.add("owner", &officer)?;
    rel.add("asset", cid)?;
    context.emit(&officer)?;
    context.emit(&rel)
}

pub(crate) fn parse_members(context: &mut Context, mut row: Row) -> Result<()> {
    let Some(company_nr) = row.pop("at_legal_entity_registration_number") else {
        return Ok(());
    };
    let cid = company_id(&company_nr);
    let mut rel = context.make(Schema::Ownership);
    rel.add("role", "OWNER")?;
    rel.add("asset", cid.as_str())?;
    let shares = row.pop("number_of_shares");
    let date_from = row.pop("date_from");
    rel.add("sharesCount", shares.as_deref())?;
    rel.add("sharesValue", row.pop("share_nominal_value"))?;
    rel.add("sharesCurrency", row.pop("share_currency"))?;
    rel.add("startDate", date_from.as_deref())?;
    if row.get("entity_type") == Some("JOINT_OWNERS") {
        // Owners are attached by the joint owners table, keyed on this row's id
        rel.id = match row.get("id") {
            Some(member_id) => context.make_slug(["OWNER", member_id]),
            None => {
                log::warn!("[{}] Joint owners of {company_nr} without member id", context.name());
                context.make_id([
                    "OWNER",
                    cid.as_str(),
                    shares.as_deref().unwrap_or_default(),
                    date_from.as_deref().unwrap_or_default(),
                ])
            }
        };
    } else {
        let officer = make_officer(context, &mut row)?;
        rel.add("owner", &officer)?;
        rel.id = context.make_slug(["OWNER", officer.id.as_deref().unwrap_or_default(), cid.as_str()]);
        context.emit(&officer)?;
    }
    context.emit(&rel)
}

pub(crate) fn parse_joint_members(context: &mut Context, mut row: Row) -> Result<()> {
    let Some(member_id) = row.pop("member_id") else {
        return Ok(());
    };
    let officer = make_officer(context, &mut row)?;
    let mut rel = context.make(Schema::Ownership);
    rel.id = context.make_slug(["OWNER", member_id.as_str()]);
    rel.add("owner", &officer)?;
    context.emit(&officer)?;
    context.emit(&rel)
}

impl Dataset for LvBusinessRegister {
    fn name(&self) -> &'static str {
        "lv_business_register"
    }

    fn metadata(&self) -> DatasetMetadata {
        DatasetMetadata::new(self.name(), "Latvian Register of Enterprises")
            .with_prefix("lv")
            .with_url("https://data.gov.lv/dati/lv/organization/ur")
            .with_summary("Companies, their officers, members and beneficial owners registered in Latvia")
            .with_publisher("Uzņēmumu reģistrs", Some("https://www.ur.gov.lv/"), Some("lv"))
    }

    fn parse(&self, context: &mut Context) -> Result<()> {
        let options = CsvOptions::default().with_delimiter(b';');
        for (name, handler, required) in TABLES {
            let path = match context.get_resource_path(name) {
                Ok(path) => path,
                Err(err) if *required => return Err(err),
                Err(_) => {
                    log::info!("[{}] No {name}, skipping", context.name());
                    continue;
                }
            };
            for_each_file_row(context, &path, &options, *handler)?;
        }
        Ok(())
    }
}
