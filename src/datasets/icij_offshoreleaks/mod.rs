//! ICIJ Offshore Leaks database.
//!
//! The bulk download is a zip of node tables (entities, officers,
//! intermediaries, others, addresses) and one relationships table. A node
//! can be seen several times: once in its own table and again as the
//! endpoint of relationships, which may imply a more specific schema (an
//! officer that owns shares in a company must be a legal entity, the company
//! must be an asset). Nodes are therefore accumulated in an [`EntityStore`]
//! that merges duplicates by id, and only written out once every table has
//! been read. Relationships themselves are emitted as soon as they are read.
//!
//! Addresses are not emitted on their own. They are folded into the nodes
//! that link to them as `address` and `country` values.

use std::sync::LazyLock;

use rustc_hash::{FxHashMap, FxHashSet};

use super::Dataset;
use super::common::for_each_zip_row;
use crate::audit::audit_row;
use crate::config::DatasetMetadata;
use crate::context::Context;
use crate::entity::ids::slugify;
use crate::entity::{Entity, EntityStore};
use crate::error::{IngestError, Result};
use crate::lookup::{LookupResult, Lookups};
use crate::reader::{CsvOptions, Row, ZipSource};
use crate::schema::Schema;
use crate::schema::types::countries::to_code;
use crate::schema::types::{DateFormatConfig, iso_date, parse_date_string};

const URL: &str = "https://offshoreleaks-data.icij.org/offshoreleaks/csv/full-oldb.LATEST.zip";
const NODE_URL: &str = "https://offshoreleaks.icij.org/nodes/";
const PATCHES: &str = include_str!("patches.yml");

/// Node tables in load order, with the schema their rows start out as
const NODE_TABLES: &[(&str, Schema)] = &[
    ("nodes-entities.csv", Schema::Company),
    ("nodes-officers.csv", Schema::LegalEntity),
    ("nodes-intermediaries.csv", Schema::LegalEntity),
    ("nodes-others.csv", Schema::LegalEntity),
];
const ADDRESS_TABLE: &str = "nodes-addresses.csv";
const RELATIONSHIP_TABLE: &str = "relationships.csv";

static DATES: LazyLock<DateFormatConfig> = LazyLock::new(|| {
    DateFormatConfig::with_formats(&[
        "%d-%b-%Y",
        "%b %d, %Y",
        "%Y-%m-%d",
        "%d/%m/%Y",
        "%d.%m.%Y",
        "%d/%m/%y",
    ])
});

pub struct IcijOffshoreLeaks;

/// Node ids are namespaced so they cannot collide with other datasets
#[must_use]
pub fn node_entity_id(node_id: &str) -> Option<String> {
    let node_id = node_id.trim();
    (!node_id.is_empty()).then(|| format!("icijol-{node_id}"))
}

/// How a relationship row maps onto an interest entity
#[derive(Debug, Clone, PartialEq, Eq)]
struct LinkRule {
    schema: Option<Schema>,
    start: Option<String>,
    end: Option<String>,
    link: Option<String>,
    status: Option<String>,
    address: bool,
}

impl LinkRule {
    fn from_result(result: &LookupResult) -> Result<Self> {
        let schema = match result.get_str("schema") {
            Some(name) => Some(name.parse::<Schema>()?),
            None => None,
        };
        Ok(Self {
            schema,
            start: result.get_str("start"),
            end: result.get_str("end"),
            link: result.get_str("link"),
            status: result.get_str("status"),
            address: result.get_bool("address"),
        })
    }
}

/// Import state shared across the node and relationship tables
pub struct LeaksImport {
    lookups: Lookups,
    store: EntityStore,
    dates: FxHashMap<String, Vec<String>>,
    countries: FxHashMap<String, Vec<String>>,
    links: FxHashMap<String, Option<LinkRule>>,
    missing: FxHashSet<(String, String)>,
    links_seen: FxHashSet<String>,
}

impl LeaksImport {
    /// Create an import using the bundled lookups
    pub fn new() -> Result<Self> {
        Self::with_lookups(Lookups::from_yaml(PATCHES)?)
    }

    pub fn with_lookups(lookups: Lookups) -> Result<Self> {
        // Fail early rather than on the first relationship row
        for section in ["relationships", "dates", "countries"] {
            lookups.section(section)?;
        }
        Ok(Self {
            lookups,
            store: EntityStore::new(),
            dates: FxHashMap::default(),
            countries: FxHashMap::default(),
            links: FxHashMap::default(),
            missing: FxHashSet::default(),
            links_seen: FxHashSet::default(),
        })
    }

    /// Nodes accumulated so far
    #[must_use]
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Look a value up, logging each value without a match once
    fn lookup(&mut self, section: &str, value: &str) -> Option<LookupResult> {
        let result = self
            .lookups
            .section(section)
            .ok()
            .and_then(|lookup| lookup.lookup(value))
            .cloned();
        if result.is_none() && self.missing.insert((section.to_string(), value.to_string())) {
            log::error!("[{section}] missing value: {value}");
        }
        result
    }

    /// ISO dates for a source date text; unparseable dates yield nothing
    pub fn parse_date(&mut self, text: Option<&str>) -> Vec<String> {
        let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
            return Vec::new();
        };
        if let Some(cached) = self.dates.get(text) {
            return cached.clone();
        }
        let parsed = if text.len() == 4 && text.chars().all(|c| c.is_ascii_digit()) {
            vec![text.to_string()]
        } else if let Some(date) = parse_date_string(text, &DATES) {
            vec![iso_date(date)]
        } else {
            self.lookup("dates", text)
                .map(|res| res.values())
                .unwrap_or_default()
        };
        self.dates.insert(text.to_string(), parsed.clone());
        parsed
    }

    /// Country codes for a source country text; `;` separates several countries
    pub fn parse_countries(&mut self, text: Option<&str>) -> Vec<String> {
        let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
            return Vec::new();
        };
        if let Some(cached) = self.countries.get(text) {
            return cached.clone();
        }
        let parsed = if text.contains(';') {
            text.split(';')
                .flat_map(|part| self.parse_countries(Some(part)))
                .collect()
        } else if let Some(code) = to_code(text) {
            vec![code.to_string()]
        } else {
            match self.lookup("countries", text) {
                Some(res) => res
                    .values()
                    .iter()
                    .flat_map(|value| self.parse_countries(Some(value.as_str())))
                    .collect(),
                None => Vec::new(),
            }
        };
        self.countries.insert(text.to_string(), parsed.clone());
        parsed
    }

    /// Merge a node into the store; schema conflicts drop the node with a warning
    fn put(&mut self, entity: Entity) {
        let id = entity.id.clone().unwrap_or_default();
        let schema = entity.schema;
        if let Err(err) = self.store.put(entity) {
            let existing = self.store.get(&id).map(|e| e.schema);
            log::warn!("Cannot merge {schema} node {id} into {existing:?}: {err}");
        }
    }

    /// Add a node row from one of the node tables
    pub fn make_row_entity(&mut self, context: &Context, mut row: Row, schema: Schema) -> Result<()> {
        let node_id = row.pop("node_id");
        let Some(id) = node_id.as_deref().and_then(node_entity_id) else {
            log::error!("[{}] No ID: {:?}", context.name(), row.remaining());
            return Ok(());
        };
        let node_id = node_id.unwrap_or_default();
        let mut entity = context.make(schema);
        entity.id = Some(id);

        let name = row.pop("name");
        entity.add("name", name.as_deref())?;
        for field in ["former_name", "original_name"] {
            let other = row.pop(field);
            if other != name {
                entity.add("previousName", other)?;
            }
        }

        entity.add("icijId", node_id.as_str())?;
        entity.add("sourceUrl", format!("{NODE_URL}{node_id}"))?;
        entity.add("legalForm", row.pop("company_type"))?;
        entity.add("legalForm", row.pop("type"))?;
        let incorporated = self.parse_date(row.pop("incorporation_date").as_deref());
        entity.add("incorporationDate", incorporated)?;
        for field in ["inactivation_date", "struck_off_date"] {
            let dissolved = self.parse_date(row.pop(field).as_deref());
            entity.add("dissolutionDate", dissolved)?;
        }

        if entity.is_a(Schema::Organization) {
            entity.add("topics", "corp.offshore")?;
        }

        // Closed and dormant dates only stand in for a missing dissolution date
        for field in ["closed_date", "dorm_date"] {
            let date = self.parse_date(row.pop(field).as_deref());
            if date.is_empty() {
                continue;
            }
            if entity.has("dissolutionDate") {
                log::warn!(
                    "[{}] {id} has both dissolution date and {field}",
                    context.name(),
                    id = entity.id.as_deref().unwrap_or_default()
                );
            } else {
                entity.add("dissolutionDate", date)?;
            }
        }

        entity.add("status", row.pop("status"))?;
        entity.add("publisher", row.pop("sourceID"))?;
        entity.add("notes", row.pop("valid_until"))?;
        entity.add("notes", row.pop("note"))?;

        row.pop("jurisdiction");
        let jurisdiction = self.parse_countries(row.pop("jurisdiction_description").as_deref());
        entity.add("jurisdiction", jurisdiction)?;
        entity.add("address", row.pop("address"))?;
        for field in ["country_codes", "countries"] {
            let countries = self.parse_countries(row.pop(field).as_deref());
            entity.add("country", countries)?;
        }
        entity.add("program", row.pop("service_provider"))?;
        entity.add_quiet("registrationNumber", row.pop("ibcRUC"));

        row.pop("internal_id");
        audit_row(context.name(), &row, &[]);
        self.put(entity);
        Ok(())
    }

    /// Add an address row; addresses stay in the store for folding
    pub fn make_row_address(&mut self, context: &Context, mut row: Row) -> Result<()> {
        let Some(id) = row.pop("node_id").as_deref().and_then(node_entity_id) else {
            log::error!("[{}] Address without ID: {:?}", context.name(), row.remaining());
            return Ok(());
        };
        let mut address = context.make(Schema::Address);
        address.id = Some(id);
        address.add("full", row.pop("address"))?;
        address.add("full", row.pop("name"))?;
        row.pop("country_codes");
        let countries = self.parse_countries(row.pop("countries").as_deref());
        address.add("country", countries)?;
        address.add("summary", row.pop("valid_until"))?;
        address.add("remarks", row.pop("note"))?;
        address.add("publisher", row.pop("sourceID"))?;
        audit_row(context.name(), &row, &[]);
        self.put(address);
        Ok(())
    }

    fn link_rule(&mut self, link: &str) -> Result<Option<LinkRule>> {
        if let Some(rule) = self.links.get(link) {
            return Ok(rule.clone());
        }
        let rule = match self.lookup("relationships", link) {
            Some(result) => Some(LinkRule::from_result(&result)?),
            None => None,
        };
        self.links.insert(link.to_string(), rule.clone());
        Ok(rule)
    }

    /// Handle a relationship row.
    ///
    /// Any link to an address node folds the address into the start node. Other
    /// links become interest entities, emitted right away; both endpoints
    /// are then re-stored under the range schema of the property they fill.
    pub fn make_row_relationship(&mut self, context: &mut Context, mut row: Row) -> Result<()> {
        let rel_type = row.pop("rel_type");
        let raw_start = row.pop("node_id_start").unwrap_or_default();
        let raw_end = row.pop("node_id_end").unwrap_or_default();
        let link = row.pop("link").unwrap_or_default();
        let source_id = row.pop("sourceID");
        let start_date = self.parse_date(row.pop("start_date").as_deref());
        let end_date = self.parse_date(row.pop("end_date").as_deref());
        let status = row.pop("status");

        let rule = self.link_rule(&link)?;

        let (Some(start), Some(end)) = (node_entity_id(&raw_start), node_entity_id(&raw_end)) else {
            return Ok(());
        };
        let (Some(start_schema), Some(end_entity)) = (
            self.store.get(&start).map(|e| e.schema),
            self.store.get(&end).cloned(),
        ) else {
            return Ok(());
        };

        let Some(rule) = rule else {
            if self.links_seen.insert(link.clone()) {
                log::warn!("[{}] Unknown link type: {link:?} ({rel_type:?})", context.name());
            }
            return Ok(());
        };

        if start_schema == Schema::Address {
            return Ok(());
        }

        if end_entity.schema == Schema::Address && start_schema.is_a(Schema::Thing) {
            if let Some(start_entity) = self.store.get_mut(&start) {
                start_entity.add_quiet("address", end_entity.get("full"));
                start_entity.add_quiet("country", end_entity.get("country"));
            }
            return Ok(());
        }

        if rule.address {
            log::warn!(
                "[{}] Address link {link:?} does not end in an address: {start} -> {end}",
                context.name()
            );
            return Ok(());
        }

        let (Some(schema), Some(start_prop), Some(end_prop)) = (rule.schema, &rule.start, &rule.end) else {
            audit_row(context.name(), &row, &[]);
            return Ok(());
        };

        let mut rel = context.make(schema);
        rel.id = slugify(&format!("{raw_start}-{raw_end}-{link}")).and_then(|slug| node_entity_id(&slug));
        rel.add("startDate", start_date)?;
        rel.add("endDate", end_date)?;
        if let Some(prop) = &rule.status {
            rel.add(prop, status)?;
        }
        if let Some(prop) = &rule.link {
            rel.add(prop, link.as_str())?;
        }
        rel.add("publisher", source_id)?;
        rel.add(start_prop, start.as_str())?;
        rel.add(end_prop, end.as_str())?;
        context.emit(&rel)?;

        for (prop, id) in [(start_prop, start), (end_prop, end)] {
            let range = schema
                .property(prop)
                .and_then(|p| p.range)
                .ok_or_else(|| IngestError::InvalidProperty {
                    schema: schema.name().to_string(),
                    property: prop.clone(),
                })?;
            self.put(Entity::with_id(range, id));
        }

        audit_row(context.name(), &row, &[]);
        Ok(())
    }

    /// Emit every stored node except addresses
    pub fn dump_nodes(self, context: &mut Context) -> Result<usize> {
        log::info!("[{}] Dumping {} nodes", context.name(), self.store.len());
        let mut progress = context.progress("nodes");
        for entity in self.store.into_entities() {
            if entity.schema == Schema::Address {
                continue;
            }
            context.emit(&entity)?;
            progress.tick();
        }
        Ok(progress.finish())
    }
}

impl Dataset for IcijOffshoreLeaks {
    fn name(&self) -> &'static str {
        "icij_offshoreleaks"
    }

    fn metadata(&self) -> DatasetMetadata {
        DatasetMetadata::new(self.name(), "ICIJ OffshoreLeaks Database")
            .with_prefix("icijol")
            .with_url("https://offshoreleaks.icij.org/pages/database")
            .with_data_url(URL)
            .with_summary(
                "Offshore companies, their officers and intermediaries from the Panama, Paradise, Pandora and Bahamas leaks",
            )
            .with_publisher(
                "International Consortium of Investigative Journalists",
                Some("https://www.icij.org/"),
                None,
            )
    }

    fn parse(&self, context: &mut Context) -> Result<()> {
        let path = context.fetch_resource("full-oldb.zip", URL)?;
        let mut source = ZipSource::open(&path)?;
        let options = CsvOptions::default();
        let mut import = LeaksImport::new()?;

        for (table, schema) in NODE_TABLES {
            let Some(member) = source.find(table) else {
                log::warn!("[{}] Archive has no {table}", context.name());
                continue;
            };
            for_each_zip_row(context, &mut source, &member, &options, |context, row| {
                import.make_row_entity(context, row, *schema)
            })?;
        }

        match source.find(ADDRESS_TABLE) {
            Some(member) => {
                for_each_zip_row(context, &mut source, &member, &options, |context, row| {
                    import.make_row_address(context, row)
                })?;
            }
            None => log::warn!("[{}] Archive has no {ADDRESS_TABLE}", context.name()),
        }

        match source.find(RELATIONSHIP_TABLE) {
            Some(member) => {
                for_each_zip_row(context, &mut source, &member, &options, |context, row| {
                    import.make_row_relationship(context, row)
                })?;
            }
            None => log::warn!("[{}] Archive has no {RELATIONSHIP_TABLE}", context.name()),
        }

        import.dump_nodes(context)?;
        Ok(())
    }
}
