//! Postal address formatting and Address entities.

use crate::context::Context;
use crate::entity::Entity;
use crate::error::Result;
use crate::schema::Schema;
use crate::schema::types::countries::{country_name, to_code};
use crate::utils::text::join_text;

/// The components of a postal address as found in a source record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressParts {
    /// Free-text note kept on the entity, not part of the formatted line
    pub remarks: Option<String>,
    /// Leading line such as a building name or care-of
    pub summary: Option<String>,
    pub po_box: Option<String>,
    pub street: Option<String>,
    pub street2: Option<String>,
    pub street3: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub state: Option<String>,
    /// Country as written in the source
    pub country: Option<String>,
    /// ISO alpha-2 code, if known
    pub country_code: Option<String>,
}

impl AddressParts {
    /// ISO code of the address country, from the code or the country text
    #[must_use]
    pub fn country_code(&self) -> Option<String> {
        self.country_code
            .as_deref()
            .or(self.country.as_deref())
            .and_then(to_code)
            .map(str::to_string)
    }

    /// Single-line rendering: street lines, postal code and city, region,
    /// state, then country. `None` when there is nothing to show.
    #[must_use]
    pub fn format_line(&self) -> Option<String> {
        let locality = join_text([self.postal_code.as_deref(), self.city.as_deref()].into_iter().flatten(), " ");
        let country = match &self.country {
            Some(country) => Some(country.clone()),
            None => self
                .country_code
                .as_deref()
                .and_then(country_name)
                .map(str::to_string),
        };
        let street_parts = [
            self.summary.as_deref(),
            self.street.as_deref(),
            self.street2.as_deref(),
            self.street3.as_deref(),
            self.po_box.as_deref(),
            locality.as_deref(),
            self.region.as_deref(),
            self.state.as_deref(),
        ];
        let mut lines: Vec<&str> = street_parts.into_iter().flatten().collect();
        // Only a country is not an address
        if lines.iter().all(|l| l.trim().is_empty()) {
            return None;
        }
        lines.extend(country.as_deref());
        join_text(lines, ", ")
    }
}

/// Build an Address entity from its parts.
///
/// The id is derived from the formatted line and the country code, so the
/// same address seen on different rows collapses into one entity.
///
/// # Returns
/// `None` when the parts do not format to any text
pub fn make_address(context: &Context, parts: &AddressParts) -> Result<Option<Entity>> {
    let Some(full) = parts.format_line() else {
        return Ok(None);
    };
    let country = parts.country_code();
    let mut address = context.make(Schema::Address);
    address.id = context.make_id(["address", full.as_str(), country.as_deref().unwrap_or_default()]);
    address.add("full", full.as_str())?;
    address.add("remarks", parts.remarks.as_deref())?;
    address.add("postOfficeBox", parts.po_box.as_deref())?;
    address.add("street", parts.street.as_deref())?;
    address.add("street2", join_text([parts.street2.as_deref(), parts.street3.as_deref()].into_iter().flatten(), ", "))?;
    address.add("postalCode", parts.postal_code.as_deref())?;
    address.add("city", parts.city.as_deref())?;
    address.add("region", parts.region.as_deref())?;
    address.add("state", parts.state.as_deref())?;
    address.add("country", country)?;
    Ok(Some(address))
}

/// Emit an address and link it to `entity` through `addressEntity` and `address`
pub fn attach_address(context: &mut Context, entity: &mut Entity, parts: &AddressParts) -> Result<()> {
    if let Some(address) = make_address(context, parts)? {
        entity.add("addressEntity", &address)?;
        entity.add("address", address.first("full"))?;
        context.emit(&address)?;
    }
    Ok(())
}
