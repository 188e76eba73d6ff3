//! Dataset importers for public company registers and leaks archives
//!
//! Each dataset module converts one publisher's bulk export into entities
//! through a [`Context`]. The importers share the readers in
//! [`crate::reader`] and the helpers in [`common`].
//!
//! Available datasets:
//! - `gb_coh_psc`: UK Companies House company data and persons with significant control
//! - `cy_companies`: Cyprus registrar of companies
//! - `icij_offshoreleaks`: ICIJ Offshore Leaks database
//! - `cz_business_register`: Czech ARES business register (VREO)
//! - `lv_business_register`: Latvian enterprise register
//! - `md_companies`: Moldovan state register of legal units
//! - `ee_ariregister`: Estonian e-Business register
//! - `us_corpwatch`: CorpWatch API tables of SEC filers

use crate::config::DatasetMetadata;
use crate::context::Context;
use crate::error::Result;

pub mod common;
pub mod factory;

pub mod cy_companies;
pub mod cz_business_register;
pub mod ee_ariregister;
pub mod gb_coh_psc;
pub mod icij_offshoreleaks;
pub mod lv_business_register;
pub mod md_companies;
pub mod us_corpwatch;

pub use factory::{DATASET_NAMES, dataset_from_name};

/// Base trait for dataset importers
pub trait Dataset: Send + Sync {
    /// Machine name of the dataset, used for directories and the CLI
    fn name(&self) -> &'static str;

    /// Default descriptive metadata
    fn metadata(&self) -> DatasetMetadata;

    /// Read the source files and emit entities into the context
    fn parse(&self, context: &mut Context) -> Result<()>;
}
