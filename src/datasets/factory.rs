//! Lookup of dataset importers by name

use std::sync::Arc;

use super::Dataset;
use crate::error::{IngestError, Result};

/// Names accepted by [`dataset_from_name`]
pub const DATASET_NAMES: &[&str] = &[
    "cy_companies",
    "cz_business_register",
    "ee_ariregister",
    "gb_coh_psc",
    "icij_offshoreleaks",
    "lv_business_register",
    "md_companies",
    "us_corpwatch",
];

/// Create a dataset importer from its name
pub fn dataset_from_name(name: &str) -> Result<Arc<dyn Dataset>> {
    let dataset: Arc<dyn Dataset> = match name.trim().to_lowercase().replace('-', "_").as_str() {
        "cy_companies" => Arc::new(super::cy_companies::CyCompanies),
        "cz_business_register" => Arc::new(super::cz_business_register::CzBusinessRegister),
        "ee_ariregister" => Arc::new(super::ee_ariregister::EeAriregister),
        "gb_coh_psc" => Arc::new(super::gb_coh_psc::GbCohPsc),
        "icij_offshoreleaks" => Arc::new(super::icij_offshoreleaks::IcijOffshoreLeaks),
        "lv_business_register" => Arc::new(super::lv_business_register::LvBusinessRegister),
        "md_companies" => Arc::new(super::md_companies::MdCompanies),
        "us_corpwatch" => Arc::new(super::us_corpwatch::UsCorpwatch),
        _ => return Err(IngestError::UnknownDataset(name.to_string())),
    };
    Ok(dataset)
}
