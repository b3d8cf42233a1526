//! Department emissions models.
//!
//! Each department resolves to one [`EmissionsStrategy`] through an exhaustive match on the
//! closed [`Department`] enum, so no string dispatch happens while calculating.

mod facility;
mod inputs;
mod it;

use super::domain::{Department, EmissionsEstimate, FieldMap};
use inputs::FieldReader;
use serde::Serialize;

pub use facility::{GRID_ELECTRICITY_KG_PER_KWH, NATURAL_GAS_KG_PER_M3};
pub use inputs::field;
pub use it::{
    CloudFactors, CloudProvider, CoolingLocation, HardwareCategory, HardwareEnergy,
    ItEmissionsBreakdown,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmissionsStrategy {
    /// Grid electricity plus natural gas.
    Facility,
    /// On-prem hardware, cloud, cooling, and workforce overheads.
    InformationTechnology,
    /// Electricity figure only, when one was reported.
    ElectricityFallback,
}

impl EmissionsStrategy {
    pub const fn for_department(department: Department) -> Self {
        match department {
            Department::Manufacturing | Department::Warehouse | Department::Office => {
                Self::Facility
            }
            Department::It => Self::InformationTechnology,
            Department::Kitchen
            | Department::Retail
            | Department::Maintenance
            | Department::Transportation
            | Department::ColdStorage
            | Department::Laboratory
            | Department::Showroom => Self::ElectricityFallback,
        }
    }

    pub fn estimate(self, fields: &FieldMap) -> EmissionsEstimate {
        let reader = FieldReader::new(fields);
        match self {
            Self::Facility => facility::facility_estimate(reader),
            Self::InformationTechnology => it::it_breakdown(reader).estimate(),
            Self::ElectricityFallback => facility::electricity_fallback_estimate(reader),
        }
    }
}

pub fn calculate_emissions(department: Department, fields: &FieldMap) -> EmissionsEstimate {
    EmissionsStrategy::for_department(department).estimate(fields)
}

/// Full IT model intermediates, including the informational allocated energy figure.
pub fn calculate_it_breakdown(fields: &FieldMap) -> ItEmissionsBreakdown {
    it::it_breakdown(FieldReader::new(fields))
}

/// Every field id the models read; the catalog must declare each one.
pub fn model_field_ids() -> Vec<&'static str> {
    let mut ids = vec![
        field::ANNUAL_ELECTRICITY,
        field::ANNUAL_NATURAL_GAS,
        field::GRID_FACTOR,
        field::RENEWABLE_PCT,
        field::CLOUD_PROVIDER,
        field::CLOUD_COMPUTE_HOURS,
        field::CLOUD_STORAGE_GB,
        field::CLOUD_TRANSFER_GB,
        field::COOLING_LOCATION,
        field::COOLING_HVAC_PCT,
        field::REMOTE_WORKFORCE_PCT,
        field::REMOTE_OVERHEAD_KWH,
        field::IS_SUBMETERED,
        field::ACTUAL_KWH,
        field::ALLOCATED_PCT,
    ];

    for category in HardwareCategory::ordered() {
        ids.push(category.count_field());
        ids.push(category.watts_field());
        ids.push(category.hours_field());
    }

    ids
}
