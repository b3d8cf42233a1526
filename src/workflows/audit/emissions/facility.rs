use super::super::domain::EmissionsEstimate;
use super::super::format::grouped;
use super::inputs::{field, FieldReader};

/// kg CO2e per kWh of grid electricity.
pub const GRID_ELECTRICITY_KG_PER_KWH: f64 = 0.42;
/// kg CO2e per m³ of natural gas.
pub const NATURAL_GAS_KG_PER_M3: f64 = 2.04;

/// Electricity plus natural gas for facility-like departments.
pub(crate) fn facility_estimate(reader: FieldReader<'_>) -> EmissionsEstimate {
    let electricity = reader.number(field::ANNUAL_ELECTRICITY);
    let gas = reader.number(field::ANNUAL_NATURAL_GAS);

    let co2e_tons =
        (electricity * GRID_ELECTRICITY_KG_PER_KWH + gas * NATURAL_GAS_KG_PER_M3) / 1000.0;

    let mut highlights = Vec::new();
    if electricity > 0.0 {
        highlights.push(format!("{} kWh annual electricity", grouped(electricity)));
    }
    if gas > 0.0 {
        highlights.push(format!("{} m³ natural gas annually", grouped(gas)));
    }

    EmissionsEstimate::clamped(co2e_tons, electricity, highlights)
}

/// Departments without a dedicated model only contribute their electricity figure.
pub(crate) fn electricity_fallback_estimate(reader: FieldReader<'_>) -> EmissionsEstimate {
    let electricity = reader.number(field::ANNUAL_ELECTRICITY);
    if electricity == 0.0 {
        return EmissionsEstimate::default();
    }

    let co2e_tons = electricity * GRID_ELECTRICITY_KG_PER_KWH / 1000.0;
    let mut highlights = Vec::new();
    if electricity > 0.0 {
        highlights.push(format!("{} kWh annual consumption", grouped(electricity)));
    }

    EmissionsEstimate::clamped(co2e_tons, electricity, highlights)
}
