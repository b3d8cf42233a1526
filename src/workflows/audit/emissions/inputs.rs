use super::super::domain::FieldMap;

/// Field ids read by the emissions models. Renaming any of these breaks
/// previously saved records, so the catalog is validated against this list.
pub mod field {
    pub const ANNUAL_ELECTRICITY: &str = "annual_electricity";
    pub const ANNUAL_NATURAL_GAS: &str = "annual_natural_gas";

    pub const GRID_FACTOR: &str = "it_grid_factor";
    pub const RENEWABLE_PCT: &str = "it_renewable_pct";

    pub const CLOUD_PROVIDER: &str = "it_cloud_provider";
    pub const CLOUD_COMPUTE_HOURS: &str = "it_cloud_compute_hours";
    pub const CLOUD_STORAGE_GB: &str = "it_cloud_storage_gb";
    pub const CLOUD_TRANSFER_GB: &str = "it_cloud_transfer_gb";

    pub const COOLING_LOCATION: &str = "it_cooling_location";
    pub const COOLING_HVAC_PCT: &str = "it_cooling_hvac_pct";

    pub const REMOTE_WORKFORCE_PCT: &str = "it_remote_workforce_pct";
    pub const REMOTE_OVERHEAD_KWH: &str = "it_remote_overhead_kwh";

    pub const IS_SUBMETERED: &str = "it_is_submetered";
    pub const ACTUAL_KWH: &str = "it_actual_kwh";
    pub const ALLOCATED_PCT: &str = "it_allocated_pct";
}

/// Read-only view over a saved field map with never-failing accessors.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldReader<'a> {
    fields: &'a FieldMap,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(fields: &'a FieldMap) -> Self {
        Self { fields }
    }

    /// Missing or non-numeric values read as `0.0`.
    pub(crate) fn number(&self, id: &str) -> f64 {
        self.fields
            .get(id)
            .map(|value| value.as_number())
            .unwrap_or(0.0)
    }

    /// Like [`number`](Self::number) but a zero reading is replaced by `default`.
    pub(crate) fn number_or(&self, id: &str, default: f64) -> f64 {
        let value = self.number(id);
        if value == 0.0 {
            default
        } else {
            value
        }
    }

    /// Trimmed, lowercased text; blank values read as absent.
    pub(crate) fn choice(&self, id: &str) -> Option<String> {
        self.fields
            .get(id)
            .and_then(|value| value.as_text())
            .map(|value| value.trim().to_ascii_lowercase())
            .filter(|value| !value.is_empty())
    }
}
