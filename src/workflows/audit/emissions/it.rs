use super::super::domain::EmissionsEstimate;
use super::super::format::grouped;
use super::facility::GRID_ELECTRICITY_KG_PER_KWH;
use super::inputs::{field, FieldReader};
use serde::Serialize;

const DAYS_PER_YEAR: f64 = 365.0;
const MONTHS_PER_YEAR: f64 = 12.0;
/// Energy drawn per billed cloud compute-hour.
const CLOUD_KWH_PER_COMPUTE_HOUR: f64 = 0.1;
/// Fixed share of on-prem plus cloud emissions attributed to security tooling.
const SECURITY_OVERHEAD_PCT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HardwareCategory {
    Servers,
    Desktops,
    Laptops,
    Monitors,
    Network,
}

impl HardwareCategory {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Servers,
            Self::Desktops,
            Self::Laptops,
            Self::Monitors,
            Self::Network,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Servers => "servers",
            Self::Desktops => "desktops",
            Self::Laptops => "laptops",
            Self::Monitors => "monitors",
            Self::Network => "network devices",
        }
    }

    pub const fn count_field(self) -> &'static str {
        match self {
            Self::Servers => "it_servers_count",
            Self::Desktops => "it_desktops_count",
            Self::Laptops => "it_laptops_count",
            Self::Monitors => "it_monitors_count",
            Self::Network => "it_network_count",
        }
    }

    pub const fn watts_field(self) -> &'static str {
        match self {
            Self::Servers => "it_servers_watts",
            Self::Desktops => "it_desktops_watts",
            Self::Laptops => "it_laptops_watts",
            Self::Monitors => "it_monitors_watts",
            Self::Network => "it_network_watts",
        }
    }

    pub const fn hours_field(self) -> &'static str {
        match self {
            Self::Servers => "it_servers_hours",
            Self::Desktops => "it_desktops_hours",
            Self::Laptops => "it_laptops_hours",
            Self::Monitors => "it_monitors_hours",
            Self::Network => "it_network_hours",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CloudProvider {
    Aws,
    Azure,
    Gcp,
    Other,
    None,
}

/// kg CO2e per unit for each cloud usage dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CloudFactors {
    pub compute: f64,
    pub storage: f64,
    pub transfer: f64,
}

impl CloudProvider {
    /// Absent selections mean no cloud usage; unrecognized ones use the generic row.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            None => Self::None,
            Some("aws") => Self::Aws,
            Some("azure") => Self::Azure,
            Some("gcp") => Self::Gcp,
            Some("none") => Self::None,
            Some(_) => Self::Other,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Aws => "AWS",
            Self::Azure => "Azure",
            Self::Gcp => "Google Cloud",
            Self::Other => "Other",
            Self::None => "None",
        }
    }

    pub const fn factors(self) -> CloudFactors {
        match self {
            Self::Aws => CloudFactors {
                compute: 0.000063,
                storage: 0.00000001,
                transfer: 0.00000225,
            },
            Self::Azure => CloudFactors {
                compute: 0.000052,
                storage: 0.00000001,
                transfer: 0.00000175,
            },
            Self::Gcp => CloudFactors {
                compute: 0.000039,
                storage: 0.00000001,
                transfer: 0.00000125,
            },
            Self::Other => CloudFactors {
                compute: 0.00006,
                storage: 0.00000001,
                transfer: 0.000002,
            },
            Self::None => CloudFactors {
                compute: 0.0,
                storage: 0.0,
                transfer: 0.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoolingLocation {
    SharedOffice,
    Hybrid,
    Dedicated,
}

impl CoolingLocation {
    /// An unanswered location is treated as cooling shared with the office.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            None | Some("shared_office") => Self::SharedOffice,
            Some("hybrid") => Self::Hybrid,
            Some(_) => Self::Dedicated,
        }
    }

    /// Dedicated cooling sits outside the allocation model.
    pub const fn shares_building_hvac(self) -> bool {
        matches!(self, Self::SharedOffice | Self::Hybrid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HardwareEnergy {
    pub category: HardwareCategory,
    pub count: f64,
    pub watts: f64,
    pub hours_per_day: f64,
    pub annual_kwh: f64,
}

/// Every intermediate of the IT model, kept for API consumers and audits of the math.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItEmissionsBreakdown {
    pub hardware: Vec<HardwareEnergy>,
    pub total_onprem_kwh: f64,
    pub grid_factor: f64,
    pub renewable_pct: f64,
    pub adjusted_grid_factor: f64,
    pub onprem_co2e_kg: f64,
    pub cloud_provider: CloudProvider,
    pub cloud_compute_kwh: f64,
    pub cloud_co2e_kg: f64,
    pub cooling_location: CoolingLocation,
    pub cooling_kwh: f64,
    pub cooling_co2e_kg: f64,
    pub security_overhead_co2e_kg: f64,
    pub remote_overhead_kwh_per_month: f64,
    pub remote_overhead_co2e_kg: f64,
    pub total_co2e_kg: f64,
    pub total_co2e_tons: f64,
    /// Displayed energy figure; not part of the emissions total.
    pub allocated_kwh: f64,
}

pub(crate) fn it_breakdown(reader: FieldReader<'_>) -> ItEmissionsBreakdown {
    let hardware: Vec<HardwareEnergy> = HardwareCategory::ordered()
        .into_iter()
        .map(|category| {
            let count = reader.number(category.count_field());
            let watts = reader.number(category.watts_field());
            let hours_per_day = reader.number(category.hours_field());
            HardwareEnergy {
                category,
                count,
                watts,
                hours_per_day,
                annual_kwh: watts * hours_per_day * DAYS_PER_YEAR * count / 1000.0,
            }
        })
        .collect();
    let total_onprem_kwh: f64 = hardware.iter().map(|entry| entry.annual_kwh).sum();

    let grid_factor = reader.number_or(field::GRID_FACTOR, GRID_ELECTRICITY_KG_PER_KWH);
    let renewable_pct = reader.number(field::RENEWABLE_PCT);
    let adjusted_grid_factor = grid_factor * (1.0 - renewable_pct / 100.0);

    let onprem_co2e_kg = total_onprem_kwh * adjusted_grid_factor;

    let cloud_provider = CloudProvider::parse(reader.choice(field::CLOUD_PROVIDER).as_deref());
    let cloud = cloud_provider.factors();
    let cloud_compute_kwh = reader.number(field::CLOUD_COMPUTE_HOURS) * CLOUD_KWH_PER_COMPUTE_HOUR;
    let cloud_co2e_kg = cloud_compute_kwh * adjusted_grid_factor
        + reader.number(field::CLOUD_STORAGE_GB) * cloud.storage
        + reader.number(field::CLOUD_TRANSFER_GB) * cloud.transfer;

    let building_kwh = reader.number(field::ANNUAL_ELECTRICITY);
    let cooling_location =
        CoolingLocation::parse(reader.choice(field::COOLING_LOCATION).as_deref());
    let cooling_kwh = if cooling_location.shares_building_hvac() {
        building_kwh * (reader.number(field::COOLING_HVAC_PCT) / 100.0)
    } else {
        0.0
    };
    let cooling_co2e_kg = cooling_kwh * adjusted_grid_factor;

    let security_overhead_co2e_kg =
        (onprem_co2e_kg + cloud_co2e_kg) * (SECURITY_OVERHEAD_PCT / 100.0);

    let remote_workforce_pct = reader.number(field::REMOTE_WORKFORCE_PCT);
    let remote_overhead_kwh_per_month = reader.number(field::REMOTE_OVERHEAD_KWH);
    let remote_overhead_co2e_kg = if remote_workforce_pct > 0.0
        && remote_overhead_kwh_per_month > 0.0
    {
        remote_overhead_kwh_per_month * MONTHS_PER_YEAR * adjusted_grid_factor
    } else {
        0.0
    };

    let total_co2e_kg = onprem_co2e_kg
        + cloud_co2e_kg
        + cooling_co2e_kg
        + security_overhead_co2e_kg
        + remote_overhead_co2e_kg;

    let submetered = reader.choice(field::IS_SUBMETERED).as_deref() == Some("yes");
    let actual_kwh = reader.number(field::ACTUAL_KWH);
    let allocated_pct = reader.number(field::ALLOCATED_PCT);
    let allocated_kwh = if submetered && actual_kwh > 0.0 {
        actual_kwh * MONTHS_PER_YEAR
    } else if allocated_pct > 0.0 && building_kwh > 0.0 {
        building_kwh * (allocated_pct / 100.0)
    } else {
        total_onprem_kwh
    };

    ItEmissionsBreakdown {
        hardware,
        total_onprem_kwh,
        grid_factor,
        renewable_pct,
        adjusted_grid_factor,
        onprem_co2e_kg,
        cloud_provider,
        cloud_compute_kwh,
        cloud_co2e_kg,
        cooling_location,
        cooling_kwh,
        cooling_co2e_kg,
        security_overhead_co2e_kg,
        remote_overhead_kwh_per_month,
        remote_overhead_co2e_kg,
        total_co2e_kg,
        total_co2e_tons: total_co2e_kg / 1000.0,
        allocated_kwh,
    }
}

impl ItEmissionsBreakdown {
    pub fn estimate(&self) -> EmissionsEstimate {
        let mut highlights: Vec<String> = self
            .hardware
            .iter()
            .filter(|entry| entry.count > 0.0)
            .map(|entry| {
                format!(
                    "{} {} consuming {:.1} MWh/year",
                    grouped(entry.count),
                    entry.category.label(),
                    entry.annual_kwh / 1000.0
                )
            })
            .collect();

        if self.cloud_co2e_kg > 0.0 {
            highlights.push(format!(
                "{} cloud usage adding {:.1} kg CO2e/year",
                self.cloud_provider.label(),
                self.cloud_co2e_kg
            ));
        }
        if self.cooling_kwh > 0.0 {
            highlights.push(format!(
                "{} kWh/year of shared cooling allocated to IT",
                grouped(self.cooling_kwh)
            ));
        }
        if self.remote_overhead_co2e_kg > 0.0 {
            highlights.push(format!(
                "{} kWh/month remote workforce overhead",
                grouped(self.remote_overhead_kwh_per_month)
            ));
        }

        EmissionsEstimate::clamped(self.total_co2e_tons, self.total_onprem_kwh, highlights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::audit::domain::{FieldMap, FieldValue};

    fn map(entries: &[(&str, FieldValue)]) -> FieldMap {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    fn two_servers() -> FieldMap {
        map(&[
            ("it_servers_count", FieldValue::Number(2.0)),
            ("it_servers_watts", FieldValue::Number(500.0)),
            ("it_servers_hours", FieldValue::Number(24.0)),
        ])
    }

    fn close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn servers_only_matches_reference_figures() {
        let breakdown = it_breakdown(FieldReader::new(&two_servers()));

        close(breakdown.hardware[0].annual_kwh, 8760.0);
        close(breakdown.total_onprem_kwh, 8760.0);
        close(breakdown.adjusted_grid_factor, 0.42);
        close(breakdown.onprem_co2e_kg, 3679.2);
        close(breakdown.security_overhead_co2e_kg, 367.92);
        close(breakdown.cloud_co2e_kg, 0.0);
        close(breakdown.cooling_co2e_kg, 0.0);
        close(breakdown.remote_overhead_co2e_kg, 0.0);
        close(breakdown.total_co2e_tons, 4.04712);
        close(breakdown.allocated_kwh, 8760.0);

        let estimate = breakdown.estimate();
        close(estimate.co2e_tons, 4.04712);
        close(estimate.kwh, 8760.0);
        assert_eq!(estimate.highlights, vec!["2 servers consuming 8.8 MWh/year"]);
    }

    #[test]
    fn renewables_scale_every_grid_derived_term() {
        let mut fields = two_servers();
        fields.insert("it_renewable_pct".to_string(), FieldValue::Number(50.0));
        fields.insert("it_grid_factor".to_string(), FieldValue::from("0.3"));

        let breakdown = it_breakdown(FieldReader::new(&fields));
        close(breakdown.adjusted_grid_factor, 0.15);
        close(breakdown.onprem_co2e_kg, 8760.0 * 0.15);
    }

    #[test]
    fn zero_grid_factor_uses_default() {
        let mut fields = two_servers();
        fields.insert("it_grid_factor".to_string(), FieldValue::Number(0.0));

        let breakdown = it_breakdown(FieldReader::new(&fields));
        close(breakdown.grid_factor, 0.42);
    }

    #[test]
    fn cloud_rows_follow_provider() {
        let fields = map(&[
            ("it_cloud_provider", FieldValue::from("gcp")),
            ("it_cloud_compute_hours", FieldValue::Number(1000.0)),
            ("it_cloud_storage_gb", FieldValue::Number(1_000_000.0)),
            ("it_cloud_transfer_gb", FieldValue::Number(1_000_000.0)),
        ]);

        let breakdown = it_breakdown(FieldReader::new(&fields));
        close(breakdown.cloud_compute_kwh, 100.0);
        close(breakdown.cloud_co2e_kg, 100.0 * 0.42 + 0.01 + 1.25);
        close(
            breakdown.security_overhead_co2e_kg,
            breakdown.cloud_co2e_kg * 0.1,
        );
    }

    #[test]
    fn unknown_provider_uses_other_row_and_none_zeroes_usage_factors() {
        assert_eq!(CloudProvider::parse(Some("oracle")), CloudProvider::Other);
        assert_eq!(CloudProvider::parse(None), CloudProvider::None);

        let fields = map(&[
            ("it_cloud_provider", FieldValue::from("none")),
            ("it_cloud_storage_gb", FieldValue::Number(5000.0)),
            ("it_cloud_transfer_gb", FieldValue::Number(5000.0)),
        ]);
        let breakdown = it_breakdown(FieldReader::new(&fields));
        close(breakdown.cloud_co2e_kg, 0.0);
    }

    #[test]
    fn cooling_applies_only_to_shared_locations() {
        let shared = map(&[
            ("annual_electricity", FieldValue::Number(100_000.0)),
            ("it_cooling_hvac_pct", FieldValue::Number(5.0)),
        ]);
        let breakdown = it_breakdown(FieldReader::new(&shared));
        close(breakdown.cooling_kwh, 5000.0);
        close(breakdown.cooling_co2e_kg, 2100.0);
        close(breakdown.security_overhead_co2e_kg, 0.0);

        let mut dedicated = shared.clone();
        dedicated.insert(
            "it_cooling_location".to_string(),
            FieldValue::from("dedicated"),
        );
        let breakdown = it_breakdown(FieldReader::new(&dedicated));
        close(breakdown.cooling_co2e_kg, 0.0);
    }

    #[test]
    fn hybrid_and_explicit_shared_locations_allocate_cooling() {
        for location in ["hybrid", "shared_office"] {
            let fields = map(&[
                ("annual_electricity", FieldValue::Number(100_000.0)),
                ("it_cooling_hvac_pct", FieldValue::Number(5.0)),
                ("it_cooling_location", FieldValue::from(location)),
            ]);

            let breakdown = it_breakdown(FieldReader::new(&fields));
            assert!(breakdown.cooling_location.shares_building_hvac());
            close(breakdown.cooling_kwh, 5000.0);
            close(breakdown.cooling_co2e_kg, 2100.0);
            assert_eq!(
                breakdown.estimate().highlights,
                vec!["5,000 kWh/year of shared cooling allocated to IT"]
            );
        }
        assert_eq!(
            CoolingLocation::parse(Some("hybrid")),
            CoolingLocation::Hybrid
        );
    }

    #[test]
    fn every_cloud_row_prices_storage_and_transfer() {
        let rows = [
            ("aws", CloudProvider::Aws, 0.000063, 0.00000225),
            ("azure", CloudProvider::Azure, 0.000052, 0.00000175),
            ("gcp", CloudProvider::Gcp, 0.000039, 0.00000125),
            ("oracle", CloudProvider::Other, 0.00006, 0.000002),
            ("none", CloudProvider::None, 0.0, 0.0),
        ];

        for (raw, provider, compute, transfer) in rows {
            let factors = provider.factors();
            close(factors.compute, compute);
            close(factors.transfer, transfer);
            let storage = if provider == CloudProvider::None {
                0.0
            } else {
                0.00000001
            };
            close(factors.storage, storage);

            let fields = map(&[
                ("it_cloud_provider", FieldValue::from(raw)),
                ("it_cloud_compute_hours", FieldValue::Number(1000.0)),
                ("it_cloud_storage_gb", FieldValue::Number(1_000_000.0)),
                ("it_cloud_transfer_gb", FieldValue::Number(1_000_000.0)),
            ]);
            let breakdown = it_breakdown(FieldReader::new(&fields));
            assert_eq!(breakdown.cloud_provider, provider, "provider for {raw}");
            close(
                breakdown.cloud_co2e_kg,
                100.0 * 0.42 + 1_000_000.0 * storage + 1_000_000.0 * transfer,
            );
        }
    }

    #[test]
    fn remote_overhead_requires_both_inputs() {
        let only_kwh = map(&[("it_remote_overhead_kwh", FieldValue::Number(100.0))]);
        close(
            it_breakdown(FieldReader::new(&only_kwh)).remote_overhead_co2e_kg,
            0.0,
        );

        let both = map(&[
            ("it_remote_overhead_kwh", FieldValue::Number(100.0)),
            ("it_remote_workforce_pct", FieldValue::Number(40.0)),
        ]);
        let breakdown = it_breakdown(FieldReader::new(&both));
        close(breakdown.remote_overhead_co2e_kg, 100.0 * 12.0 * 0.42);
        assert_eq!(
            breakdown.estimate().highlights,
            vec!["100 kWh/month remote workforce overhead"]
        );
    }

    #[test]
    fn allocated_energy_prefers_submeter_then_share_then_onprem() {
        let mut fields = two_servers();
        fields.insert("annual_electricity".to_string(), FieldValue::Number(50_000.0));
        fields.insert("it_allocated_pct".to_string(), FieldValue::Number(10.0));
        fields.insert("it_cooling_location".to_string(), FieldValue::from("dedicated"));
        close(it_breakdown(FieldReader::new(&fields)).allocated_kwh, 5000.0);

        fields.insert("it_is_submetered".to_string(), FieldValue::from("yes"));
        fields.insert("it_actual_kwh".to_string(), FieldValue::Number(900.0));
        let breakdown = it_breakdown(FieldReader::new(&fields));
        close(breakdown.allocated_kwh, 10_800.0);
        // Display figure never feeds the emissions total.
        close(breakdown.total_co2e_tons, 4.04712);

        fields.remove("it_allocated_pct");
        fields.insert("it_actual_kwh".to_string(), FieldValue::Number(0.0));
        close(it_breakdown(FieldReader::new(&fields)).allocated_kwh, 8760.0);
    }

    #[test]
    fn empty_fields_produce_zero_estimate() {
        let estimate = it_breakdown(FieldReader::new(&FieldMap::new())).estimate();
        assert_eq!(estimate, EmissionsEstimate::default());
    }
}
