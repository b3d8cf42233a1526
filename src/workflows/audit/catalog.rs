use super::domain::{Department, FieldMap, FieldValue};
use super::emissions::model_field_ids;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Text,
    Number,
    Select,
    Textarea,
    MultiSelect,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: QuestionKind,
    /// `None` applies to every department.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<Department>,
    pub options: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
}

impl Question {
    fn new(id: &'static str, label: &'static str, kind: QuestionKind) -> Self {
        Self {
            id,
            label,
            kind,
            department: None,
            options: &[],
            min: None,
            max: None,
            unit: None,
        }
    }

    fn text(id: &'static str, label: &'static str) -> Self {
        Self::new(id, label, QuestionKind::Text)
    }

    fn textarea(id: &'static str, label: &'static str) -> Self {
        Self::new(id, label, QuestionKind::Textarea)
    }

    fn number(id: &'static str, label: &'static str, unit: &'static str) -> Self {
        Self {
            min: Some(0.0),
            unit: Some(unit),
            ..Self::new(id, label, QuestionKind::Number)
        }
    }

    fn percent(id: &'static str, label: &'static str) -> Self {
        Self::number(id, label, "%").bounded(0.0, 100.0)
    }

    fn select(id: &'static str, label: &'static str, options: &'static [&'static str]) -> Self {
        Self {
            options,
            ..Self::new(id, label, QuestionKind::Select)
        }
    }

    fn multi(id: &'static str, label: &'static str, options: &'static [&'static str]) -> Self {
        Self {
            options,
            ..Self::new(id, label, QuestionKind::MultiSelect)
        }
    }

    fn bounded(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    fn only(mut self, department: Department) -> Self {
        self.department = Some(department);
        self
    }

    pub fn applies_to(&self, department: Department) -> bool {
        self.department.map_or(true, |only| only == department)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub id: &'static str,
    pub title: &'static str,
    pub questions: Vec<&'static str>,
}

/// Sidebar grouping of sections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavGroup {
    pub id: &'static str,
    pub title: &'static str,
    pub sections: Vec<&'static str>,
}

/// Section with the questions that apply to one department.
#[derive(Debug, Clone, Serialize)]
pub struct SectionView<'a> {
    pub id: &'static str,
    pub title: &'static str,
    pub group: &'static str,
    pub questions: Vec<&'a Question>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("question '{0}' is declared more than once")]
    DuplicateQuestion(&'static str),
    #[error("section '{0}' is declared more than once")]
    DuplicateSection(&'static str),
    #[error("section '{section}' references unknown question '{question}'")]
    UnknownQuestion {
        section: &'static str,
        question: &'static str,
    },
    #[error("group '{group}' references unknown section '{section}'")]
    UnknownSection {
        group: &'static str,
        section: &'static str,
    },
    #[error("question '{0}' is not placed in exactly one section")]
    UnplacedQuestion(&'static str),
    #[error("section '{0}' is not placed in exactly one group")]
    UnplacedSection(&'static str),
    #[error("choice question '{0}' has no options")]
    MissingOptions(&'static str),
    #[error("question '{0}' has a minimum above its maximum")]
    InvalidBounds(&'static str),
    #[error("emissions model reads '{0}' but no question declares it")]
    MissingModelField(&'static str),
}

/// Immutable registry of groups, sections, and questions.
#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    groups: Vec<NavGroup>,
    sections: Vec<Section>,
    questions: Vec<Question>,
}

impl QuestionCatalog {
    /// Builds and validates the standard catalog; call once at startup.
    pub fn load() -> Result<Self, CatalogError> {
        let catalog = Self::standard();
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn standard() -> Self {
        Self::from_parts(standard_groups(), standard_sections(), standard_questions())
    }

    pub fn from_parts(
        groups: Vec<NavGroup>,
        sections: Vec<Section>,
        questions: Vec<Question>,
    ) -> Self {
        Self {
            groups,
            sections,
            questions,
        }
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut question_ids = HashSet::new();
        for question in &self.questions {
            if !question_ids.insert(question.id) {
                return Err(CatalogError::DuplicateQuestion(question.id));
            }
            let is_choice = matches!(
                question.kind,
                QuestionKind::Select | QuestionKind::MultiSelect
            );
            if is_choice && question.options.is_empty() {
                return Err(CatalogError::MissingOptions(question.id));
            }
            if let (Some(min), Some(max)) = (question.min, question.max) {
                if min > max {
                    return Err(CatalogError::InvalidBounds(question.id));
                }
            }
        }

        let mut section_ids = HashSet::new();
        for section in &self.sections {
            if !section_ids.insert(section.id) {
                return Err(CatalogError::DuplicateSection(section.id));
            }
            if let Some(question) = section
                .questions
                .iter()
                .copied()
                .find(|question| !question_ids.contains(question))
            {
                return Err(CatalogError::UnknownQuestion {
                    section: section.id,
                    question,
                });
            }
        }

        for group in &self.groups {
            if let Some(section) = group
                .sections
                .iter()
                .copied()
                .find(|section| !section_ids.contains(section))
            {
                return Err(CatalogError::UnknownSection {
                    group: group.id,
                    section,
                });
            }
        }

        for question in &self.questions {
            let placements = self
                .sections
                .iter()
                .flat_map(|section| section.questions.iter())
                .filter(|id| **id == question.id)
                .count();
            if placements != 1 {
                return Err(CatalogError::UnplacedQuestion(question.id));
            }
        }

        for section in &self.sections {
            let placements = self
                .groups
                .iter()
                .flat_map(|group| group.sections.iter())
                .filter(|id| **id == section.id)
                .count();
            if placements != 1 {
                return Err(CatalogError::UnplacedSection(section.id));
            }
        }

        if let Some(missing) = model_field_ids()
            .into_iter()
            .find(|id| !question_ids.contains(id))
        {
            return Err(CatalogError::MissingModelField(missing));
        }

        Ok(())
    }

    pub fn departments(&self) -> [Department; Department::COUNT] {
        Department::ordered()
    }

    pub fn groups(&self) -> &[NavGroup] {
        &self.groups
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    pub fn questions_for(&self, department: Department) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|question| question.applies_to(department))
            .collect()
    }

    /// Sections in navigation order, dropping any with no applicable question.
    pub fn sections_for(&self, department: Department) -> Vec<SectionView<'_>> {
        self.groups
            .iter()
            .flat_map(|group| group.sections.iter().map(move |id| (group.id, *id)))
            .filter_map(|(group, id)| {
                let section = self.sections.iter().find(|section| section.id == id)?;
                let questions: Vec<&Question> = section
                    .questions
                    .iter()
                    .filter_map(|question| self.question(question))
                    .filter(|question| question.applies_to(department))
                    .collect();
                (!questions.is_empty()).then_some(SectionView {
                    id: section.id,
                    title: section.title,
                    group,
                    questions,
                })
            })
            .collect()
    }

    /// Number of questions declared for the department, independent of what was saved.
    pub fn declared_field_count(&self, department: Department) -> usize {
        self.questions_for(department).len()
    }

    /// Ensures every applicable multi-select question is present as an array, so an
    /// unselected field is stored as `[]` rather than omitted.
    pub fn materialize_multi_selects(&self, department: Department, fields: &mut FieldMap) {
        for question in self.questions_for(department) {
            if question.kind != QuestionKind::MultiSelect {
                continue;
            }
            let entry = fields
                .entry(question.id.to_string())
                .or_insert_with(|| FieldValue::Multi(Vec::new()));
            *entry = match std::mem::replace(entry, FieldValue::Null) {
                FieldValue::Multi(values) => FieldValue::Multi(values),
                FieldValue::Text(value) if !value.trim().is_empty() => {
                    FieldValue::Multi(vec![value.trim().to_string()])
                }
                _ => FieldValue::Multi(Vec::new()),
            };
        }
    }
}

const YES_NO: &[&str] = &["yes", "no"];

fn standard_groups() -> Vec<NavGroup> {
    vec![
        NavGroup {
            id: "g1",
            title: "Organization & Boundary",
            sections: vec!["sec_boundary", "sec_profile"],
        },
        NavGroup {
            id: "g2",
            title: "Energy & Buildings",
            sections: vec!["sec_energy", "sec_hvac"],
        },
        NavGroup {
            id: "g3",
            title: "Operations",
            sections: vec!["sec_equipment", "sec_fleet", "sec_waste"],
        },
        NavGroup {
            id: "g4",
            title: "IT Infrastructure",
            sections: vec![
                "sec_it_hardware",
                "sec_it_energy",
                "sec_it_cloud",
                "sec_it_cooling",
                "sec_it_workforce",
            ],
        },
    ]
}

fn standard_sections() -> Vec<Section> {
    let mut it_hardware = Vec::new();
    for category in super::emissions::HardwareCategory::ordered() {
        it_hardware.push(category.count_field());
        it_hardware.push(category.watts_field());
        it_hardware.push(category.hours_field());
    }

    vec![
        Section {
            id: "sec_boundary",
            title: "Organizational Boundary",
            questions: vec![
                "consolidation",
                "consolidation_responsible_name",
                "consolidation_person_role",
                "justification",
            ],
        },
        Section {
            id: "sec_profile",
            title: "Organization Profile",
            questions: vec![
                "facility_count",
                "total_employees",
                "primary_location",
                "reporting_year",
                "key_notes",
            ],
        },
        Section {
            id: "sec_energy",
            title: "Energy Consumption",
            questions: vec![
                "annual_electricity",
                "annual_natural_gas",
                "electricity_supplier",
                "renewable_contract",
                "energy_sources",
            ],
        },
        Section {
            id: "sec_hvac",
            title: "Heating, Ventilation & Refrigerants",
            questions: vec![
                "hvac_system_type",
                "hvac_age_years",
                "refrigerant_types",
                "refrigerant_recharge_kg",
            ],
        },
        Section {
            id: "sec_equipment",
            title: "Equipment & Processes",
            questions: vec![
                "production_equipment",
                "compressed_air",
                "kitchen_appliances",
                "refrigerated_units",
                "fume_hood_count",
                "display_lighting_kw",
            ],
        },
        Section {
            id: "sec_fleet",
            title: "Fleet & Logistics",
            questions: vec![
                "fleet_vehicle_count",
                "fleet_fuel_types",
                "fleet_annual_fuel_litres",
                "forklift_count",
            ],
        },
        Section {
            id: "sec_waste",
            title: "Procurement & Waste",
            questions: vec![
                "waste_streams",
                "annual_waste_tonnes",
                "recycling_rate_pct",
                "supplier_sustainability_policy",
            ],
        },
        Section {
            id: "sec_it_hardware",
            title: "On-Premises Hardware",
            questions: it_hardware,
        },
        Section {
            id: "sec_it_energy",
            title: "IT Energy & Metering",
            questions: vec![
                "it_grid_factor",
                "it_renewable_pct",
                "it_is_submetered",
                "it_actual_kwh",
                "it_allocated_pct",
            ],
        },
        Section {
            id: "sec_it_cloud",
            title: "Cloud Services",
            questions: vec![
                "it_cloud_provider",
                "it_cloud_compute_hours",
                "it_cloud_storage_gb",
                "it_cloud_transfer_gb",
            ],
        },
        Section {
            id: "sec_it_cooling",
            title: "IT Cooling",
            questions: vec!["it_cooling_location", "it_cooling_hvac_pct"],
        },
        Section {
            id: "sec_it_workforce",
            title: "Remote Workforce",
            questions: vec!["it_remote_workforce_pct", "it_remote_overhead_kwh"],
        },
    ]
}

fn standard_questions() -> Vec<Question> {
    use Department::*;

    let mut questions = vec![
        Question::select(
            "consolidation",
            "Consolidation approach",
            &["equity", "control", "financial"],
        ),
        Question::text("consolidation_responsible_name", "Responsible person"),
        Question::text("consolidation_person_role", "Responsible person's role"),
        Question::textarea("justification", "Consolidation justification"),
        Question::number("facility_count", "Number of facilities", "facilities"),
        Question::number("total_employees", "Total employees", "employees"),
        Question::text("primary_location", "Primary location"),
        Question::number("reporting_year", "Reporting year", "year").bounded(2000.0, 2100.0),
        Question::textarea("key_notes", "Key notes"),
        Question::number("annual_electricity", "Annual electricity consumption", "kWh"),
        Question::number("annual_natural_gas", "Annual natural gas consumption", "m³"),
        Question::text("electricity_supplier", "Electricity supplier"),
        Question::select("renewable_contract", "Renewable energy contract", YES_NO),
        Question::multi(
            "energy_sources",
            "Energy sources on site",
            &[
                "grid",
                "solar",
                "wind",
                "diesel_generator",
                "natural_gas",
                "district_heating",
            ],
        ),
        Question::select(
            "hvac_system_type",
            "HVAC system type",
            &["central", "split", "heat_pump", "rooftop", "none"],
        ),
        Question::number("hvac_age_years", "HVAC system age", "years"),
        Question::multi(
            "refrigerant_types",
            "Refrigerants in use",
            &["R-410A", "R-32", "R-134a", "R-22", "R-744", "R-717"],
        ),
        Question::number("refrigerant_recharge_kg", "Annual refrigerant recharge", "kg"),
        Question::multi(
            "production_equipment",
            "Production equipment",
            &["cnc", "furnace", "boiler", "injection_molding", "paint_line"],
        )
        .only(Manufacturing),
        Question::select("compressed_air", "Compressed air system", YES_NO).only(Manufacturing),
        Question::multi(
            "kitchen_appliances",
            "Kitchen appliances",
            &["gas_range", "electric_range", "fryer", "dishwasher", "walk_in_cooler"],
        )
        .only(Kitchen),
        Question::number("refrigerated_units", "Refrigerated storage units", "units")
            .only(ColdStorage),
        Question::number("fume_hood_count", "Fume hoods", "hoods").only(Laboratory),
        Question::number("display_lighting_kw", "Display lighting load", "kW").only(Showroom),
        Question::number("fleet_vehicle_count", "Fleet vehicles", "vehicles").only(Transportation),
        Question::multi(
            "fleet_fuel_types",
            "Fleet fuel types",
            &["diesel", "gasoline", "electric", "hybrid", "cng"],
        )
        .only(Transportation),
        Question::number("fleet_annual_fuel_litres", "Annual fleet fuel", "L").only(Transportation),
        Question::number("forklift_count", "Forklifts", "forklifts").only(Warehouse),
        Question::multi(
            "waste_streams",
            "Waste streams",
            &["landfill", "recycling", "compost", "hazardous", "e_waste"],
        ),
        Question::number("annual_waste_tonnes", "Annual waste", "t"),
        Question::percent("recycling_rate_pct", "Recycling rate"),
        Question::select(
            "supplier_sustainability_policy",
            "Supplier sustainability policy",
            YES_NO,
        )
        .only(Retail),
    ];

    for category in super::emissions::HardwareCategory::ordered() {
        questions.push(hardware_question(category.count_field(), "units").only(It));
        questions.push(hardware_question(category.watts_field(), "W").only(It));
        questions.push(
            hardware_question(category.hours_field(), "h/day")
                .bounded(0.0, 24.0)
                .only(It),
        );
    }

    questions.extend([
        Question::number("it_grid_factor", "Grid emission factor", "kg CO2e/kWh").only(It),
        Question::percent("it_renewable_pct", "Renewable electricity share").only(It),
        Question::select("it_is_submetered", "IT load is submetered", YES_NO).only(It),
        Question::number("it_actual_kwh", "Metered IT consumption", "kWh/month").only(It),
        Question::percent("it_allocated_pct", "IT share of building electricity").only(It),
        Question::select(
            "it_cloud_provider",
            "Primary cloud provider",
            &["aws", "azure", "gcp", "other", "none"],
        )
        .only(It),
        Question::number("it_cloud_compute_hours", "Cloud compute hours", "h/year").only(It),
        Question::number("it_cloud_storage_gb", "Cloud storage", "GB").only(It),
        Question::number("it_cloud_transfer_gb", "Cloud data transfer", "GB/year").only(It),
        Question::select(
            "it_cooling_location",
            "Where is IT equipment cooled?",
            &["shared_office", "hybrid", "dedicated"],
        )
        .only(It),
        Question::percent("it_cooling_hvac_pct", "Share of building HVAC used for IT").only(It),
        Question::percent("it_remote_workforce_pct", "Remote workforce share").only(It),
        Question::number(
            "it_remote_overhead_kwh",
            "Remote work energy overhead",
            "kWh/month",
        )
        .only(It),
    ]);

    questions
}

fn hardware_question(id: &'static str, unit: &'static str) -> Question {
    let label = match id {
        "it_servers_count" => "Servers",
        "it_servers_watts" => "Average server power",
        "it_servers_hours" => "Server hours per day",
        "it_desktops_count" => "Desktops",
        "it_desktops_watts" => "Average desktop power",
        "it_desktops_hours" => "Desktop hours per day",
        "it_laptops_count" => "Laptops",
        "it_laptops_watts" => "Average laptop power",
        "it_laptops_hours" => "Laptop hours per day",
        "it_monitors_count" => "Monitors",
        "it_monitors_watts" => "Average monitor power",
        "it_monitors_hours" => "Monitor hours per day",
        "it_network_count" => "Network devices",
        "it_network_watts" => "Average network device power",
        "it_network_hours" => "Network device hours per day",
        _ => id,
    };
    Question::number(id, label, unit)
}
