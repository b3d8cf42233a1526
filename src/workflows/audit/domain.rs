use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Closed set of departments an organization can audit, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    Manufacturing,
    Warehouse,
    Office,
    It,
    Kitchen,
    Retail,
    Maintenance,
    Transportation,
    ColdStorage,
    Laboratory,
    Showroom,
}

impl Department {
    pub const COUNT: usize = 11;

    pub const fn ordered() -> [Self; Self::COUNT] {
        [
            Self::Manufacturing,
            Self::Warehouse,
            Self::Office,
            Self::It,
            Self::Kitchen,
            Self::Retail,
            Self::Maintenance,
            Self::Transportation,
            Self::ColdStorage,
            Self::Laboratory,
            Self::Showroom,
        ]
    }

    /// Stable identifier shared with stored records.
    pub const fn id(self) -> &'static str {
        match self {
            Self::Manufacturing => "manufacturing",
            Self::Warehouse => "warehouse",
            Self::Office => "office",
            Self::It => "it",
            Self::Kitchen => "kitchen",
            Self::Retail => "retail",
            Self::Maintenance => "maintenance",
            Self::Transportation => "transportation",
            Self::ColdStorage => "cold_storage",
            Self::Laboratory => "laboratory",
            Self::Showroom => "showroom",
        }
    }

    /// Id with the first letter capitalized and underscores replaced by spaces.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Manufacturing => "Manufacturing",
            Self::Warehouse => "Warehouse",
            Self::Office => "Office",
            Self::It => "It",
            Self::Kitchen => "Kitchen",
            Self::Retail => "Retail",
            Self::Maintenance => "Maintenance",
            Self::Transportation => "Transportation",
            Self::ColdStorage => "Cold storage",
            Self::Laboratory => "Laboratory",
            Self::Showroom => "Showroom",
        }
    }

    pub fn from_id(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ordered()
            .into_iter()
            .find(|department| department.id().eq_ignore_ascii_case(value))
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// A single saved answer. Multi-select answers are always an array, possibly empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Flag(bool),
    Number(f64),
    Text(String),
    Multi(Vec<String>),
}

impl FieldValue {
    /// Zero, `"0"`, blank text, null, and empty selections all count as unanswered.
    pub fn is_answered(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Flag(_) => true,
            FieldValue::Number(value) => *value != 0.0,
            FieldValue::Text(value) => {
                let trimmed = value.trim();
                !trimmed.is_empty() && trimmed != "0"
            }
            FieldValue::Multi(values) => !values.is_empty(),
        }
    }

    /// Lenient numeric read; anything missing or non-numeric is `0.0`.
    pub fn as_number(&self) -> f64 {
        let value = match self {
            FieldValue::Number(value) => *value,
            FieldValue::Text(value) => value.trim().parse::<f64>().unwrap_or(0.0),
            FieldValue::Null | FieldValue::Flag(_) | FieldValue::Multi(_) => 0.0,
        };

        if value.is_finite() {
            value
        } else {
            0.0
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::Multi(values)
    }
}

/// Field id to saved answer, exactly as persisted (never padded to the catalog).
pub type FieldMap = BTreeMap<String, FieldValue>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditRecordId(pub String);

/// Saved answers for one department of one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AuditRecordId>,
    pub company_id: CompanyId,
    pub department: Department,
    #[serde(default)]
    pub fields: FieldMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AuditRecord {
    pub fn new(company_id: CompanyId, department: Department, fields: FieldMap) -> Self {
        Self {
            id: None,
            company_id,
            department,
            fields,
            updated_at: None,
        }
    }
}

/// Row shown in the audit manager for every saved department.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditRecordSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<AuditRecordId>,
    pub department: Department,
    pub label: &'static str,
    pub completion_pct: u8,
    pub filled_fields: usize,
    pub total_fields: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Company and contact details printed on the report's second page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyField {
    Name,
    Address,
    City,
    Postal,
    Country,
    Website,
    ContactName,
    ContactPhone,
    ContactEmail,
}

impl CompanyField {
    pub const fn ordered() -> [Self; 9] {
        [
            Self::Name,
            Self::Address,
            Self::City,
            Self::Postal,
            Self::Country,
            Self::Website,
            Self::ContactName,
            Self::ContactPhone,
            Self::ContactEmail,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Address => "address",
            Self::City => "city",
            Self::Postal => "postal",
            Self::Country => "country",
            Self::Website => "website",
            Self::ContactName => "contact_name",
            Self::ContactPhone => "contact_phone",
            Self::ContactEmail => "contact_email",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Company Name",
            Self::Address => "Address",
            Self::City => "City",
            Self::Postal => "Postal Code",
            Self::Country => "Country",
            Self::Website => "Website",
            Self::ContactName => "Contact Name",
            Self::ContactPhone => "Phone",
            Self::ContactEmail => "Email",
        }
    }

    pub const fn is_contact(self) -> bool {
        matches!(
            self,
            Self::ContactName | Self::ContactPhone | Self::ContactEmail
        )
    }

    pub fn from_key(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ordered()
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(value))
    }
}

impl CompanyInfo {
    /// Blank strings are reported as absent.
    pub fn get(&self, field: CompanyField) -> Option<&str> {
        let value = match field {
            CompanyField::Name => &self.name,
            CompanyField::Address => &self.address,
            CompanyField::City => &self.city,
            CompanyField::Postal => &self.postal,
            CompanyField::Country => &self.country,
            CompanyField::Website => &self.website,
            CompanyField::ContactName => &self.contact_name,
            CompanyField::ContactPhone => &self.contact_phone,
            CompanyField::ContactEmail => &self.contact_email,
        };

        value
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn set(&mut self, field: CompanyField, value: impl Into<String>) {
        let value = Some(value.into());
        match field {
            CompanyField::Name => self.name = value,
            CompanyField::Address => self.address = value,
            CompanyField::City => self.city = value,
            CompanyField::Postal => self.postal = value,
            CompanyField::Country => self.country = value,
            CompanyField::Website => self.website = value,
            CompanyField::ContactName => self.contact_name = value,
            CompanyField::ContactPhone => self.contact_phone = value,
            CompanyField::ContactEmail => self.contact_email = value,
        }
    }
}

/// Emissions estimate for one department.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmissionsEstimate {
    pub co2e_tons: f64,
    pub kwh: f64,
    #[serde(default)]
    pub highlights: Vec<String>,
}

impl EmissionsEstimate {
    /// Negative or non-finite intermediates from malformed input collapse to zero.
    pub fn clamped(co2e_tons: f64, kwh: f64, highlights: Vec<String>) -> Self {
        Self {
            co2e_tons: non_negative(co2e_tons),
            kwh: non_negative(kwh),
            highlights,
        }
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derived_label(id: &str) -> String {
        let mut chars = id.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>().replace('_', " "),
            None => String::new(),
        }
    }

    #[test]
    fn labels_follow_id_derivation() {
        for department in Department::ordered() {
            assert_eq!(department.label(), derived_label(department.id()));
        }
    }

    #[test]
    fn department_ids_round_trip_through_serde() {
        for department in Department::ordered() {
            let json = serde_json::to_string(&department).expect("serializes");
            assert_eq!(json, format!("\"{}\"", department.id()));
            assert_eq!(Department::from_id(department.id()), Some(department));
        }
        assert_eq!(Department::from_id("parking"), None);
    }

    #[test]
    fn field_values_deserialize_untagged() {
        let fields: FieldMap = serde_json::from_str(
            r#"{"a": null, "b": 12.5, "c": "text", "d": ["x", "y"], "e": [], "f": true}"#,
        )
        .expect("field map parses");

        assert_eq!(fields["a"], FieldValue::Null);
        assert_eq!(fields["b"], FieldValue::Number(12.5));
        assert_eq!(fields["c"], FieldValue::Text("text".to_string()));
        assert_eq!(
            fields["d"],
            FieldValue::Multi(vec!["x".to_string(), "y".to_string()])
        );
        assert_eq!(fields["e"], FieldValue::Multi(Vec::new()));
        assert_eq!(fields["f"], FieldValue::Flag(true));
    }

    #[test]
    fn numeric_reads_never_fail() {
        assert_eq!(FieldValue::from(" 42.5 ").as_number(), 42.5);
        assert_eq!(FieldValue::from("n/a").as_number(), 0.0);
        assert_eq!(FieldValue::from("NaN").as_number(), 0.0);
        assert_eq!(FieldValue::Null.as_number(), 0.0);
        assert_eq!(FieldValue::Multi(vec!["5".to_string()]).as_number(), 0.0);
    }

    #[test]
    fn blank_company_fields_read_as_absent() {
        let mut info = CompanyInfo {
            name: Some("  ".to_string()),
            ..CompanyInfo::default()
        };
        assert_eq!(info.get(CompanyField::Name), None);

        info.set(CompanyField::Name, "Northwind Foods");
        assert_eq!(info.get(CompanyField::Name), Some("Northwind Foods"));
    }

    #[test]
    fn estimates_clamp_negative_output() {
        let estimate = EmissionsEstimate::clamped(-1.5, f64::NAN, Vec::new());
        assert_eq!(estimate.co2e_tons, 0.0);
        assert_eq!(estimate.kwh, 0.0);
    }
}
