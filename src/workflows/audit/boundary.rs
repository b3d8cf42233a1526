//! Auto-generated texts for the organizational boundary section.

use super::domain::{FieldMap, FieldValue};

pub const KEY_NOTES_PROMPT: &str = "Fill in Consolidation Approach, Facilities, Employees, \
    and Location to auto-generate notes here.";

const KEY_NOTES_FIELD: &str = "key_notes";
const JUSTIFICATION_FIELD: &str = "justification";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsolidationApproach {
    Equity,
    Control,
    Financial,
}

impl ConsolidationApproach {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "equity" => Some(Self::Equity),
            "control" => Some(Self::Control),
            "financial" => Some(Self::Financial),
            _ => None,
        }
    }

    const fn approach_name(self) -> &'static str {
        match self {
            Self::Equity => "Equity Share",
            Self::Control => "Operational Control",
            Self::Financial => "Financial Control",
        }
    }

    const fn rationale(self) -> &'static str {
        match self {
            Self::Equity => {
                "to account for greenhouse gas emissions in proportion to the organization's \
                 ownership interests in relevant entities. This approach reflects the \
                 organization's share of risks and benefits associated with its equity \
                 investments, in accordance with the GHG Protocol Corporate Standard."
            }
            Self::Control => {
                "to account for greenhouse gas emissions from all entities over which it has \
                 operational control, regardless of ownership percentage. This approach aligns \
                 with the organization's management structure and operational decision-making \
                 authority, in accordance with the GHG Protocol Corporate Standard."
            }
            Self::Financial => {
                "to account for greenhouse gas emissions from all entities over which it has \
                 financial control, typically those in which it has majority ownership or voting \
                 rights. This approach reflects the organization's financial consolidation \
                 methodology used in corporate accounting and reporting practices."
            }
        }
    }
}

/// Summary line built from the boundary answers, or a prompt when none are set.
pub fn key_notes(fields: &FieldMap) -> String {
    generated_key_notes(fields).unwrap_or_else(|| KEY_NOTES_PROMPT.to_string())
}

/// Fills `key_notes` and `justification` when they are unanswered and enough boundary
/// answers exist to generate them. Returns the ids that were filled.
pub fn fill_generated_texts(fields: &mut FieldMap) -> Vec<&'static str> {
    let mut filled = Vec::new();
    let candidates = [
        (KEY_NOTES_FIELD, generated_key_notes(fields)),
        (JUSTIFICATION_FIELD, consolidation_justification(fields)),
    ];
    for (id, generated) in candidates {
        let Some(generated) = generated else {
            continue;
        };
        if fields.get(id).map_or(false, FieldValue::is_answered) {
            continue;
        }
        fields.insert(id.to_string(), FieldValue::Text(generated));
        filled.push(id);
    }
    filled
}

fn generated_key_notes(fields: &FieldMap) -> Option<String> {
    let mut parts = Vec::new();

    if let Some(consolidation) = text(fields, "consolidation") {
        parts.push(format!("Consolidation: {}", capitalize(&consolidation)));
    }
    if let Some(facilities) = text(fields, "facility_count") {
        parts.push(format!("Facilities: {facilities}"));
    }
    if let Some(employees) = text(fields, "total_employees") {
        parts.push(format!("Employees: {employees}"));
    }
    if let Some(location) = text(fields, "primary_location") {
        parts.push(format!("Location: {location}"));
    }

    if parts.is_empty() {
        return None;
    }

    Some(format!(
        "{}. Review and adjust these notes as needed for completeness.",
        parts.join(" | ")
    ))
}

/// GHG Protocol justification for the chosen consolidation approach. `None` until the
/// approach, responsible person, and role are all answered.
pub fn consolidation_justification(fields: &FieldMap) -> Option<String> {
    let approach =
        text(fields, "consolidation").and_then(|value| ConsolidationApproach::parse(&value))?;
    let name = text(fields, "consolidation_responsible_name")?;
    let role = text(fields, "consolidation_person_role")?;

    Some(format!(
        "The organization's designated responsible person, {name}, acting in the role of \
         {role}, selected the {} consolidation approach {}",
        approach.approach_name(),
        approach.rationale()
    ))
}

fn text(fields: &FieldMap, id: &str) -> Option<String> {
    let value = match fields.get(id)? {
        FieldValue::Text(value) => value.trim().to_string(),
        FieldValue::Number(value) if value.fract() == 0.0 => format!("{value:.0}"),
        FieldValue::Number(value) => value.to_string(),
        FieldValue::Null | FieldValue::Flag(_) | FieldValue::Multi(_) => return None,
    };
    (!value.is_empty()).then_some(value)
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
