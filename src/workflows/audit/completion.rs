use super::domain::{FieldMap, FieldValue};
use serde::{Deserialize, Serialize};

/// Share of saved fields that hold a non-placeholder answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionScore {
    pub completion_pct: u8,
    pub filled_fields: usize,
    pub total_fields: usize,
}

/// Scores only the keys present in `fields`; catalog questions that were never
/// saved do not count against the total.
pub fn score_completion(fields: &FieldMap) -> CompletionScore {
    score_values(fields.values())
}

pub(crate) fn score_values<'a, I>(values: I) -> CompletionScore
where
    I: IntoIterator<Item = &'a FieldValue>,
{
    let (filled_fields, total_fields) = values
        .into_iter()
        .fold((0usize, 0usize), |(filled, total), value| {
            (filled + usize::from(value.is_answered()), total + 1)
        });

    CompletionScore {
        completion_pct: rounded_pct(filled_fields, total_fields),
        filled_fields,
        total_fields,
    }
}

/// Half-up rounding in integer arithmetic.
fn rounded_pct(filled: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }

    let filled = filled.min(total) as u128;
    let total = total as u128;
    let pct = (200 * filled + total) / (2 * total);
    pct.min(100) as u8
}
