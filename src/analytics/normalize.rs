use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::mood::MoodCategory;

/// Mood entry as handed over by the data-access layer: a `"Mar 12"` style
/// label with no year, and the stored mood code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMoodEntry {
    pub date_label: String,
    pub mood: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoodEntry {
    pub user_id: Uuid,
    pub occurred_on: NaiveDate,
    pub category: MoodCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizationError {
    #[error("date label {0:?} is not of the form \"<Mon> <Day>\"")]
    Shape(String),

    #[error("unrecognized month abbreviation {0:?}")]
    UnknownMonth(String),

    #[error("day in {0:?} is not a valid day of that month")]
    InvalidDay(String),
}

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Parse a yearless `"<Mon> <Day>"` label, attributing it to `reference_year`.
pub fn normalize(label: &str, reference_year: i32) -> Result<NaiveDate, NormalizationError> {
    let tokens: Vec<&str> = label.split_whitespace().collect();
    let [month, day] = tokens.as_slice() else {
        return Err(NormalizationError::Shape(label.to_string()));
    };

    let month = MONTHS
        .iter()
        .position(|m| m == month)
        .map(|idx| idx as u32 + 1)
        .ok_or_else(|| NormalizationError::UnknownMonth(month.to_string()))?;

    let day: u32 = day
        .parse()
        .map_err(|_| NormalizationError::InvalidDay(label.to_string()))?;

    NaiveDate::from_ymd_opt(reference_year, month, day)
        .ok_or_else(|| NormalizationError::InvalidDay(label.to_string()))
}

#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub entries: Vec<MoodEntry>,
    pub skipped: usize,
}

/// Normalize a fetched batch. Unparsable labels are skipped and counted; a
/// bad record never fails the batch.
pub fn normalize_batch(user_id: Uuid, raw: &[RawMoodEntry], reference_year: i32) -> NormalizedBatch {
    let mut batch = NormalizedBatch {
        entries: Vec::with_capacity(raw.len()),
        skipped: 0,
    };

    for entry in raw {
        match normalize(&entry.date_label, reference_year) {
            Ok(occurred_on) => batch.entries.push(MoodEntry {
                user_id,
                occurred_on,
                category: MoodCategory::from_code(&entry.mood),
            }),
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Skipping mood entry with unparsable date");
                batch.skipped += 1;
            }
        }
    }

    if batch.skipped > 0 {
        tracing::info!(
            user_id = %user_id,
            skipped = batch.skipped,
            kept = batch.entries.len(),
            "Mood entries skipped during normalization"
        );
    }

    batch
}
