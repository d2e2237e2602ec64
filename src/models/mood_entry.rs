use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::analytics::normalize::RawMoodEntry;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MoodEntryRow {
    pub mood_code: Option<String>,
    pub logged_at: DateTime<Utc>,
}

impl MoodEntryRow {
    /// Yearless `"Mar 05"` label, the shape the analytics layer consumes.
    pub fn into_raw(self) -> RawMoodEntry {
        RawMoodEntry {
            date_label: self.logged_at.format("%b %d").to_string(),
            mood: self.mood_code.unwrap_or_default().trim().to_uppercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_into_raw_uses_yearless_label_and_uppercase_mood() {
        let row = MoodEntryRow {
            mood_code: Some(" md01 ".into()),
            logged_at: Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap(),
        };

        let raw = row.into_raw();
        assert_eq!(raw.date_label, "Mar 05");
        assert_eq!(raw.mood, "MD01");
    }

    #[test]
    fn test_missing_mood_becomes_empty() {
        let row = MoodEntryRow {
            mood_code: None,
            logged_at: Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap(),
        };
        assert_eq!(row.into_raw().mood, "");
    }
}
