use chrono::{Duration, NaiveDateTime};

use super::config::Frequency;

/// When a reminder fires again after `trigger_at`. One-off reminders never
/// recur.
pub fn next_occurrence(trigger_at: NaiveDateTime, frequency: Frequency) -> Option<NaiveDateTime> {
    match frequency {
        Frequency::Once => None,
        Frequency::Daily => trigger_at.checked_add_signed(Duration::days(1)),
        Frequency::Weekly => trigger_at.checked_add_signed(Duration::days(7)),
    }
}
