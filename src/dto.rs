//! # MoodMeal: request/response DTOs
//!
//! API contract types for the analytics and reminder routes.
//!
//! Conventions:
//! - `*Query` / `*Request` are deserialized from query strings or JSON bodies
//! - `*Response` / `*View` are serialized to the client
//! - Body validation is expressed via `validator` derive macros

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::analytics::aggregate::{MoodSummary, NamedRange};
use crate::analytics::calendar::{CalendarCell, YearMonth, WEEKDAYS};
use crate::analytics::mood::MoodCategory;
use crate::analytics::normalize::MoodEntry;
use crate::reminder::config::{Frequency, ReminderConfig, ReminderDraft, ValidationError};

// ============================================================================
// Moods
// ============================================================================

/// GET /api/moods
#[derive(Debug, Serialize)]
pub struct MoodHistoryResponse {
    pub entries: Vec<MoodEntry>,
    pub skipped: usize,
}

/// GET /api/moods/calendar
#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthRef {
    pub year: i32,
    pub month: u32,
}

impl From<YearMonth> for MonthRef {
    fn from(month: YearMonth) -> Self {
        Self {
            year: month.year(),
            month: month.month(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub title: String,
    pub year: i32,
    pub month: u32,
    pub weekdays: [&'static str; 7],
    pub rows: Vec<Vec<CalendarCell>>,
    pub previous: MonthRef,
    pub next: MonthRef,
    pub skipped: usize,
}

impl CalendarResponse {
    pub fn new(month: YearMonth, rows: Vec<Vec<CalendarCell>>, skipped: usize) -> Self {
        Self {
            title: month.title(),
            year: month.year(),
            month: month.month(),
            weekdays: WEEKDAYS,
            rows,
            previous: month.previous().into(),
            next: month.next().into(),
            skipped,
        }
    }
}

/// Shared by the summary and report views: a named preset or an explicit
/// `start`/`end` pair (ISO dates, inclusive).
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub range: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// GET /api/moods/summary
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<NamedRange>,
    #[serde(flatten)]
    pub summary: MoodSummary,
    pub skipped: usize,
}

// ============================================================================
// Meals
// ============================================================================

/// POST /api/meals/:suggestion_id/feedback
#[derive(Debug, Deserialize, Validate)]
pub struct MealFeedbackRequest {
    /// "Happy", "Sad", "Angry", "Neutral" or a category code
    #[validate(length(min = 1, max = 16, message = "Mood is required"))]
    pub mood: String,
}

#[derive(Debug, Serialize)]
pub struct MealFeedbackResponse {
    pub suggestion_id: Uuid,
    pub mood_after: MoodCategory,
}

// ============================================================================
// Reminders
// ============================================================================

fn format_trigger(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%dT%H:%M").to_string()
}

/// GET /api/reminders. The resolved form values plus the first problem
/// that would block submitting them as-is.
#[derive(Debug, Serialize)]
pub struct ReminderView {
    pub email: Option<String>,
    pub datetime: Option<String>,
    pub frequency: Frequency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<ValidationError>,
}

impl From<&ReminderDraft> for ReminderView {
    fn from(draft: &ReminderDraft) -> Self {
        Self {
            email: draft.email.clone(),
            datetime: draft.trigger_at.map(format_trigger),
            frequency: draft.frequency,
            problem: draft.validate().err(),
        }
    }
}

/// POST /api/reminders
#[derive(Debug, Serialize)]
pub struct ReminderConfirmation {
    pub status: &'static str,
    pub email: String,
    pub datetime: String,
    pub frequency: Frequency,
}

impl From<ReminderConfig> for ReminderConfirmation {
    fn from(config: ReminderConfig) -> Self {
        Self {
            status: "confirmed",
            email: config.email,
            datetime: format_trigger(config.trigger_at),
            frequency: config.frequency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_response_navigation_wraps_year() {
        let december = YearMonth::new(2024, 12).unwrap();
        let view = CalendarResponse::new(december, Vec::new(), 0);

        assert_eq!(view.title, "December 2024");
        assert_eq!(view.previous, MonthRef { year: 2024, month: 11 });
        assert_eq!(view.next, MonthRef { year: 2025, month: 1 });
    }

    #[test]
    fn test_reminder_view_reports_first_problem() {
        let draft = ReminderDraft {
            email: None,
            trigger_at: None,
            frequency: Frequency::Once,
        };
        let view = ReminderView::from(&draft);

        assert_eq!(view.problem, Some(ValidationError::MissingEmail));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["problem"], "missing_email");
        assert_eq!(json["frequency"], "once");
    }
}
