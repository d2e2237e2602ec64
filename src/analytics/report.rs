use chrono::{DateTime, NaiveDate, Utc};
use serde::{Serialize, Serializer};
use uuid::Uuid;

use super::aggregate::DateWindow;
use super::mood::{ChartBar, MoodCategory, MoodCount};

pub const UNKNOWN_FOOD_NAME: &str = "Unknown Food";
pub const DEFAULT_FOOD_IMAGE: &str = "/images/default_food.png";

/// A suggested meal the user marked as eaten, with the mood that prompted
/// the suggestion and the mood reported afterwards (if any yet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealRecord {
    pub food_id: Uuid,
    pub suggestion_id: Uuid,
    pub food_name: Option<String>,
    pub image_url: Option<String>,
    pub consumed_at: DateTime<Utc>,
    pub mood_before: MoodCategory,
    pub mood_after: Option<MoodCategory>,
}

/// Post-meal mood as shown in the report; `Pending` until feedback arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodAfter {
    Recorded(MoodCategory),
    Pending,
}

impl MoodAfter {
    pub const PENDING_LABEL: &'static str = "pending";

    pub fn label(self) -> &'static str {
        match self {
            Self::Recorded(mood) => mood.label(),
            Self::Pending => Self::PENDING_LABEL,
        }
    }
}

impl From<Option<MoodCategory>> for MoodAfter {
    fn from(mood: Option<MoodCategory>) -> Self {
        mood.map(Self::Recorded).unwrap_or(Self::Pending)
    }
}

impl Serialize for MoodAfter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub food_image: String,
    pub food_name: String,
    #[serde(serialize_with = "serialize_minutes")]
    pub consumed_at: DateTime<Utc>,
    pub mood_before: MoodCategory,
    pub mood_after: MoodAfter,
}

fn serialize_minutes<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&at.format("%Y-%m-%d %H:%M"))
}

#[derive(Debug, Clone, Serialize)]
pub struct MealReport {
    pub window: DateWindow,
    pub rows: Vec<ReportRow>,
    pub total_meals: usize,
    pub before_counts: MoodCount,
    pub after_counts: MoodCount,
    pub before_chart: Vec<ChartBar>,
    pub after_chart: Vec<ChartBar>,
}

/// Pair each meal eaten in `[start, end]` with its before/after mood.
///
/// Rows come out oldest first; meals sharing a timestamp keep their input
/// order. A meal without post-meal feedback stays in the report as
/// `pending` and is left out of `after_counts` only.
pub fn build_report(meals: &[MealRecord], start: NaiveDate, end: NaiveDate) -> MealReport {
    let window = DateWindow::new(start, end);

    let mut eaten: Vec<&MealRecord> = meals
        .iter()
        .filter(|m| window.contains(m.consumed_at.date_naive()))
        .collect();
    eaten.sort_by_key(|m| m.consumed_at);

    let before_counts = MoodCount::tally(eaten.iter().map(|m| m.mood_before));
    let after_counts = MoodCount::tally(eaten.iter().filter_map(|m| m.mood_after));

    let rows: Vec<ReportRow> = eaten
        .into_iter()
        .map(|m| ReportRow {
            food_image: m
                .image_url
                .clone()
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FOOD_IMAGE.to_string()),
            food_name: m
                .food_name
                .clone()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_FOOD_NAME.to_string()),
            consumed_at: m.consumed_at,
            mood_before: m.mood_before,
            mood_after: m.mood_after.into(),
        })
        .collect();

    MealReport {
        window,
        total_meals: rows.len(),
        rows,
        before_chart: before_counts.chart_series(),
        after_chart: after_counts.chart_series(),
        before_counts,
        after_counts,
    }
}
