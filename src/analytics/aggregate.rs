use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::mood::{ChartBar, MoodCategory, MoodCount};
use super::normalize::MoodEntry;

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The `days` calendar days ending on `today`, both ends included.
    pub fn last_days(today: NaiveDate, days: u32) -> Self {
        let span = i64::from(days.max(1)) - 1;
        Self {
            start: today - Duration::days(span),
            end: today,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

/// Named presets offered by the summary and report views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedRange {
    Weekly,
    Monthly,
}

impl NamedRange {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "weekly" | "week" | "7" => Some(Self::Weekly),
            "monthly" | "month" | "30" => Some(Self::Monthly),
            _ => None,
        }
    }

    pub fn days(self) -> u32 {
        match self {
            Self::Weekly => 7,
            Self::Monthly => 30,
        }
    }

    pub fn window_ending(self, today: NaiveDate) -> DateWindow {
        DateWindow::last_days(today, self.days())
    }
}

/// Count entries per category inside `[start, end]`.
pub fn aggregate(entries: &[MoodEntry], start: NaiveDate, end: NaiveDate) -> MoodCount {
    let window = DateWindow::new(start, end);
    MoodCount::tally(
        entries
            .iter()
            .filter(|e| window.contains(e.occurred_on))
            .map(|e| e.category),
    )
}

#[derive(Debug, Clone, Serialize)]
pub struct MoodSummary {
    pub window: DateWindow,
    pub counts: MoodCount,
    pub chart: Vec<ChartBar>,
    pub unknown: u32,
    pub total: u32,
}

pub fn summarize(entries: &[MoodEntry], window: DateWindow) -> MoodSummary {
    let counts = aggregate(entries, window.start, window.end);
    MoodSummary {
        window,
        chart: counts.chart_series(),
        unknown: counts.get(MoodCategory::Unknown),
        total: counts.total(),
        counts,
    }
}
