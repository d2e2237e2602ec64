//! Month grid layout for the mood calendar.
//!
//! Weeks start on Monday. The grid is padded with blank cells before the
//! 1st and after the last day so that every row holds exactly seven cells.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use super::mood::MoodCategory;
use super::normalize::MoodEntry;

pub const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Mood categories per day, in the order the entries were fetched.
pub type DailyMoodIndex = BTreeMap<NaiveDate, Vec<MoodCategory>>;

pub fn build_daily_index(entries: &[MoodEntry]) -> DailyMoodIndex {
    let mut index = DailyMoodIndex::new();
    for entry in entries {
        index.entry(entry.occurred_on).or_default().push(entry.category);
    }
    index
}

/// A calendar month. Always holds the first day of that month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth {
    first: NaiveDate,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            first: date - Duration::days(i64::from(date.day0())),
        }
    }

    pub fn year(self) -> i32 {
        self.first.year()
    }

    pub fn month(self) -> u32 {
        self.first.month()
    }

    pub fn first_day(self) -> NaiveDate {
        self.first
    }

    /// December rolls into January of the following year. Saturates at the
    /// end of the supported date range.
    pub fn next(self) -> Self {
        let (year, month) = if self.month() == 12 {
            (self.year() + 1, 1)
        } else {
            (self.year(), self.month() + 1)
        };
        Self::new(year, month).unwrap_or(self)
    }

    /// January rolls back into December of the preceding year.
    pub fn previous(self) -> Self {
        let (year, month) = if self.month() == 1 {
            (self.year() - 1, 12)
        } else {
            (self.year(), self.month() - 1)
        };
        Self::new(year, month).unwrap_or(self)
    }

    pub fn days_in_month(self) -> u32 {
        match self.month() {
            4 | 6 | 9 | 11 => 30,
            2 if is_leap_year(self.year()) => 29,
            2 => 28,
            _ => 31,
        }
    }

    /// Blank cells before the 1st in a Monday-first week (Monday = 0).
    pub fn leading_blanks(self) -> u32 {
        self.first.weekday().num_days_from_monday()
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// e.g. "March 2024"
    pub fn title(self) -> String {
        format!("{} {}", MONTH_NAMES[self.month() as usize - 1], self.year())
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarCell {
    pub day: Option<u32>,
    pub is_current_day: bool,
    pub icons: Vec<&'static str>,
}

impl CalendarCell {
    fn blank() -> Self {
        Self {
            day: None,
            is_current_day: false,
            icons: Vec::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.day.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarGrid {
    pub rows: Vec<Vec<CalendarCell>>,
}

impl CalendarGrid {
    pub fn cells(&self) -> impl Iterator<Item = &CalendarCell> {
        self.rows.iter().flatten()
    }
}

pub fn build(month: YearMonth, index: &DailyMoodIndex, today: NaiveDate) -> CalendarGrid {
    let leading = month.leading_blanks() as usize;
    let days = month.days_in_month();

    let mut cells: Vec<CalendarCell> = Vec::with_capacity(42);
    cells.extend(std::iter::repeat_with(CalendarCell::blank).take(leading));

    for day in 1..=days {
        let date = month.first_day() + Duration::days(i64::from(day - 1));
        let icons = index
            .get(&date)
            .map(|moods| moods.iter().map(|m| m.glyph()).collect())
            .unwrap_or_default();

        cells.push(CalendarCell {
            day: Some(day),
            is_current_day: date == today,
            icons,
        });
    }

    let trailing = (7 - cells.len() % 7) % 7;
    cells.extend(std::iter::repeat_with(CalendarCell::blank).take(trailing));

    CalendarGrid {
        rows: cells.chunks(7).map(<[CalendarCell]>::to_vec).collect(),
    }
}
