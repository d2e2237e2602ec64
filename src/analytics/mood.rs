use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Mood categories recorded by the logging flow, plus a catch-all for
/// anything that cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MoodCategory {
    Happy,
    Sad,
    Angry,
    Neutral,
    Unknown,
}

impl MoodCategory {
    /// Categories that get a bar in charts, in display order.
    pub const CHARTED: [MoodCategory; 4] = [
        MoodCategory::Happy,
        MoodCategory::Sad,
        MoodCategory::Angry,
        MoodCategory::Neutral,
    ];

    /// Resolve a stored mood value. Accepts category codes (`MD01`..`MD04`)
    /// and plain labels, case-insensitively; anything else is `Unknown`.
    pub fn from_code(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "MD01" | "HAPPY" => Self::Happy,
            "MD02" | "SAD" => Self::Sad,
            "MD03" | "ANGRY" => Self::Angry,
            "MD04" | "NEUTRAL" => Self::Neutral,
            _ => Self::Unknown,
        }
    }

    pub fn from_optional(raw: Option<&str>) -> Self {
        raw.map(Self::from_code).unwrap_or(Self::Unknown)
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Happy => "MD01",
            Self::Sad => "MD02",
            Self::Angry => "MD03",
            Self::Neutral => "MD04",
            Self::Unknown => "MD00",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Happy => "Happy",
            Self::Sad => "Sad",
            Self::Angry => "Angry",
            Self::Neutral => "Neutral",
            Self::Unknown => "Unknown",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Self::Happy => "😊",
            Self::Sad => "😢",
            Self::Angry => "😡",
            Self::Neutral => "😐",
            Self::Unknown => "❓",
        }
    }

    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

/// Per-category tally. Categories that never occurred have no key; use
/// [`MoodCount::get`] or [`MoodCount::chart_series`] to read them as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MoodCount(BTreeMap<MoodCategory, u32>);

impl MoodCount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tally<I>(moods: I) -> Self
    where
        I: IntoIterator<Item = MoodCategory>,
    {
        let mut count = Self::new();
        for mood in moods {
            count.increment(mood);
        }
        count
    }

    pub fn increment(&mut self, mood: MoodCategory) {
        *self.0.entry(mood).or_insert(0) += 1;
    }

    pub fn get(&self, mood: MoodCategory) -> u32 {
        self.0.get(&mood).copied().unwrap_or(0)
    }

    /// Sum over every category, `Unknown` included.
    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    /// One bar per charted category, zero-height when absent.
    pub fn chart_series(&self) -> Vec<ChartBar> {
        MoodCategory::CHARTED
            .iter()
            .map(|&mood| ChartBar {
                mood,
                glyph: mood.glyph(),
                count: self.get(mood),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartBar {
    pub mood: MoodCategory,
    pub glyph: &'static str,
    pub count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_accepts_codes_and_labels() {
        assert_eq!(MoodCategory::from_code("MD01"), MoodCategory::Happy);
        assert_eq!(MoodCategory::from_code(" md02 "), MoodCategory::Sad);
        assert_eq!(MoodCategory::from_code("Angry"), MoodCategory::Angry);
        assert_eq!(MoodCategory::from_code("neutral"), MoodCategory::Neutral);
    }

    #[test]
    fn test_from_code_falls_back_to_unknown() {
        assert_eq!(MoodCategory::from_code("MD00"), MoodCategory::Unknown);
        assert_eq!(MoodCategory::from_code(""), MoodCategory::Unknown);
        assert_eq!(MoodCategory::from_code("Better"), MoodCategory::Unknown);
        assert_eq!(MoodCategory::from_optional(None), MoodCategory::Unknown);
    }

    #[test]
    fn test_code_round_trips_for_known_moods() {
        for mood in MoodCategory::CHARTED {
            assert_eq!(MoodCategory::from_code(mood.code()), mood);
        }
    }

    #[test]
    fn test_chart_series_renders_missing_as_zero() {
        let count = MoodCount::tally([MoodCategory::Sad, MoodCategory::Sad]);
        let series = count.chart_series();

        assert_eq!(series.len(), 4);
        assert_eq!(series[0].mood, MoodCategory::Happy);
        assert_eq!(series[0].count, 0);
        assert_eq!(series[1].count, 2);
        assert_eq!(series[2].count, 0);
        assert_eq!(series[3].count, 0);
    }

    #[test]
    fn test_total_includes_unknown() {
        let count = MoodCount::tally([MoodCategory::Happy, MoodCategory::Unknown]);
        assert_eq!(count.total(), 2);
        assert_eq!(count.get(MoodCategory::Unknown), 1);
    }

    #[test]
    fn test_mood_count_serializes_as_label_map() {
        let count = MoodCount::tally([MoodCategory::Happy, MoodCategory::Sad, MoodCategory::Happy]);
        let json = serde_json::to_value(&count).unwrap();
        assert_eq!(json["Happy"], 2);
        assert_eq!(json["Sad"], 1);
        assert!(json.get("Angry").is_none());
    }
}
