use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::analytics::mood::MoodCategory;
use crate::analytics::report::MealRecord;

#[derive(Debug, Clone, FromRow)]
pub struct EatenMealRow {
    pub food_id: Uuid,
    pub suggestion_id: Uuid,
    pub food_name: Option<String>,
    pub image_url: Option<String>,
    pub eaten_at: DateTime<Utc>,
    pub mood_before: Option<String>,
    pub mood_after: Option<String>,
}

impl From<EatenMealRow> for MealRecord {
    fn from(row: EatenMealRow) -> Self {
        Self {
            food_id: row.food_id,
            suggestion_id: row.suggestion_id,
            food_name: row.food_name,
            image_url: row.image_url,
            consumed_at: row.eaten_at,
            mood_before: MoodCategory::from_optional(row.mood_before.as_deref()),
            mood_after: row
                .mood_after
                .as_deref()
                .filter(|m| !m.trim().is_empty())
                .map(MoodCategory::from_code),
        }
    }
}
