use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    Datastore, FeedbackOutcome, MealSource, MoodSource, ReminderQueue, ScheduleStore, StoreError,
};
use crate::analytics::mood::MoodCategory;
use crate::analytics::normalize::RawMoodEntry;
use crate::analytics::report::MealRecord;
use crate::models::meal::EatenMealRow;
use crate::models::mood_entry::MoodEntryRow;
use crate::models::reminder::ReminderRow;
use crate::reminder::config::ReminderConfig;

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MoodSource for PgStore {
    async fn fetch_mood_entries(&self, user_id: Uuid) -> Result<Vec<RawMoodEntry>, StoreError> {
        let rows = sqlx::query_as::<_, MoodEntryRow>(
            r#"
            SELECT mood_code, logged_at
            FROM mood_entries
            WHERE user_id = $1
            ORDER BY logged_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(MoodEntryRow::into_raw).collect())
    }
}

#[async_trait]
impl MealSource for PgStore {
    async fn fetch_meal_records(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MealRecord>, StoreError> {
        // Half-open upper bound so the whole end day is included
        let from = start.and_time(chrono::NaiveTime::MIN).and_utc();
        let until = (end + Duration::days(1)).and_time(chrono::NaiveTime::MIN).and_utc();

        let rows = sqlx::query_as::<_, EatenMealRow>(
            r#"
            SELECT
                me.food_id,
                me.suggestion_id,
                fi.food_name,
                fi.image_url,
                me.eaten_at,
                fs.mood_code AS mood_before,
                me.mood_after
            FROM meals_eaten me
            LEFT JOIN food_items fi ON fi.id = me.food_id
            LEFT JOIN food_suggestions fs ON fs.id = me.suggestion_id
            WHERE me.user_id = $1 AND me.eaten_at >= $2 AND me.eaten_at < $3
            ORDER BY me.eaten_at ASC, me.created_at ASC
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(until)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(MealRecord::from).collect())
    }

    async fn record_feedback(
        &self,
        user_id: Uuid,
        suggestion_id: Uuid,
        mood: MoodCategory,
    ) -> Result<FeedbackOutcome, StoreError> {
        let updated = sqlx::query(
            r#"
            UPDATE meals_eaten SET mood_after = $3
            WHERE user_id = $1 AND suggestion_id = $2 AND mood_after IS NULL
            "#,
        )
        .bind(user_id)
        .bind(suggestion_id)
        .bind(mood.code())
        .execute(&self.db)
        .await?;

        if updated.rows_affected() == 1 {
            return Ok(FeedbackOutcome::Recorded);
        }

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM meals_eaten WHERE user_id = $1 AND suggestion_id = $2)",
        )
        .bind(user_id)
        .bind(suggestion_id)
        .fetch_one(&self.db)
        .await?;

        Ok(if exists {
            FeedbackOutcome::AlreadyRecorded
        } else {
            FeedbackOutcome::NotFound
        })
    }
}

#[async_trait]
impl ScheduleStore for PgStore {
    async fn schedule(&self, user_id: Uuid, config: &ReminderConfig) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO reminders (id, user_id, email, remind_at, frequency)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&config.email)
        .bind(config.trigger_at)
        .bind(config.frequency)
        .execute(&self.db)
        .await?;

        tracing::info!(
            user_id = %user_id,
            remind_at = %config.trigger_at,
            frequency = %config.frequency,
            "Reminder scheduled"
        );
        Ok(())
    }

    async fn latest_for_user(&self, user_id: Uuid) -> Result<Option<ReminderConfig>, StoreError> {
        let row = sqlx::query_as::<_, ReminderRow>(
            r#"
            SELECT * FROM reminders
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.as_ref().map(ReminderRow::config))
    }
}

#[async_trait]
impl ReminderQueue for PgStore {
    async fn due_reminders(&self, now: NaiveDateTime) -> Result<Vec<ReminderRow>, StoreError> {
        let rows = sqlx::query_as::<_, ReminderRow>(
            r#"
            SELECT * FROM reminders
            WHERE sent = FALSE AND remind_at <= $1
            ORDER BY remind_at ASC
            LIMIT 100
            "#,
        )
        .bind(now)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn claim(&self, reminder_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE reminders SET sent = TRUE WHERE id = $1 AND sent = FALSE")
            .bind(reminder_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl Datastore for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.db)
            .await?;
        Ok(())
    }
}
