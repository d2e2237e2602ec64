//! Data-access and persistence collaborators.
//!
//! Handlers only see these traits; `postgres` backs them with the service
//! database and `cache` keeps per-user reminder preferences on local disk.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::analytics::mood::MoodCategory;
use crate::analytics::normalize::RawMoodEntry;
use crate::analytics::report::MealRecord;
use crate::models::reminder::ReminderRow;
use crate::reminder::config::{PartialReminderConfig, ReminderConfig};

pub mod cache;
pub mod postgres;

#[cfg(test)]
pub mod memory;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("{0}")]
    Rejected(String),
}

/// Outcome of recording post-meal feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackOutcome {
    Recorded,
    AlreadyRecorded,
    NotFound,
}

#[async_trait]
pub trait MoodSource: Send + Sync {
    /// Every mood entry of the user, newest first, with yearless labels.
    async fn fetch_mood_entries(&self, user_id: Uuid) -> Result<Vec<RawMoodEntry>, StoreError>;
}

#[async_trait]
pub trait MealSource: Send + Sync {
    /// Eaten meals whose timestamp falls on a day in `[start, end]`.
    async fn fetch_meal_records(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MealRecord>, StoreError>;

    /// Set the post-meal mood once; never overwrites existing feedback.
    async fn record_feedback(
        &self,
        user_id: Uuid,
        suggestion_id: Uuid,
        mood: MoodCategory,
    ) -> Result<FeedbackOutcome, StoreError>;
}

/// Remote store that the reminder dispatcher reads from.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn schedule(&self, user_id: Uuid, config: &ReminderConfig) -> Result<(), StoreError>;

    async fn latest_for_user(&self, user_id: Uuid) -> Result<Option<ReminderConfig>, StoreError>;
}

/// Device-local reminder preferences, keyed per user.
#[async_trait]
pub trait ReminderCache: Send + Sync {
    async fn load(&self, user_id: Uuid) -> Result<PartialReminderConfig, StoreError>;

    async fn store(&self, user_id: Uuid, config: &PartialReminderConfig) -> Result<(), StoreError>;
}

/// Scheduled reminders as seen by the dispatcher.
#[async_trait]
pub trait ReminderQueue: ScheduleStore {
    /// Unsent reminders with `remind_at <= now`, oldest first.
    async fn due_reminders(&self, now: NaiveDateTime) -> Result<Vec<ReminderRow>, StoreError>;

    /// Mark a reminder as sent. `false` means another worker got there first.
    async fn claim(&self, reminder_id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait Datastore: MoodSource + MealSource + ScheduleStore {
    async fn ping(&self) -> Result<(), StoreError>;
}
