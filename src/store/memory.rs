//! In-memory collaborators for handler and submission tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{
    Datastore, FeedbackOutcome, MealSource, MoodSource, ReminderCache, ReminderQueue,
    ScheduleStore, StoreError,
};
use crate::analytics::mood::MoodCategory;
use crate::analytics::normalize::RawMoodEntry;
use crate::analytics::report::MealRecord;
use crate::models::reminder::ReminderRow;
use crate::reminder::config::{PartialReminderConfig, ReminderConfig};

#[derive(Default)]
pub struct MemoryStore {
    moods: Mutex<HashMap<Uuid, Vec<RawMoodEntry>>>,
    meals: Mutex<HashMap<Uuid, Vec<MealRecord>>>,
    reminders: Mutex<Vec<ReminderRow>>,
    reject_schedules: AtomicBool,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_mood(&self, user_id: Uuid, date_label: &str, mood: &str) {
        self.moods.lock().await.entry(user_id).or_default().push(RawMoodEntry {
            date_label: date_label.to_string(),
            mood: mood.to_string(),
        });
    }

    pub async fn add_meal(&self, user_id: Uuid, meal: MealRecord) {
        self.meals.lock().await.entry(user_id).or_default().push(meal);
    }

    pub async fn meals(&self, user_id: Uuid) -> Vec<MealRecord> {
        self.meals.lock().await.get(&user_id).cloned().unwrap_or_default()
    }

    pub async fn schedules(&self) -> Vec<(Uuid, ReminderConfig)> {
        self.reminders
            .lock()
            .await
            .iter()
            .map(|r| (r.user_id, r.config()))
            .collect()
    }

    pub async fn reminders(&self) -> Vec<ReminderRow> {
        self.reminders.lock().await.clone()
    }

    pub fn reject_schedules(&self, reject: bool) {
        self.reject_schedules.store(reject, Ordering::SeqCst);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Rejected("datastore unreachable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl MoodSource for MemoryStore {
    async fn fetch_mood_entries(&self, user_id: Uuid) -> Result<Vec<RawMoodEntry>, StoreError> {
        self.check_online()?;
        Ok(self.moods.lock().await.get(&user_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl MealSource for MemoryStore {
    async fn fetch_meal_records(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MealRecord>, StoreError> {
        self.check_online()?;
        Ok(self
            .meals(user_id)
            .await
            .into_iter()
            .filter(|m| {
                let day = m.consumed_at.date_naive();
                start <= day && day <= end
            })
            .collect())
    }

    async fn record_feedback(
        &self,
        user_id: Uuid,
        suggestion_id: Uuid,
        mood: MoodCategory,
    ) -> Result<FeedbackOutcome, StoreError> {
        self.check_online()?;
        let mut meals = self.meals.lock().await;
        let Some(meal) = meals
            .get_mut(&user_id)
            .and_then(|m| m.iter_mut().find(|m| m.suggestion_id == suggestion_id))
        else {
            return Ok(FeedbackOutcome::NotFound);
        };
        if meal.mood_after.is_some() {
            return Ok(FeedbackOutcome::AlreadyRecorded);
        }
        meal.mood_after = Some(mood);
        Ok(FeedbackOutcome::Recorded)
    }
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn schedule(&self, user_id: Uuid, config: &ReminderConfig) -> Result<(), StoreError> {
        self.check_online()?;
        if self.reject_schedules.load(Ordering::SeqCst) {
            return Err(StoreError::Rejected("schedule store rejected the reminder".into()));
        }
        self.reminders.lock().await.push(ReminderRow {
            id: Uuid::new_v4(),
            user_id,
            email: config.email.clone(),
            remind_at: config.trigger_at,
            frequency: config.frequency,
            sent: false,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn latest_for_user(&self, user_id: Uuid) -> Result<Option<ReminderConfig>, StoreError> {
        self.check_online()?;
        Ok(self
            .reminders
            .lock()
            .await
            .iter()
            .rev()
            .find(|r| r.user_id == user_id)
            .map(ReminderRow::config))
    }
}

#[async_trait]
impl ReminderQueue for MemoryStore {
    async fn due_reminders(&self, now: NaiveDateTime) -> Result<Vec<ReminderRow>, StoreError> {
        self.check_online()?;
        let mut due: Vec<ReminderRow> = self
            .reminders
            .lock()
            .await
            .iter()
            .filter(|r| !r.sent && r.remind_at <= now)
            .cloned()
            .collect();
        due.sort_by_key(|r| r.remind_at);
        Ok(due)
    }

    async fn claim(&self, reminder_id: Uuid) -> Result<bool, StoreError> {
        self.check_online()?;
        let mut reminders = self.reminders.lock().await;
        match reminders.iter_mut().find(|r| r.id == reminder_id && !r.sent) {
            Some(reminder) => {
                reminder.sent = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl Datastore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.check_online()
    }
}

#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<Uuid, PartialReminderConfig>>,
    fail_writes: AtomicBool,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ReminderCache for MemoryCache {
    async fn load(&self, user_id: Uuid) -> Result<PartialReminderConfig, StoreError> {
        Ok(self.entries.lock().await.get(&user_id).cloned().unwrap_or_default())
    }

    async fn store(&self, user_id: Uuid, config: &PartialReminderConfig) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "cache is read-only",
            )));
        }
        self.entries.lock().await.insert(user_id, config.clone());
        Ok(())
    }
}
