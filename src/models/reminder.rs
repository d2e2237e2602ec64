use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::reminder::config::{Frequency, ReminderConfig};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReminderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub remind_at: NaiveDateTime,
    pub frequency: Frequency,
    pub sent: bool,
    pub created_at: DateTime<Utc>,
}

impl ReminderRow {
    pub fn config(&self) -> ReminderConfig {
        ReminderConfig {
            email: self.email.clone(),
            trigger_at: self.remind_at,
            frequency: self.frequency,
        }
    }
}
