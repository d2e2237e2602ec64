use uuid::Uuid;

use super::config::{PartialReminderConfig, ReminderConfig, ReminderDraft, ValidationError};
use crate::store::{ReminderCache, ScheduleStore, StoreError};

/// Lifecycle of one reminder submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Validating,
    Submitting,
    Confirmed(ReminderConfig),
    Failed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("could not save reminder: {0}")]
    Persistence(#[from] StoreError),
}

/// Drives a draft through validation and persistence. The preference cache
/// is written before the remote schedule and is never rolled back.
pub struct ReminderSubmission<'a, C: ?Sized, S: ?Sized> {
    user_id: Uuid,
    cache: &'a C,
    schedules: &'a S,
    state: SubmissionState,
}

impl<'a, C, S> ReminderSubmission<'a, C, S>
where
    C: ReminderCache + ?Sized,
    S: ScheduleStore + ?Sized,
{
    pub fn new(user_id: Uuid, cache: &'a C, schedules: &'a S) -> Self {
        Self {
            user_id,
            cache,
            schedules,
            state: SubmissionState::Idle,
        }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub async fn submit(&mut self, draft: &ReminderDraft) -> Result<ReminderConfig, SubmitError> {
        self.state = SubmissionState::Validating;
        let config = match draft.validate() {
            Ok(config) => config,
            Err(e) => return Err(self.fail(e.into())),
        };

        self.state = SubmissionState::Submitting;
        let partial = PartialReminderConfig::from(&config);
        if let Err(e) = self.cache.store(self.user_id, &partial).await {
            tracing::warn!(user_id = %self.user_id, error = %e, "Reminder cache write failed");
            return Err(self.fail(e.into()));
        }
        if let Err(e) = self.schedules.schedule(self.user_id, &config).await {
            tracing::error!(user_id = %self.user_id, error = %e, "Reminder schedule write failed");
            return Err(self.fail(e.into()));
        }

        self.state = SubmissionState::Confirmed(config.clone());
        Ok(config)
    }

    fn fail(&mut self, err: SubmitError) -> SubmitError {
        self.state = SubmissionState::Failed(err.to_string());
        err
    }
}
