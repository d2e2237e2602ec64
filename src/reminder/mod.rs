//! Reminder configuration: resolution from layered sources, submission,
//! recurrence and delivery.

pub mod config;
pub mod dispatch;
pub mod notifier;
pub mod schedule;
pub mod submit;

use uuid::Uuid;

use self::config::{PartialReminderConfig, ReminderDraft};
use crate::store::{ReminderCache, ScheduleStore, StoreError};

/// Account email plus whatever the most recent remote reminder says.
pub async fn server_defaults<S>(
    user_id: Uuid,
    account_email: Option<&str>,
    schedules: &S,
) -> Result<PartialReminderConfig, StoreError>
where
    S: ScheduleStore + ?Sized,
{
    let latest = schedules.latest_for_user(user_id).await?;
    let mut defaults = latest
        .as_ref()
        .map(PartialReminderConfig::from)
        .unwrap_or_default();
    // The signed-in account's address wins over the one last scheduled
    if let Some(email) = account_email {
        defaults.email = Some(email.to_string());
    }
    Ok(defaults)
}

/// The user's cached preferences. An unreadable cache entry is treated as
/// empty rather than failing the request.
pub async fn cached_preferences<C>(user_id: Uuid, cache: &C) -> PartialReminderConfig
where
    C: ReminderCache + ?Sized,
{
    match cache.load(user_id).await {
        Ok(cached) => cached,
        Err(e) => {
            tracing::warn!(user_id = %user_id, error = %e, "Ignoring unreadable reminder cache");
            PartialReminderConfig::default()
        }
    }
}

/// Resolve the effective draft for display and write it back to the cache.
pub async fn load<C, S>(
    user_id: Uuid,
    account_email: Option<&str>,
    overrides: &PartialReminderConfig,
    cache: &C,
    schedules: &S,
) -> Result<ReminderDraft, StoreError>
where
    C: ReminderCache + ?Sized,
    S: ScheduleStore + ?Sized,
{
    let server = server_defaults(user_id, account_email, schedules).await?;
    let cached = cached_preferences(user_id, cache).await;
    let draft = config::resolve_draft(&server, &cached, overrides);

    if draft.to_partial() != cached {
        if let Err(e) = cache.store(user_id, &draft.to_partial()).await {
            tracing::warn!(user_id = %user_id, error = %e, "Failed to refresh reminder cache");
        }
    }

    Ok(draft)
}
