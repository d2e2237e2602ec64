use std::sync::Arc;

use chrono::{Local, NaiveDateTime};

use super::config::ReminderConfig;
use super::notifier::Notifier;
use super::schedule::next_occurrence;
use crate::store::{ReminderQueue, StoreError};

/// Counts from one dispatch pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
    pub rescheduled: usize,
}

/// Wall-clock time in the server's zone. Reminder times are entered as
/// zone-less local times, so due checks compare against this rather than UTC.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn spawn_reminder_dispatcher(
    queue: Arc<dyn ReminderQueue>,
    notifier: Arc<dyn Notifier>,
    poll_secs: u64,
) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(poll_secs.max(1)));
        loop {
            interval.tick().await;
            match dispatch_due(&*queue, &*notifier, local_now()).await {
                Ok(report) => {
                    if report != DispatchReport::default() {
                        tracing::info!(
                            sent = report.sent,
                            failed = report.failed,
                            skipped = report.skipped,
                            rescheduled = report.rescheduled,
                            "Reminder dispatch pass finished"
                        );
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Reminder dispatcher error");
                }
            }
        }
    });
}

/// Claim, send and (for recurring reminders) reschedule everything due at
/// `now`. A reminder is claimed before it is sent, so a failed send is not
/// retried.
pub async fn dispatch_due<Q, N>(
    queue: &Q,
    notifier: &N,
    now: NaiveDateTime,
) -> Result<DispatchReport, StoreError>
where
    Q: ReminderQueue + ?Sized,
    N: Notifier + ?Sized,
{
    let mut report = DispatchReport::default();

    for reminder in queue.due_reminders(now).await? {
        if !queue.claim(reminder.id).await? {
            report.skipped += 1;
            continue;
        }

        match notifier.send_reminder(&reminder).await {
            Ok(()) => report.sent += 1,
            Err(e) => {
                report.failed += 1;
                tracing::warn!(reminder_id = %reminder.id, error = %e, "Reminder delivery failed");
            }
        }

        if let Some(next) = next_occurrence(reminder.remind_at, reminder.frequency) {
            let config = ReminderConfig {
                trigger_at: next,
                ..reminder.config()
            };
            match queue.schedule(reminder.user_id, &config).await {
                Ok(()) => report.rescheduled += 1,
                Err(e) => {
                    tracing::error!(
                        reminder_id = %reminder.id,
                        error = %e,
                        "Failed to schedule next reminder occurrence"
                    );
                }
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reminder::ReminderRow;
    use crate::reminder::config::Frequency;
    use crate::store::memory::MemoryStore;
    use crate::store::ScheduleStore;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use tokio::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send_reminder(&self, reminder: &ReminderRow) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("smtp unavailable");
            }
            self.sent.lock().await.push(reminder.email.clone());
            Ok(())
        }
    }

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    fn config(email: &str, trigger_at: NaiveDateTime, frequency: Frequency) -> ReminderConfig {
        ReminderConfig {
            email: email.into(),
            trigger_at,
            frequency,
        }
    }

    #[tokio::test]
    async fn test_only_due_reminders_are_sent() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        store.schedule(user, &config("due@x.com", at(5, 8), Frequency::Once)).await.unwrap();
        store.schedule(user, &config("later@x.com", at(6, 8), Frequency::Once)).await.unwrap();
        let notifier = RecordingNotifier::default();

        let report = dispatch_due(&store, &notifier, at(5, 9)).await.unwrap();

        assert_eq!(report.sent, 1);
        assert_eq!(*notifier.sent.lock().await, vec!["due@x.com".to_string()]);
        assert_eq!(store.due_reminders(at(5, 9)).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_recurring_reminder_is_rescheduled() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        store.schedule(user, &config("a@x.com", at(5, 8), Frequency::Weekly)).await.unwrap();
        let notifier = RecordingNotifier::default();

        let report = dispatch_due(&store, &notifier, at(5, 8)).await.unwrap();

        assert_eq!(report.rescheduled, 1);
        let latest = store.latest_for_user(user).await.unwrap().unwrap();
        assert_eq!(latest.trigger_at, at(12, 8));
        assert_eq!(latest.frequency, Frequency::Weekly);
    }

    #[tokio::test]
    async fn test_second_pass_does_not_resend() {
        let store = MemoryStore::new();
        store
            .schedule(Uuid::new_v4(), &config("a@x.com", at(5, 8), Frequency::Once))
            .await
            .unwrap();
        let notifier = RecordingNotifier::default();

        dispatch_due(&store, &notifier, at(5, 9)).await.unwrap();
        let second = dispatch_due(&store, &notifier, at(5, 10)).await.unwrap();

        assert_eq!(second, DispatchReport::default());
        assert_eq!(notifier.sent.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_delivery_is_counted_and_not_retried() {
        let store = MemoryStore::new();
        store
            .schedule(Uuid::new_v4(), &config("a@x.com", at(5, 8), Frequency::Once))
            .await
            .unwrap();
        let notifier = RecordingNotifier {
            fail: true,
            ..Default::default()
        };

        let report = dispatch_due(&store, &notifier, at(5, 9)).await.unwrap();

        assert_eq!(report.failed, 1);
        assert!(store.reminders().await.iter().all(|r| r.sent));
    }

    #[test]
    fn test_local_now_tracks_local_wall_clock() {
        let before = Local::now().naive_local();
        let now = local_now();
        let after = Local::now().naive_local();

        assert!(before <= now && now <= after);
    }

    #[tokio::test]
    async fn test_reminder_at_local_wall_time_is_due() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let entered = local_now() - chrono::Duration::minutes(1);
        let future = local_now() + chrono::Duration::hours(1);
        store.schedule(user, &config("now@x.com", entered, Frequency::Once)).await.unwrap();
        store.schedule(user, &config("soon@x.com", future, Frequency::Once)).await.unwrap();
        let notifier = RecordingNotifier::default();

        let report = dispatch_due(&store, &notifier, local_now()).await.unwrap();

        assert_eq!(report.sent, 1);
        assert_eq!(*notifier.sent.lock().await, vec!["now@x.com".to_string()]);
    }
}
