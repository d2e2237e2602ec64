//! Delivery of due reminders.

use async_trait::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials, Message,
    SmtpTransport, Transport,
};

use crate::config::SmtpConfig;
use crate::models::reminder::ReminderRow;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_reminder(&self, reminder: &ReminderRow) -> anyhow::Result<()>;
}

const REMINDER_SUBJECT: &str = "Time to log your mood";

fn reminder_body(reminder: &ReminderRow) -> String {
    format!(
        "Hi!\n\n\
         This is your {} MoodMeal reminder for {}.\n\
         Take a moment to log how you feel and what you ate.\n",
        reminder.frequency,
        reminder.remind_at.format("%Y-%m-%d %H:%M"),
    )
}

/// Sends reminder emails over SMTP.
#[derive(Clone)]
pub struct SmtpNotifier {
    mailer: SmtpTransport,
    from: String,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig) -> anyhow::Result<Self> {
        let mailer = match (&config.username, &config.password) {
            (Some(username), Some(password)) => {
                tracing::info!(
                    smtp_host = %config.host,
                    smtp_port = config.port,
                    from = %config.from_address,
                    "Reminder mailer initialized with authentication"
                );
                let creds = Credentials::new(username.clone(), password.clone());
                SmtpTransport::relay(&config.host)?
                    .port(config.port)
                    .credentials(creds)
                    .build()
            }
            _ => {
                tracing::info!(
                    smtp_host = %config.host,
                    smtp_port = config.port,
                    "SMTP credentials not configured, using unauthenticated connection"
                );
                SmtpTransport::builder_dangerous(&config.host)
                    .port(config.port)
                    .build()
            }
        };

        Ok(Self {
            mailer,
            from: config.from_address.clone(),
        })
    }

    fn build_message(&self, reminder: &ReminderRow) -> anyhow::Result<Message> {
        Ok(Message::builder()
            .from(self.from.parse()?)
            .to(reminder.email.parse()?)
            .subject(REMINDER_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(reminder_body(reminder))?)
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_reminder(&self, reminder: &ReminderRow) -> anyhow::Result<()> {
        let message = self.build_message(reminder)?;
        let mailer = self.mailer.clone();

        // SmtpTransport blocks on the network
        tokio::task::spawn_blocking(move || mailer.send(&message)).await??;

        tracing::info!(reminder_id = %reminder.id, to = %reminder.email, "Reminder email sent");
        Ok(())
    }
}

/// Used when no SMTP server is configured; reminders only show up in the logs.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_reminder(&self, reminder: &ReminderRow) -> anyhow::Result<()> {
        tracing::info!(
            reminder_id = %reminder.id,
            user_id = %reminder.user_id,
            to = %reminder.email,
            remind_at = %reminder.remind_at,
            frequency = %reminder.frequency,
            "Reminder due (no SMTP configured, not emailed)"
        );
        Ok(())
    }
}
