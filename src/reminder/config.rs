use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "reminder_frequency", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Once,
    Daily,
    Weekly,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Once => "once",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reminder frequency {0:?}")]
pub struct UnknownFrequency(pub String);

impl FromStr for Frequency {
    type Err = UnknownFrequency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "once" => Ok(Self::Once),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            _ => Err(UnknownFrequency(s.to_string())),
        }
    }
}

/// Accepts the `datetime-local` shapes browsers submit, with or without
/// seconds, `T` or space separated.
pub fn parse_trigger(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
    ];
    let raw = raw.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// One configuration source. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialReminderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
}

impl PartialReminderConfig {
    fn email(&self) -> Option<&str> {
        self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }
}

impl From<&ReminderConfig> for PartialReminderConfig {
    fn from(config: &ReminderConfig) -> Self {
        Self {
            email: Some(config.email.clone()),
            trigger_at: Some(config.trigger_at),
            frequency: Some(config.frequency),
        }
    }
}

/// Raw reminder fields as they arrive from a URL query or a submitted form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReminderInput {
    pub email: Option<String>,
    pub datetime: Option<String>,
    pub frequency: Option<String>,
}

impl ReminderInput {
    /// Unparsable values are dropped so a stale link cannot block the form.
    pub fn into_partial(self) -> PartialReminderConfig {
        let trigger_at = self.datetime.as_deref().and_then(|raw| {
            let parsed = parse_trigger(raw);
            if parsed.is_none() && !raw.trim().is_empty() {
                tracing::debug!(datetime = %raw, "Ignoring unparsable reminder datetime");
            }
            parsed
        });
        let frequency = self.frequency.as_deref().and_then(|raw| match raw.parse() {
            Ok(freq) => Some(freq),
            Err(e) => {
                if !raw.trim().is_empty() {
                    tracing::debug!(error = %e, "Ignoring reminder frequency");
                }
                None
            }
        });

        PartialReminderConfig {
            email: self.email,
            trigger_at,
            frequency,
        }
    }
}

/// Merged but not yet validated configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderDraft {
    pub email: Option<String>,
    pub trigger_at: Option<NaiveDateTime>,
    pub frequency: Frequency,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderConfig {
    pub email: String,
    pub trigger_at: NaiveDateTime,
    pub frequency: Frequency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    #[error("Please enter your email address.")]
    MissingEmail,

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Please select a valid date/time.")]
    MissingTrigger,
}

impl ReminderDraft {
    /// Email problems are reported before a missing trigger.
    pub fn validate(&self) -> Result<ReminderConfig, ValidationError> {
        let email = self.email.as_deref().ok_or(ValidationError::MissingEmail)?;
        if !validator::validate_email(email) {
            return Err(ValidationError::InvalidEmail);
        }
        let trigger_at = self.trigger_at.ok_or(ValidationError::MissingTrigger)?;

        Ok(ReminderConfig {
            email: email.to_string(),
            trigger_at,
            frequency: self.frequency,
        })
    }

    /// What gets written back to the preference cache.
    pub fn to_partial(&self) -> PartialReminderConfig {
        PartialReminderConfig {
            email: self.email.clone(),
            trigger_at: self.trigger_at,
            frequency: Some(self.frequency),
        }
    }
}

/// Merge sources field by field; earlier sources win. Blank emails count as
/// missing. Frequency falls back to `once`.
pub fn merge_sources(sources: &[&PartialReminderConfig]) -> ReminderDraft {
    ReminderDraft {
        email: sources
            .iter()
            .find_map(|s| s.email())
            .map(str::to_string),
        trigger_at: sources.iter().find_map(|s| s.trigger_at),
        frequency: sources
            .iter()
            .find_map(|s| s.frequency)
            .unwrap_or_default(),
    }
}

/// Query override beats the cached value, which beats the server default.
pub fn resolve_draft(
    server_defaults: &PartialReminderConfig,
    cached: &PartialReminderConfig,
    query_overrides: &PartialReminderConfig,
) -> ReminderDraft {
    merge_sources(&[query_overrides, cached, server_defaults])
}

pub fn resolve(
    server_defaults: &PartialReminderConfig,
    cached: &PartialReminderConfig,
    query_overrides: &PartialReminderConfig,
) -> Result<ReminderConfig, ValidationError> {
    resolve_draft(server_defaults, cached, query_overrides).validate()
}
