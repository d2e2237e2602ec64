use std::env;
use std::path::PathBuf;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub cors_extra_origins: Vec<String>,

    pub jwt_secret: String,

    // Reminders
    pub reminder_cache_dir: PathBuf,
    pub reminder_poll_secs: u64,
    pub smtp: Option<SmtpConfig>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_address: String,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.into())
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let smtp = match optional_var("SMTP_HOST") {
            Some(host) => Some(SmtpConfig {
                host,
                port: var_or("SMTP_PORT", "587")
                    .parse()
                    .context("SMTP_PORT must be a number")?,
                username: optional_var("SMTP_USERNAME"),
                password: optional_var("SMTP_PASSWORD"),
                from_address: var_or("MAIL_FROM", "reminders@moodmeal.local"),
            }),
            None => None,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            host: var_or("HOST", "0.0.0.0"),
            port: var_or("PORT", "8080")
                .parse()
                .context("PORT must be a number")?,
            frontend_url: var_or("FRONTEND_URL", "http://localhost:3000"),
            cors_extra_origins: optional_var("CORS_EXTRA_ORIGINS")
                .map(|list| {
                    list.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),

            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,

            reminder_cache_dir: var_or("REMINDER_CACHE_DIR", "./data/reminder-cache").into(),
            reminder_poll_secs: var_or("REMINDER_POLL_SECS", "60")
                .parse()
                .context("REMINDER_POLL_SECS must be a number")?,
            smtp,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Every origin the CORS layer accepts.
    pub fn allowed_origins(&self) -> Vec<String> {
        std::iter::once(self.frontend_url.clone())
            .chain(self.cors_extra_origins.iter().cloned())
            .collect()
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            database_url: "postgres://localhost/moodmeal_test".into(),
            host: "127.0.0.1".into(),
            port: 0,
            frontend_url: "http://localhost:3000".into(),
            cors_extra_origins: Vec::new(),
            jwt_secret: "test-secret".into(),
            reminder_cache_dir: std::env::temp_dir().join("moodmeal-test-cache"),
            reminder_poll_secs: 60,
            smtp: None,
        }
    }
}
