use std::sync::Arc;

use anyhow::Context;

mod analytics;
mod app;
mod auth;
mod config;
mod db;
mod dto;
mod error;
mod handlers;
mod models;
mod reminder;
mod store;

use app::AppState;
use config::Config;
use reminder::notifier::{LogNotifier, Notifier, SmtpNotifier};
use store::cache::FileCache;
use store::postgres::PgStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodmeal_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env()?);

    // Database
    let db = db::pool::create_pool(&config.database_url)
        .await
        .context("Failed to create database pool")?;

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations applied");

    let store = Arc::new(PgStore::new(db));

    let cache = FileCache::open(&config.reminder_cache_dir)
        .await
        .context("Failed to open reminder cache directory")?;
    tracing::info!(dir = %cache.dir().display(), "Reminder cache ready");

    let notifier: Arc<dyn Notifier> = match &config.smtp {
        Some(smtp) => Arc::new(SmtpNotifier::new(smtp)?),
        None => {
            tracing::warn!("SMTP_HOST not set, reminders will only be logged");
            Arc::new(LogNotifier)
        }
    };

    // Sends due reminders every REMINDER_POLL_SECS
    reminder::dispatch::spawn_reminder_dispatcher(
        store.clone(),
        notifier,
        config.reminder_poll_secs,
    );

    let state = AppState {
        config: config.clone(),
        store,
        cache: Arc::new(cache),
    };

    let app = app::router(state);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
