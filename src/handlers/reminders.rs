use axum::{
    extract::{Query, State},
    Extension, Json,
};

use crate::app::AppState;
use crate::auth::middleware::AuthUser;
use crate::dto::{ReminderConfirmation, ReminderView};
use crate::error::AppResult;
use crate::reminder::config::{resolve_draft, ReminderInput};
use crate::reminder::submit::ReminderSubmission;
use crate::reminder::{self, cached_preferences, server_defaults};

/// Effective reminder settings. Query parameters override the cached
/// preferences, which override the account defaults.
pub async fn get_reminder(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<ReminderInput>,
) -> AppResult<Json<ReminderView>> {
    let overrides = query.into_partial();
    let draft = reminder::load(
        auth_user.id,
        auth_user.email.as_deref(),
        &overrides,
        &*state.cache,
        &*state.store,
    )
    .await?;

    Ok(Json(ReminderView::from(&draft)))
}

pub async fn submit_reminder(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<ReminderInput>,
) -> AppResult<Json<ReminderConfirmation>> {
    let server = server_defaults(auth_user.id, auth_user.email.as_deref(), &*state.store).await?;
    let cached = cached_preferences(auth_user.id, &*state.cache).await;
    let draft = resolve_draft(&server, &cached, &body.into_partial());

    let mut submission = ReminderSubmission::new(auth_user.id, &*state.cache, &*state.store);
    let config = submission.submit(&draft).await?;

    tracing::info!(
        user_id = %auth_user.id,
        remind_at = %config.trigger_at,
        frequency = %config.frequency,
        "Reminder confirmed"
    );

    Ok(Json(config.into()))
}
