use axum::{
    extract::{Query, State},
    Extension, Json,
};

use super::{load_mood_history, resolve_window, today};
use crate::analytics::aggregate::{summarize, NamedRange};
use crate::analytics::calendar::{self, build_daily_index, YearMonth};
use crate::app::AppState;
use crate::auth::middleware::AuthUser;
use crate::dto::{CalendarQuery, CalendarResponse, MoodHistoryResponse, RangeQuery, SummaryResponse};
use crate::error::{AppError, AppResult};

pub async fn list_moods(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<MoodHistoryResponse>> {
    let batch = load_mood_history(&*state.store, auth_user.id, today()).await?;

    Ok(Json(MoodHistoryResponse {
        entries: batch.entries,
        skipped: batch.skipped,
    }))
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<CalendarQuery>,
) -> AppResult<Json<CalendarResponse>> {
    let today = today();
    let current = YearMonth::of(today);
    let month = YearMonth::new(
        query.year.unwrap_or(current.year()),
        query.month.unwrap_or(current.month()),
    )
    .ok_or_else(|| AppError::Validation("month must be between 1 and 12".into()))?;

    let batch = load_mood_history(&*state.store, auth_user.id, today).await?;
    let index = build_daily_index(&batch.entries);
    let grid = calendar::build(month, &index, today);

    Ok(Json(CalendarResponse::new(month, grid.rows, batch.skipped)))
}

pub async fn get_summary(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<SummaryResponse>> {
    let today = today();
    let (window, range) = resolve_window(&query, NamedRange::Weekly, today)?;

    let batch = load_mood_history(&*state.store, auth_user.id, today).await?;

    Ok(Json(SummaryResponse {
        range,
        summary: summarize(&batch.entries, window),
        skipped: batch.skipped,
    }))
}
