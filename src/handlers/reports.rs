use axum::{
    extract::{Query, State},
    Extension, Json,
};

use super::{resolve_window, today};
use crate::analytics::aggregate::NamedRange;
use crate::analytics::report::{build_report, MealReport};
use crate::app::AppState;
use crate::auth::middleware::AuthUser;
use crate::dto::RangeQuery;
use crate::error::AppResult;

/// Meals eaten in the window with their before/after moods. Defaults to the
/// last 7 days.
pub async fn get_meal_report(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<MealReport>> {
    let (window, _) = resolve_window(&query, NamedRange::Weekly, today())?;

    let meals = state
        .store
        .fetch_meal_records(auth_user.id, window.start, window.end)
        .await?;

    tracing::debug!(
        user_id = %auth_user.id,
        start = %window.start,
        end = %window.end,
        meals = meals.len(),
        "Building meal report"
    );

    Ok(Json(build_report(&meals, window.start, window.end)))
}
