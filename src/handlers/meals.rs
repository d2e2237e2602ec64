use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::analytics::mood::MoodCategory;
use crate::app::AppState;
use crate::auth::middleware::AuthUser;
use crate::dto::{MealFeedbackRequest, MealFeedbackResponse};
use crate::error::{AppError, AppResult};
use crate::store::FeedbackOutcome;

pub async fn record_feedback(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(suggestion_id): Path<Uuid>,
    Json(body): Json<MealFeedbackRequest>,
) -> AppResult<Json<MealFeedbackResponse>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mood = MoodCategory::from_code(&body.mood);
    if !mood.is_known() {
        return Err(AppError::Validation(format!(
            "Mood must be one of Happy, Sad, Angry or Neutral, got {:?}",
            body.mood
        )));
    }

    match state
        .store
        .record_feedback(auth_user.id, suggestion_id, mood)
        .await?
    {
        FeedbackOutcome::Recorded => {
            tracing::info!(
                user_id = %auth_user.id,
                suggestion_id = %suggestion_id,
                mood = mood.label(),
                "Meal feedback recorded"
            );
            Ok(Json(MealFeedbackResponse {
                suggestion_id,
                mood_after: mood,
            }))
        }
        FeedbackOutcome::AlreadyRecorded => Err(AppError::Conflict(
            "Feedback for this meal was already recorded".into(),
        )),
        FeedbackOutcome::NotFound => Err(AppError::NotFound("Meal not found".into())),
    }
}
