use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::reminder::config::ValidationError;
use crate::reminder::submit::SubmitError;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Reminder could not be saved: {0}")]
    ReminderFailed(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Validation(e) => e.into(),
            SubmitError::Persistence(e) => {
                tracing::error!(error = %e, "Reminder persistence failed");
                AppError::ReminderFailed(e.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::ReminderFailed(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::Store(e) => {
                tracing::error!(error = %e, "Store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };

        let body = json!({
            "error": {
                "message": message,
                "code": status.as_u16(),
            }
        });

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AppError::NotFound("meal".into()), StatusCode::NOT_FOUND),
            (ValidationError::MissingTrigger.into(), StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::Conflict("dup".into()), StatusCode::CONFLICT),
            (
                SubmitError::Persistence(StoreError::Rejected("down".into())).into(),
                StatusCode::BAD_GATEWAY,
            ),
            (
                StoreError::Rejected("down".into()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_validation_message_is_user_facing() {
        let err: AppError = ValidationError::MissingEmail.into();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Please enter your email address."));
    }

    #[test]
    fn test_persistence_failure_keeps_store_reason() {
        let err: AppError = SubmitError::Persistence(StoreError::Rejected("quota exceeded".into())).into();
        assert_eq!(err.to_string(), "Reminder could not be saved: quota exceeded");
    }
}
