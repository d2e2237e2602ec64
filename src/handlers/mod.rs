pub mod health;
pub mod meals;
pub mod moods;
pub mod reminders;
pub mod reports;

use chrono::{Datelike, NaiveDate, Utc};
use uuid::Uuid;

use crate::analytics::aggregate::{DateWindow, NamedRange};
use crate::analytics::normalize::{normalize_batch, NormalizedBatch};
use crate::dto::RangeQuery;
use crate::error::{AppError, AppResult};
use crate::store::MoodSource;

pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Explicit `start`/`end` wins over a named `range`; with neither, `fallback`.
pub(crate) fn resolve_window(
    query: &RangeQuery,
    fallback: NamedRange,
    today: NaiveDate,
) -> AppResult<(DateWindow, Option<NamedRange>)> {
    match (query.start, query.end) {
        (Some(start), Some(end)) => {
            let window = DateWindow::new(start, end);
            if window.is_inverted() {
                return Err(AppError::Validation(
                    "start must not be after end".into(),
                ));
            }
            Ok((window, None))
        }
        (Some(_), None) | (None, Some(_)) => Err(AppError::Validation(
            "start and end must be given together".into(),
        )),
        (None, None) => {
            let range = match query.range.as_deref() {
                Some(raw) => NamedRange::parse(raw).ok_or_else(|| {
                    AppError::Validation(format!("Unknown range {:?}", raw))
                })?,
                None => fallback,
            };
            Ok((range.window_ending(today), Some(range)))
        }
    }
}

/// Fetch and normalize a user's mood history. Labels are attributed to the
/// year of `today`.
pub(crate) async fn load_mood_history<S>(
    store: &S,
    user_id: Uuid,
    today: NaiveDate,
) -> AppResult<NormalizedBatch>
where
    S: MoodSource + ?Sized,
{
    let raw = store.fetch_mood_entries(user_id).await?;
    Ok(normalize_batch(user_id, &raw, today.year()))
}
