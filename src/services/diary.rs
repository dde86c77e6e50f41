//! Diary rules: one entry per owner per UTC day, last write wins.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::Store;
use crate::error::{AppError, AppResult};
use crate::models::diary_entry::{
    DiaryEntry, DiaryEntryInput, Emotion, UpsertEntryRequest, UpsertOutcome, Weather,
};
use crate::services::calendar::{day_range, effective_date, parse_month};

/// Presence check that ignores surrounding whitespace. Returns the trimmed
/// value; `content` itself is stored untrimmed.
fn required<'a>(value: &'a Option<String>, field: &str) -> AppResult<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("{field} is required"))),
    }
}

/// Checks a raw submission and pins it to its UTC day.
pub fn validate_entry(req: &UpsertEntryRequest, now: DateTime<Utc>) -> AppResult<DiaryEntryInput> {
    required(&req.content, "content")?;
    let emotion: Emotion = required(&req.emotion, "emotion")?.parse()?;
    let weather: Weather = required(&req.weather, "weather")?.parse()?;
    let date = effective_date(req.date.as_deref(), now)?;

    Ok(DiaryEntryInput {
        // Stored as submitted; only the emptiness check trims.
        content: req.content.clone().unwrap_or_default(),
        emotion,
        weather,
        date,
        day_start: day_range(date)?.start,
    })
}

pub async fn upsert_entry(
    store: &Store,
    owner_id: Uuid,
    req: &UpsertEntryRequest,
    now: DateTime<Utc>,
) -> AppResult<(DiaryEntry, UpsertOutcome)> {
    let input = validate_entry(req, now)?;
    let (entry, outcome) = store.upsert_entry(owner_id, &input).await?;

    tracing::info!(
        owner_id = %owner_id,
        entry_id = %entry.id,
        day = %input.day_start.date_naive(),
        outcome = ?outcome,
        "Diary entry saved"
    );
    Ok((entry, outcome))
}

pub async fn entries_for_month(
    store: &Store,
    owner_id: Uuid,
    year: &str,
    month: &str,
) -> AppResult<Vec<DiaryEntry>> {
    let range = parse_month(year, month)?;
    tracing::debug!(
        owner_id = %owner_id,
        start = %range.start,
        end = %range.end,
        "Month query"
    );
    store.entries_in_range(owner_id, range).await
}

pub async fn all_entries(store: &Store, owner_id: Uuid) -> AppResult<Vec<DiaryEntry>> {
    store.all_entries(owner_id).await
}
