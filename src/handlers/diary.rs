use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::diary_entry::{
    DiaryEntry, UpsertEntryRequest, UpsertEntryResponse, UpsertOutcome,
};
use crate::services::diary;
use crate::AppState;

pub async fn upsert_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    WithRejection(Json(body), _): WithRejection<Json<UpsertEntryRequest>, AppError>,
) -> AppResult<(StatusCode, Json<UpsertEntryResponse>)> {
    let (entry, outcome) =
        diary::upsert_entry(&state.store, auth_user.id, &body, Utc::now()).await?;

    let (status, message) = match outcome {
        UpsertOutcome::Created => (StatusCode::CREATED, "Diary entry created"),
        UpsertOutcome::Updated => (StatusCode::OK, "Diary entry updated"),
    };

    Ok((
        status,
        Json(UpsertEntryResponse {
            message: message.into(),
            entry,
        }),
    ))
}

pub async fn list_month(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((year, month)): Path<(String, String)>,
) -> AppResult<Json<Vec<DiaryEntry>>> {
    let entries = diary::entries_for_month(&state.store, auth_user.id, &year, &month).await?;
    Ok(Json(entries))
}

pub async fn list_entries(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Vec<DiaryEntry>>> {
    let entries = diary::all_entries(&state.store, auth_user.id).await?;
    Ok(Json(entries))
}
