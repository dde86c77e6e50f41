use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::diary_entry::{DiaryEntry, DiaryEntryInput, UpsertOutcome};
use crate::models::user::{NewUser, User};
use crate::services::calendar::UtcRange;

const ENTRY_COLUMNS: &str =
    "id, owner_id, entry_date, content, emotion, weather, created_at, updated_at";

#[derive(FromRow)]
struct UpsertedEntry {
    #[sqlx(flatten)]
    entry: DiaryEntry,
    inserted: bool,
}

pub async fn insert_user(db: &PgPool, user: &NewUser) -> AppResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, user_id, password_hash, display_name)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&user.user_id)
    .bind(&user.password_hash)
    .bind(&user.display_name)
    .fetch_optional(db)
    .await?;

    Ok(user)
}

pub async fn find_user_by_login(db: &PgPool, user_id: &str) -> AppResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(db)
        .await?;
    Ok(user)
}

pub async fn find_user_by_id(db: &PgPool, id: Uuid) -> AppResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(user)
}

/// Single-statement upsert keyed on `(owner_id, day_start)`. `xmax = 0`
/// holds only for a freshly inserted row version.
pub async fn upsert_entry(
    db: &PgPool,
    owner_id: Uuid,
    input: &DiaryEntryInput,
) -> AppResult<(DiaryEntry, UpsertOutcome)> {
    let row = sqlx::query_as::<_, UpsertedEntry>(&format!(
        r#"
        INSERT INTO diary_entries (id, owner_id, day_start, entry_date, content, emotion, weather)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (owner_id, day_start) DO UPDATE SET
            entry_date = EXCLUDED.entry_date,
            content = EXCLUDED.content,
            emotion = EXCLUDED.emotion,
            weather = EXCLUDED.weather,
            updated_at = NOW()
        RETURNING {ENTRY_COLUMNS}, (xmax = 0) AS inserted
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind(input.day_start)
    .bind(input.date)
    .bind(&input.content)
    .bind(input.emotion)
    .bind(input.weather)
    .fetch_one(db)
    .await?;

    let outcome = if row.inserted {
        UpsertOutcome::Created
    } else {
        UpsertOutcome::Updated
    };
    Ok((row.entry, outcome))
}

pub async fn entries_in_range(
    db: &PgPool,
    owner_id: Uuid,
    range: UtcRange,
) -> AppResult<Vec<DiaryEntry>> {
    let entries = sqlx::query_as::<_, DiaryEntry>(&format!(
        r#"
        SELECT {ENTRY_COLUMNS} FROM diary_entries
        WHERE owner_id = $1 AND entry_date >= $2 AND entry_date < $3
        ORDER BY entry_date ASC
        "#
    ))
    .bind(owner_id)
    .bind(range.start)
    .bind(range.end)
    .fetch_all(db)
    .await?;

    Ok(entries)
}

pub async fn all_entries(db: &PgPool, owner_id: Uuid) -> AppResult<Vec<DiaryEntry>> {
    let entries = sqlx::query_as::<_, DiaryEntry>(&format!(
        r#"
        SELECT {ENTRY_COLUMNS} FROM diary_entries
        WHERE owner_id = $1
        ORDER BY entry_date DESC
        "#
    ))
    .bind(owner_id)
    .fetch_all(db)
    .await?;

    Ok(entries)
}

pub async fn ping(db: &PgPool) -> bool {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(db)
        .await
        .is_ok()
}
