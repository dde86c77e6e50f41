//! Persistence for users and diary entries.
//!
//! `Store` dispatches to Postgres in deployments and to [`MemoryStore`] when no
//! `DATABASE_URL` is configured (local runs, tests).

pub mod memory;
pub mod pool;
pub mod postgres;

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::diary_entry::{DiaryEntry, DiaryEntryInput, UpsertOutcome};
use crate::models::user::{NewUser, User};
use crate::services::calendar::UtcRange;

pub use memory::MemoryStore;

#[derive(Clone)]
pub enum Store {
    Postgres(PgPool),
    Memory(MemoryStore),
}

impl Store {
    pub fn backend(&self) -> &'static str {
        match self {
            Store::Postgres(_) => "postgres",
            Store::Memory(_) => "memory",
        }
    }

    /// Returns `None` when the login name is already taken.
    pub async fn insert_user(&self, user: &NewUser) -> AppResult<Option<User>> {
        match self {
            Store::Postgres(db) => postgres::insert_user(db, user).await,
            Store::Memory(mem) => Ok(mem.insert_user(user).await),
        }
    }

    pub async fn find_user_by_login(&self, user_id: &str) -> AppResult<Option<User>> {
        match self {
            Store::Postgres(db) => postgres::find_user_by_login(db, user_id).await,
            Store::Memory(mem) => Ok(mem.find_user_by_login(user_id).await),
        }
    }

    pub async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        match self {
            Store::Postgres(db) => postgres::find_user_by_id(db, id).await,
            Store::Memory(mem) => Ok(mem.find_user_by_id(id).await),
        }
    }

    pub async fn upsert_entry(
        &self,
        owner_id: Uuid,
        input: &DiaryEntryInput,
    ) -> AppResult<(DiaryEntry, UpsertOutcome)> {
        match self {
            Store::Postgres(db) => postgres::upsert_entry(db, owner_id, input).await,
            Store::Memory(mem) => Ok(mem.upsert_entry(owner_id, input).await),
        }
    }

    /// Entries with `range.start <= date < range.end`, oldest first.
    pub async fn entries_in_range(
        &self,
        owner_id: Uuid,
        range: UtcRange,
    ) -> AppResult<Vec<DiaryEntry>> {
        match self {
            Store::Postgres(db) => postgres::entries_in_range(db, owner_id, range).await,
            Store::Memory(mem) => Ok(mem.entries_in_range(owner_id, range).await),
        }
    }

    /// Every entry of the owner, newest first.
    pub async fn all_entries(&self, owner_id: Uuid) -> AppResult<Vec<DiaryEntry>> {
        match self {
            Store::Postgres(db) => postgres::all_entries(db, owner_id).await,
            Store::Memory(mem) => Ok(mem.all_entries(owner_id).await),
        }
    }

    pub async fn ping(&self) -> bool {
        match self {
            Store::Postgres(db) => postgres::ping(db).await,
            Store::Memory(_) => true,
        }
    }
}
