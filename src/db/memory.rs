use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::diary_entry::{DiaryEntry, DiaryEntryInput, UpsertOutcome};
use crate::models::user::{NewUser, User};
use crate::services::calendar::{day_start, UtcRange};

/// Process-local store used for development runs without Postgres and in tests.
/// A single lock covers users and entries, so every operation is atomic.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    users: Vec<User>,
    entries: Vec<DiaryEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user: &NewUser) -> Option<User> {
        let mut state = self.inner.lock().await;
        if state.users.iter().any(|u| u.user_id == user.user_id) {
            return None;
        }

        let now = Utc::now();
        let stored = User {
            id: Uuid::new_v4(),
            user_id: user.user_id.clone(),
            password_hash: user.password_hash.clone(),
            display_name: user.display_name.clone(),
            created_at: now,
            updated_at: now,
        };
        state.users.push(stored.clone());
        Some(stored)
    }

    pub async fn find_user_by_login(&self, user_id: &str) -> Option<User> {
        let state = self.inner.lock().await;
        state.users.iter().find(|u| u.user_id == user_id).cloned()
    }

    pub async fn find_user_by_id(&self, id: Uuid) -> Option<User> {
        let state = self.inner.lock().await;
        state.users.iter().find(|u| u.id == id).cloned()
    }

    pub async fn upsert_entry(
        &self,
        owner_id: Uuid,
        input: &DiaryEntryInput,
    ) -> (DiaryEntry, UpsertOutcome) {
        let mut state = self.inner.lock().await;
        let now = Utc::now();

        if let Some(existing) = state
            .entries
            .iter_mut()
            .find(|e| e.owner_id == owner_id && day_start(e.date) == input.day_start)
        {
            existing.content = input.content.clone();
            existing.emotion = input.emotion;
            existing.weather = input.weather;
            existing.date = input.date;
            existing.updated_at = now;
            return (existing.clone(), UpsertOutcome::Updated);
        }

        let entry = DiaryEntry {
            id: Uuid::new_v4(),
            owner_id,
            date: input.date,
            content: input.content.clone(),
            emotion: input.emotion,
            weather: input.weather,
            created_at: now,
            updated_at: now,
        };
        state.entries.push(entry.clone());
        (entry, UpsertOutcome::Created)
    }

    pub async fn entries_in_range(&self, owner_id: Uuid, range: UtcRange) -> Vec<DiaryEntry> {
        let state = self.inner.lock().await;
        let mut entries: Vec<DiaryEntry> = state
            .entries
            .iter()
            .filter(|e| e.owner_id == owner_id && range.contains(&e.date))
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.date);
        entries
    }

    pub async fn all_entries(&self, owner_id: Uuid) -> Vec<DiaryEntry> {
        let state = self.inner.lock().await;
        let mut entries: Vec<DiaryEntry> = state
            .entries
            .iter()
            .filter(|e| e.owner_id == owner_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries
    }
}
