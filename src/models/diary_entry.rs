use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "emotion", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Heart,
    Happy,
    Low,
    Angry,
    Unknown,
}

impl Emotion {
    pub const ALL: [Emotion; 5] = [
        Emotion::Heart,
        Emotion::Happy,
        Emotion::Low,
        Emotion::Angry,
        Emotion::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Heart => "heart",
            Emotion::Happy => "happy",
            Emotion::Low => "low",
            Emotion::Angry => "angry",
            Emotion::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "emotion must be one of: {}",
                    Self::ALL.map(|e| e.as_str()).join(", ")
                ))
            })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "weather", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    Sunny,
    Cloudy,
    Rain,
    Snow,
}

impl Weather {
    pub const ALL: [Weather; 4] = [Weather::Sunny, Weather::Cloudy, Weather::Rain, Weather::Snow];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weather::Sunny => "sunny",
            Weather::Cloudy => "cloudy",
            Weather::Rain => "rain",
            Weather::Snow => "snow",
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weather {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|w| w.as_str() == s)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "weather must be one of: {}",
                    Self::ALL.map(|w| w.as_str()).join(", ")
                ))
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    pub id: Uuid,
    pub owner_id: Uuid,
    #[sqlx(rename = "entry_date")]
    pub date: DateTime<Utc>,
    pub content: String,
    pub emotion: Emotion,
    pub weather: Weather,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated submission. `date` is the effective timestamp, `day_start`
/// the midnight UTC that keys the one-entry-per-day rule.
#[derive(Debug, Clone)]
pub struct DiaryEntryInput {
    pub content: String,
    pub emotion: Emotion,
    pub weather: Weather,
    pub date: DateTime<Utc>,
    pub day_start: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

#[derive(Debug, Deserialize)]
pub struct UpsertEntryRequest {
    pub content: Option<String>,
    pub emotion: Option<String>,
    pub weather: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpsertEntryResponse {
    pub message: String,
    pub entry: DiaryEntry,
}
