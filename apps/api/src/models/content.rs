use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted bundle, owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContentRecord {
    pub content_id: Uuid,
    pub owner_id: Uuid,
    pub process_id: String,
    pub title: String,
    pub persona: String,
    pub text: String,
    pub text_short: String,
    pub description: String,
    pub tags: String,
    pub audio: Option<String>,
    /// Every parsed section, keyed by content type.
    pub additional_content: Value,
    pub prompt_used: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentRecord {
    pub fn has_audio(&self) -> bool {
        self.audio.as_deref().is_some_and(|a| !a.trim().is_empty())
    }
}
