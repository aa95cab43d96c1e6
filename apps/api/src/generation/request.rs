use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::content_type::ContentType;
use crate::generation::duration::{DurationBucket, DurationInput};

/// The content style being generated. Unknown tags deserialize to `Unknown`
/// and are served by the generic handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum Persona {
    #[default]
    Generic,
    Prayer,
    Stoicism,
    Unknown,
}

impl Persona {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "GENERIC" | "DEFAULT" | "" => Persona::Generic,
            "PRAYER" | "DEVOTIONAL" | "ORACAO" => Persona::Prayer,
            "STOICISM" | "STOIC" | "PHILOSOPHICAL" | "ESTOICISMO" => Persona::Stoicism,
            _ => Persona::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::Generic => "GENERIC",
            Persona::Prayer => "PRAYER",
            Persona::Stoicism => "STOICISM",
            Persona::Unknown => "UNKNOWN",
        }
    }
}

impl From<String> for Persona {
    fn from(tag: String) -> Self {
        Persona::from_tag(&tag)
    }
}

fn default_language() -> String {
    "pt_BR".to_string()
}

fn default_true() -> bool {
    true
}

/// Request body for content generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    #[serde(default)]
    pub process_id: Option<String>,
    #[serde(default)]
    pub persona: Persona,
    #[serde(default)]
    pub content_types: BTreeSet<ContentType>,

    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub video_topic: Option<String>,
    #[serde(default)]
    pub target_audience: Option<String>,
    #[serde(default)]
    pub tone_style: Option<String>,
    #[serde(default)]
    pub additional_context: Option<String>,

    // Devotional persona
    #[serde(default)]
    pub prayer_type: Option<String>,
    #[serde(default)]
    pub prayer_style: Option<String>,
    #[serde(default)]
    pub bible_passage: Option<String>,
    #[serde(default)]
    pub bible_version: Option<String>,
    #[serde(default)]
    pub occasion: Option<String>,
    #[serde(default)]
    pub personalization_name: Option<String>,

    // Philosophical persona
    #[serde(default)]
    pub philosopher_name: Option<String>,
    #[serde(default)]
    pub stoic_concept: Option<String>,
    #[serde(default)]
    pub practical_application: Option<String>,

    #[serde(default)]
    pub duration: Option<DurationInput>,
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub generate_audio: bool,
    #[serde(default)]
    pub generate_short_version: bool,
    #[serde(default = "default_true")]
    pub include_call_to_action: bool,
    #[serde(default = "default_true")]
    pub optimize_for_seo: bool,
}

/// Trimmed, non-empty view of an optional text field.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl GenerationRequest {
    /// Rejects requests that cannot be composed into a prompt. Runs before any
    /// external call.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.content_types.is_empty() {
            return Err(AppError::Validation(
                "At least one content type must be requested".to_string(),
            ));
        }
        match self.persona {
            Persona::Prayer | Persona::Stoicism => {
                if non_blank(&self.theme).is_none() {
                    return Err(AppError::Validation(format!(
                        "A theme is required for {} content",
                        self.persona.as_str()
                    )));
                }
            }
            Persona::Generic | Persona::Unknown => {
                if non_blank(&self.title).is_none() && non_blank(&self.theme).is_none() {
                    return Err(AppError::Validation(
                        "A title or theme is required".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Assigns a fresh process id when the caller did not supply one.
    pub fn ensure_process_id(&mut self) -> &str {
        if non_blank(&self.process_id).is_none() {
            self.process_id = Some(Uuid::new_v4().to_string());
        }
        self.process_id.as_deref().unwrap_or_default()
    }

    pub fn process_id(&self) -> &str {
        non_blank(&self.process_id).unwrap_or_default()
    }

    pub fn duration_bucket(&self) -> DurationBucket {
        DurationBucket::resolve(self.duration.as_ref())
    }

    pub fn wants(&self, content_type: ContentType) -> bool {
        self.content_types.contains(&content_type)
    }

    /// A short variant is produced only when asked for and when the target
    /// length is not already short-form.
    pub fn wants_short_variant(&self) -> bool {
        (self.wants(ContentType::ShortsIdea) || self.generate_short_version)
            && self.duration_bucket().allows_short_variant()
    }
}
