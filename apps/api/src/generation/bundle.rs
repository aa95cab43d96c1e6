use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::generation::content_type::ContentType;
use crate::generation::request::Persona;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BundleStatus {
    Completed,
    Error,
    NotFound,
    Unauthorized,
}

/// The assembled, status-tagged result of one generation attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedBundle {
    pub process_id: String,
    pub title: String,
    pub persona: Persona,
    pub text: String,
    pub text_short: String,
    pub description: String,
    pub tags: String,
    /// Inline `data:audio/...;base64,` payload or an external reference.
    pub audio: Option<String>,
    /// Every section the reply labeled, including the ones copied above.
    pub generated_content: BTreeMap<ContentType, String>,
    pub status: BundleStatus,
    pub message: String,
    /// Whether the bundle reached the content store.
    pub saved: bool,
    pub content_id: Option<Uuid>,
}

impl GeneratedBundle {
    /// A bundle carrying no content, only a status and a reason.
    pub fn failed(
        process_id: impl Into<String>,
        persona: Persona,
        status: BundleStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            process_id: process_id.into(),
            title: String::new(),
            persona,
            text: String::new(),
            text_short: String::new(),
            description: String::new(),
            tags: String::new(),
            audio: None,
            generated_content: BTreeMap::new(),
            status,
            message: message.into(),
            saved: false,
            content_id: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == BundleStatus::Completed
    }

    /// Text handed to speech synthesis: the narration script when present,
    /// otherwise the main script.
    pub fn narration_text(&self) -> &str {
        self.generated_content
            .get(&ContentType::AudioScript)
            .map(String::as_str)
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_bundle_is_empty() {
        let bundle = GeneratedBundle::failed("p1", Persona::Generic, BundleStatus::Error, "boom");
        assert!(!bundle.is_completed());
        assert!(bundle.text.is_empty());
        assert!(bundle.generated_content.is_empty());
        assert!(!bundle.saved);
    }

    #[test]
    fn test_status_serializes_upper_case() {
        let json = serde_json::to_string(&BundleStatus::NotFound).unwrap();
        assert_eq!(json, "\"NOT_FOUND\"");
    }

    #[test]
    fn test_narration_prefers_audio_script() {
        let mut bundle = GeneratedBundle::failed("p", Persona::Generic, BundleStatus::Completed, "");
        bundle.text = "roteiro".to_string();
        assert_eq!(bundle.narration_text(), "roteiro");
        bundle
            .generated_content
            .insert(ContentType::AudioScript, "locução".to_string());
        assert_eq!(bundle.narration_text(), "locução");
    }
}
