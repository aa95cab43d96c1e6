//! Content generation — orchestrates the full pipeline.
//!
//! Flow: validate → pick handler → compose prompt → invoke model →
//!       parse + assemble → optional speech → persist COMPLETED bundles.
//!
//! Model failures produce an ERROR bundle rather than an HTTP error, and
//! nothing is persisted for them. A storage failure after a successful
//! generation is logged and reported on the bundle (`saved = false`).

use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::assembler::GENERATION_FAILED_MESSAGE;
use crate::generation::bundle::{BundleStatus, GeneratedBundle};
use crate::generation::composer::{render, Substitutions};
use crate::generation::prompts::{
    description_prompt, fallback_description, short_version_prompt, short_version_title,
    Language, SHORT_VERSION_SOURCE_LIMIT,
};
use crate::generation::request::{GenerationRequest, Persona};
use crate::llm_client::prompts::SINGLE_ARTIFACT_SYSTEM;
use crate::models::content::ContentRecord;
use crate::state::AppState;
use crate::tts::audio_data_url;

const NOT_SAVED_NOTICE: &str = "conteúdo não foi salvo";

/// Result of a description enhancement.
#[derive(Debug, Clone, Serialize)]
pub struct EnhancedDescription {
    pub content_id: Uuid,
    pub description: String,
    /// False when the model call failed and the fixed description was used.
    pub generated: bool,
    pub has_audio: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Full generation
// ────────────────────────────────────────────────────────────────────────────

pub async fn generate_content(
    state: &AppState,
    owner_id: Uuid,
    mut request: GenerationRequest,
) -> Result<GeneratedBundle, AppError> {
    request.validate()?;
    let process_id = request.ensure_process_id().to_string();

    let handler = state.registry.get(request.persona);
    info!(
        "Generating {} content for process {process_id} (handler {}, {} sections, {})",
        request.persona.as_str(),
        handler.persona().as_str(),
        request.content_types.len(),
        request.duration_bucket().name()
    );

    let prompt = handler.prepare_prompt(&request).await;

    let reply = match state.invoker.invoke(&prompt).await {
        Ok(reply) => reply,
        Err(e) => {
            error!("Generation failed for process {process_id}: {e}");
            return Ok(GeneratedBundle::failed(
                process_id,
                request.persona,
                BundleStatus::Error,
                GENERATION_FAILED_MESSAGE,
            ));
        }
    };

    let mut bundle = handler.process_response(&reply, &request);
    if !bundle.is_completed() {
        warn!("Process {process_id} finished with status {:?}", bundle.status);
        return Ok(bundle);
    }

    if request.generate_audio {
        bundle.audio = synthesize_audio(state, bundle.narration_text(), &process_id).await;
    }

    match state.lifecycle.save(&bundle, owner_id, &prompt).await {
        Ok(record) => {
            bundle.saved = true;
            bundle.content_id = Some(record.content_id);
        }
        Err(e) => {
            error!("Generated content for process {process_id} could not be saved: {e}");
            bundle.message = format!("{} ({NOT_SAVED_NOTICE})", bundle.message);
        }
    }

    Ok(bundle)
}

/// Speech is best effort: any failure leaves the bundle without audio.
async fn synthesize_audio(state: &AppState, text: &str, process_id: &str) -> Option<String> {
    let Some(speech) = state.speech.as_ref() else {
        warn!("Audio requested for process {process_id} but no speech provider is configured");
        return None;
    };
    match speech.synthesize(text).await {
        Ok(bytes) => {
            info!("Synthesized {} bytes of audio for process {process_id}", bytes.len());
            Some(audio_data_url(&bytes))
        }
        Err(e) => {
            error!("Speech synthesis failed for process {process_id}: {e}");
            None
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Derived artifacts
// ────────────────────────────────────────────────────────────────────────────

async fn owned_record(
    state: &AppState,
    owner_id: Uuid,
    content_id: Uuid,
) -> Result<ContentRecord, AppError> {
    state
        .lifecycle
        .get_owned(content_id, owner_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Content {content_id} not found")))
}

fn truncated(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Condenses a stored script into a Shorts-length script and stores it as a
/// new record of its own.
pub async fn generate_short_version(
    state: &AppState,
    owner_id: Uuid,
    content_id: Uuid,
    language: Language,
) -> Result<GeneratedBundle, AppError> {
    let record = owned_record(state, owner_id, content_id).await?;
    if record.text.trim().is_empty() {
        return Err(AppError::Validation(format!(
            "Content {content_id} has no script to shorten"
        )));
    }

    let mut subs = Substitutions::new();
    subs.set("title", record.title.clone())
        .set("script", truncated(&record.text, SHORT_VERSION_SOURCE_LIMIT));
    let prompt = render(short_version_prompt(language), &subs).text;

    let short = state
        .invoker
        .invoke_with_system(&prompt, SINGLE_ARTIFACT_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;
    let short = short.trim().to_string();

    let mut bundle = GeneratedBundle::failed(
        Uuid::new_v4().to_string(),
        Persona::from_tag(&record.persona),
        BundleStatus::Completed,
        "Versão curta gerada com sucesso",
    );
    bundle.title = short_version_title(&record.title, language);
    bundle.text = short.clone();
    bundle.text_short = short;
    bundle.description = record.description.clone();
    bundle.tags = record.tags.clone();

    let saved = state.lifecycle.save(&bundle, owner_id, &prompt).await?;
    info!("Short version {} created from content {content_id}", saved.content_id);
    bundle.saved = true;
    bundle.content_id = Some(saved.content_id);
    Ok(bundle)
}

/// Rewrites the description of a stored record and optionally attaches
/// narration audio synthesized from its script.
pub async fn enhance_description(
    state: &AppState,
    owner_id: Uuid,
    content_id: Uuid,
    with_audio: bool,
    language: Language,
) -> Result<EnhancedDescription, AppError> {
    let record = owned_record(state, owner_id, content_id).await?;

    let mut subs = Substitutions::new();
    subs.set("title", record.title.clone())
        .set("script", truncated(&record.text, SHORT_VERSION_SOURCE_LIMIT));
    let prompt = render(description_prompt(language), &subs).text;

    let (description, generated) = match state
        .invoker
        .invoke_with_system(&prompt, SINGLE_ARTIFACT_SYSTEM)
        .await
    {
        Ok(reply) => (reply.trim().to_string(), true),
        Err(e) => {
            warn!("Description generation failed for {content_id}, using fallback: {e}");
            (
                fallback_description(&record.title, Persona::from_tag(&record.persona)),
                false,
            )
        }
    };

    let audio = if with_audio {
        synthesize_audio(state, &record.text, &record.process_id).await
    } else {
        None
    };

    let updated = state
        .lifecycle
        .update_enhancements(content_id, owner_id, Some(&description), audio.as_deref())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Content {content_id} not found")))?;

    Ok(EnhancedDescription {
        content_id,
        description,
        generated,
        has_audio: updated.has_audio(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;

    use super::*;
    use crate::content::lifecycle::testing::record;
    use crate::content::store::testing::MemoryContentStore;
    use crate::generation::content_type::ContentType;
    use crate::generation::invoker::testing::{overloaded, ScriptedGenerator};
    use crate::llm_client::LlmError;
    use crate::state::testing::state_with;
    use crate::tts::testing::FakeSynthesizer;
    use crate::tts::SpeechSynthesizer;

    const REPLY: &str = "### TÍTULO DO VÍDEO\nA coragem de recomeçar\n\
                         ### DESCRIÇÃO DO VÍDEO\nUm vídeo sobre recomeços.\n\
                         ### TAGS\n#recomeço #coragem\n\
                         ### ROTEIRO\nHoje vamos falar de recomeços. Todo dia é uma chance.";

    fn request() -> GenerationRequest {
        GenerationRequest {
            persona: Persona::Generic,
            content_types: [ContentType::Title, ContentType::Script, ContentType::Tags]
                .into_iter()
                .collect(),
            theme: Some("Recomeços".to_string()),
            language: "pt_BR".to_string(),
            include_call_to_action: true,
            optimize_for_seo: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_completed_bundle_is_saved_for_owner() {
        let store = Arc::new(MemoryContentStore::default());
        let generator = Arc::new(ScriptedGenerator::new(REPLY));
        let state = state_with(generator.clone(), store.clone(), None);
        let owner = Uuid::new_v4();

        let bundle = generate_content(&state, owner, request()).await.unwrap();

        assert!(bundle.is_completed());
        assert!(bundle.saved);
        assert_eq!(bundle.title, "A coragem de recomeçar");
        assert_eq!(bundle.tags, "#recomeço #coragem");
        assert!(!bundle.process_id.is_empty());

        let stored = store.all();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].owner_id, owner);
        assert_eq!(Some(stored[0].content_id), bundle.content_id);
        assert!(generator.last_prompt().unwrap().contains("Recomeços"));
    }

    #[tokio::test]
    async fn test_invalid_request_never_calls_model() {
        let generator = Arc::new(ScriptedGenerator::new(REPLY));
        let state = state_with(
            generator.clone(),
            Arc::new(MemoryContentStore::default()),
            None,
        );
        let mut req = request();
        req.content_types.clear();

        let result = generate_content(&state, Uuid::new_v4(), req).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_reply_yields_error_bundle_and_nothing_saved() {
        let store = Arc::new(MemoryContentStore::default());
        let state = state_with(Arc::new(ScriptedGenerator::new("")), store.clone(), None);

        let bundle = generate_content(&state, Uuid::new_v4(), request()).await.unwrap();

        assert_eq!(bundle.status, BundleStatus::Error);
        assert_eq!(bundle.message, GENERATION_FAILED_MESSAGE);
        assert!(!bundle.saved);
        assert_eq!(store.insert_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_outage_yields_error_bundle() {
        let generator = Arc::new(
            ScriptedGenerator::new(REPLY)
                .then(Err(overloaded()))
                .then(Err(overloaded())),
        );
        let store = Arc::new(MemoryContentStore::default());
        let state = state_with(generator.clone(), store.clone(), None);

        let bundle = generate_content(&state, Uuid::new_v4(), request()).await.unwrap();

        assert_eq!(bundle.status, BundleStatus::Error);
        assert_eq!(generator.call_count(), 2);
        assert_eq!(store.insert_count(), 0);
    }

    #[tokio::test]
    async fn test_storage_failure_degrades_to_unsaved_bundle() {
        let store = Arc::new(MemoryContentStore::failing());
        let state = state_with(Arc::new(ScriptedGenerator::new(REPLY)), store.clone(), None);

        let bundle = generate_content(&state, Uuid::new_v4(), request()).await.unwrap();

        assert!(bundle.is_completed());
        assert!(!bundle.saved);
        assert!(bundle.content_id.is_none());
        assert!(bundle.message.contains(NOT_SAVED_NOTICE));
        assert_eq!(store.insert_count(), 1);
    }

    #[tokio::test]
    async fn test_audio_attached_when_requested() {
        let speech = Arc::new(FakeSynthesizer::working());
        let state = state_with(
            Arc::new(ScriptedGenerator::new(REPLY)),
            Arc::new(MemoryContentStore::default()),
            Some(speech.clone() as Arc<dyn SpeechSynthesizer>),
        );
        let mut req = request();
        req.generate_audio = true;

        let bundle = generate_content(&state, Uuid::new_v4(), req).await.unwrap();

        assert_eq!(bundle.audio, Some(audio_data_url(b"ID3fake-mp3")));
        assert_eq!(speech.calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_audio_failure_keeps_bundle_completed() {
        let store = Arc::new(MemoryContentStore::default());
        let state = state_with(
            Arc::new(ScriptedGenerator::new(REPLY)),
            store.clone(),
            Some(Arc::new(FakeSynthesizer::broken())),
        );
        let mut req = request();
        req.generate_audio = true;

        let bundle = generate_content(&state, Uuid::new_v4(), req).await.unwrap();

        assert!(bundle.is_completed());
        assert!(bundle.audio.is_none());
        assert!(bundle.saved);
        assert!(!store.all()[0].has_audio());
    }

    #[tokio::test]
    async fn test_short_version_saved_as_new_record() {
        let store = Arc::new(MemoryContentStore::default());
        let owner = Uuid::new_v4();
        let original = record(owner, "Recomeços", Duration::hours(1));
        store.records.lock().unwrap().push(original.clone());
        let generator = Arc::new(ScriptedGenerator::new("  Versão rápida.  "));
        let state = state_with(generator.clone(), store.clone(), None);

        let bundle = generate_short_version(&state, owner, original.content_id, Language::English)
            .await
            .unwrap();

        assert_eq!(bundle.title, "Recomeços (Short Version)");
        assert_eq!(bundle.text, "Versão rápida.");
        assert!(bundle.saved);
        assert_eq!(store.all().len(), 2);
        assert!(generator.last_prompt().unwrap().contains(&original.text));
    }

    #[tokio::test]
    async fn test_short_version_of_foreign_record_is_not_found() {
        let store = Arc::new(MemoryContentStore::default());
        let original = record(Uuid::new_v4(), "Alheio", Duration::hours(1));
        store.records.lock().unwrap().push(original.clone());
        let state = state_with(Arc::new(ScriptedGenerator::new("x")), store, None);

        let result =
            generate_short_version(&state, Uuid::new_v4(), original.content_id, Language::Portuguese)
                .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_description_falls_back_when_model_fails() {
        let store = Arc::new(MemoryContentStore::default());
        let owner = Uuid::new_v4();
        let original = record(owner, "Paz interior", Duration::hours(1));
        store.records.lock().unwrap().push(original.clone());
        let generator = Arc::new(ScriptedGenerator::new("unused").then(Err(LlmError::Api {
            status: 400,
            message: "bad request".to_string(),
        })));
        let state = state_with(generator, store.clone(), None);

        let result = enhance_description(
            &state,
            owner,
            original.content_id,
            false,
            Language::Portuguese,
        )
        .await
        .unwrap();

        assert!(!result.generated);
        assert!(result.description.contains("Paz interior"));
        assert_eq!(store.all()[0].description, result.description);
    }

    #[tokio::test]
    async fn test_description_with_audio_updates_record() {
        let store = Arc::new(MemoryContentStore::default());
        let owner = Uuid::new_v4();
        let original = record(owner, "Gratidão", Duration::hours(1));
        store.records.lock().unwrap().push(original.clone());
        let state = state_with(
            Arc::new(ScriptedGenerator::new("🌅 Nova descrição")),
            store.clone(),
            Some(Arc::new(FakeSynthesizer::working())),
        );

        let result = enhance_description(
            &state,
            owner,
            original.content_id,
            true,
            Language::Portuguese,
        )
        .await
        .unwrap();

        assert!(result.generated);
        assert!(result.has_audio);
        let stored = &store.all()[0];
        assert_eq!(stored.description, "🌅 Nova descrição");
        assert!(stored.has_audio());
    }
}
