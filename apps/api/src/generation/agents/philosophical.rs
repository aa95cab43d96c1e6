//! Philosophical persona: stoic reflections in the voice of a chosen
//! philosopher.

use std::sync::Arc;

use async_trait::async_trait;

use crate::generation::agents::devotional::hashtag_word;
use crate::generation::agents::AgentHandler;
use crate::generation::bundle::GeneratedBundle;
use crate::generation::composer::{base_substitutions, compose, Substitutions};
use crate::generation::parser::{HeadingTable, GENERIC_HEADINGS};
use crate::generation::request::{GenerationRequest, Persona};
use crate::generation::style_catalog::{StyleCatalog, StyleFamily};
use crate::generation::templates::{load_for_persona, TemplateStore};

pub const STOIC_DEFAULT_TITLE: &str = "Conteúdo Estoico";
const BASE_HASHTAGS: &str = "#estoicismo #filosofia #sabedoria";

pub struct PhilosophicalHandler {
    catalog: Arc<StyleCatalog>,
    templates: Arc<dyn TemplateStore>,
}

impl PhilosophicalHandler {
    pub fn new(catalog: Arc<StyleCatalog>, templates: Arc<dyn TemplateStore>) -> Self {
        Self { catalog, templates }
    }

    fn philosopher(&self, request: &GenerationRequest) -> &'static str {
        self.catalog
            .display_name(StyleFamily::Philosopher, request.philosopher_name.as_deref())
    }
}

#[async_trait]
impl AgentHandler for PhilosophicalHandler {
    fn persona(&self) -> Persona {
        Persona::Stoicism
    }

    // Stoic videos use the same section headings as generic ones.
    fn headings(&self) -> HeadingTable {
        GENERIC_HEADINGS
    }

    fn default_title(&self, _request: &GenerationRequest) -> String {
        STOIC_DEFAULT_TITLE.to_string()
    }

    fn substitutions(&self, request: &GenerationRequest) -> Substitutions {
        let style = self
            .catalog
            .characteristics_for(StyleFamily::Philosopher, request.philosopher_name.as_deref());

        let mut subs = base_substitutions(
            request,
            self.headings(),
            style,
            self.catalog.agent_guidelines(Persona::Stoicism),
        );
        subs.set("philosopher", self.philosopher(request))
            .set("philosopherStyle", style)
            .set_field("stoicConcept", &request.stoic_concept, "")
            .set_field("practicalApplication", &request.practical_application, "");
        subs
    }

    async fn prepare_prompt(&self, request: &GenerationRequest) -> String {
        let template = load_for_persona(self.templates.as_ref(), Persona::Stoicism).await;
        compose(&template, request, &self.substitutions(request))
    }

    fn enhance(&self, mut bundle: GeneratedBundle, request: &GenerationRequest) -> GeneratedBundle {
        let philosopher = self.philosopher(request);
        if bundle.tags.trim().is_empty() {
            let word = hashtag_word(philosopher);
            bundle.tags = if word.is_empty() {
                BASE_HASHTAGS.to_string()
            } else {
                format!("{BASE_HASHTAGS} #{word}")
            };
        }
        bundle.message = format!("Conteúdo estoico gerado com sucesso ({philosopher})");
        bundle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::composer::render;
    use crate::generation::content_type::ContentType;
    use crate::generation::templates::embedded_template;
    use crate::generation::templates::testing::UnavailableTemplateStore;

    fn handler() -> PhilosophicalHandler {
        PhilosophicalHandler::new(
            Arc::new(StyleCatalog::builtin()),
            Arc::new(UnavailableTemplateStore),
        )
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            process_id: Some("stoa-1".to_string()),
            persona: Persona::Stoicism,
            content_types: ContentType::ALL.into_iter().collect(),
            title: Some("O que depende de nós".to_string()),
            theme: Some("Ansiedade".to_string()),
            notes: Some("Citar o Enchiridion".to_string()),
            video_topic: Some("Controle".to_string()),
            target_audience: Some("Adultos".to_string()),
            tone_style: Some("Firme".to_string()),
            additional_context: Some("Parte 2".to_string()),
            philosopher_name: Some("Epicteto".to_string()),
            stoic_concept: Some("Dicotomia do controle".to_string()),
            practical_application: Some("Trânsito".to_string()),
            language: "pt_BR".to_string(),
            generate_short_version: true,
            include_call_to_action: true,
            optimize_for_seo: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_prompt_has_no_leftover_placeholders() {
        let handler = handler();
        let req = request();
        let rendered = render(embedded_template(Persona::Stoicism), &handler.substitutions(&req));
        assert!(rendered.unresolved.is_empty(), "unresolved: {:?}", rendered.unresolved);
        let prompt = handler.prepare_prompt(&req).await;
        assert!(prompt.contains("na voz de Epicteto"));
        assert!(prompt.contains("Enchiridion"));
        assert!(prompt.contains("### ROTEIRO"));
    }

    #[tokio::test]
    async fn test_unknown_philosopher_uses_default_style() {
        let mut req = request();
        req.philosopher_name = Some("Nietzsche".to_string());
        let prompt = handler().prepare_prompt(&req).await;
        assert!(prompt.contains("na voz de Estoicismo Clássico"));
    }

    #[test]
    fn test_enhance_adds_default_hashtags() {
        let bundle = handler().process_response("### ROTEIRO\nTexto", &request());
        assert_eq!(bundle.tags, "#estoicismo #filosofia #sabedoria #epicteto");
        assert_eq!(bundle.message, "Conteúdo estoico gerado com sucesso (Epicteto)");
    }
}
