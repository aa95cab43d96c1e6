//! Devotional persona: Christian prayers narrated on video.

use std::sync::Arc;

use async_trait::async_trait;

use crate::generation::agents::AgentHandler;
use crate::generation::bundle::GeneratedBundle;
use crate::generation::composer::{base_substitutions, compose, Substitutions};
use crate::generation::parser::{HeadingTable, PRAYER_HEADINGS};
use crate::generation::request::{non_blank, GenerationRequest, Persona};
use crate::generation::style_catalog::{normalize, StyleCatalog, StyleFamily};
use crate::generation::templates::{load_for_persona, TemplateStore};

const DEFAULT_BIBLE_PASSAGE: &str = "o que fizer sentido em relação ao tema";
const DEFAULT_BIBLE_VERSION: &str = "NVI";
const DEFAULT_AUDIENCE: &str = "Cristãos";
const PRAYER_SYMBOLS: [&str; 2] = ["🙏", "✝"];
const BASE_HASHTAGS: &str = "#oração #fé #espiritualidade";

pub struct DevotionalHandler {
    catalog: Arc<StyleCatalog>,
    templates: Arc<dyn TemplateStore>,
}

impl DevotionalHandler {
    pub fn new(catalog: Arc<StyleCatalog>, templates: Arc<dyn TemplateStore>) -> Self {
        Self { catalog, templates }
    }

    fn type_key(&self, request: &GenerationRequest) -> &'static str {
        self.catalog
            .lookup(StyleFamily::PrayerType, request.prayer_type.as_deref())
            .map(|e| e.key)
            .unwrap_or_default()
    }
}

/// Extra hashtags per prayer type, appended after the base set.
fn type_hashtags(type_key: &str) -> &'static str {
    match type_key {
        "BIBLICAL_REFLECTION" => " #reflexãoBíblica #estudo #revelação",
        "DEVOTIONAL_INTIMACY" => " #intimidade #devocional #presençaDeDeus",
        "FAITH_DECLARATION" => " #declaraçãoDeFé #vitória #promessas",
        "GRATITUDE_WORSHIP" => " #gratidão #adoração #louvor",
        "PASTORAL_COMFORT" => " #consolo #esperança #paz",
        "INTERCESSION" => " #intercessão #súplica #clamor",
        "REPENTANCE" => " #arrependimento #perdão #graça",
        _ => "",
    }
}

/// `Fé em tempos difíceis` → `feemtemposdificeis`
pub fn hashtag_word(text: &str) -> String {
    normalize(text)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

#[async_trait]
impl AgentHandler for DevotionalHandler {
    fn persona(&self) -> Persona {
        Persona::Prayer
    }

    fn headings(&self) -> HeadingTable {
        PRAYER_HEADINGS
    }

    fn default_title(&self, request: &GenerationRequest) -> String {
        format!(
            "Oração {} - {}",
            self.catalog
                .display_name(StyleFamily::PrayerType, request.prayer_type.as_deref()),
            non_blank(&request.theme).unwrap_or_default()
        )
    }

    fn substitutions(&self, request: &GenerationRequest) -> Substitutions {
        let characteristics = self.catalog.combined_prayer_characteristics(
            request.prayer_style.as_deref(),
            request.prayer_type.as_deref(),
        );

        let mut subs = base_substitutions(
            request,
            self.headings(),
            &characteristics,
            self.catalog.agent_guidelines(Persona::Prayer),
        );
        subs.set("prayerStyleCharacteristics", characteristics.clone())
            .set(
                "prayerType",
                self.catalog
                    .display_name(StyleFamily::PrayerType, request.prayer_type.as_deref()),
            )
            .set(
                "prayerStyle",
                self.catalog
                    .display_name(StyleFamily::PrayerStyle, request.prayer_style.as_deref()),
            )
            .set_field("biblePassage", &request.bible_passage, DEFAULT_BIBLE_PASSAGE)
            .set_field("bibleVersion", &request.bible_version, DEFAULT_BIBLE_VERSION)
            .set_field("occasion", &request.occasion, "")
            .set_field("personalizationName", &request.personalization_name, "")
            .set_field("targetAudience", &request.target_audience, DEFAULT_AUDIENCE);
        subs
    }

    async fn prepare_prompt(&self, request: &GenerationRequest) -> String {
        let template = load_for_persona(self.templates.as_ref(), Persona::Prayer).await;
        compose(&template, request, &self.substitutions(request))
    }

    fn enhance(&self, mut bundle: GeneratedBundle, request: &GenerationRequest) -> GeneratedBundle {
        if !PRAYER_SYMBOLS.iter().any(|s| bundle.title.contains(s)) {
            bundle.title = format!("🙏 {}", bundle.title);
        }

        if bundle.tags.trim().is_empty() {
            let theme = hashtag_word(non_blank(&request.theme).unwrap_or_default());
            let mut tags = BASE_HASHTAGS.to_string();
            if !theme.is_empty() {
                tags.push_str(&format!(" #{theme}"));
            }
            tags.push_str(type_hashtags(self.type_key(request)));
            bundle.tags = tags;
        }

        bundle.message = format!(
            "Oração gerada com sucesso no estilo {}",
            self.catalog
                .display_name(StyleFamily::PrayerStyle, request.prayer_style.as_deref())
        );
        bundle
    }
}
