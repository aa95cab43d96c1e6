use std::sync::Arc;

use async_trait::async_trait;

use crate::generation::agents::AgentHandler;
use crate::generation::composer::{base_substitutions, compose, Substitutions};
use crate::generation::parser::{HeadingTable, GENERIC_HEADINGS};
use crate::generation::request::{GenerationRequest, Persona};
use crate::generation::style_catalog::StyleCatalog;
use crate::generation::templates::{load_for_persona, TemplateStore};

pub const GENERIC_DEFAULT_TITLE: &str = "Conteúdo para YouTube";

/// General-purpose video content. Also serves unknown personas.
pub struct GenericHandler {
    catalog: Arc<StyleCatalog>,
    templates: Arc<dyn TemplateStore>,
}

impl GenericHandler {
    pub fn new(catalog: Arc<StyleCatalog>, templates: Arc<dyn TemplateStore>) -> Self {
        Self { catalog, templates }
    }
}

#[async_trait]
impl AgentHandler for GenericHandler {
    fn persona(&self) -> Persona {
        Persona::Generic
    }

    fn headings(&self) -> HeadingTable {
        GENERIC_HEADINGS
    }

    fn default_title(&self, _request: &GenerationRequest) -> String {
        GENERIC_DEFAULT_TITLE.to_string()
    }

    fn substitutions(&self, request: &GenerationRequest) -> Substitutions {
        let guidelines = self.catalog.agent_guidelines(Persona::Generic);
        base_substitutions(request, self.headings(), "", guidelines)
    }

    async fn prepare_prompt(&self, request: &GenerationRequest) -> String {
        let template = load_for_persona(self.templates.as_ref(), Persona::Generic).await;
        compose(&template, request, &self.substitutions(request))
    }
}
