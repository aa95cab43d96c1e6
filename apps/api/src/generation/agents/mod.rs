//! Persona handlers and the registry that dispatches to them.
//!
//! `AppState` holds an `Arc<HandlerRegistry>` built once at startup. The
//! registry cannot exist without a generic handler, so dispatch never fails:
//! unknown or unregistered personas are served by it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::generation::assembler::assemble;
use crate::generation::bundle::GeneratedBundle;
use crate::generation::composer::Substitutions;
use crate::generation::parser::{extract, HeadingTable};
use crate::generation::request::{GenerationRequest, Persona};
use crate::generation::style_catalog::StyleCatalog;
use crate::generation::templates::TemplateStore;

pub mod devotional;
pub mod generic;
pub mod philosophical;

pub use devotional::DevotionalHandler;
pub use generic::GenericHandler;
pub use philosophical::PhilosophicalHandler;

/// One implementation per persona. Prompt composition and persona decoration
/// live here; parsing and assembly are shared through the provided
/// `process_response`.
#[async_trait]
pub trait AgentHandler: Send + Sync {
    fn persona(&self) -> Persona;

    /// Heading phrases this persona's prompt asks for and its parser expects.
    fn headings(&self) -> HeadingTable;

    /// Title used when neither the request nor the reply supplies one.
    fn default_title(&self, request: &GenerationRequest) -> String;

    /// Full placeholder table for this persona's template.
    fn substitutions(&self, request: &GenerationRequest) -> Substitutions;

    async fn prepare_prompt(&self, request: &GenerationRequest) -> String;

    /// Persona-specific decoration of a completed bundle.
    fn enhance(&self, bundle: GeneratedBundle, _request: &GenerationRequest) -> GeneratedBundle {
        bundle
    }

    fn process_response(&self, reply: &str, request: &GenerationRequest) -> GeneratedBundle {
        let sections = extract(reply, self.headings());
        debug!(
            "Parsed {} sections for process {}",
            sections.len(),
            request.process_id()
        );
        let bundle = assemble(
            request,
            reply,
            sections,
            self.headings(),
            &self.default_title(request),
        );
        if bundle.is_completed() {
            self.enhance(bundle, request)
        } else {
            bundle
        }
    }
}

pub struct HandlerRegistry {
    generic: Arc<dyn AgentHandler>,
    handlers: HashMap<Persona, Arc<dyn AgentHandler>>,
}

impl HandlerRegistry {
    /// `generic` is mandatory. A later handler for the same persona replaces
    /// an earlier one.
    pub fn new(generic: Arc<dyn AgentHandler>, others: Vec<Arc<dyn AgentHandler>>) -> Self {
        let mut handlers = HashMap::new();
        handlers.insert(generic.persona(), generic.clone());
        for handler in others {
            handlers.insert(handler.persona(), handler);
        }
        Self { generic, handlers }
    }

    /// The three built-in personas sharing one catalog and template store.
    pub fn builtin(catalog: Arc<StyleCatalog>, templates: Arc<dyn TemplateStore>) -> Self {
        Self::new(
            Arc::new(GenericHandler::new(catalog.clone(), templates.clone())),
            vec![
                Arc::new(DevotionalHandler::new(catalog.clone(), templates.clone())),
                Arc::new(PhilosophicalHandler::new(catalog, templates)),
            ],
        )
    }

    pub fn get(&self, persona: Persona) -> Arc<dyn AgentHandler> {
        self.handlers
            .get(&persona)
            .cloned()
            .unwrap_or_else(|| self.generic.clone())
    }

    pub fn personas(&self) -> Vec<Persona> {
        let mut personas: Vec<Persona> = self.handlers.keys().copied().collect();
        personas.sort_by_key(|p| p.as_str());
        personas
    }
}
