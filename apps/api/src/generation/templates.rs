//! Prompt templates, one per persona.
//!
//! Templates are read from `TEMPLATE_DIR/<name>.txt` on every request so they
//! can be edited without a redeploy. A missing persona template degrades to the
//! generic one, and when the directory is unusable the copies compiled into
//! the binary are used instead.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::generation::request::Persona;

const EMBEDDED_GENERIC: &str = include_str!("../../templates/generic.txt");
const EMBEDDED_PRAYER: &str = include_str!("../../templates/prayer.txt");
const EMBEDDED_STOICISM: &str = include_str!("../../templates/stoicism.txt");

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template '{name}' could not be read: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("template '{0}' is empty")]
    Empty(String),
}

#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn load_template(&self, name: &str) -> Result<String, TemplateError>;
}

/// Reads templates from a directory with `tokio::fs`.
pub struct FsTemplateStore {
    dir: PathBuf,
}

impl FsTemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl TemplateStore for FsTemplateStore {
    async fn load_template(&self, name: &str) -> Result<String, TemplateError> {
        let path = self.dir.join(format!("{name}.txt"));
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| TemplateError::Io {
                name: name.to_string(),
                source,
            })?;
        if text.trim().is_empty() {
            return Err(TemplateError::Empty(name.to_string()));
        }
        Ok(text)
    }
}

pub fn template_name(persona: Persona) -> &'static str {
    match persona {
        Persona::Prayer => "prayer",
        Persona::Stoicism => "stoicism",
        Persona::Generic | Persona::Unknown => "generic",
    }
}

pub fn embedded_template(persona: Persona) -> &'static str {
    match persona {
        Persona::Prayer => EMBEDDED_PRAYER,
        Persona::Stoicism => EMBEDDED_STOICISM,
        Persona::Generic | Persona::Unknown => EMBEDDED_GENERIC,
    }
}

/// Persona template → generic template → compiled-in copy. Never fails.
pub async fn load_for_persona(store: &dyn TemplateStore, persona: Persona) -> String {
    let name = template_name(persona);
    match store.load_template(name).await {
        Ok(text) => return text,
        Err(e) => warn!("Template for {} unavailable: {e}", persona.as_str()),
    }

    let generic = template_name(Persona::Generic);
    if name != generic {
        match store.load_template(generic).await {
            Ok(text) => return text,
            Err(e) => warn!("Generic template unavailable: {e}"),
        }
    }

    warn!("Using built-in template for {}", persona.as_str());
    embedded_template(persona).to_string()
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// A store where every read fails, forcing the compiled-in templates.
    pub struct UnavailableTemplateStore;

    #[async_trait]
    impl TemplateStore for UnavailableTemplateStore {
        async fn load_template(&self, name: &str) -> Result<String, TemplateError> {
            Err(TemplateError::Io {
                name: name.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no templates"),
            })
        }
    }
}
