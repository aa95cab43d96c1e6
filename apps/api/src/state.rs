use std::sync::Arc;

use crate::blob::BlobStore;
use crate::content::lifecycle::ContentLifecycle;
use crate::generation::agents::HandlerRegistry;
use crate::generation::invoker::GenerationInvoker;
use crate::generation::style_catalog::StyleCatalog;
use crate::tts::SpeechSynthesizer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<StyleCatalog>,
    pub registry: Arc<HandlerRegistry>,
    pub invoker: GenerationInvoker,
    pub lifecycle: ContentLifecycle,
    /// Resolves stored audio references when packaging downloads.
    pub blobs: Arc<dyn BlobStore>,
    /// `None` when no speech provider key is configured; audio is then skipped.
    pub speech: Option<Arc<dyn SpeechSynthesizer>>,
}

#[cfg(test)]
pub mod testing {
    use std::time::Duration;

    use super::*;
    use crate::blob::testing::MemoryBlobStore;
    use crate::config::Config;
    use crate::content::store::ContentStore;
    use crate::generation::templates::testing::UnavailableTemplateStore;
    use crate::llm_client::TextGenerator;

    /// State wired to in-memory fakes. Templates come from the embedded copies.
    pub fn state_with(
        generator: Arc<dyn TextGenerator>,
        store: Arc<dyn ContentStore>,
        speech: Option<Arc<dyn SpeechSynthesizer>>,
    ) -> AppState {
        let config = Config::for_tests();
        let catalog = Arc::new(StyleCatalog::builtin());
        AppState {
            registry: Arc::new(HandlerRegistry::builtin(
                catalog.clone(),
                Arc::new(UnavailableTemplateStore),
            )),
            catalog,
            invoker: GenerationInvoker::new(
                generator,
                Duration::from_secs(config.llm_timeout_secs),
            ),
            lifecycle: ContentLifecycle::new(store, config.content_retention_days),
            blobs: Arc::new(MemoryBlobStore::default()),
            speech,
        }
    }
}
