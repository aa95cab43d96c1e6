//! The single external model call of the pipeline.
//!
//! Each attempt is bounded by a timeout. A transient failure (timeout,
//! network, 429, 5xx) gets exactly one more attempt after a short pause.
//! An empty reply counts as a failure.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::prompts::GENERATION_SYSTEM;
use crate::llm_client::{LlmError, TextGenerator};

const MAX_ATTEMPTS: u32 = 2;
const RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum InvocationError {
    #[error(transparent)]
    Provider(#[from] LlmError),

    #[error("model call timed out after {0:?}")]
    Timeout(Duration),

    #[error("model returned an empty reply")]
    EmptyReply,
}

impl InvocationError {
    fn is_transient(&self) -> bool {
        match self {
            InvocationError::Provider(e) => e.is_transient(),
            InvocationError::Timeout(_) => true,
            InvocationError::EmptyReply => false,
        }
    }
}

#[derive(Clone)]
pub struct GenerationInvoker {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl GenerationInvoker {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// Full-bundle generation call.
    pub async fn invoke(&self, prompt: &str) -> Result<String, InvocationError> {
        self.invoke_with_system(prompt, GENERATION_SYSTEM).await
    }

    pub async fn invoke_with_system(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<String, InvocationError> {
        let mut attempt = 1;
        loop {
            let error = match self.attempt(prompt, system).await {
                Ok(reply) => {
                    info!(
                        "Model replied with {} chars on attempt {attempt}",
                        reply.len()
                    );
                    return Ok(reply);
                }
                Err(e) => e,
            };

            if attempt >= MAX_ATTEMPTS || !error.is_transient() {
                return Err(error);
            }

            warn!(
                "Model call attempt {attempt} failed ({error}), retrying after {}ms...",
                RETRY_DELAY.as_millis()
            );
            tokio::time::sleep(RETRY_DELAY).await;
            attempt += 1;
        }
    }

    async fn attempt(&self, prompt: &str, system: &str) -> Result<String, InvocationError> {
        let reply = tokio::time::timeout(self.timeout, self.generator.complete(prompt, system))
            .await
            .map_err(|_| InvocationError::Timeout(self.timeout))??;
        if reply.trim().is_empty() {
            return Err(InvocationError::EmptyReply);
        }
        Ok(reply)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    fn invoker(generator: Arc<dyn TextGenerator>) -> GenerationInvoker {
        GenerationInvoker::new(generator, Duration::from_secs(30))
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failure_retried_once() {
        let generator = Arc::new(ScriptedGenerator::new("### ROTEIRO\nok").then(Err(overloaded())));
        let reply = invoker(generator.clone()).invoke("p").await.unwrap();
        assert_eq!(reply, "### ROTEIRO\nok");
        assert_eq!(generator.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_second_transient_failure() {
        let generator = Arc::new(
            ScriptedGenerator::new("never")
                .then(Err(overloaded()))
                .then(Err(overloaded())),
        );
        let err = invoker(generator.clone()).invoke("p").await.unwrap_err();
        assert!(matches!(err, InvocationError::Provider(_)));
        assert_eq!(generator.call_count(), 2);
    }

    #[tokio::test]
    async fn test_permanent_failure_not_retried() {
        let generator = Arc::new(ScriptedGenerator::new("never").then(Err(LlmError::Api {
            status: 401,
            message: "bad key".to_string(),
        })));
        let err = invoker(generator.clone()).invoke("p").await.unwrap_err();
        assert!(matches!(err, InvocationError::Provider(LlmError::Api { status: 401, .. })));
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_reply_is_an_error() {
        let generator = Arc::new(ScriptedGenerator::new("  \n\t"));
        let err = invoker(generator.clone()).invoke("p").await.unwrap_err();
        assert!(matches!(err, InvocationError::EmptyReply));
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_provider_times_out() {
        let err = invoker(Arc::new(StalledGenerator)).invoke("p").await.unwrap_err();
        assert!(matches!(err, InvocationError::Timeout(_)));
    }
}
