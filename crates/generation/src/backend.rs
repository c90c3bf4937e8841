use crate::error::Result;
use crate::options::GenerationOptions;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use std::pin::Pin;

/// Lazily produced, finite, non-restartable text fragments
pub type FragmentStream<'a> = Pin<Box<dyn Stream<Item = Result<String>> + Send + 'a>>;

/// Text-generation backend
///
/// Implement this trait to plug in a model. An `Err` item ends the generation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Start generating text for a prompt
    fn generate(&self, prompt: String, options: &GenerationOptions) -> FragmentStream<'_>;

    /// Generate and concatenate the whole response
    async fn complete(&self, prompt: String, options: &GenerationOptions) -> Result<String> {
        let mut fragments = self.generate(prompt, options);
        let mut text = String::new();
        while let Some(fragment) = fragments.next().await {
            text.push_str(&fragment?);
        }
        Ok(text)
    }
}
