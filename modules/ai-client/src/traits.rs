use anyhow::Result;
use async_trait::async_trait;

/// A text-in, text-out completion model.
///
/// Every pipeline stage that talks to the reasoning provider goes through
/// this trait so tests can substitute canned responses. The concrete
/// implementation is [`crate::Claude`].
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}
