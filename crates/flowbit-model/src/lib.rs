//! Flowbit Model — the external generative model seam.
//!
//! The pipeline makes exactly one `generate` call per classification and per
//! extraction, treats the reply as unstructured text, and never retries.

pub mod gemini;
pub mod reply;
pub mod scripted;

use async_trait::async_trait;

use flowbit_core::Result;

pub use gemini::GeminiClient;
pub use reply::strip_code_fence;
pub use scripted::ScriptedModel;

/// A generative text model: one prompt in, one text reply out.
///
/// Injected into the agents so tests can substitute [`ScriptedModel`].
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}
