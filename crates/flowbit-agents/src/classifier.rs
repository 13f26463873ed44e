//! Intent classification over extracted document text.

use tracing::warn;

use crate::prompts::classification_prompt;
use flowbit_core::Intent;
use flowbit_model::GenerativeModel;

/// At most this many characters of the document reach the classification
/// prompt.
pub const CLASSIFY_SNIPPET_CHARS: usize = 3000;

/// Classifies a document's intent with one model call.
pub struct IntentClassifier<'a> {
    model: &'a dyn GenerativeModel,
}

impl<'a> IntentClassifier<'a> {
    pub fn new(model: &'a dyn GenerativeModel) -> Self {
        Self { model }
    }

    /// Classify the given text. Degrades to [`Intent::Unknown`] on a model
    /// failure or a reply outside the known label set; never errors.
    pub async fn classify(&self, text: &str) -> Intent {
        let snippet: String = text.chars().take(CLASSIFY_SNIPPET_CHARS).collect();
        let prompt = classification_prompt(&snippet);

        let reply = match self.model.generate(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Classification call failed: {}", e);
                return Intent::Unknown;
            }
        };

        match reply.parse::<Intent>() {
            Ok(intent) => intent,
            Err(_) => {
                warn!("Classifier returned a label outside the known set: {:?}", reply);
                Intent::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowbit_model::ScriptedModel;

    #[tokio::test]
    async fn test_trims_and_parses_label() {
        let model = ScriptedModel::new();
        model.push_reply("  Invoice\n");
        let classifier = IntentClassifier::new(&model);
        assert_eq!(classifier.classify("Total due: $420").await, Intent::Invoice);
    }

    #[tokio::test]
    async fn test_caps_text_at_snippet_limit() {
        let model = ScriptedModel::new();
        model.push_reply("RFQ");
        let classifier = IntentClassifier::new(&model);

        let text = format!("{}TAIL-MARKER", "x".repeat(CLASSIFY_SNIPPET_CHARS));
        classifier.classify(&text).await;

        let prompt = &model.prompts()[0];
        assert!(prompt.contains(&"x".repeat(CLASSIFY_SNIPPET_CHARS)));
        assert!(!prompt.contains("TAIL-MARKER"));
    }

    #[tokio::test]
    async fn test_model_failure_degrades_to_unknown() {
        let model = ScriptedModel::new();
        model.push_failure("connection refused");
        let classifier = IntentClassifier::new(&model);
        assert_eq!(classifier.classify("anything").await, Intent::Unknown);
    }

    #[tokio::test]
    async fn test_stray_label_degrades_to_unknown() {
        let model = ScriptedModel::new();
        model.push_reply("Purchase Order");
        let classifier = IntentClassifier::new(&model);
        assert_eq!(classifier.classify("anything").await, Intent::Unknown);
    }
}
