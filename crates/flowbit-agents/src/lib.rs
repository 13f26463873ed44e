//! Flowbit Agents — the two model-prompting stages of the pipeline.
//!
//! The classifier labels a document's intent from its raw text; the
//! structured extractor fills the fixed five-field schema for that intent
//! and merges the result into the document's record.

pub mod classifier;
pub mod extractor;
pub mod prompts;

pub use classifier::IntentClassifier;
pub use extractor::{Outcome, SkipReason, StructuredExtractor};
