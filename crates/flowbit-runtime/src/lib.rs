//! Flowbit Runtime — the linear per-file pipeline.

pub mod pipeline;

pub use pipeline::{Classification, Pipeline, ProcessReport, StepResult};
