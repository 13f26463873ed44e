//! Flowbit Core — shared types, field schemas, configuration.

pub mod config;
pub mod error;
pub mod schema;
pub mod types;

pub use config::{DataPaths, FlowbitConfig};
pub use error::{Error, Result};
pub use schema::{expected_fields, record_key, INTENT_SCHEMAS};
pub use types::{DocumentFormat, Intent, Record};
