//! Document formats, intents, and the record tracked per ingested file.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Container type of an uploaded document, derived from the file extension
/// only. A mislabeled extension is silently misclassified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentFormat {
    Json,
    Email,
    Pdf,
    Unknown,
}

impl DocumentFormat {
    /// Detect format from a path's extension. Case-insensitive, no content
    /// sniffing, always returns a value.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "pdf" => Self::Pdf,
            "json" => Self::Json,
            "txt" | "eml" => Self::Email,
            _ => Self::Unknown,
        }
    }

    /// Whether this format has an extraction handler at all.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentFormat::Json => write!(f, "JSON"),
            DocumentFormat::Email => write!(f, "Email"),
            DocumentFormat::Pdf => write!(f, "PDF"),
            DocumentFormat::Unknown => write!(f, "Unknown"),
        }
    }
}

impl FromStr for DocumentFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "JSON" => Ok(Self::Json),
            "Email" => Ok(Self::Email),
            "PDF" => Ok(Self::Pdf),
            "Unknown" => Ok(Self::Unknown),
            other => Err(Error::UnexpectedReply(format!(
                "unknown format label: {other:?}"
            ))),
        }
    }
}

/// Business category of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Invoice,
    Rfq,
    Complaint,
    Regulation,
    Unknown,
}

impl Intent {
    /// The four classifiable intents, in prompt order.
    pub const KNOWN: [Intent; 4] = [
        Intent::Invoice,
        Intent::Rfq,
        Intent::Complaint,
        Intent::Regulation,
    ];
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::Invoice => write!(f, "Invoice"),
            Intent::Rfq => write!(f, "RFQ"),
            Intent::Complaint => write!(f, "Complaint"),
            Intent::Regulation => write!(f, "Regulation"),
            Intent::Unknown => write!(f, "Unknown"),
        }
    }
}

impl FromStr for Intent {
    type Err = Error;

    /// Parse a model-produced label. Tolerates surrounding whitespace and
    /// letter case, nothing else.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "invoice" => Ok(Self::Invoice),
            "rfq" => Ok(Self::Rfq),
            "complaint" => Ok(Self::Complaint),
            "regulation" => Ok(Self::Regulation),
            "unknown" => Ok(Self::Unknown),
            _ => Err(Error::UnexpectedReply(format!(
                "unknown intent label: {:?}",
                s.trim()
            ))),
        }
    }
}

/// The evolving key-value entry tracking one ingested document.
///
/// Created once by the classification stage with the first four fields;
/// updated at most once more by an extraction stage with the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    pub source: String,
    pub format: String,
    pub intent: String,
    pub timestamp: String,
    #[serde(default)]
    pub fields: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub missing_fields: Vec<String>,
    #[serde(default)]
    pub entities: Vec<serde_json::Value>,
    #[serde(default)]
    pub comments: String,
}

impl Record {
    /// Field names present after the classification stage, before any
    /// extractor has run.
    pub const INITIAL_FIELDS: [&'static str; 4] = ["source", "format", "intent", "timestamp"];

    /// Decode a record from its stored hash form. Structured values are
    /// JSON-encoded strings in the store; malformed ones fail the decode.
    pub fn from_hash(hash: &HashMap<String, String>) -> Result<Self> {
        let get = |name: &str| hash.get(name).cloned().unwrap_or_default();

        let fields = match hash.get("fields") {
            Some(raw) => serde_json::from_str(raw)?,
            None => BTreeMap::new(),
        };
        let missing_fields = match hash.get("missing_fields") {
            Some(raw) => serde_json::from_str(raw)?,
            None => Vec::new(),
        };
        let entities = match hash.get("entities") {
            Some(raw) => serde_json::from_str(raw)?,
            None => Vec::new(),
        };

        Ok(Self {
            source: get("source"),
            format: get("format"),
            intent: get("intent"),
            timestamp: get("timestamp"),
            fields,
            missing_fields,
            entities,
            comments: get("comments"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_from_extension() {
        let cases = [
            ("report.pdf", DocumentFormat::Pdf),
            ("invoice.JSON", DocumentFormat::Json),
            ("mail.txt", DocumentFormat::Email),
            ("mail.eml", DocumentFormat::Email),
            ("image.png", DocumentFormat::Unknown),
            ("noext", DocumentFormat::Unknown),
        ];
        for (name, expected) in cases {
            assert_eq!(
                DocumentFormat::from_path(&PathBuf::from(name)),
                expected,
                "{name}"
            );
        }
    }

    #[test]
    fn test_intent_round_trip() {
        for intent in Intent::KNOWN {
            assert_eq!(intent.to_string().parse::<Intent>().unwrap(), intent);
        }
        assert_eq!("Unknown".parse::<Intent>().unwrap(), Intent::Unknown);
        assert_eq!(" rfq ".parse::<Intent>().unwrap(), Intent::Rfq);
        assert!("Receipt".parse::<Intent>().is_err());
    }

    #[test]
    fn test_record_from_hash() {
        let mut hash = HashMap::new();
        hash.insert("source".to_string(), "/tmp/a.json".to_string());
        hash.insert("format".to_string(), "JSON".to_string());
        hash.insert("intent".to_string(), "Invoice".to_string());
        hash.insert("timestamp".to_string(), "2026-01-01T00:00:00Z".to_string());
        hash.insert(
            "fields".to_string(),
            r#"{"invoice_number":"INV-1"}"#.to_string(),
        );
        hash.insert("missing_fields".to_string(), r#"["date"]"#.to_string());
        hash.insert("entities".to_string(), r#"["Acme Corp"]"#.to_string());

        let record = Record::from_hash(&hash).unwrap();
        assert_eq!(record.intent, "Invoice");
        assert_eq!(record.fields["invoice_number"], "INV-1");
        assert_eq!(record.missing_fields, vec!["date"]);
        assert_eq!(record.entities.len(), 1);
        assert!(record.comments.is_empty());
    }

    #[test]
    fn test_record_from_hash_rejects_bad_json() {
        let mut hash = HashMap::new();
        hash.insert("fields".to_string(), "{not json".to_string());
        assert!(Record::from_hash(&hash).is_err());
    }
}
