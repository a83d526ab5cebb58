//! Document codecs: one record <-> one document in a concrete format.
//!
//! Every codec works on the record's canonical form, an ordered
//! `serde_json::Value` object. Fidelity differs per format:
//! - JSON and YAML keep nulls and types verbatim.
//! - Markdown stores the fields as frontmatter (YAML when available,
//!   JSON otherwise) above an empty body.
//! - XML omits nulls and stores every scalar as text; the reader rebuilds
//!   types from the record's [`EntityShape`].

pub mod json;
pub mod markdown;
pub mod xml;
pub mod yaml;

use invoicekit_model::EntityShape;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{StorageError, StorageResult};

/// Serialization format of a stored document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentFormat {
    #[default]
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "xml")]
    Xml,
    #[serde(rename = "md", alias = "markdown")]
    Markdown,
    #[serde(rename = "yaml", alias = "yml")]
    Yaml,
}

impl DocumentFormat {
    /// Extensions probed by exact-name lookup, in preference order.
    pub const LOOKUP_EXTENSIONS: [&'static str; 5] = ["json", "yaml", "yml", "xml", "md"];

    /// Extension used for newly written documents.
    pub const fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Json => "json",
            DocumentFormat::Xml => "xml",
            DocumentFormat::Markdown => "md",
            DocumentFormat::Yaml => "yaml",
        }
    }

    /// Maps a file extension to its format; `None` for anything unknown.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "json" => Some(DocumentFormat::Json),
            "xml" => Some(DocumentFormat::Xml),
            "md" => Some(DocumentFormat::Markdown),
            "yaml" | "yml" => Some(DocumentFormat::Yaml),
            _ => None,
        }
    }

    /// Format of the document at `path`, judged by its extension.
    pub fn of_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for DocumentFormat {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(DocumentFormat::Json),
            "xml" => Ok(DocumentFormat::Xml),
            "md" | "markdown" => Ok(DocumentFormat::Markdown),
            "yaml" | "yml" => Ok(DocumentFormat::Yaml),
            _ => Err(StorageError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Optional codecs available to a store, resolved once when it is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecSupport {
    pub yaml: bool,
}

impl CodecSupport {
    /// Everything compiled into this build.
    pub const fn detect() -> Self {
        Self {
            yaml: cfg!(feature = "yaml"),
        }
    }

    /// Only the codecs that never need an optional dependency.
    pub const fn required_only() -> Self {
        Self { yaml: false }
    }

    pub const fn yaml_available(self) -> bool {
        self.yaml && cfg!(feature = "yaml")
    }
}

impl Default for CodecSupport {
    fn default() -> Self {
        Self::detect()
    }
}

/// Encodes a canonical record value as a document of `format`.
///
/// `type_name` becomes the XML root element; `path` is only used in errors.
pub fn encode_document(
    value: &Value,
    format: DocumentFormat,
    type_name: &str,
    support: CodecSupport,
    path: &Path,
) -> StorageResult<String> {
    match format {
        DocumentFormat::Json => json::encode(value),
        DocumentFormat::Xml => xml::encode(value, type_name),
        DocumentFormat::Markdown => markdown::encode(value, support),
        DocumentFormat::Yaml => {
            if !support.yaml_available() {
                return Err(StorageError::missing_yaml(format!(
                    "cannot write {} as YAML",
                    path.display()
                )));
            }
            yaml::encode(value)
        }
    }
}

/// Decodes a document of `format` back into a canonical record value.
pub fn decode_document(
    text: &str,
    format: DocumentFormat,
    shape: &EntityShape,
    support: CodecSupport,
    path: &Path,
) -> StorageResult<Value> {
    match format {
        DocumentFormat::Json => json::decode(text),
        DocumentFormat::Xml => xml::decode(text, shape),
        DocumentFormat::Markdown => markdown::decode(text, support, path),
        DocumentFormat::Yaml => {
            if !support.yaml_available() {
                return Err(StorageError::missing_yaml(format!(
                    "found YAML file {} but YAML support is not available",
                    path.display()
                )));
            }
            yaml::decode(text)
        }
    }
}
