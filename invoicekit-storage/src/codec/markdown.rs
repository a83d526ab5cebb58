//! Markdown documents whose data lives entirely in the frontmatter.
//!
//! ```text
//! ---
//! id: 1
//! name: Acme
//!
//! ---
//! ```
//!
//! The frontmatter is YAML when a YAML codec is available and pretty JSON
//! otherwise. JSON is valid YAML, so a YAML-capable reader handles both.

use serde_json::Value;
use std::path::Path;

use super::{CodecSupport, json, yaml};
use crate::error::{StorageError, StorageResult};

const DELIMITER: &str = "---";

pub fn encode(value: &Value, support: CodecSupport) -> StorageResult<String> {
    let frontmatter = if support.yaml_available() {
        yaml::encode(value)?
    } else {
        json::encode(value)?
    };
    Ok(format!("{DELIMITER}\n{frontmatter}\n{DELIMITER}\n"))
}

pub fn decode(text: &str, support: CodecSupport, path: &Path) -> StorageResult<Value> {
    let frontmatter = extract_frontmatter(text).ok_or_else(|| StorageError::InvalidDocument {
        path: path.to_path_buf(),
        reason: "expected frontmatter delimited by '---' lines".into(),
    })?;

    if support.yaml_available() {
        yaml::decode(&frontmatter)
    } else {
        json::decode(&frontmatter)
    }
}

/// Text between an opening `---` first line and the next line that is only `---`.
fn extract_frontmatter(text: &str) -> Option<String> {
    let mut lines = text.lines();
    if lines.next()?.trim_end() != DELIMITER {
        return None;
    }

    let mut body = Vec::new();
    for line in lines {
        if line.trim_end() == DELIMITER {
            return Some(body.join("\n"));
        }
        body.push(line);
    }
    None
}
