use serde_json::Value;

use crate::error::StorageResult;

pub fn encode(value: &Value) -> StorageResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn decode(text: &str) -> StorageResult<Value> {
    Ok(serde_json::from_str(text)?)
}
