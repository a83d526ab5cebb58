//! YAML codec, compiled only with the `yaml` feature.
//!
//! Without the feature the functions still exist so callers never need
//! their own `cfg`; they fail with [`StorageError::MissingOptionalCodec`].

use serde_json::Value;

#[cfg(not(feature = "yaml"))]
use crate::error::StorageError;
use crate::error::StorageResult;

#[cfg(feature = "yaml")]
pub fn encode(value: &Value) -> StorageResult<String> {
    Ok(serde_yaml::to_string(value)?)
}

#[cfg(feature = "yaml")]
pub fn decode(text: &str) -> StorageResult<Value> {
    Ok(serde_yaml::from_str(text)?)
}

#[cfg(not(feature = "yaml"))]
pub fn encode(_value: &Value) -> StorageResult<String> {
    Err(StorageError::missing_yaml("YAML output was requested"))
}

#[cfg(not(feature = "yaml"))]
pub fn decode(_text: &str) -> StorageResult<Value> {
    Err(StorageError::missing_yaml("YAML input was found"))
}
