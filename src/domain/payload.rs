//! JSON payload codec.
//!
//! The service accepts bodies of arbitrary shape as long as the top-level
//! value is a JSON object. Everything else is rejected with [`DecodeError`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Errors produced while decoding a request body.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("body is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("expected a JSON object at the top level, found {found}")]
    NotAnObject { found: &'static str },
}

/// A decoded request body: a JSON object with values of any shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// Parses `bytes` as JSON and requires the top-level value to be an object.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::Malformed`] for invalid or empty input
    /// - [`DecodeError::NotAnObject`] for arrays, strings, numbers, booleans and `null`
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_slice(bytes)?;

        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(DecodeError::NotAnObject {
                found: kind_of(&other),
            }),
        }
    }

    /// Serializes the payload back to compact JSON bytes.
    ///
    /// Key order in the output is not guaranteed to match the original body.
    pub fn encode(&self) -> Vec<u8> {
        // A map with string keys always serializes.
        serde_json::to_vec(&self.0).unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
