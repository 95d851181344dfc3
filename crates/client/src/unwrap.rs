//! Response envelope decoding.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ClientError, Result};

/// One server-reported error, with any extra fields preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteErrorEntry {
    pub message: String,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl RemoteErrorEntry {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            rest: Map::new(),
        }
    }
}

/// Top-level response envelope: `{ data?, errors? }`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<RemoteErrorEntry>,
}

impl ResponseEnvelope {
    /// Extract the single `data.<module>.<method>` result, or raise.
    ///
    /// A non-empty `errors` list wins even when `data` is also present:
    /// partial success is treated as failure. A missing path with no errors
    /// is an upstream contract violation and raises
    /// [`ClientError::EnvelopeShape`].
    pub fn unwrap_method(mut self, module: &str, method: &str) -> Result<Value> {
        if !self.errors.is_empty() {
            return Err(ClientError::remote(self.errors));
        }
        self.data
            .as_mut()
            .and_then(|data| data.get_mut(module))
            .and_then(|module_data| module_data.get_mut(method))
            .map(Value::take)
            .ok_or_else(|| ClientError::EnvelopeShape {
                path: format!("data.{module}.{method}"),
            })
    }
}
