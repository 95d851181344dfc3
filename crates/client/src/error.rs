//! Error taxonomy for the request compiler.
//!
//! Nothing is recovered locally: every variant is a hard stop for the one
//! call that raised it, and the caller decides whether to retry.

use thiserror::Error;

use crate::unwrap::RemoteErrorEntry;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Failure at the transport boundary.
///
/// Raised by the injected transport or by JSON-parsing the response body;
/// propagated to the caller without translation.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport request failed: {source}")]
    Request {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("response body is not valid JSON: {0}")]
    Body(#[from] serde_json::Error),
}

impl TransportError {
    #[must_use]
    pub fn request(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Request {
            source: Box::new(source),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unknown module `{0}`")]
    UnknownModule(String),

    #[error("unknown method `{module}.{method}`")]
    UnknownMethod { module: String, method: String },

    /// A value shape referenced a collection absent from the catalog.
    #[error("unknown collection `{0}`")]
    UnknownCollection(String),

    /// Fallback arm of the variable-type renderer: a promoted argument whose
    /// shape has no input-type rendering.
    #[error("unsupported shape for argument `{argument}`")]
    UnsupportedArgumentShape { argument: String },

    #[error("unsupported return shape")]
    UnsupportedReturnShape,

    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode result: {0}")]
    Decode(#[source] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response envelope carried a non-empty `errors` list. The
    /// structured entries stay inspectable; the message joins every
    /// server-reported message.
    #[error("server reported errors: {message}")]
    Remote {
        message: String,
        errors: Vec<RemoteErrorEntry>,
    },

    /// `data` lacks the `module.method` path even though no errors were
    /// reported.
    #[error("response envelope is missing `{path}`")]
    EnvelopeShape { path: String },
}

impl ClientError {
    #[must_use]
    pub fn remote(errors: Vec<RemoteErrorEntry>) -> Self {
        let message = errors
            .iter()
            .map(|entry| entry.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        Self::Remote { message, errors }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_joins_messages() {
        let err = ClientError::remote(vec![
            RemoteErrorEntry::new("first failure"),
            RemoteErrorEntry::new("second failure"),
        ]);
        assert_eq!(
            err.to_string(),
            "server reported errors: first failure; second failure"
        );
        let ClientError::Remote { errors, .. } = err else {
            panic!("expected Remote");
        };
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn transport_error_wraps_foreign_sources() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = TransportError::request(io);
        assert!(err.to_string().contains("refused"));
    }
}
