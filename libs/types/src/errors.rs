//! Error types for the stream engine
//!
//! Comprehensive error taxonomy using thiserror

use thiserror::Error;

/// Errors raised while encoding, decoding or parsing schema values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Invalid integer: {0}")]
    InvalidInteger(String),

    #[error("Integer does not fit in 256 bits: {0}")]
    Overflow(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Unsupported field type: {0}")]
    UnsupportedType(String),

    #[error("Malformed schema: {0}")]
    MalformedSchema(String),

    #[error("Field {field} expects a value of type {expected}")]
    TypeMismatch { field: String, expected: String },

    #[error("Expected {expected} values, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("Expected {expected} encoded bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Failures reported by (or while talking to) the external stream provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Provider unreachable: {0}")]
    Transport(String),

    #[error("{message}")]
    Rejected { status: Option<u16>, message: String },

    #[error("No signing credential configured for write operations")]
    MissingCredential,

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// Build a rejection without an HTTP status.
    pub fn rejected(message: impl Into<String>) -> Self {
        ProviderError::Rejected {
            status: None,
            message: message.into(),
        }
    }

    /// Whether this failure is the provider saying the schema already exists.
    ///
    /// Registration treats this as a successful no-op.
    pub fn is_already_registered(&self) -> bool {
        let message = match self {
            ProviderError::Rejected { message, .. } => message,
            _ => return false,
        };
        let lowered = message.to_ascii_lowercase();
        lowered.contains("nothing to register")
            || lowered.contains("already registered")
            || lowered.contains("schemaalreadyregistered")
    }
}

/// Errors from the publish pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// Missing or unusable request fields; never retried.
    #[error("{0}")]
    ClientInput(String),

    #[error("Encoding error: {0}")]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl PublishError {
    /// Whether the caller, not the provider, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PublishError::ClientInput(_) | PublishError::Codec(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_error_display() {
        let err = CodecError::ArityMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(err.to_string(), "Expected 3 values, got 2");
    }

    #[test]
    fn test_already_registered_matching() {
        assert!(ProviderError::rejected("Nothing to register").is_already_registered());
        assert!(ProviderError::rejected("execution reverted: SchemaAlreadyRegistered()")
            .is_already_registered());
        assert!(ProviderError::rejected("schema already registered").is_already_registered());
        assert!(!ProviderError::rejected("insufficient funds").is_already_registered());
        assert!(!ProviderError::Transport("nothing to register".into()).is_already_registered());
    }

    #[test]
    fn test_rejected_display_is_bare_message() {
        let err = ProviderError::Rejected {
            status: Some(502),
            message: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "bad gateway");
    }

    #[test]
    fn test_publish_error_from_provider_error() {
        let err: PublishError = ProviderError::MissingCredential.into();
        assert!(matches!(err, PublishError::Provider(_)));
        assert!(!err.is_client_error());

        let err: PublishError = CodecError::InvalidAddress("0x12".into()).into();
        assert!(err.is_client_error());
    }
}
