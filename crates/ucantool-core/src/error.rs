//! Error types for the ucantool core.

use thiserror::Error;

/// Errors raised while decoding, encoding or transcoding artifacts.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Bytes are not a single well-formed CBOR item.
    #[error("decoding error: {0}")]
    DecodingError(String),

    /// CBOR decoded but does not have the shape of the expected artifact.
    #[error("malformed {kind}: {reason}")]
    MalformedEnvelope { kind: &'static str, reason: String },

    /// First byte of a container is not a known transport codec.
    #[error("unknown container codec: 0x{0:02x}")]
    UnknownCodec(u8),

    /// Principal identifier is not a valid DID.
    #[error("invalid DID: {0}")]
    InvalidDid(String),

    /// Command is not a valid slash-delimited path.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// Link or identifier string is not a valid CID.
    #[error("invalid CID: {0}")]
    InvalidCid(String),

    /// Value cannot be written as canonical DAG-CBOR.
    #[error("encoding error: {0}")]
    EncodingError(String),

    /// Value has no DAG-JSON form.
    #[error("transcode error: {0}")]
    TranscodeError(String),
}

impl CoreError {
    pub(crate) fn malformed(kind: &'static str, reason: impl Into<String>) -> Self {
        CoreError::MalformedEnvelope {
            kind,
            reason: reason.into(),
        }
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
