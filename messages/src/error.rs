use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    #[error("unsupported wire version: {0}")]
    UnsupportedVersion(u8),

    #[error("message too large: {size} > {max}")]
    MessageTooLarge { size: usize, max: usize },

    #[error("empty payload")]
    Empty,

    #[error("malformed instruction: {0}")]
    Malformed(String),
}

/// Failure reported by the message transport's send primitive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("transport channel closed")]
    Closed,

    #[error("transport rejected message: {0}")]
    Rejected(String),
}
