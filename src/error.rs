//! Error taxonomy for the output path.

use std::io;

use thiserror::Error;

/// Failures surfaced by output operations.
///
/// `StreamAborted` and `Cancelled` are deliberately distinct: the first
/// means the peer or connection stopped the stream, the second means the
/// caller's own token asked to stop. Callers that need to react differently
/// can match on the variant.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The stream was aborted and the caller supplied a cancellable token,
    /// so silent suppression would lose data the caller cares about.
    #[error("the response stream has been aborted")]
    StreamAborted,

    /// The caller's cancellation token was already cancelled when the
    /// operation started. No data was forwarded.
    #[error("the write was cancelled")]
    Cancelled,

    /// A response header name contained a byte outside the token table.
    #[error("invalid character in response header name")]
    InvalidHeaderName,

    /// A response header value contained a byte outside the field-value
    /// table.
    #[error("invalid character in response header value")]
    InvalidHeaderValue,

    /// The underlying transport failed.
    #[error("transport error: {0}")]
    Io(#[from] io::Error),
}
