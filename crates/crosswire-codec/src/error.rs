//! Codec error types.

use thiserror::Error;

/// Errors raised while encoding or decoding wire values.
///
/// Everything except the capability failures is a protocol violation: it
/// fails the in-flight call and is never retried.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The 4-bit tag field holds a value outside the closed tag set.
    #[error("unknown type tag {0} is not implemented")]
    UnknownTag(u8),

    /// A `string` or `json` payload was not valid UTF-8.
    #[error("payload is not valid UTF-8")]
    InvalidUtf8,

    /// A `json` payload failed to parse, or a structured value failed to
    /// serialize.
    #[error("JSON payload error: {0}")]
    Json(#[from] serde_json::Error),

    /// A guest memory read or write fell outside the live memory bounds.
    #[error("guest memory access out of bounds: addr={addr:#x} len={len}")]
    OutOfBounds { addr: u32, len: u32 },

    /// The guest allocator could not satisfy a request.
    #[error("guest allocation of {0} bytes failed")]
    AllocFailed(u32),

    /// A buffer or array is too large for the 32-bit length/count field.
    #[error("payload of {0} elements exceeds the 32-bit length field")]
    TooLarge(usize),
}

/// Codec result type alias.
pub type CodecResult<T> = Result<T, CodecError>;
