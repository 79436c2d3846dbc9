//! Bridge error types.

use crosswire_codec::CodecError;
use crosswire_types::TypeTag;
use thiserror::Error;

/// Errors raised while binding a guest or forwarding calls.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The guest does not export a required allocation primitive. Fatal at
    /// bind time; no call forwarding is possible without it.
    #[error("guest is missing required export `{0}`")]
    MissingAllocPrimitive(&'static str),

    /// A host→guest call named an export the guest does not have.
    #[error("guest has no export named `{0}`")]
    UnknownExport(String),

    /// The `call` import was handed something other than a function
    /// reference.
    #[error("cannot dispatch a {0} value as a function")]
    NotAFunction(TypeTag),

    /// The `call` import was handed a guest-origin reference; only
    /// host-registered functions may be dispatched through this path.
    #[error("cannot dispatch a guest-origin function reference")]
    GuestOriginDispatch,

    /// The `call` import's argument value was not an array (or void).
    #[error("call arguments must be an array, got {0}")]
    NotAnArgumentArray(TypeTag),

    /// A host-origin function reference names a table index that was never
    /// registered.
    #[error("no host function registered at index {0}")]
    MissingFunction(u32),

    /// A guest export returned a word count that is neither void (0) nor a
    /// register pair (2).
    #[error("guest export returned {0} words, expected 0 or 2")]
    UnexpectedReturnArity(usize),

    /// Encode/decode failure.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The guest trapped or failed internally.
    #[error("guest error: {0}")]
    Guest(String),

    /// A registered host function reported a failure.
    #[error("host function failed: {0}")]
    Host(String),
}

/// Bridge result type alias.
pub type BridgeResult<T> = Result<T, BridgeError>;
