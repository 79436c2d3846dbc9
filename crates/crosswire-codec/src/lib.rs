//! Wire codec for the crosswire marshalling protocol.
//!
//! # Architecture
//!
//! The codec is the leaf of the system: pure encode/decode between the
//! native [`Value`](crosswire_types::Value) model and the 128-bit tagged
//! [`Wire`](crosswire_types::Wire) form. It performs no I/O of its own and
//! depends only on two capabilities bound by the bridge:
//!
//! - [`MemoryAccess`] — read/write a byte range of guest linear memory.
//!   Every access goes through the capability at call time; the codec never
//!   caches a view, because the guest may grow or relocate its memory
//!   between calls.
//! - [`Allocator`] — the guest's `allocate`/`release` primitives, used to
//!   place variable-length payloads (`bytes`/`string`/`json`/`array`) into
//!   guest memory.
//!
//! Decoding trusts the encoded length fields: the guest is assumed
//! cooperative, and a bad length surfaces as an out-of-bounds capability
//! error, not a sandbox breach.

mod capability;
mod decode;
mod encode;
mod error;
pub mod testing;

pub use capability::{Allocator, GuestHeap, MemoryAccess};
pub use decode::decode;
pub use encode::encode;
pub use error::{CodecError, CodecResult};
