//! Shared types for the crosswire marshalling protocol.
//!
//! This crate defines the data model that crosses the host/guest boundary:
//! the closed set of type tags, the 128-bit wire value and its register-pair
//! transport form, function references, and the native [`Value`] sum type
//! that the rest of the system works with.
//!
//! Nothing here touches guest memory. Bit packing that needs a memory or
//! allocation capability lives in `crosswire-codec`.

mod func;
mod tag;
mod value;
mod wire;

pub use func::{FuncOrigin, FuncRef};
pub use tag::TypeTag;
pub use value::Value;
pub use wire::{
    pack_slice, unpack_slice, Wire, ARRAY_SLOT_SIZE, PAYLOAD_BITS, PAYLOAD_MASK, TAG_BITS,
};
