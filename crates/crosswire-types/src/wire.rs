use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypeTag;

/// Width of the tag field in bits.
pub const TAG_BITS: u32 = 4;

/// Width of the payload field in bits.
pub const PAYLOAD_BITS: u32 = 124;

/// Mask selecting exactly the payload field.
pub const PAYLOAD_MASK: u128 = (1u128 << PAYLOAD_BITS) - 1;

/// Byte size of one array element slot in guest memory: a full wire value
/// stored as two little-endian 64-bit words.
pub const ARRAY_SLOT_SIZE: u32 = 16;

/// One encoded value crossing the boundary: a 128-bit quantity laid out as
/// `tag(4 bits) | payload(124 bits) << 4`.
///
/// Transport splits the quantity into two little-endian 64-bit words,
/// `lo = bits[0..64)` and `hi = bits[64..128)`. Both the combined and the
/// register-pair form are accepted and normalize to the same value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wire(u128);

impl Wire {
    /// Build from the combined 128-bit quantity.
    pub fn from_bits(bits: u128) -> Self {
        Self(bits)
    }

    /// Build from the two-word register pair.
    pub fn from_parts(lo: u64, hi: u64) -> Self {
        Self(((hi as u128) << 64) | lo as u128)
    }

    /// Pack a tag and payload. The payload is masked to exactly
    /// [`PAYLOAD_BITS`] first; an oversized payload must never be able to
    /// corrupt the tag field.
    pub fn pack(tag: TypeTag, payload: u128) -> Self {
        Self(tag.bits() as u128 | ((payload & PAYLOAD_MASK) << TAG_BITS))
    }

    /// The combined 128-bit quantity.
    pub fn bits(self) -> u128 {
        self.0
    }

    /// The low transport word.
    pub fn lo(self) -> u64 {
        self.0 as u64
    }

    /// The high transport word.
    pub fn hi(self) -> u64 {
        (self.0 >> 64) as u64
    }

    /// The `(lo, hi)` register pair.
    pub fn to_parts(self) -> (u64, u64) {
        (self.lo(), self.hi())
    }

    /// The raw 4-bit tag field.
    pub fn tag_bits(self) -> u8 {
        (self.0 & 0xF) as u8
    }

    /// The 124-bit payload field.
    pub fn payload(self) -> u128 {
        self.0 >> TAG_BITS
    }
}

impl fmt::Debug for Wire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wire {{ tag: {}, payload: {:#x} }}",
            self.tag_bits(),
            self.payload()
        )
    }
}

/// Pack a length (or element count) and a guest-memory address into the
/// payload convention used by `bytes`/`string`/`json`/`array`:
/// `(len << 32) | addr`.
pub fn pack_slice(len: u32, addr: u32) -> u128 {
    ((len as u128) << 32) | addr as u128
}

/// Split a `bytes`-like payload back into `(len, addr)`.
pub fn unpack_slice(payload: u128) -> (u32, u32) {
    (((payload >> 32) & 0xFFFF_FFFF) as u32, payload as u32)
}
