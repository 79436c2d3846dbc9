//! Native → wire encoding.

use crosswire_types::{pack_slice, TypeTag, Value, Wire, ARRAY_SLOT_SIZE};

use crate::{CodecError, CodecResult, GuestHeap};

/// Encode a native value into its wire form.
///
/// Variable-length kinds serialize to a byte sequence, allocate that many
/// bytes of guest memory through `heap`, and pack the `(len << 32) | addr`
/// payload. The caller inherits responsibility for those allocations; the
/// codec never frees them.
///
/// [`Wire::pack`] masks every payload to exactly 124 bits, so an oversized
/// numeric value truncates rather than corrupting the tag field.
pub fn encode(value: &Value, heap: &mut dyn GuestHeap) -> CodecResult<Wire> {
    match value {
        Value::Void => Ok(Wire::pack(TypeTag::Void, 0)),
        // Canonical 0/1, regardless of how the bool was produced.
        Value::Bool(b) => Ok(Wire::pack(TypeTag::Bool, *b as u128)),
        Value::Int(i) => Ok(Wire::pack(TypeTag::Int, *i as u128)),
        Value::Uint(u) => Ok(Wire::pack(TypeTag::Uint, *u)),
        Value::Float(x) => Ok(Wire::pack(TypeTag::Float, x.to_bits() as u128)),
        Value::Bytes(b) => Ok(Wire::pack(TypeTag::Bytes, write_buffer(heap, b)?)),
        Value::Str(s) => Ok(Wire::pack(TypeTag::Str, write_buffer(heap, s.as_bytes())?)),
        Value::Json(j) => {
            let text = serde_json::to_vec(j)?;
            Ok(Wire::pack(TypeTag::Json, write_buffer(heap, &text)?))
        }
        // Guest-origin references re-pack their original bits unchanged;
        // host-origin references carry the table index assigned by the
        // bridge when the closure was registered.
        Value::Func(fr) => Ok(Wire::pack(TypeTag::Func, fr.to_payload())),
        Value::Array(items) => {
            if items.is_empty() {
                return Ok(Wire::pack(TypeTag::Array, 0));
            }
            let count = u32::try_from(items.len()).map_err(|_| CodecError::TooLarge(items.len()))?;
            let total = count
                .checked_mul(ARRAY_SLOT_SIZE)
                .ok_or(CodecError::TooLarge(items.len()))?;
            let addr = heap.allocate(total)?;
            for (i, item) in items.iter().enumerate() {
                let (lo, hi) = encode(item, &mut *heap)?.to_parts();
                let mut slot = [0u8; ARRAY_SLOT_SIZE as usize];
                slot[..8].copy_from_slice(&lo.to_le_bytes());
                slot[8..].copy_from_slice(&hi.to_le_bytes());
                heap.write_bytes(addr + i as u32 * ARRAY_SLOT_SIZE, &slot)?;
            }
            Ok(Wire::pack(TypeTag::Array, pack_slice(count, addr)))
        }
    }
}

/// Copy a byte sequence into freshly allocated guest memory and pack its
/// `(len << 32) | addr` payload. Empty buffers encode as address 0 without
/// invoking the allocator.
fn write_buffer(heap: &mut dyn GuestHeap, bytes: &[u8]) -> CodecResult<u128> {
    if bytes.is_empty() {
        return Ok(0);
    }
    let len = u32::try_from(bytes.len()).map_err(|_| CodecError::TooLarge(bytes.len()))?;
    let addr = heap.allocate(len)?;
    heap.write_bytes(addr, bytes)?;
    Ok(pack_slice(len, addr))
}
