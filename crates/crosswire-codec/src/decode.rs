//! Wire → native decoding.

use crosswire_types::{unpack_slice, FuncRef, TypeTag, Value, Wire, ARRAY_SLOT_SIZE, TAG_BITS};

use crate::{CodecError, CodecResult, MemoryAccess};

/// Decode a wire value into its native form.
///
/// Variable-length kinds read their payload out of guest memory through
/// `mem`. Array elements are themselves full wire values and decode
/// recursively; a `function` payload decodes to a plain [`FuncRef`] whose
/// invocation routes through the bridge.
pub fn decode(wire: Wire, mem: &dyn MemoryAccess) -> CodecResult<Value> {
    let tag = TypeTag::from_bits(wire.tag_bits())
        .ok_or_else(|| CodecError::UnknownTag(wire.tag_bits()))?;
    let payload = wire.payload();

    match tag {
        TypeTag::Void => Ok(Value::Void),
        // Only the least-significant bit is meaningful; the rest of the
        // field is ignored in case it was reused.
        TypeTag::Bool => Ok(Value::Bool(payload & 1 == 1)),
        TypeTag::Int => Ok(Value::Int(sign_extend(payload))),
        TypeTag::Uint => Ok(Value::Uint(payload)),
        TypeTag::Float => Ok(Value::Float(f64::from_bits(payload as u64))),
        TypeTag::Bytes => Ok(Value::Bytes(read_buffer(mem, payload)?)),
        TypeTag::Str => {
            let buf = read_buffer(mem, payload)?;
            let s = String::from_utf8(buf).map_err(|_| CodecError::InvalidUtf8)?;
            Ok(Value::Str(s))
        }
        TypeTag::Json => {
            let buf = read_buffer(mem, payload)?;
            let text = std::str::from_utf8(&buf).map_err(|_| CodecError::InvalidUtf8)?;
            Ok(Value::Json(serde_json::from_str(text)?))
        }
        TypeTag::Func => Ok(Value::Func(FuncRef::from_payload(payload))),
        TypeTag::Array => {
            let (count, addr) = unpack_slice(payload);
            if count == 0 {
                return Ok(Value::Array(Vec::new()));
            }
            let mut slots = vec![0u8; count as usize * ARRAY_SLOT_SIZE as usize];
            mem.read_bytes(addr, &mut slots)?;
            let mut items = Vec::with_capacity(count as usize);
            for slot in slots.chunks_exact(ARRAY_SLOT_SIZE as usize) {
                let lo = u64::from_le_bytes(slot[..8].try_into().expect("slot width"));
                let hi = u64::from_le_bytes(slot[8..].try_into().expect("slot width"));
                items.push(decode(Wire::from_parts(lo, hi), mem)?);
            }
            Ok(Value::Array(items))
        }
    }
}

/// Two's-complement sign extension from the 124-bit payload field.
fn sign_extend(payload: u128) -> i128 {
    ((payload << TAG_BITS) as i128) >> TAG_BITS
}

/// Read a `(len << 32) | addr` payload out of guest memory. A zero length
/// decodes to an empty buffer without touching the capability.
fn read_buffer(mem: &dyn MemoryAccess, payload: u128) -> CodecResult<Vec<u8>> {
    let (len, addr) = unpack_slice(payload);
    if len == 0 {
        return Ok(Vec::new());
    }
    let mut buf = vec![0u8; len as usize];
    mem.read_bytes(addr, &mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crosswire_types::PAYLOAD_BITS;

    #[test]
    fn sign_extension_width() {
        let mask = crosswire_types::PAYLOAD_MASK;
        // -1 masked to 124 bits must come back as -1.
        assert_eq!(sign_extend((-1i128 as u128) & mask), -1);
        // 124-bit extremes.
        let min = -(1i128 << (PAYLOAD_BITS - 1));
        let max = (1i128 << (PAYLOAD_BITS - 1)) - 1;
        assert_eq!(sign_extend((min as u128) & mask), min);
        assert_eq!(sign_extend((max as u128) & mask), max);
        assert_eq!(sign_extend(42), 42);
    }
}
