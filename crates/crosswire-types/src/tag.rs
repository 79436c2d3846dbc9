use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of value kinds that may cross the boundary.
///
/// The tag occupies the low 4 bits of a wire value; the remaining 124 bits
/// are the payload, whose interpretation depends solely on the tag:
///
/// | Tag      | Payload |
/// |----------|---------|
/// | `Void`   | ignored, always 0 |
/// | `Bool`   | least-significant bit |
/// | `Int`    | two's-complement signed integer, 124 bits |
/// | `Uint`   | unsigned integer, 124 bits |
/// | `Float`  | IEEE-754 double bit pattern in the low 64 bits |
/// | `Bytes`  | `(len << 32) \| addr` into guest memory |
/// | `Str`    | same as `Bytes`; contents are UTF-8 |
/// | `Json`   | same as `Bytes`; contents are a UTF-8 JSON document |
/// | `Func`   | bit 32 = origin, low 32 bits = address or table index |
/// | `Array`  | `(count << 32) \| addr`; 16-byte wire-value slots |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum TypeTag {
    Void = 0,
    Bool = 1,
    Int = 2,
    Uint = 3,
    Float = 4,
    Bytes = 5,
    Str = 6,
    Json = 7,
    Func = 8,
    Array = 9,
}

impl TypeTag {
    /// Decode a 4-bit tag field. Returns `None` for the unused tags 10–15;
    /// callers treat that as a protocol violation, never as a default.
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::Void),
            1 => Some(Self::Bool),
            2 => Some(Self::Int),
            3 => Some(Self::Uint),
            4 => Some(Self::Float),
            5 => Some(Self::Bytes),
            6 => Some(Self::Str),
            7 => Some(Self::Json),
            8 => Some(Self::Func),
            9 => Some(Self::Array),
            _ => None,
        }
    }

    /// The 4-bit wire encoding of this tag.
    pub fn bits(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void => write!(f, "void"),
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Uint => write!(f, "uint"),
            Self::Float => write!(f, "float"),
            Self::Bytes => write!(f, "bytes"),
            Self::Str => write!(f, "string"),
            Self::Json => write!(f, "json"),
            Self::Func => write!(f, "function"),
            Self::Array => write!(f, "array"),
        }
    }
}
