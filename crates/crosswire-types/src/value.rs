use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{FuncRef, TypeTag};

/// A native value, the in-memory form of everything that crosses the
/// boundary.
///
/// This is a closed sum type: callers state the kind explicitly when they
/// construct a value. The `From` conversions below exist as a convenience
/// edge layer and reproduce the original host's inference rules
/// (non-negative integers map to `Uint`, negative to `Int`, fractional
/// numbers to `Float`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Absence of a value.
    Void,
    /// Boolean.
    Bool(bool),
    /// Signed integer. The wire carries 124 bits; anything wider is
    /// truncated by masking on encode.
    Int(i128),
    /// Unsigned integer. Same 124-bit truncation rule.
    Uint(u128),
    /// 64-bit float, carried bit-exactly.
    Float(f64),
    /// Raw byte buffer.
    Bytes(Vec<u8>),
    /// UTF-8 text.
    Str(String),
    /// Structured value, serialized as JSON text on the wire.
    Json(serde_json::Value),
    /// Function reference; see [`FuncRef`].
    Func(FuncRef),
    /// Ordered sequence of values of any kind, including nested arrays.
    Array(Vec<Value>),
}

impl Value {
    /// The wire tag this value encodes under.
    pub fn tag(&self) -> TypeTag {
        match self {
            Self::Void => TypeTag::Void,
            Self::Bool(_) => TypeTag::Bool,
            Self::Int(_) => TypeTag::Int,
            Self::Uint(_) => TypeTag::Uint,
            Self::Float(_) => TypeTag::Float,
            Self::Bytes(_) => TypeTag::Bytes,
            Self::Str(_) => TypeTag::Str,
            Self::Json(_) => TypeTag::Json,
            Self::Func(_) => TypeTag::Func,
            Self::Array(_) => TypeTag::Array,
        }
    }

    /// True for `Value::Void`.
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void => write!(f, "void"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Uint(u) => write!(f, "{u}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bytes(b) => {
                write!(f, "bytes[")?;
                for (i, byte) in b.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{byte:02x}")?;
                }
                write!(f, "]")
            }
            Self::Str(s) => write!(f, "{s}"),
            Self::Json(j) => write!(f, "{j}"),
            Self::Func(fr) => write!(f, "{fr}"),
            Self::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Self::Void
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Self::Float(x as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Self::Bytes(b.to_vec())
    }
}

impl From<serde_json::Value> for Value {
    fn from(j: serde_json::Value) -> Self {
        Self::Json(j)
    }
}

impl From<FuncRef> for Value {
    fn from(fr: FuncRef) -> Self {
        Self::Func(fr)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Array(items)
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for Value {
            fn from(i: $t) -> Self {
                // Original inference rule: negative means int, otherwise uint.
                if i < 0 {
                    Self::Int(i as i128)
                } else {
                    Self::Uint(i as u128)
                }
            }
        }
    )*};
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for Value {
            fn from(u: $t) -> Self {
                Self::Uint(u as u128)
            }
        }
    )*};
}

from_signed!(i8, i16, i32, i64, i128);
from_unsigned!(u8, u16, u32, u64, u128);
