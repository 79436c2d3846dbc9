use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the boundary a function reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuncOrigin {
    /// A guest-native function, identified by its code address.
    Guest,
    /// A host-native function, identified by its index in the bridge's
    /// function table.
    Host,
}

/// A wire-transportable handle to a callable on either side.
///
/// Payload packing: bit 32 is the origin (0 = guest, 1 = host); the low
/// 32 bits are the guest code address or the host table index. A reference
/// decoded from the guest re-encodes to the identical bits, so guest
/// functions round-trip without re-registration.
///
/// A `FuncRef` is plain data; invoking it routes through the bridge, not
/// through the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FuncRef {
    pub origin: FuncOrigin,
    /// Guest code address or host function-table index, per `origin`.
    pub index: u32,
}

impl FuncRef {
    /// Reference a guest function by code address.
    pub fn guest(addr: u32) -> Self {
        Self {
            origin: FuncOrigin::Guest,
            index: addr,
        }
    }

    /// Reference a host function by table index.
    pub fn host(index: u32) -> Self {
        Self {
            origin: FuncOrigin::Host,
            index,
        }
    }

    /// Pack into the `function` payload convention.
    pub fn to_payload(self) -> u128 {
        let origin = match self.origin {
            FuncOrigin::Guest => 0u128,
            FuncOrigin::Host => 1u128,
        };
        (origin << 32) | self.index as u128
    }

    /// Unpack from a `function` payload. Only bit 32 and the low 32 bits
    /// are meaningful; anything above is ignored.
    pub fn from_payload(payload: u128) -> Self {
        let origin = if (payload >> 32) & 1 == 1 {
            FuncOrigin::Host
        } else {
            FuncOrigin::Guest
        };
        Self {
            origin,
            index: payload as u32,
        }
    }
}

impl fmt::Display for FuncRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.origin {
            FuncOrigin::Guest => write!(f, "function(guest@{:#x})", self.index),
            FuncOrigin::Host => write!(f, "function(host#{})", self.index),
        }
    }
}
