//! Bridge for the crosswire marshalling protocol.
//!
//! # Architecture
//!
//! A [`Bridge`] binds the wire codec to exactly one guest instance and
//! forwards calls in both directions. The guest side of the contract:
//!
//! ## Required guest exports
//! - `allocate(size) → addr`
//! - `release(addr, size)`
//! - `memory` — linear memory
//! - any number of user entry points taking/returning wire register pairs
//!
//! ## Import surface handed to the guest
//! - `log(wire_lo, wire_hi)` — decode and print a value
//! - `call(func_lo, func_hi, args_lo, args_hi) → (lo, hi)` — dispatch a
//!   host-registered function reference with an array of arguments
//!
//! Host→guest: [`Bridge::call`] encodes each native argument (allocating
//! guest memory for variable-length payloads), invokes the named export
//! with the register pairs concatenated positionally, and decodes the
//! result. Guest→host: the guest re-enters through the `call` import,
//! which the bridge resolves against its [`FunctionTable`]. Both
//! directions may nest; this is ordinary call-stack recursion on a single
//! logical thread.
//!
//! Known limitation, kept deliberately: guest memory allocated for
//! arguments is never freed by the protocol. [`Bridge::release_value`]
//! exists as an explicit opt-in free.

mod bridge;
mod error;
mod guest;
mod table;
pub mod testing;

pub use bridge::Bridge;
pub use error::{BridgeError, BridgeResult};
pub use guest::{GuestInstance, ImportSurface, EXPORT_ALLOCATE, EXPORT_RELEASE, RESERVED_EXPORTS};
pub use table::{FunctionTable, HostFn};
