//! The bridge proper: capability binding and bidirectional call
//! forwarding.

use crosswire_codec::{decode, encode, GuestHeap, MemoryAccess};
use crosswire_types::{unpack_slice, FuncOrigin, TypeTag, Value, Wire, ARRAY_SLOT_SIZE};

use crate::guest::{GuestInstance, ImportSurface, EXPORT_ALLOCATE, EXPORT_RELEASE, RESERVED_EXPORTS};
use crate::table::{FunctionTable, HostFn};
use crate::{BridgeError, BridgeResult};

/// Where decoded `log` values go. Defaults to stdout.
type LogSink = Box<dyn FnMut(&Value)>;

/// Binds the codec to one guest instance and forwards calls both ways.
///
/// Construction via [`Bridge::bind`] is the only state transition: once
/// bound, a bridge stays bound for the life of the guest (guest lifetime
/// equals host-process lifetime in this design, so there is no teardown).
pub struct Bridge<G: GuestInstance> {
    guest: G,
    /// User-callable export names: everything except [`RESERVED_EXPORTS`].
    exports: Vec<String>,
    table: FunctionTable,
    sink: LogSink,
}

impl<G: GuestInstance> Bridge<G> {
    /// Bind a guest instance.
    ///
    /// Verifies that the `allocate` and `release` primitives are exported
    /// (fatal otherwise — no call forwarding is possible without them)
    /// and enumerates the user-callable exports.
    pub fn bind(guest: G) -> BridgeResult<Self> {
        let names = guest.export_names();
        for required in [EXPORT_ALLOCATE, EXPORT_RELEASE] {
            if !names.iter().any(|n| n == required) {
                return Err(BridgeError::MissingAllocPrimitive(required));
            }
        }
        let exports = names
            .into_iter()
            .filter(|n| !RESERVED_EXPORTS.contains(&n.as_str()))
            .collect();
        Ok(Self {
            guest,
            exports,
            table: FunctionTable::new(),
            sink: Box::new(|value| println!("{value}")),
        })
    }

    /// The user-callable export names enumerated at bind time.
    pub fn exports(&self) -> &[String] {
        &self.exports
    }

    /// Access the bound guest (tests use this to seed guest memory).
    pub fn guest_mut(&mut self) -> &mut G {
        &mut self.guest
    }

    /// Replace the `log` sink (defaults to stdout).
    pub fn set_log_sink<F: FnMut(&Value) + 'static>(&mut self, sink: F) {
        self.sink = Box::new(sink);
    }

    /// Register a host function for the guest to call, returning a
    /// host-origin reference that encodes as a `function` wire value.
    ///
    /// Entries are never removed; the index stays valid for the life of
    /// the bridge.
    pub fn register<F>(&mut self, f: F) -> crosswire_types::FuncRef
    where
        F: FnMut(&[Value]) -> Result<Value, String> + 'static,
    {
        crosswire_types::FuncRef::host(self.table.register(Box::new(f)))
    }

    /// Call a guest export with native arguments (host→guest forwarding).
    ///
    /// Each argument is encoded into a register pair; variable-length
    /// payloads are written into freshly allocated guest memory and — by
    /// design — never released afterwards (see the crate docs). An empty
    /// return maps to [`Value::Void`].
    pub fn call(&mut self, name: &str, args: &[Value]) -> BridgeResult<Value> {
        if !self.exports.iter().any(|e| e == name) {
            return Err(BridgeError::UnknownExport(name.to_string()));
        }

        let mut words = Vec::with_capacity(args.len() * 2);
        for arg in args {
            let (lo, hi) = encode(arg, &mut self.guest)?.to_parts();
            words.push(lo);
            words.push(hi);
        }

        let mut imports = Imports {
            table: &mut self.table,
            sink: &mut self.sink,
        };
        let ret = self.guest.invoke(name, &words, &mut imports)?;

        match ret.len() {
            0 => Ok(Value::Void),
            2 => Ok(decode(Wire::from_parts(ret[0], ret[1]), &self.guest)?),
            n => Err(BridgeError::UnexpectedReturnArity(n)),
        }
    }

    /// Dispatch an incoming guest→host call (the body of the `call`
    /// import). Public so embedders can wire it to their runtime's import
    /// mechanism directly.
    pub fn dispatch(&mut self, func: Wire, args: Wire) -> BridgeResult<Wire> {
        let mut imports = Imports {
            table: &mut self.table,
            sink: &mut self.sink,
        };
        imports.call(&mut self.guest, func, args)
    }

    /// The body of the `log` import: decode a wire value and hand it to
    /// the sink.
    pub fn log_value(&mut self, value: Wire) -> BridgeResult<()> {
        let decoded = decode(value, &self.guest)?;
        (self.sink)(&decoded);
        Ok(())
    }

    /// Explicitly free the guest memory behind a variable-length wire
    /// value, recursing into array elements. Opt-in: forwarding leaves
    /// allocations alive, and callers who care invoke this afterwards.
    pub fn release_value(&mut self, wire: Wire) -> BridgeResult<()> {
        let tag = TypeTag::from_bits(wire.tag_bits())
            .ok_or_else(|| crosswire_codec::CodecError::UnknownTag(wire.tag_bits()))?;
        match tag {
            TypeTag::Bytes | TypeTag::Str | TypeTag::Json => {
                let (len, addr) = unpack_slice(wire.payload());
                if len > 0 {
                    self.guest.release(addr, len)?;
                }
                Ok(())
            }
            TypeTag::Array => {
                let (count, addr) = unpack_slice(wire.payload());
                if count == 0 {
                    return Ok(());
                }
                for i in 0..count {
                    let mut slot = [0u8; ARRAY_SLOT_SIZE as usize];
                    self.guest
                        .read_bytes(addr + i * ARRAY_SLOT_SIZE, &mut slot)?;
                    let lo = u64::from_le_bytes(slot[..8].try_into().expect("slot width"));
                    let hi = u64::from_le_bytes(slot[8..].try_into().expect("slot width"));
                    self.release_value(Wire::from_parts(lo, hi))?;
                }
                self.guest.release(addr, count * ARRAY_SLOT_SIZE)?;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// The import surface handed to the guest on every invoke: a view over the
/// bridge's function table and log sink, borrowed disjointly from the
/// guest itself.
struct Imports<'a> {
    table: &'a mut FunctionTable,
    sink: &'a mut LogSink,
}

impl ImportSurface for Imports<'_> {
    fn log(&mut self, mem: &dyn MemoryAccess, value: Wire) -> BridgeResult<()> {
        let decoded = decode(value, mem)?;
        (self.sink)(&decoded);
        Ok(())
    }

    fn call(&mut self, heap: &mut dyn GuestHeap, func: Wire, args: Wire) -> BridgeResult<Wire> {
        let func_ref = match decode(func, &*heap)? {
            Value::Func(fr) => fr,
            other => return Err(BridgeError::NotAFunction(other.tag())),
        };
        if func_ref.origin != FuncOrigin::Host {
            return Err(BridgeError::GuestOriginDispatch);
        }

        // Void is tolerated as "no arguments"; anything else must be an
        // array, spread positionally.
        let argv = match decode(args, &*heap)? {
            Value::Array(items) => items,
            Value::Void => Vec::new(),
            other => return Err(BridgeError::NotAnArgumentArray(other.tag())),
        };

        let entry: &mut HostFn = self
            .table
            .get_mut(func_ref.index)
            .ok_or(BridgeError::MissingFunction(func_ref.index))?;
        let result = entry(&argv).map_err(BridgeError::Host)?;

        Ok(encode(&result, heap)?)
    }
}
