//! Bridge integration tests over the scripted in-memory guest.
//!
//! Covers: bind-time verification of the allocation primitives, export
//! enumeration/filtering, host→guest forwarding (including the documented
//! argument-allocation leak), guest→host dispatch through the `call`
//! import, re-entrant guest→host→guest flows, the `log` import, and
//! explicit release of variable-length values.

use std::cell::RefCell;
use std::rc::Rc;

use crosswire_bridge::testing::ScriptedGuest;
use crosswire_bridge::{Bridge, BridgeError};
use crosswire_codec::{decode, encode};
use crosswire_types::{FuncRef, TypeTag, Value, Wire};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// A guest whose `echo` export returns its first register pair unchanged.
fn echo_guest() -> ScriptedGuest {
    ScriptedGuest::new().export("echo", |_, args, _| Ok(vec![args[0], args[1]]))
}

// ─────────────────────────────────────────────────────────────────────
// Binding
// ─────────────────────────────────────────────────────────────────────

#[test]
fn bind_requires_allocate() {
    let mut guest = ScriptedGuest::new();
    guest.drop_export("allocate");
    match Bridge::bind(guest) {
        Err(BridgeError::MissingAllocPrimitive("allocate")) => {}
        other => panic!("expected missing allocate, got {:?}", other.err()),
    }
}

#[test]
fn bind_requires_release() {
    let mut guest = ScriptedGuest::new();
    guest.drop_export("release");
    match Bridge::bind(guest) {
        Err(BridgeError::MissingAllocPrimitive("release")) => {}
        other => panic!("expected missing release, got {:?}", other.err()),
    }
}

#[test]
fn reserved_exports_are_not_user_callable() {
    let bridge = Bridge::bind(echo_guest()).unwrap();
    assert_eq!(bridge.exports(), ["echo".to_string()]);

    let mut bridge = Bridge::bind(echo_guest()).unwrap();
    match bridge.call("allocate", &[Value::Uint(8)]) {
        Err(BridgeError::UnknownExport(name)) => assert_eq!(name, "allocate"),
        other => panic!("expected UnknownExport, got {:?}", other.err()),
    }
}

#[test]
fn unknown_export_is_rejected() {
    let mut bridge = Bridge::bind(echo_guest()).unwrap();
    match bridge.call("missing", &[]) {
        Err(BridgeError::UnknownExport(name)) => assert_eq!(name, "missing"),
        other => panic!("expected UnknownExport, got {:?}", other.err()),
    }
}

// ─────────────────────────────────────────────────────────────────────
// Host→guest forwarding
// ─────────────────────────────────────────────────────────────────────

#[test]
fn forward_call_round_trips_through_guest_memory() {
    let mut bridge = Bridge::bind(echo_guest()).unwrap();
    let result = bridge.call("echo", &[Value::from("hello guest")]).unwrap();
    assert_eq!(result, Value::Str("hello guest".into()));
}

#[test]
fn forward_call_with_array_argument() {
    let mut bridge = Bridge::bind(echo_guest()).unwrap();
    let arg = Value::Array(vec![Value::from(1), Value::from("a"), Value::from(true)]);
    assert_eq!(bridge.call("echo", &[arg.clone()]).unwrap(), arg);
}

#[test]
fn forward_call_with_json_argument() {
    let mut bridge = Bridge::bind(echo_guest()).unwrap();
    let doc = Value::Json(serde_json::json!({ "answer": 42, "tags": ["a", "b"] }));
    assert_eq!(bridge.call("echo", &[doc.clone()]).unwrap(), doc);
}

#[test]
fn empty_return_maps_to_void() {
    let guest = ScriptedGuest::new().export("fire", |_, _, _| Ok(Vec::new()));
    let mut bridge = Bridge::bind(guest).unwrap();
    assert_eq!(bridge.call("fire", &[Value::Uint(1)]).unwrap(), Value::Void);
}

#[test]
fn odd_return_arity_is_a_protocol_violation() {
    let guest = ScriptedGuest::new().export("bad", |_, _, _| Ok(vec![7]));
    let mut bridge = Bridge::bind(guest).unwrap();
    match bridge.call("bad", &[]) {
        Err(BridgeError::UnexpectedReturnArity(1)) => {}
        other => panic!("expected arity error, got {:?}", other.err()),
    }
}

#[test]
fn argument_allocations_are_not_released_by_forwarding() {
    // Documented limitation: every variable-length argument leaks its
    // guest allocation after the call.
    let mut bridge = Bridge::bind(echo_guest()).unwrap();
    bridge.call("echo", &[Value::from("leaky")]).unwrap();
    assert_eq!(bridge.guest_mut().heap().alloc_count, 1);
    assert!(bridge.guest_mut().heap().released.is_empty());
}

// ─────────────────────────────────────────────────────────────────────
// Guest→host dispatch (the `call` import)
// ─────────────────────────────────────────────────────────────────────

#[test]
fn host_function_dispatch_increments() {
    // Register f = |x| x + 1, encode it, simulate guest call(f, [41]).
    let mut bridge = Bridge::bind(ScriptedGuest::new()).unwrap();
    let fr = bridge.register(|args| match args {
        [Value::Uint(x)] => Ok(Value::Uint(x + 1)),
        _ => Err("expected one uint".to_string()),
    });

    let func_wire = encode(&Value::Func(fr), bridge.guest_mut()).unwrap();
    let args_wire = encode(&Value::Array(vec![Value::from(41)]), bridge.guest_mut()).unwrap();

    let result = bridge.dispatch(func_wire, args_wire).unwrap();
    assert_eq!(result.tag_bits(), TypeTag::Uint.bits());
    assert_eq!(decode(result, bridge.guest_mut()).unwrap(), Value::Uint(42));
}

#[test]
fn void_arguments_dispatch_as_zero_arity() {
    let mut bridge = Bridge::bind(ScriptedGuest::new()).unwrap();
    let fr = bridge.register(|args| {
        assert!(args.is_empty());
        Ok(Value::Str("ran".into()))
    });
    let func_wire = Wire::pack(TypeTag::Func, fr.to_payload());
    let void_wire = Wire::pack(TypeTag::Void, 0);
    let result = bridge.dispatch(func_wire, void_wire).unwrap();
    assert_eq!(decode(result, bridge.guest_mut()).unwrap(), Value::Str("ran".into()));
}

#[test]
fn guest_origin_references_cannot_be_dispatched() {
    let mut bridge = Bridge::bind(ScriptedGuest::new()).unwrap();
    let func_wire = Wire::pack(TypeTag::Func, FuncRef::guest(0x10).to_payload());
    let void_wire = Wire::pack(TypeTag::Void, 0);
    match bridge.dispatch(func_wire, void_wire) {
        Err(BridgeError::GuestOriginDispatch) => {}
        other => panic!("expected GuestOriginDispatch, got {:?}", other.err()),
    }
}

#[test]
fn unregistered_index_is_a_missing_reference() {
    let mut bridge = Bridge::bind(ScriptedGuest::new()).unwrap();
    let func_wire = Wire::pack(TypeTag::Func, FuncRef::host(99).to_payload());
    let void_wire = Wire::pack(TypeTag::Void, 0);
    match bridge.dispatch(func_wire, void_wire) {
        Err(BridgeError::MissingFunction(99)) => {}
        other => panic!("expected MissingFunction, got {:?}", other.err()),
    }
}

#[test]
fn non_array_arguments_are_rejected() {
    let mut bridge = Bridge::bind(ScriptedGuest::new()).unwrap();
    let fr = bridge.register(|_| Ok(Value::Void));
    let func_wire = Wire::pack(TypeTag::Func, fr.to_payload());
    let bad_args = Wire::pack(TypeTag::Uint, 5);
    match bridge.dispatch(func_wire, bad_args) {
        Err(BridgeError::NotAnArgumentArray(TypeTag::Uint)) => {}
        other => panic!("expected NotAnArgumentArray, got {:?}", other.err()),
    }
}

#[test]
fn non_function_dispatch_is_rejected() {
    let mut bridge = Bridge::bind(ScriptedGuest::new()).unwrap();
    let not_func = Wire::pack(TypeTag::Bool, 1);
    let void_wire = Wire::pack(TypeTag::Void, 0);
    match bridge.dispatch(not_func, void_wire) {
        Err(BridgeError::NotAFunction(TypeTag::Bool)) => {}
        other => panic!("expected NotAFunction, got {:?}", other.err()),
    }
}

#[test]
fn host_function_failures_surface_to_the_caller() {
    let mut bridge = Bridge::bind(ScriptedGuest::new()).unwrap();
    let fr = bridge.register(|_| Err("boom".to_string()));
    let func_wire = Wire::pack(TypeTag::Func, fr.to_payload());
    let void_wire = Wire::pack(TypeTag::Void, 0);
    match bridge.dispatch(func_wire, void_wire) {
        Err(BridgeError::Host(msg)) => assert_eq!(msg, "boom"),
        other => panic!("expected Host error, got {:?}", other.err()),
    }
}

// ─────────────────────────────────────────────────────────────────────
// Re-entrant flows and the `log` import
// ─────────────────────────────────────────────────────────────────────

#[test]
fn guest_reenters_host_mid_call() {
    // Guest export `apply21` receives a function reference, builds the
    // argument array [21] in its own memory, and re-enters the host
    // through the `call` import — all inside one host→guest call.
    let guest = ScriptedGuest::new().export("apply21", |heap, args, imports| {
        let func = Wire::from_parts(args[0], args[1]);
        let call_args = encode(&Value::Array(vec![Value::from(21)]), heap)
            .map_err(crosswire_bridge::BridgeError::Codec)?;
        let result = imports.call(heap, func, call_args)?;
        let (lo, hi) = result.to_parts();
        Ok(vec![lo, hi])
    });
    let mut bridge = Bridge::bind(guest).unwrap();
    let fr = bridge.register(|args| match args {
        [Value::Uint(x)] => Ok(Value::Uint(x * 2)),
        _ => Err("expected one uint".to_string()),
    });

    let result = bridge.call("apply21", &[Value::Func(fr)]).unwrap();
    assert_eq!(result, Value::Uint(42));
}

#[test]
fn log_import_routes_to_the_sink() {
    let guest = ScriptedGuest::new().export("announce", |heap, _, imports| {
        let wire = encode(&Value::from("hello from the guest"), heap)
            .map_err(crosswire_bridge::BridgeError::Codec)?;
        imports.log(heap, wire)?;
        Ok(Vec::new())
    });
    let mut bridge = Bridge::bind(guest).unwrap();

    let lines: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let sink_lines = Rc::clone(&lines);
    bridge.set_log_sink(move |value| sink_lines.borrow_mut().push(value.to_string()));

    bridge.call("announce", &[]).unwrap();
    assert_eq!(lines.borrow().as_slice(), ["hello from the guest"]);
}

#[test]
fn log_value_decodes_and_prints() {
    let mut bridge = Bridge::bind(ScriptedGuest::new()).unwrap();
    let lines: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let sink_lines = Rc::clone(&lines);
    bridge.set_log_sink(move |value| sink_lines.borrow_mut().push(value.to_string()));

    let wire = encode(&Value::Uint(7), bridge.guest_mut()).unwrap();
    bridge.log_value(wire).unwrap();
    assert_eq!(lines.borrow().as_slice(), ["7"]);
}

// ─────────────────────────────────────────────────────────────────────
// Explicit release
// ─────────────────────────────────────────────────────────────────────

#[test]
fn release_value_frees_a_string_payload() {
    let mut bridge = Bridge::bind(ScriptedGuest::new()).unwrap();
    let wire = encode(&Value::from("free me"), bridge.guest_mut()).unwrap();
    bridge.release_value(wire).unwrap();

    let released = &bridge.guest_mut().heap().released;
    assert_eq!(released.len(), 1);
    assert_eq!(released[0].1, "free me".len() as u32);
}

#[test]
fn release_value_recurses_into_arrays() {
    let mut bridge = Bridge::bind(ScriptedGuest::new()).unwrap();
    let value = Value::Array(vec![
        Value::from("abc"),
        Value::Bytes(vec![1, 2]),
        Value::Uint(9),
    ]);
    let wire = encode(&value, bridge.guest_mut()).unwrap();
    bridge.release_value(wire).unwrap();

    let released = bridge.guest_mut().heap().released.clone();
    // Two element payloads plus the slot block itself.
    assert_eq!(released.len(), 3);
    assert!(released.iter().any(|&(_, size)| size == 3), "string payload");
    assert!(released.iter().any(|&(_, size)| size == 2), "bytes payload");
    assert_eq!(released.last().unwrap().1, 3 * 16, "slot block freed last");
}

#[test]
fn release_value_ignores_scalars_and_empties() {
    let mut bridge = Bridge::bind(ScriptedGuest::new()).unwrap();
    for value in [Value::Uint(1), Value::Str(String::new()), Value::Array(Vec::new())] {
        let wire = encode(&value, bridge.guest_mut()).unwrap();
        bridge.release_value(wire).unwrap();
    }
    assert!(bridge.guest_mut().heap().released.is_empty());
}
