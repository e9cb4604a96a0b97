//! End-to-end behavior of the mock surface: registration, instrumented
//! access, ordering guarantees, callback conventions, and the event-emitter
//! facade.

use mimic::{
    EventKind, MethodOptions, MockBuilder, MockError, NativeFn, PropertyOptions, Value,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn static_return_value_is_stable_and_every_call_is_logged() {
    let mut mock = MockBuilder::new();
    mock.create_method("ping", MethodOptions::default().returning("pong"));

    for _ in 0..3 {
        assert_eq!(mock.object().call("ping", &[]).unwrap(), Value::str("pong"));
    }

    let events = mock.invocations();
    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|e| e.is_call() && e.member == "ping"));
}

#[test]
fn call_arguments_are_recorded_in_call_order() {
    let mut mock = MockBuilder::new();
    mock.create_method("foo", MethodOptions::default());
    mock.create_method("bar", MethodOptions::default());

    mock.object()
        .call("foo", &[Value::Int(1), Value::Int(2)])
        .unwrap();
    mock.object()
        .call("foo", &[Value::Int(2), Value::Int(3)])
        .unwrap();
    mock.object().call("bar", &[Value::Int(123)]).unwrap();

    let events = mock.invocations();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].member, "foo");
    assert_eq!(
        events[0].arguments(),
        Some(&[Value::Int(1), Value::Int(2)][..])
    );
    assert_eq!(events[1].member, "foo");
    assert_eq!(events[2].member, "bar");

    // Per-member history agrees with the global log.
    assert_eq!(mock.metadata().method_calls("foo").len(), 2);
    assert_eq!(
        mock.metadata().method_calls("bar"),
        vec![vec![Value::Int(123)]]
    );
}

#[test]
fn dynamic_value_computes_the_result_per_call() {
    let mut mock = MockBuilder::new();
    mock.create_method(
        "f",
        MethodOptions::default().dynamic(|_, args| {
            let a = args.first().and_then(Value::as_int).unwrap_or(0);
            Ok(Value::Int(a * 2))
        }),
    );

    assert_eq!(mock.object().call("f", &[Value::Int(3)]).unwrap(), Value::Int(6));

    let events = mock.invocations();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].arguments(), Some(&[Value::Int(3)][..]));
}

#[test]
fn dynamic_value_failure_propagates_unmodified() {
    let mut mock = MockBuilder::new();
    mock.create_method(
        "flaky",
        MethodOptions::default()
            .dynamic(|_, _| Err(MockError::Simulated("backend down".into()))),
    );

    let err = mock.object().call("flaky", &[]).unwrap_err();
    assert!(matches!(err, MockError::Simulated(msg) if msg == "backend down"));
    // The call itself was still recorded.
    assert_eq!(mock.log().len(), 1);
}

#[test]
fn dynamic_value_receives_the_surface_as_receiver() {
    let mut mock = MockBuilder::new();
    mock.create_property("count", PropertyOptions::default().initial(41));
    mock.create_method(
        "bump",
        MethodOptions::default().dynamic(|object, _| {
            let current = object.get("count")?.as_int().unwrap_or(0);
            object.set("count", Value::Int(current + 1))?;
            object.get("count")
        }),
    );

    assert_eq!(mock.object().call("bump", &[]).unwrap(), Value::Int(42));
}

#[test]
fn completion_callback_fires_synchronously_with_configured_args() {
    let mut mock = MockBuilder::new();
    mock.create_method(
        "bar",
        MethodOptions::default().callback_args(vec![Value::Int(1), Value::Int(2)]),
    );

    let seen = Arc::new(parking_lot::Mutex::new(None));
    let seen_in_cb = seen.clone();
    let callback: NativeFn = Arc::new(move |args| {
        *seen_in_cb.lock() = Some(args.to_vec());
        Ok(Value::Undefined)
    });

    mock.object()
        .call_with_callback("bar", &[Value::Int(2)], &callback)
        .unwrap();

    // Fired inline, before the call returned.
    assert_eq!(seen.lock().clone(), Some(vec![Value::Int(1), Value::Int(2)]));
}

#[test]
fn completion_callback_gets_zero_args_when_none_configured() {
    let mut mock = MockBuilder::new();
    mock.create_method("foo", MethodOptions::default());

    let argc = Arc::new(AtomicUsize::new(usize::MAX));
    let argc_in_cb = argc.clone();
    let callback: NativeFn = Arc::new(move |args| {
        argc_in_cb.store(args.len(), Ordering::SeqCst);
        Ok(Value::Undefined)
    });

    mock.object().call_with_callback("foo", &[], &callback).unwrap();
    assert_eq!(argc.load(Ordering::SeqCst), 0);
}

#[test]
fn completion_callback_is_suppressed_when_disabled() {
    let mut mock = MockBuilder::new();
    mock.create_method("bar", MethodOptions::default().no_callback());

    let fired = Arc::new(AtomicUsize::new(0));
    let fired_in_cb = fired.clone();
    let callback: NativeFn = Arc::new(move |_| {
        fired_in_cb.fetch_add(1, Ordering::SeqCst);
        Ok(Value::Undefined)
    });

    mock.object()
        .call_with_callback("bar", &[Value::Int(2)], &callback)
        .unwrap();
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[test]
fn property_roundtrip_and_event_ordering() {
    let mut mock = MockBuilder::new();
    mock.create_property("foo", PropertyOptions::default().initial(5));

    assert_eq!(mock.object().get("foo").unwrap(), Value::Int(5));

    mock.object().set("foo", Value::Int(1)).unwrap();
    mock.object().set("foo", Value::Int(2)).unwrap();
    assert_eq!(mock.object().get("foo").unwrap(), Value::Int(2));

    let events = mock.invocations();
    assert_eq!(events.len(), 4);
    assert_eq!(events[0].kind, EventKind::Get { value: Value::Int(5) });
    assert_eq!(events[1].kind, EventKind::Set { value: Value::Int(1) });
    assert_eq!(events[2].kind, EventKind::Set { value: Value::Int(2) });
    assert_eq!(events[3].kind, EventKind::Get { value: Value::Int(2) });

    assert_eq!(
        mock.metadata().assignments("foo"),
        vec![Value::Int(1), Value::Int(2)]
    );
}

#[test]
fn custom_accessor_overrides_control_values_but_access_is_still_logged() {
    let mut mock = MockBuilder::new();
    mock.create_property(
        "masked",
        PropertyOptions::default()
            .initial("secret")
            .get(|_| Value::str("****"))
            .set(|slot, written| {
                // Store a redacted marker instead of the written value.
                *slot = Value::str(format!("redacted:{}", written.type_name()));
            }),
    );

    assert_eq!(mock.object().get("masked").unwrap(), Value::str("****"));
    mock.object().set("masked", Value::Int(99)).unwrap();

    let events = mock.invocations();
    // The get event records the stored value, not the override's output.
    assert_eq!(events[0].kind, EventKind::Get { value: Value::str("secret") });
    // The set event records the write attempt as-written.
    assert_eq!(events[1].kind, EventKind::Set { value: Value::Int(99) });
}

#[test]
fn bulk_factory_registers_exactly_the_requested_members() {
    let mock = MockBuilder::create(["a", "b"], ["c"]);

    assert_eq!(
        mock.metadata().names(),
        vec!["a".to_string(), "b".to_string(), "c".to_string()]
    );
    assert!(mock.object().is_method("a"));
    assert!(mock.object().is_method("b"));
    assert!(mock.object().is_property("c"));
    assert!(mock.invocations().is_empty());
}

#[test]
fn emitter_bridges_surface_to_test_and_back() {
    let mut mock = MockBuilder::new();
    let emitter = mock.create_event_emitter();

    // Code under test subscribes through the surface; the test publishes
    // through the emitter.
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_in_listener = hits.clone();
    let listener = Value::native(move |_| {
        hits_in_listener.fetch_add(1, Ordering::SeqCst);
        Ok(Value::Undefined)
    });
    mock.object()
        .call("on", &[Value::str("x"), listener])
        .unwrap();
    emitter.emit("x", &[]).unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    // And symmetrically: the test subscribes, the surface publishes.
    let hits_back = Arc::new(AtomicUsize::new(0));
    let hits_in_listener = hits_back.clone();
    emitter.on(
        "y",
        Arc::new(move |_| {
            hits_in_listener.fetch_add(1, Ordering::SeqCst);
            Ok(Value::Undefined)
        }),
    );
    let fired = mock.object().call("emit", &[Value::str("y")]).unwrap();
    assert_eq!(fired, Value::Bool(true));
    assert_eq!(hits_back.load(Ordering::SeqCst), 1);

    // Facade calls are ordinary logged method calls.
    let members: Vec<_> = mock.invocations().iter().map(|e| e.member.clone()).collect();
    assert_eq!(members, vec!["on".to_string(), "emit".to_string()]);
}

#[test]
fn once_through_the_surface_fires_a_single_time() {
    let mut mock = MockBuilder::new();
    let emitter = mock.create_event_emitter();

    let hits = Arc::new(AtomicUsize::new(0));
    let hits_in_listener = hits.clone();
    let listener = Value::native(move |_| {
        hits_in_listener.fetch_add(1, Ordering::SeqCst);
        Ok(Value::Undefined)
    });
    mock.object()
        .call("once", &[Value::str("x"), listener])
        .unwrap();

    emitter.emit("x", &[]).unwrap();
    emitter.emit("x", &[]).unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn interleaved_access_across_members_keeps_global_order() {
    let mut mock = MockBuilder::new();
    mock.create_method("m", MethodOptions::default());
    mock.create_property("p", PropertyOptions::default());

    mock.object().set("p", Value::Int(1)).unwrap();
    mock.object().call("m", &[]).unwrap();
    mock.object().get("p").unwrap();

    let tags: Vec<_> = mock.invocations().iter().map(|e| e.tag()).collect();
    assert_eq!(tags, vec!["set_p", "call_m", "get_p"]);
}
