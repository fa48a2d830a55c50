use std::{cell::RefCell, rc::Rc};

use serde_json::json;

use crate::runtime::{
    RuntimeContext, config::RuntimeConfig, event_loop::EventLoop, hash_key::HashKey, value::Value,
};

use super::function_ops::{
    builtin_delay, builtin_identity, builtin_invoke, builtin_memoize, builtin_once,
    builtin_throttle,
};

fn test_ctx() -> EventLoop {
    EventLoop::with_config(RuntimeConfig::default().with_seed(7))
}

fn v(json: serde_json::Value) -> Value {
    Value::from_json(json)
}

/// Closure returning its first argument and recording every argument list.
fn recorder(name: &str) -> (Value, Rc<RefCell<Vec<Vec<Value>>>>) {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&calls);
    let func = Value::closure(name, move |_, _, args| {
        sink.borrow_mut().push(args.clone());
        Ok(args.first().cloned().unwrap_or(Value::None))
    });
    (func, calls)
}

#[test]
fn identity_returns_first_argument() {
    let mut ctx = test_ctx();
    assert_eq!(
        builtin_identity(&mut ctx, vec![Value::from("x"), Value::Integer(1)]).unwrap(),
        Value::from("x")
    );
    assert!(builtin_identity(&mut ctx, vec![]).is_err());
}

#[test]
fn once_runs_inner_function_a_single_time() {
    let mut ctx = test_ctx();
    let (inner, calls) = recorder("create");
    let wrapped = builtin_once(&mut ctx, vec![inner]).unwrap();

    for n in 0..5 {
        let result = ctx
            .invoke_value(wrapped.clone(), vec![Value::Integer(n)])
            .unwrap();
        assert_eq!(result, Value::Integer(0));
    }
    assert_eq!(calls.borrow().len(), 1);
}

#[test]
fn once_retries_after_failure() {
    let mut ctx = test_ctx();
    let attempts = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&attempts);
    let flaky = Value::closure("flaky", move |_, _, _| {
        *counter.borrow_mut() += 1;
        if *counter.borrow() == 1 {
            Err("not yet".to_string())
        } else {
            Ok(Value::from("ready"))
        }
    });
    let wrapped = builtin_once(&mut ctx, vec![flaky]).unwrap();

    assert_eq!(
        ctx.invoke_value(wrapped.clone(), vec![]).unwrap_err(),
        "not yet"
    );
    assert_eq!(
        ctx.invoke_value(wrapped.clone(), vec![]).unwrap(),
        Value::from("ready")
    );
    assert_eq!(
        ctx.invoke_value(wrapped, vec![]).unwrap(),
        Value::from("ready")
    );
    assert_eq!(*attempts.borrow(), 2);
}

#[test]
fn once_wrappers_do_not_share_state() {
    let mut ctx = test_ctx();
    let (inner, calls) = recorder("create");
    let first = builtin_once(&mut ctx, vec![inner.clone()]).unwrap();
    let second = builtin_once(&mut ctx, vec![inner]).unwrap();

    ctx.invoke_value(first, vec![Value::Integer(1)]).unwrap();
    let result = ctx.invoke_value(second, vec![Value::Integer(2)]).unwrap();
    assert_eq!(result, Value::Integer(2));
    assert_eq!(calls.borrow().len(), 2);
}

#[test]
fn once_reentrant_call_returns_none() {
    let mut ctx = test_ctx();
    let slot: Rc<RefCell<Option<Value>>> = Rc::new(RefCell::new(None));
    let handle = Rc::clone(&slot);
    let reenter = Value::closure("reenter", move |ctx, _, _| {
        let wrapped = handle.borrow().clone().unwrap_or(Value::None);
        let inner = ctx.invoke_value(wrapped, vec![])?;
        Ok(Value::array(vec![inner]))
    });
    let wrapped = builtin_once(&mut ctx, vec![reenter]).unwrap();
    *slot.borrow_mut() = Some(wrapped.clone());

    let result = ctx.invoke_value(wrapped.clone(), vec![]).unwrap();
    assert_eq!(result, Value::array(vec![Value::None]));
    assert_eq!(ctx.invoke_value(wrapped, vec![]).unwrap(), result);

    slot.borrow_mut().take();
}

#[test]
fn once_rejects_non_function() {
    let err = builtin_once(&mut test_ctx(), vec![Value::Integer(3)]).unwrap_err();
    assert!(err.contains("once expected argument to be Function, got Int"));
}

#[test]
fn memoize_caches_per_first_argument() {
    let mut ctx = test_ctx();
    let (inner, calls) = recorder("slow");
    let fast = builtin_memoize(&mut ctx, vec![inner]).unwrap();

    for _ in 0..3 {
        let result = ctx
            .invoke_value(fast.clone(), vec![Value::Integer(5)])
            .unwrap();
        assert_eq!(result, Value::Integer(5));
    }
    assert_eq!(calls.borrow().len(), 1);
}

#[test]
fn memoize_keeps_types_apart() {
    let mut ctx = test_ctx();
    let (inner, calls) = recorder("slow");
    let fast = builtin_memoize(&mut ctx, vec![inner]).unwrap();

    for key in [Value::Integer(1), Value::from("1"), Value::Float(1.0), Value::None] {
        let result = ctx.invoke_value(fast.clone(), vec![key.clone()]).unwrap();
        assert_eq!(result, key);
    }
    assert_eq!(calls.borrow().len(), 4);
}

#[test]
fn memoize_rejects_composite_keys() {
    let mut ctx = test_ctx();
    let (inner, calls) = recorder("slow");
    let fast = builtin_memoize(&mut ctx, vec![inner]).unwrap();

    let err = ctx.invoke_value(fast, vec![v(json!([1]))]).unwrap_err();
    assert!(err.contains("memoize key must be Int, Float, Bool, String or None, got Array"));
    assert!(calls.borrow().is_empty());
}

#[test]
fn delay_runs_callback_after_wait() {
    let mut ctx = test_ctx();
    let (inner, calls) = recorder("later");
    let id = builtin_delay(
        &mut ctx,
        vec![inner, Value::Integer(50), Value::from("x")],
    )
    .unwrap();
    assert!(matches!(id, Value::Integer(_)));
    assert!(calls.borrow().is_empty());

    ctx.advance(49).unwrap();
    assert!(calls.borrow().is_empty());

    ctx.advance(1).unwrap();
    assert_eq!(*calls.borrow(), vec![vec![Value::from("x")]]);
    assert_eq!(ctx.pending_timers(), 0);
}

#[test]
fn delay_validates_arguments() {
    let mut ctx = test_ctx();
    let err = builtin_delay(&mut ctx, vec![Value::Integer(1), Value::Integer(5)]).unwrap_err();
    assert!(err.contains("delay expected first argument to be Function, got Int"));

    let (inner, _) = recorder("later");
    let err = builtin_delay(&mut ctx, vec![inner]).unwrap_err();
    assert!(err.contains("wrong number of arguments"));
}

#[test]
fn delay_with_negative_wait_fires_on_next_advance() {
    let mut ctx = test_ctx();
    let (inner, calls) = recorder("asap");
    builtin_delay(&mut ctx, vec![inner, Value::Integer(-10)]).unwrap();
    ctx.advance(0).unwrap();
    assert_eq!(calls.borrow().len(), 1);
}

#[test]
fn throttle_coalesces_burst_into_leading_and_trailing_call() {
    let mut ctx = test_ctx();
    let (inner, calls) = recorder("update");
    let throttled = builtin_throttle(&mut ctx, vec![inner, Value::Integer(100)]).unwrap();

    for n in 0..10 {
        let result = ctx
            .invoke_value(throttled.clone(), vec![Value::Integer(n)])
            .unwrap();
        assert_eq!(result, Value::Integer(0));
        ctx.advance(1).unwrap();
    }
    assert_eq!(calls.borrow().len(), 1);

    ctx.advance(100).unwrap();
    assert_eq!(
        *calls.borrow(),
        vec![vec![Value::Integer(0)], vec![Value::Integer(9)]]
    );

    let latest = ctx
        .invoke_value(throttled, vec![Value::Integer(42)])
        .unwrap();
    assert_eq!(latest, Value::Integer(9));
}

#[test]
fn throttle_calls_spaced_past_window_run_immediately() {
    let mut ctx = test_ctx();
    let (inner, calls) = recorder("tick");
    let throttled = builtin_throttle(&mut ctx, vec![inner, Value::Integer(10)]).unwrap();

    for n in 0..3 {
        let result = ctx
            .invoke_value(throttled.clone(), vec![Value::Integer(n)])
            .unwrap();
        assert_eq!(result, Value::Integer(n));
        ctx.advance(10).unwrap();
    }
    assert_eq!(calls.borrow().len(), 3);
    assert_eq!(ctx.pending_timers(), 0);
}

#[test]
fn throttle_window_near_clock_limit_does_not_wrap() {
    let mut ctx = EventLoop::with_config(RuntimeConfig {
        start_ms: u64::MAX - 1_000,
        ..RuntimeConfig::default()
    });
    let (inner, calls) = recorder("tick");
    let throttled =
        builtin_throttle(&mut ctx, vec![inner, Value::Integer(i64::MAX)]).unwrap();

    for n in 0..2 {
        ctx.invoke_value(throttled.clone(), vec![Value::Integer(n)])
            .unwrap();
    }
    ctx.advance(500).unwrap();
    assert_eq!(calls.borrow().len(), 1);

    ctx.advance(500).unwrap();
    assert_eq!(
        *calls.borrow(),
        vec![vec![Value::Integer(0)], vec![Value::Integer(1)]]
    );
}

#[test]
fn invoke_calls_builtin_by_name_with_item_as_receiver() {
    let mut ctx = test_ctx();
    let lists = v(json!([[5, 1, 7], [3, 2, 1]]));

    let sorted = builtin_invoke(&mut ctx, vec![lists.clone(), Value::from("sort")]).unwrap();
    assert_eq!(sorted, v(json!([[1, 5, 7], [1, 2, 3]])));

    let desc =
        builtin_invoke(&mut ctx, vec![lists, Value::from("sort"), Value::from("desc")]).unwrap();
    assert_eq!(desc, v(json!([[7, 5, 1], [3, 2, 1]])));

    let sizes = builtin_invoke(
        &mut ctx,
        vec![v(json!({"a": [1, 2], "b": [1]})), Value::from("size")],
    )
    .unwrap();
    match sizes {
        Value::Array(items) => {
            assert_eq!(items.len(), 2);
            assert!(items.contains(&Value::Integer(2)));
            assert!(items.contains(&Value::Integer(1)));
        }
        other => panic!("expected array, got {}", other),
    }
}

#[test]
fn invoke_prefers_method_stored_on_hash_item() {
    let mut ctx = test_ctx();
    let greet = Value::closure("greet", |_, receiver, args| {
        let name = match &receiver {
            Some(Value::Hash(fields)) => fields
                .get(&HashKey::from("name"))
                .cloned()
                .unwrap_or(Value::None),
            _ => Value::None,
        };
        Ok(Value::from(format!(
            "{}, {}",
            args[0].to_string_value(),
            name.to_string_value()
        )))
    });
    let people = Value::array(vec![
        Value::hash([("name", Value::from("moe")), ("size", greet.clone())]),
        Value::hash([("name", Value::from("curly")), ("size", greet)]),
    ]);

    let greetings =
        builtin_invoke(&mut ctx, vec![people, Value::from("size"), Value::from("hi")]).unwrap();
    assert_eq!(greetings, v(json!(["hi, moe", "hi, curly"])));
}

#[test]
fn invoke_with_function_passes_receiver() {
    let mut ctx = test_ctx();
    let describe = Value::closure("describe", |_, receiver, args| {
        Ok(Value::array(vec![
            receiver.unwrap_or(Value::None),
            Value::Integer(args.len() as i64),
        ]))
    });
    let described = builtin_invoke(
        &mut ctx,
        vec![v(json!([1, "a"])), describe, Value::Boolean(true)],
    )
    .unwrap();
    assert_eq!(described, v(json!([[1, 1], ["a", 1]])));
}

#[test]
fn invoke_reports_missing_method_and_bad_selector() {
    let mut ctx = test_ctx();
    let err = builtin_invoke(&mut ctx, vec![v(json!([1])), Value::from("nope")]).unwrap_err();
    assert_eq!(err, "invoke: no method \"nope\" on Int");

    let err = builtin_invoke(&mut ctx, vec![v(json!([1])), Value::Integer(3)]).unwrap_err();
    assert!(err.contains("invoke expected second argument to be Function or String, got Int"));
}
