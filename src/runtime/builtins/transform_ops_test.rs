use serde_json::json;

use crate::runtime::{
    builtins::builtin_value, config::RuntimeConfig, event_loop::EventLoop, value::Value,
};

use super::transform_ops::{
    builtin_compact, builtin_filter, builtin_map, builtin_pluck, builtin_reject, builtin_sort_by,
    builtin_uniq,
};

fn test_ctx() -> EventLoop {
    EventLoop::with_config(RuntimeConfig::default().with_seed(7))
}

fn v(json: serde_json::Value) -> Value {
    Value::from_json(json)
}

fn int_closure(name: &str, f: fn(i64) -> Value) -> Value {
    Value::closure(name, move |_, _, args| match &args[0] {
        Value::Integer(n) => Ok(f(*n)),
        other => Err(format!("expected Int, got {}", other.type_name())),
    })
}

fn is_even() -> Value {
    int_closure("is_even", |n| Value::Boolean(n % 2 == 0))
}

#[test]
fn map_applies_callback_in_order() {
    let double = int_closure("double", |n| Value::Integer(n * 2));
    let mapped = builtin_map(&mut test_ctx(), vec![v(json!([1, 2, 3])), double]).unwrap();
    assert_eq!(mapped, v(json!([2, 4, 6])));
}

#[test]
fn map_passes_index_as_second_argument() {
    let index = Value::closure("index", |_, _, args| Ok(args[1].clone()));
    let mapped = builtin_map(&mut test_ctx(), vec![v(json!(["a", "b"])), index]).unwrap();
    assert_eq!(mapped, v(json!([0, 1])));
}

#[test]
fn map_with_identity_returns_equal_copy() {
    let arr = v(json!([1, "two", [3], null]));
    let identity = builtin_value("identity").unwrap();
    let mapped = builtin_map(&mut test_ctx(), vec![arr.clone(), identity]).unwrap();
    assert_eq!(mapped, arr);
    match (&mapped, &arr) {
        (Value::Array(left), Value::Array(right)) => assert!(!std::rc::Rc::ptr_eq(left, right)),
        _ => panic!("expected arrays"),
    }
}

#[test]
fn map_over_hash_visits_every_value() {
    let double = int_closure("double", |n| Value::Integer(n * 2));
    let mapped = builtin_map(&mut test_ctx(), vec![v(json!({"a": 1, "b": 2})), double]).unwrap();
    match mapped {
        Value::Array(items) => {
            assert_eq!(items.len(), 2);
            assert!(items.contains(&Value::Integer(2)));
            assert!(items.contains(&Value::Integer(4)));
        }
        other => panic!("expected array, got {}", other),
    }
}

#[test]
fn map_returns_callback_error_unchanged() {
    let double = int_closure("double", |n| Value::Integer(n * 2));
    let err = builtin_map(&mut test_ctx(), vec![v(json!([1, "x"])), double]).unwrap_err();
    assert_eq!(err, "expected Int, got String");
}

#[test]
fn map_rejects_non_function_callback() {
    let err = builtin_map(&mut test_ctx(), vec![v(json!([1])), Value::Integer(1)]).unwrap_err();
    assert!(err.contains("map expected second argument to be Function, got Int"));
}

#[test]
fn pluck_reads_record_fields() {
    let people = v(json!([
        {"name": "moe", "age": 40},
        {"name": "larry"},
        [10, 20],
        5
    ]));
    let ages = builtin_pluck(&mut test_ctx(), vec![people.clone(), Value::from("age")]).unwrap();
    assert_eq!(ages, v(json!([40, null, null, null])));

    let second = builtin_pluck(&mut test_ctx(), vec![people, Value::Integer(1)]).unwrap();
    assert_eq!(second, v(json!([null, null, 20, null])));
}

#[test]
fn filter_and_reject_partition_input() {
    let arr = v(json!([1, 2, 3, 4, 5, 6]));
    let kept = builtin_filter(&mut test_ctx(), vec![arr.clone(), is_even()]).unwrap();
    let dropped = builtin_reject(&mut test_ctx(), vec![arr, is_even()]).unwrap();
    assert_eq!(kept, v(json!([2, 4, 6])));
    assert_eq!(dropped, v(json!([1, 3, 5])));
}

#[test]
fn filter_truthiness_only_false_and_none_are_falsy() {
    let arr = v(json!([0, "", false, null, [], 1]));
    let itself = Value::closure("itself", |_, _, args| Ok(args[0].clone()));
    let kept = builtin_filter(&mut test_ctx(), vec![arr, itself]).unwrap();
    assert_eq!(kept, v(json!([0, "", [], 1])));
}

#[test]
fn filter_empty_input_returns_empty_array() {
    let kept = builtin_filter(&mut test_ctx(), vec![Value::array(vec![]), is_even()]).unwrap();
    assert_eq!(kept, Value::array(vec![]));
}

#[test]
fn uniq_keeps_first_occurrences() {
    let arr = v(json!([1, 2, 1, 3, 2, "1", 1.0]));
    let unique = builtin_uniq(&mut test_ctx(), vec![arr]).unwrap();
    assert_eq!(unique, v(json!([1, 2, 3, "1", 1.0])));

    let again = builtin_uniq(&mut test_ctx(), vec![unique.clone()]).unwrap();
    assert_eq!(again, unique);
}

#[test]
fn uniq_requires_array() {
    let err = builtin_uniq(&mut test_ctx(), vec![v(json!({"a": 1}))]).unwrap_err();
    assert!(err.contains("uniq expected argument to be Array, got Hash"));
}

#[test]
fn compact_drops_falsy_values() {
    let compacted = builtin_compact(&mut test_ctx(), vec![v(json!([0, false, null, "a"]))])
        .unwrap();
    assert_eq!(compacted, v(json!([0, "a"])));
}

#[test]
fn sort_by_function_is_stable() {
    let words = v(json!(["ccc", "a", "bb", "d", "ee"]));
    let length = Value::closure("length", |_, _, args| match &args[0] {
        Value::String(s) => Ok(Value::Integer(s.len() as i64)),
        other => Err(format!("expected String, got {}", other.type_name())),
    });
    let sorted = builtin_sort_by(&mut test_ctx(), vec![words, length]).unwrap();
    assert_eq!(sorted, v(json!(["a", "d", "bb", "ee", "ccc"])));
}

#[test]
fn sort_by_key_puts_missing_last() {
    let people = v(json!([
        {"name": "curly", "age": 60},
        {"name": "nobody"},
        {"name": "moe", "age": 40},
        {"name": "larry", "age": 50}
    ]));
    let sorted = builtin_sort_by(&mut test_ctx(), vec![people, Value::from("age")]).unwrap();
    let names = builtin_pluck(&mut test_ctx(), vec![sorted, Value::from("name")]).unwrap();
    assert_eq!(names, v(json!(["moe", "larry", "curly", "nobody"])));
}

#[test]
fn sort_by_mixes_ints_and_floats() {
    let arr = v(json!([2.5, 1, 3, 0.5]));
    let identity = builtin_value("identity").unwrap();
    let sorted = builtin_sort_by(&mut test_ctx(), vec![arr, identity]).unwrap();
    assert_eq!(sorted, v(json!([0.5, 1, 2.5, 3])));
}

#[test]
fn sort_by_orders_nan_criteria_after_numbers() {
    let mut records: Vec<Value> = (0..40_i64)
        .map(|i| {
            let rank = match i % 3 {
                0 => Value::Float(f64::NAN),
                1 => Value::Integer((i * 7919) % 41),
                _ => Value::Float(((i * 7919) % 41) as f64),
            };
            Value::hash([("i", Value::Integer(i)), ("k", rank)])
        })
        .collect();
    records.push(Value::hash([("i", Value::Integer(40))]));

    let sorted = builtin_sort_by(
        &mut test_ctx(),
        vec![Value::array(records), Value::from("k")],
    )
    .unwrap();
    let Value::Array(ranks) =
        builtin_pluck(&mut test_ctx(), vec![sorted, Value::from("k")]).unwrap()
    else {
        panic!("pluck must return an array");
    };
    assert_eq!(ranks.len(), 41);

    let number = |value: &Value| match value {
        Value::Integer(n) => *n as f64,
        Value::Float(f) => *f,
        other => panic!("expected number, got {}", other),
    };
    // 14 NaN ranks (i = 0, 3, ..., 39), then the record without "k".
    let (numbers, tail) = ranks.split_at(26);
    assert!(numbers.windows(2).all(|w| number(&w[0]) <= number(&w[1])));
    assert!(tail[..14].iter().all(|rank| number(rank).is_nan()));
    assert_eq!(tail[14], Value::None);
}

#[test]
fn sort_by_rejects_mixed_criteria() {
    let arr = v(json!([1, "a"]));
    let identity = builtin_value("identity").unwrap();
    let err = builtin_sort_by(&mut test_ctx(), vec![arr, identity]).unwrap_err();
    assert!(err.contains("sort_by criteria must not mix kinds"));
}
