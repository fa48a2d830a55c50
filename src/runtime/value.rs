use std::{collections::HashMap, fmt, rc::Rc};

use crate::runtime::{
    RuntimeContext, builtin_function::BuiltinFunction, closure::Closure, hash_key::HashKey,
};

/// Runtime value passed to and returned from every builtin.
///
/// ## Memory Management Model
///
/// Heap-allocated variants (String, Array, Hash, Closure) sit behind `Rc`, so
/// cloning a value is O(1). Values are semantically immutable: builtins that
/// "produce" a collection build a fresh `Vec`/`HashMap`, and builtins that
/// "mutate" one (`extend`, `defaults`) go through `Rc::make_mut`, which copies
/// whenever another handle still observes the old contents.
///
/// ## Equality
///
/// `==` is strict: values of different variants are never equal, so
/// `Integer(1) != Float(1.0)` and `Integer(1) != String("1")`. `NaN` is not
/// equal to itself. Closures are equal only to themselves.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit floating point number.
    Float(f64),
    /// Boolean value.
    Boolean(bool),
    /// UTF-8 string value.
    String(Rc<str>),
    /// Absence of value. Also used for "no such element" results.
    None,
    /// Ordered sequence of values.
    Array(Rc<Vec<Value>>),
    /// Keyed mapping. Enumeration order is the map's own and is only stable
    /// while the map is unmodified.
    Hash(Rc<HashMap<HashKey, Value>>),
    /// Builtin function handle.
    Builtin(BuiltinFunction),
    /// Native closure, possibly carrying private state.
    Closure(Rc<Closure>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "\"{}\"", v),
            Value::None => write!(f, "None"),
            Value::Builtin(b) => write!(f, "<builtin {}>", b.name),
            Value::Closure(c) => write!(f, "<closure {}>", c.name),
            Value::Array(elements) => {
                let items: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Value::Hash(pairs) => {
                let items: Vec<String> =
                    pairs.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
                write!(f, "{{{}}}", items.join(", "))
            }
        }
    }
}

impl Value {
    /// Builds an array value from owned elements.
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(items))
    }

    /// Builds a hash value from key/value pairs. Later duplicates win.
    pub fn hash<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<HashKey>,
    {
        Value::Hash(Rc::new(
            pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Wraps a Rust closure as a callable value.
    pub fn closure<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut dyn RuntimeContext, Option<Value>, Vec<Value>) -> Result<Value, String>
            + 'static,
    {
        Value::Closure(Rc::new(Closure::new(name, body)))
    }

    /// Returns the canonical runtime type label used in diagnostics.
    ///
    /// These labels are user-visible and are expected to remain stable.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "Int",
            Value::Float(_) => "Float",
            Value::Boolean(_) => "Bool",
            Value::String(_) => "String",
            Value::None => "None",
            Value::Array(_) => "Array",
            Value::Hash(_) => "Hash",
            Value::Builtin(_) => "Builtin",
            Value::Closure(_) => "Closure",
        }
    }

    /// Only `Boolean(false)` and `None` are falsy; all other values are truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Boolean(false) | Value::None)
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Builtin(_) | Value::Closure(_))
    }

    /// Converts this value into a hash-map key if the value is hashable.
    ///
    /// Hashable variants are `Integer`, `Boolean` and `String`.
    pub fn to_hash_key(&self) -> Option<HashKey> {
        match self {
            Value::Integer(v) => Some(HashKey::Integer(*v)),
            Value::Boolean(v) => Some(HashKey::Boolean(*v)),
            Value::String(v) => Some(HashKey::String(v.to_string())),
            _ => None,
        }
    }

    /// Converts a value to plain text. Unlike [`fmt::Display`], strings are
    /// returned without quotes.
    pub fn to_string_value(&self) -> String {
        match self {
            Value::String(v) => v.to_string(),
            other => other.to_string(),
        }
    }

    /// Converts JSON into a runtime value. Integral numbers that fit `i64`
    /// become `Integer`, every other number becomes `Float`.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(v) => Value::Boolean(v),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(v) => Value::Integer(v),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s.into()),
            serde_json::Value::Array(items) => {
                Value::array(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::hash(
                map.into_iter()
                    .map(|(k, v)| (HashKey::String(k), Value::from_json(v))),
            ),
        }
    }

    /// Converts a runtime value into JSON.
    ///
    /// Functions and non-finite floats have no JSON form and become `null`.
    /// Hash keys are rendered as strings.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Integer(v) => serde_json::Value::from(*v),
            Value::Float(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Boolean(v) => serde_json::Value::Bool(*v),
            Value::String(v) => serde_json::Value::String(v.to_string()),
            Value::None | Value::Builtin(_) | Value::Closure(_) => serde_json::Value::Null,
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Hash(pairs) => serde_json::Value::Object(
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_value().to_string_value(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::array(value)
    }
}
