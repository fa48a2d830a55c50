use std::fmt;

use crate::runtime::value::Value;

/// Key of a keyed mapping. Only primitives with a total equality are hashable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HashKey {
    Integer(i64),
    Boolean(bool),
    String(String),
}

impl HashKey {
    /// Converts the key back into the value handed to visitors.
    pub fn to_value(&self) -> Value {
        match self {
            HashKey::Integer(v) => Value::Integer(*v),
            HashKey::Boolean(v) => Value::Boolean(*v),
            HashKey::String(v) => Value::String(v.as_str().into()),
        }
    }
}

impl From<&str> for HashKey {
    fn from(value: &str) -> Self {
        HashKey::String(value.to_string())
    }
}

impl fmt::Display for HashKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashKey::Integer(v) => write!(f, "{}", v),
            HashKey::Boolean(v) => write!(f, "{}", v),
            HashKey::String(v) => write!(f, "\"{}\"", v),
        }
    }
}
