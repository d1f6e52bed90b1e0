//! Typed values and their string form on the remote side.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Largest integer an f64 represents exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// The only types the data model supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    String,
    Number,
    Bool,
    Object,
    Array,
}

impl Kind {
    pub const ALL: [Kind; 5] = [
        Kind::String,
        Kind::Number,
        Kind::Bool,
        Kind::Object,
        Kind::Array,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Bool => "bool",
            Kind::Object => "object",
            Kind::Array => "array",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// A JSON value tagged with its [`Kind`].
///
/// Decoded once at the JSON boundary; `null` has no kind and is rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    String(String),
    Number(f64),
    Bool(bool),
    Object(Map<String, Value>),
    Array(Vec<Value>),
}

impl TypedValue {
    pub fn kind(&self) -> Kind {
        match self {
            TypedValue::String(_) => Kind::String,
            TypedValue::Number(_) => Kind::Number,
            TypedValue::Bool(_) => Kind::Bool,
            TypedValue::Object(_) => Kind::Object,
            TypedValue::Array(_) => Kind::Array,
        }
    }

    /// Decodes a JSON value. Fails for `null` and for numbers that do not
    /// fit an f64.
    pub fn from_json(value: Value) -> Result<Self, String> {
        match value {
            Value::Null => Err("null values are not supported".to_string()),
            Value::Bool(b) => Ok(TypedValue::Bool(b)),
            Value::Number(n) => n
                .as_f64()
                .map(TypedValue::Number)
                .ok_or_else(|| format!("number {} is out of range", n)),
            Value::String(s) => Ok(TypedValue::String(s)),
            Value::Array(items) => Ok(TypedValue::Array(items)),
            Value::Object(map) => Ok(TypedValue::Object(map)),
        }
    }

    /// Encodes back to JSON. Integral numbers are written without a
    /// fractional part so documents keep the shape operators typed.
    pub fn to_json(&self) -> Value {
        match self {
            TypedValue::String(s) => Value::String(s.clone()),
            TypedValue::Number(n) => match exact_integer(*n) {
                Some(i) => Value::Number(i.into()),
                None => Number::from_f64(*n).map_or(Value::Null, Value::Number),
            },
            TypedValue::Bool(b) => Value::Bool(*b),
            TypedValue::Object(map) => Value::Object(map.clone()),
            TypedValue::Array(items) => Value::Array(items.clone()),
        }
    }

    /// The string form stored in the remote store.
    pub fn to_wire(&self) -> String {
        match self {
            TypedValue::String(s) => s.clone(),
            TypedValue::Number(n) => match exact_integer(*n) {
                Some(i) => i.to_string(),
                None => n.to_string(),
            },
            TypedValue::Bool(b) => b.to_string(),
            TypedValue::Object(map) => Value::Object(map.clone()).to_string(),
            TypedValue::Array(items) => Value::Array(items.clone()).to_string(),
        }
    }

    /// Parses the remote string form as `kind`. The error is a reason
    /// suitable for an `InvalidValue` message.
    pub fn from_wire(kind: Kind, raw: &str) -> Result<Self, String> {
        match kind {
            Kind::String => Ok(TypedValue::String(raw.to_string())),
            Kind::Number => {
                let n: f64 = raw
                    .trim()
                    .parse()
                    .map_err(|e| format!("'{}' is not a number: {}", raw, e))?;
                if !n.is_finite() {
                    return Err(format!("'{}' is not a finite number", raw));
                }
                Ok(TypedValue::Number(n))
            }
            Kind::Bool => match raw.trim() {
                "true" => Ok(TypedValue::Bool(true)),
                "false" => Ok(TypedValue::Bool(false)),
                other => Err(format!("'{}' is not a bool", other)),
            },
            Kind::Object => {
                if raw.trim().is_empty() {
                    return Ok(TypedValue::Object(Map::new()));
                }
                serde_json::from_str::<Map<String, Value>>(raw)
                    .map(TypedValue::Object)
                    .map_err(|e| format!("not a JSON object: {}", e))
            }
            Kind::Array => serde_json::from_str::<Vec<Value>>(raw)
                .map(TypedValue::Array)
                .map_err(|e| format!("not a JSON array: {}", e)),
        }
    }
}

fn exact_integer(n: f64) -> Option<i64> {
    if n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER {
        Some(n as i64)
    } else {
        None
    }
}
