use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// A single parameter or argument setting.
///
/// Scalars (`Bool`, `Int`, `Float`) are the only values an initialization
/// record can hold. `Text` carries a raw engine expression (a quoted string,
/// an enumeration literal, a function call) and `Array` a possibly nested
/// array; both are accepted when rendering modifiers only. `Null` marks a
/// setting that is left at the model's default: it is skipped when rendering
/// and cannot be written into a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// No setting; serialized as `null`.
    Null,
    /// Boolean constant, rendered as `true`/`false`.
    Bool(bool),
    /// Integer constant.
    Int(i64),
    /// Real constant.
    Float(f64),
    /// Raw expression text, rendered verbatim.
    Text(String),
    /// Array of values, rendered with curly braces.
    Array(Vec<Value>),
}

impl Value {
    /// Short name of the variant used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Array(_) => "array",
        }
    }

    /// Whether the value is `Null`, i.e. leaves the setting untouched.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Formats the value as an engine literal. `Null` formats as nothing.
impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(flag) => write!(f, "{}", if *flag { "true" } else { "false" }),
            Value::Int(int) => write!(f, "{int}"),
            // Debug keeps the decimal point on integral reals.
            Value::Float(float) => write!(f, "{float:?}"),
            Value::Text(text) => f.write_str(text),
            Value::Array(items) => {
                f.write_str("{")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::Array(values.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_follow_engine_syntax() {
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(18).to_string(), "18");
        assert_eq!(Value::from(18.0).to_string(), "18.0");
        assert_eq!(Value::from("\"hello\"").to_string(), "\"hello\"");
        let matrix = Value::Array(vec![Value::from(vec![1, 2]), Value::from(vec![3, 4])]);
        assert_eq!(matrix.to_string(), "{{1, 2}, {3, 4}}");
        assert_eq!(
            Value::from(vec![true, false]).to_string(),
            "{true, false}"
        );
    }

    #[test]
    fn untagged_decoding_prefers_narrow_types() {
        let values: Vec<Value> = serde_json::from_str(r#"[null, true, 3, 2.5, "Axis.x", [1, 2]]"#)
            .expect("decode values");
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Bool(true),
                Value::Int(3),
                Value::Float(2.5),
                Value::Text("Axis.x".into()),
                Value::Array(vec![Value::Int(1), Value::Int(2)]),
            ]
        );
    }
}
