//! Primitive metadata values and the source-side metadata tree.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Flat metadata record: string keys to primitive values.
///
/// This is the only shape that is ever persisted next to a data table.
pub type FlatMeta = BTreeMap<String, MetaValue>;

/// A primitive metadata value.
///
/// Serialized untagged, so a record reads as a plain JSON object
/// (`{"x": 115534.0, "locatie": "B33F0133", "filternr": 1}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    /// Boolean flag.
    Bool(bool),
    /// Integer number.
    Int(i64),
    /// Floating-point number.
    Float(f64),
    /// Free text.
    Text(String),
}

impl MetaValue {
    /// Numeric view of the value, if it is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Bool(_) | Self::Text(_) => None,
        }
    }

    /// Text view of the value, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "str",
        }
    }

    /// Converts a JSON value into a primitive, or `None` for arrays,
    /// objects, null and numbers outside the `i64`/`f64` range.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(Self::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float)),
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            serde_json::Value::Null
            | serde_json::Value::Array(_)
            | serde_json::Value::Object(_) => None,
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for MetaValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for MetaValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for MetaValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for MetaValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for MetaValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Source-side metadata as attached to an observation.
///
/// Unlike [`MetaValue`] this may nest. Only primitives and one level of
/// mapping survive extraction; lists, null and deeper maps are dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaField {
    /// A primitive value.
    Value(MetaValue),
    /// A nested mapping, flattened one level on extraction.
    Map(BTreeMap<String, MetaField>),
    /// A sequence of values; never persisted.
    List(Vec<MetaField>),
    /// An absent value; never persisted.
    Null,
}

impl MetaField {
    /// Short name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Value(v) => v.type_name(),
            Self::Map(_) => "dict",
            Self::List(_) => "list",
            Self::Null => "null",
        }
    }

    /// The primitive value, if this field is one.
    pub fn as_value(&self) -> Option<&MetaValue> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }
}

macro_rules! field_from_primitive {
    ($($t:ty),*) => {
        $(
            impl From<$t> for MetaField {
                fn from(v: $t) -> Self {
                    Self::Value(v.into())
                }
            }
        )*
    };
}

field_from_primitive!(bool, i64, i32, f64, &str, String);

impl From<MetaValue> for MetaField {
    fn from(v: MetaValue) -> Self {
        Self::Value(v)
    }
}

impl From<BTreeMap<String, MetaField>> for MetaField {
    fn from(map: BTreeMap<String, MetaField>) -> Self {
        Self::Map(map)
    }
}

/// Lifts a flat record back into a source-side mapping.
pub fn to_fields(meta: &FlatMeta) -> BTreeMap<String, MetaField> {
    meta.iter()
        .map(|(k, v)| (k.clone(), MetaField::Value(v.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn untagged_json_shape() {
        let mut meta = FlatMeta::new();
        meta.insert("locatie".into(), "B33F0133".into());
        meta.insert("filternr".into(), 1i64.into());
        meta.insert("x".into(), 115534.5.into());
        meta.insert("in_use".into(), true.into());

        let json = serde_json::to_string(&meta).unwrap();
        assert_eq!(
            json,
            r#"{"filternr":1,"in_use":true,"locatie":"B33F0133","x":115534.5}"#
        );

        let back: FlatMeta = serde_json::from_str(&json).unwrap();
        assert_eq!(back, meta);
    }

    #[test]
    fn whole_float_reads_back_as_float() {
        let back: MetaValue = serde_json::from_str("2.0").unwrap();
        assert_eq!(back, MetaValue::Float(2.0));
        let back: MetaValue = serde_json::from_str("2").unwrap();
        assert_eq!(back, MetaValue::Int(2));
    }

    #[test]
    fn from_json_rejects_structures() {
        assert!(MetaValue::from_json(&serde_json::json!(null)).is_none());
        assert!(MetaValue::from_json(&serde_json::json!([1, 2])).is_none());
        assert!(MetaValue::from_json(&serde_json::json!({"a": 1})).is_none());
        assert_eq!(
            MetaValue::from_json(&serde_json::json!(u64::MAX)),
            Some(MetaValue::Float(u64::MAX as f64))
        );
    }

    #[test]
    fn numeric_view() {
        assert_relative_eq!(MetaValue::Int(3).as_f64().unwrap(), 3.0);
        assert_relative_eq!(MetaValue::Float(0.25).as_f64().unwrap(), 0.25);
        assert!(MetaValue::Text("3".into()).as_f64().is_none());
        assert!(MetaValue::Bool(true).as_f64().is_none());
    }

    #[test]
    fn display_is_plain() {
        assert_eq!(MetaValue::Text("loc".into()).to_string(), "loc");
        assert_eq!(MetaValue::Int(-4).to_string(), "-4");
        assert_eq!(MetaValue::Float(1.5).to_string(), "1.5");
        assert_eq!(MetaValue::Bool(false).to_string(), "false");
    }

    #[test]
    fn field_type_names() {
        assert_eq!(MetaField::from("a").type_name(), "str");
        assert_eq!(MetaField::Map(BTreeMap::new()).type_name(), "dict");
        assert_eq!(MetaField::List(vec![]).type_name(), "list");
        assert_eq!(MetaField::Null.type_name(), "null");
    }
}
