//! Attribute values.
//!
//! [`AttrValue`] is used on both sides of a type descriptor: as the untyped
//! input handed to `parse` (whatever the container decoded, or whatever a
//! caller passed to a setter) and as the canonical typed value stored in a
//! record's projection. `Null` plays the role of "no value".

use crate::error::{AttrError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Runtime representation of an attribute value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AttrValue {
    #[default]
    Null,
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Time(DateTime<Utc>),
    Array(Vec<AttrValue>),
    Hash(BTreeMap<String, AttrValue>),
}

impl AttrValue {
    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    /// Null or the empty string.
    ///
    /// Whitespace, zero, `false` and empty collections are not blank.
    pub fn is_blank(&self) -> bool {
        match self {
            AttrValue::Null => true,
            AttrValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Everything except `Null` and `false` is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, AttrValue::Null | AttrValue::Boolean(false))
    }

    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            AttrValue::Null => "null",
            AttrValue::String(_) => "string",
            AttrValue::Integer(_) => "integer",
            AttrValue::Float(_) => "float",
            AttrValue::Boolean(_) => "boolean",
            AttrValue::Time(_) => "time",
            AttrValue::Array(_) => "array",
            AttrValue::Hash(_) => "hash",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttrValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Float(v) => Some(*v),
            AttrValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<DateTime<Utc>> {
        match self {
            AttrValue::Time(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[AttrValue]> {
        match self {
            AttrValue::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_hash(&self) -> Option<&BTreeMap<String, AttrValue>> {
        match self {
            AttrValue::Hash(v) => Some(v),
            _ => None,
        }
    }

    /// Convert a decoded container value.
    ///
    /// Integral numbers become `Integer` when they fit in an `i64`; every
    /// other number becomes `Float`.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => AttrValue::Null,
            Value::Bool(b) => AttrValue::Boolean(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => AttrValue::Integer(i),
                None => AttrValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => AttrValue::String(s),
            Value::Array(items) => {
                AttrValue::Array(items.into_iter().map(AttrValue::from_json).collect())
            }
            Value::Object(map) => AttrValue::Hash(
                map.into_iter()
                    .map(|(k, v)| (k, AttrValue::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Untyped conversion to a container primitive, for display.
    ///
    /// Times render as UTC XML-schema strings; non-finite floats become null.
    /// Anything headed for a blob goes through [`to_stored_json`](Self::to_stored_json).
    pub fn to_json(&self) -> Value {
        match self {
            AttrValue::Null => Value::Null,
            AttrValue::String(s) => Value::String(s.clone()),
            AttrValue::Integer(i) => Value::Number((*i).into()),
            AttrValue::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            AttrValue::Boolean(b) => Value::Bool(*b),
            AttrValue::Time(t) => Value::String(xmlschema(t)),
            AttrValue::Array(items) => Value::Array(items.iter().map(AttrValue::to_json).collect()),
            AttrValue::Hash(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }
}

impl AttrValue {
    /// Conversion to a container primitive that can be stored and read back.
    ///
    /// Fails on non-finite floats, which the container cannot represent.
    pub fn to_stored_json(&self) -> Result<Value> {
        match self {
            AttrValue::Float(f) => Number::from_f64(*f)
                .map(Value::Number)
                .ok_or_else(|| AttrError::coercion("float", f)),
            AttrValue::Array(items) => items
                .iter()
                .map(AttrValue::to_stored_json)
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            AttrValue::Hash(map) => map
                .iter()
                .map(|(k, v)| Ok((k.clone(), v.to_stored_json()?)))
                .collect::<Result<Map<String, Value>>>()
                .map(Value::Object),
            other => Ok(other.to_json()),
        }
    }
}

/// Render a time the way the container stores it: `2009-01-01T00:00:00Z`.
pub fn xmlschema(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Stringify an encoded primitive for before-type-cast views.
///
/// Null is the empty string and strings are not quoted.
pub fn cast_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Null => write!(f, "null"),
            AttrValue::String(s) => write!(f, "{:?}", s),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::String(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::String(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Integer(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        AttrValue::Integer(value.into())
    }
}

impl From<u32> for AttrValue {
    fn from(value: u32) -> Self {
        AttrValue::Integer(value.into())
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Boolean(value)
    }
}

impl From<DateTime<Utc>> for AttrValue {
    fn from(value: DateTime<Utc>) -> Self {
        AttrValue::Time(value)
    }
}

impl<T: Into<AttrValue>> From<Vec<T>> for AttrValue {
    fn from(value: Vec<T>) -> Self {
        AttrValue::Array(value.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, AttrValue>> for AttrValue {
    fn from(value: BTreeMap<String, AttrValue>) -> Self {
        AttrValue::Hash(value)
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AttrValue::Null, Into::into)
    }
}

impl From<Value> for AttrValue {
    fn from(value: Value) -> Self {
        AttrValue::from_json(value)
    }
}

/// Typed extraction used by generated accessors.
///
/// Returns `None` for `Null` and for values of a different variant.
pub trait FromAttr: Sized {
    fn from_attr(value: AttrValue) -> Option<Self>;
}

impl FromAttr for AttrValue {
    fn from_attr(value: AttrValue) -> Option<Self> {
        (!value.is_null()).then_some(value)
    }
}

impl FromAttr for String {
    fn from_attr(value: AttrValue) -> Option<Self> {
        match value {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl FromAttr for i64 {
    fn from_attr(value: AttrValue) -> Option<Self> {
        value.as_i64()
    }
}

impl FromAttr for f64 {
    fn from_attr(value: AttrValue) -> Option<Self> {
        value.as_f64()
    }
}

impl FromAttr for bool {
    fn from_attr(value: AttrValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FromAttr for DateTime<Utc> {
    fn from_attr(value: AttrValue) -> Option<Self> {
        value.as_time()
    }
}

impl FromAttr for Vec<AttrValue> {
    fn from_attr(value: AttrValue) -> Option<Self> {
        match value {
            AttrValue::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl FromAttr for BTreeMap<String, AttrValue> {
    fn from_attr(value: AttrValue) -> Option<Self> {
        match value {
            AttrValue::Hash(map) => Some(map),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn blank_is_only_null_and_empty_string() {
        assert!(AttrValue::Null.is_blank());
        assert!(AttrValue::from("").is_blank());
        assert!(!AttrValue::from(" ").is_blank());
        assert!(!AttrValue::Integer(0).is_blank());
        assert!(!AttrValue::Boolean(false).is_blank());
        assert!(!AttrValue::Array(vec![]).is_blank());
    }

    #[test]
    fn truthiness_follows_null_and_false() {
        assert!(!AttrValue::Null.is_truthy());
        assert!(!AttrValue::Boolean(false).is_truthy());
        assert!(AttrValue::Boolean(true).is_truthy());
        assert!(AttrValue::Integer(0).is_truthy());
        assert!(AttrValue::from("").is_truthy());
    }

    #[test]
    fn from_json_splits_integers_and_floats() {
        assert_eq!(AttrValue::from_json(json!(5)), AttrValue::Integer(5));
        assert_eq!(AttrValue::from_json(json!(5.1)), AttrValue::Float(5.1));
        assert_eq!(
            AttrValue::from_json(json!(u64::MAX)),
            AttrValue::Float(u64::MAX as f64)
        );
    }

    #[test]
    fn from_json_keeps_structure() {
        let value = AttrValue::from_json(json!({"b": "two", "n": [1, null]}));
        let mut expected = BTreeMap::new();
        expected.insert("b".to_string(), AttrValue::from("two"));
        expected.insert(
            "n".to_string(),
            AttrValue::Array(vec![AttrValue::Integer(1), AttrValue::Null]),
        );
        assert_eq!(value, AttrValue::Hash(expected));
    }

    #[test]
    fn to_json_renders_times_as_xmlschema() {
        let t = Utc.with_ymd_and_hms(2009, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(AttrValue::Time(t).to_json(), json!("2009-01-01T00:00:00Z"));
    }

    #[test]
    fn display_json_shows_non_finite_floats_as_null() {
        assert_eq!(AttrValue::Float(f64::NAN).to_json(), Value::Null);
    }

    #[test]
    fn stored_json_rejects_non_finite_floats() {
        assert!(AttrValue::Float(f64::INFINITY).to_stored_json().is_err());
        let nested = AttrValue::Array(vec![AttrValue::Float(1.5), AttrValue::Float(f64::NAN)]);
        assert!(matches!(
            nested.to_stored_json(),
            Err(AttrError::Coercion { kind: "float", .. })
        ));
        assert_eq!(
            AttrValue::Array(vec![AttrValue::Float(1.5)]).to_stored_json().unwrap(),
            json!([1.5])
        );
    }

    #[test]
    fn cast_string_does_not_quote_strings() {
        assert_eq!(cast_string(&Value::Null), "");
        assert_eq!(cast_string(&json!("abc")), "abc");
        assert_eq!(cast_string(&json!(1)), "1");
        assert_eq!(cast_string(&json!(["a", 1])), r#"["a",1]"#);
    }

    #[test]
    fn option_conversion_maps_none_to_null() {
        assert_eq!(AttrValue::from(None::<i64>), AttrValue::Null);
        assert_eq!(AttrValue::from(Some(3)), AttrValue::Integer(3));
    }

    #[test]
    fn from_attr_rejects_other_variants() {
        assert_eq!(String::from_attr(AttrValue::from("x")), Some("x".into()));
        assert_eq!(String::from_attr(AttrValue::Integer(1)), None);
        assert_eq!(f64::from_attr(AttrValue::Integer(2)), Some(2.0));
        assert_eq!(AttrValue::from_attr(AttrValue::Null), None);
    }
}
