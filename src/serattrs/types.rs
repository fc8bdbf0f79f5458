//! Type descriptors.
//!
//! An [`AttributeType`] knows how to turn an untyped value (as decoded from
//! the container, or as handed to a setter) into the canonical value for its
//! kind, how to turn that canonical value back into a container primitive,
//! and what the field's default is.
//!
//! | Kind | parse | encode |
//! |------|-------|--------|
//! | `String` | stringify, decode `\uXXXX` escapes | identity |
//! | `Integer` | truncate, lenient on strings | identity |
//! | `Float` | lenient on strings | identity |
//! | `Boolean` | `"true"`/`"false"`, integers `> 0` | `1` / `0` |
//! | `Time` | XML-schema strings, unix timestamps | UTC XML-schema string |
//! | `Array` | each element through the item type | each element through the item type |
//! | `Hash` | each value through its key's type | each value through its key's type |

use crate::error::{AttrError, Result};
use crate::value::{xmlschema, AttrValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

static UNICODE_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\u([0-9a-fA-F]{4})").expect("valid unicode escape regex"));

static INTEGER_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[+-]?\d+").expect("valid integer prefix regex"));

static FLOAT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[+-]?(\d+(\.\d+)?|\.\d+)([eE][+-]?\d+)?").expect("valid float prefix regex")
});

/// The closed set of descriptor kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    String,
    Integer,
    Float,
    Boolean,
    Time,
    /// Sequence whose elements all share one item type.
    Array(Box<AttributeType>),
    /// Mapping whose values are typed per key, with a fallback for keys
    /// that have no override.
    Hash {
        types: BTreeMap<String, AttributeType>,
        fallback: Box<AttributeType>,
    },
}

/// A type descriptor: a kind plus the field's default value.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeType {
    kind: TypeKind,
    default: AttrValue,
}

/// Options given alongside a field declaration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldOptions {
    /// Default value, parsed through the field's type when it is built.
    pub default: Option<AttrValue>,
    /// Item type tag for arrays. Arrays of strings when absent.
    pub item: Option<String>,
    /// Per-key type tags for hashes.
    pub types: BTreeMap<String, String>,
}

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_value(mut self, value: impl Into<AttrValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn item(mut self, tag: impl Into<String>) -> Self {
        self.item = Some(tag.into());
        self
    }

    pub fn key_type(mut self, key: impl Into<String>, tag: impl Into<String>) -> Self {
        self.types.insert(key.into(), tag.into());
        self
    }
}

impl AttributeType {
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            default: AttrValue::Null,
        }
    }

    pub fn string() -> Self {
        Self::new(TypeKind::String)
    }

    pub fn integer() -> Self {
        Self::new(TypeKind::Integer)
    }

    pub fn float() -> Self {
        Self::new(TypeKind::Float)
    }

    pub fn boolean() -> Self {
        Self::new(TypeKind::Boolean)
    }

    pub fn time() -> Self {
        Self::new(TypeKind::Time)
    }

    pub fn array(item: AttributeType) -> Self {
        Self::new(TypeKind::Array(Box::new(item)))
    }

    pub fn hash(types: BTreeMap<String, AttributeType>, fallback: AttributeType) -> Self {
        Self::new(TypeKind::Hash {
            types,
            fallback: Box::new(fallback),
        })
    }

    pub fn with_default(mut self, default: impl Into<AttrValue>) -> Self {
        self.default = default.into();
        self
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            TypeKind::String => "string",
            TypeKind::Integer => "integer",
            TypeKind::Float => "float",
            TypeKind::Boolean => "boolean",
            TypeKind::Time => "time",
            TypeKind::Array(_) => "array",
            TypeKind::Hash { .. } => "hash",
        }
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self.kind, TypeKind::Boolean)
    }

    /// A fresh copy of the default. `Null` when none was declared.
    pub fn default(&self) -> AttrValue {
        self.default.clone()
    }

    pub fn has_default(&self) -> bool {
        !self.default.is_null()
    }

    /// Convert an untyped value into this kind's canonical value.
    ///
    /// Blank input yields `Null`. Present input that cannot be coerced is an
    /// error, never a silent default.
    pub fn parse(&self, raw: &AttrValue) -> Result<AttrValue> {
        match &self.kind {
            TypeKind::String => parse_string(raw),
            TypeKind::Integer => parse_integer(raw),
            TypeKind::Float => parse_float(raw),
            TypeKind::Boolean => parse_boolean(raw),
            TypeKind::Time => parse_time(raw),
            TypeKind::Array(item) => match raw {
                AttrValue::Null => Ok(AttrValue::Null),
                AttrValue::String(s) if s.is_empty() => Ok(AttrValue::Array(Vec::new())),
                AttrValue::Array(items) => items
                    .iter()
                    .map(|v| item.parse(v))
                    .collect::<Result<Vec<_>>>()
                    .map(AttrValue::Array),
                other => Err(AttrError::coercion("array", other)),
            },
            TypeKind::Hash { types, fallback } => match raw {
                v if v.is_blank() => Ok(AttrValue::Null),
                AttrValue::Hash(map) if map.is_empty() => Ok(AttrValue::Null),
                AttrValue::Hash(map) => {
                    let mut parsed = BTreeMap::new();
                    for (key, value) in map {
                        let key = unescape_unicode(key);
                        let ty = types.get(&key).unwrap_or(fallback.as_ref());
                        parsed.insert(key, ty.parse(value)?);
                    }
                    Ok(AttrValue::Hash(parsed))
                }
                other => Err(AttrError::coercion("hash", other)),
            },
        }
    }

    /// Convert a canonical value into a primitive the container can store.
    pub fn encode(&self, typed: &AttrValue) -> Result<Value> {
        match &self.kind {
            TypeKind::String | TypeKind::Integer | TypeKind::Float => typed.to_stored_json(),
            TypeKind::Boolean => Ok(match typed {
                AttrValue::Null => Value::Null,
                AttrValue::String(s) if s.is_empty() => Value::Null,
                AttrValue::String(s) if s == "true" => Value::from(1),
                AttrValue::String(s) if s == "false" => Value::from(0),
                other => Value::from(if other.is_truthy() { 1 } else { 0 }),
            }),
            TypeKind::Time => match typed {
                v if !v.is_truthy() => Ok(Value::Null),
                AttrValue::Time(t) => Ok(Value::String(xmlschema(t))),
                other => match parse_time(other)? {
                    AttrValue::Time(t) => Ok(Value::String(xmlschema(&t))),
                    _ => Ok(Value::Null),
                },
            },
            TypeKind::Array(item) => match typed {
                AttrValue::Array(items) => items
                    .iter()
                    .map(|v| item.encode(v))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::Array),
                other => other.to_stored_json(),
            },
            TypeKind::Hash { types, fallback } => match typed {
                AttrValue::Hash(map) => {
                    let mut encoded = Map::new();
                    for (key, value) in map {
                        let ty = types.get(key).unwrap_or(fallback.as_ref());
                        encoded.insert(key.clone(), ty.encode(value)?);
                    }
                    Ok(Value::Object(encoded))
                }
                other => other.to_stored_json(),
            },
        }
    }
}

/// Replace `\uXXXX` escapes with the character they name.
///
/// `\u0000` and escapes naming surrogates are left as written.
pub fn unescape_unicode(input: &str) -> String {
    UNICODE_ESCAPE
        .replace_all(input, |caps: &Captures| {
            let code = u32::from_str_radix(&caps[1], 16).unwrap_or(0);
            match char::from_u32(code) {
                Some(c) if code != 0 => c.to_string(),
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn parse_string(raw: &AttrValue) -> Result<AttrValue> {
    let s = match raw {
        AttrValue::Null => return Ok(AttrValue::Null),
        AttrValue::String(s) => s.clone(),
        AttrValue::Integer(i) => i.to_string(),
        AttrValue::Float(f) => f.to_string(),
        AttrValue::Boolean(b) => b.to_string(),
        AttrValue::Time(t) => xmlschema(t),
        composite => composite.to_json().to_string(),
    };
    Ok(AttrValue::String(unescape_unicode(&s)))
}

/// Leading integer of a string, `0` when there is none.
fn leading_integer(s: &str) -> Result<i64> {
    match INTEGER_PREFIX.find(s) {
        Some(m) => m
            .as_str()
            .trim()
            .parse::<i64>()
            .map_err(|_| AttrError::coercion("integer", s)),
        None => Ok(0),
    }
}

/// Leading float of a string, `0.0` when there is none.
fn leading_float(s: &str) -> Result<f64> {
    match FLOAT_PREFIX.find(s) {
        Some(m) => m
            .as_str()
            .trim()
            .parse::<f64>()
            .map_err(|_| AttrError::coercion("float", s)),
        None => Ok(0.0),
    }
}

fn parse_integer(raw: &AttrValue) -> Result<AttrValue> {
    match raw {
        v if v.is_blank() => Ok(AttrValue::Null),
        AttrValue::Integer(i) => Ok(AttrValue::Integer(*i)),
        AttrValue::Float(f) if fits_i64(*f) => Ok(AttrValue::Integer(f.trunc() as i64)),
        AttrValue::String(s) => leading_integer(s).map(AttrValue::Integer),
        AttrValue::Time(t) => Ok(AttrValue::Integer(t.timestamp())),
        other => Err(AttrError::coercion("integer", other)),
    }
}

/// Whether truncating `f` lands inside the `i64` range.
fn fits_i64(f: f64) -> bool {
    f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64
}

fn finite(f: f64, raw: &AttrValue) -> Result<AttrValue> {
    if f.is_finite() {
        Ok(AttrValue::Float(f))
    } else {
        Err(AttrError::coercion("float", raw))
    }
}

fn parse_float(raw: &AttrValue) -> Result<AttrValue> {
    match raw {
        v if v.is_blank() => Ok(AttrValue::Null),
        AttrValue::Float(f) => finite(*f, raw),
        AttrValue::Integer(i) => Ok(AttrValue::Float(*i as f64)),
        AttrValue::String(s) => finite(leading_float(s)?, raw),
        AttrValue::Time(t) => Ok(AttrValue::Float(
            t.timestamp() as f64 + f64::from(t.timestamp_subsec_nanos()) / 1e9,
        )),
        other => Err(AttrError::coercion("float", other)),
    }
}

fn parse_boolean(raw: &AttrValue) -> Result<AttrValue> {
    match raw {
        v if v.is_blank() => Ok(AttrValue::Null),
        AttrValue::Boolean(b) => Ok(AttrValue::Boolean(*b)),
        AttrValue::Integer(i) => Ok(AttrValue::Boolean(*i > 0)),
        AttrValue::Float(f) if f.is_finite() => Ok(AttrValue::Boolean(f.trunc() > 0.0)),
        AttrValue::String(s) => {
            let trimmed = s.trim();
            if trimmed.eq_ignore_ascii_case("true") {
                Ok(AttrValue::Boolean(true))
            } else if trimmed.eq_ignore_ascii_case("false") {
                Ok(AttrValue::Boolean(false))
            } else {
                Ok(AttrValue::Boolean(leading_integer(s)? > 0))
            }
        }
        AttrValue::Time(t) => Ok(AttrValue::Boolean(t.timestamp() > 0)),
        other => Err(AttrError::coercion("boolean", other)),
    }
}

fn parse_time(raw: &AttrValue) -> Result<AttrValue> {
    match raw {
        v if v.is_blank() => Ok(AttrValue::Null),
        AttrValue::Time(t) => Ok(AttrValue::Time(*t)),
        AttrValue::String(s) => parse_time_str(s)
            .map(AttrValue::Time)
            .ok_or_else(|| AttrError::coercion("time", raw)),
        AttrValue::Integer(secs) => Utc
            .timestamp_opt(*secs, 0)
            .single()
            .map(AttrValue::Time)
            .ok_or_else(|| AttrError::coercion("time", raw)),
        AttrValue::Float(secs) if secs.is_finite() => {
            let whole = secs.floor();
            let nanos = ((secs - whole) * 1e9).round() as u32;
            Utc.timestamp_opt(whole as i64, nanos.min(999_999_999))
                .single()
                .map(AttrValue::Time)
                .ok_or_else(|| AttrError::coercion("time", raw))
        }
        other => Err(AttrError::coercion("time", other)),
    }
}

const ZONED_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f %z", "%Y-%m-%dT%H:%M:%S%.f%z"];
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f UTC",
    "%Y-%m-%dT%H:%M",
];

/// XML-schema timestamps first, then the common variations of it.
/// Timestamps without an offset are taken as UTC.
fn parse_time_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    for fmt in ZONED_FORMATS {
        if let Ok(t) = DateTime::parse_from_str(s, fmt) {
            return Some(t.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(t.and_utc());
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|t| t.and_utc());
    }
    DateTime::parse_from_rfc2822(s)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn s(v: &str) -> AttrValue {
        AttrValue::from(v)
    }

    #[test]
    fn integer_truncates_strings_and_floats() {
        let ty = AttributeType::integer();
        assert_eq!(ty.parse(&s("5.5")).unwrap(), AttrValue::Integer(5));
        assert_eq!(ty.parse(&AttrValue::Float(5.9)).unwrap(), AttrValue::Integer(5));
        assert_eq!(ty.parse(&s("-12abc")).unwrap(), AttrValue::Integer(-12));
        assert_eq!(ty.parse(&s("abc")).unwrap(), AttrValue::Integer(0));
    }

    #[test]
    fn integer_blank_is_null() {
        let ty = AttributeType::integer();
        assert_eq!(ty.parse(&s("")).unwrap(), AttrValue::Null);
        assert_eq!(ty.parse(&AttrValue::Null).unwrap(), AttrValue::Null);
        assert_eq!(ty.encode(&AttrValue::Integer(5)).unwrap(), json!(5));
    }

    #[test]
    fn integer_rejects_booleans_and_collections() {
        let ty = AttributeType::integer();
        assert!(ty.parse(&AttrValue::Boolean(true)).is_err());
        assert!(ty.parse(&AttrValue::Array(vec![])).is_err());
    }

    #[test]
    fn integer_rejects_floats_outside_i64() {
        let ty = AttributeType::integer();
        for raw in [1e20, -1e20, u64::MAX as f64, f64::INFINITY, f64::NAN] {
            assert!(
                matches!(
                    ty.parse(&AttrValue::Float(raw)),
                    Err(AttrError::Coercion { kind: "integer", .. })
                ),
                "{} was accepted",
                raw
            );
        }
        assert!(ty.parse(&s("99999999999999999999")).is_err());
        assert_eq!(
            ty.parse(&AttrValue::Float(-9.2e18)).unwrap(),
            AttrValue::Integer(-9_200_000_000_000_000_000)
        );
    }

    #[test]
    fn float_parses_strings() {
        let ty = AttributeType::float();
        assert_eq!(ty.parse(&s("5.5")).unwrap(), AttrValue::Float(5.5));
        assert_eq!(ty.parse(&s("1.2e3x")).unwrap(), AttrValue::Float(1200.0));
        assert_eq!(ty.parse(&s("abc")).unwrap(), AttrValue::Float(0.0));
        assert_eq!(ty.parse(&AttrValue::Integer(3)).unwrap(), AttrValue::Float(3.0));
        assert_eq!(ty.parse(&s("")).unwrap(), AttrValue::Null);
    }

    #[test]
    fn float_rejects_non_finite_values() {
        let ty = AttributeType::float();
        for raw in [
            AttrValue::Float(f64::INFINITY),
            AttrValue::Float(f64::NEG_INFINITY),
            AttrValue::Float(f64::NAN),
            s("1e400"),
            s("-1e400abc"),
        ] {
            assert!(
                matches!(ty.parse(&raw), Err(AttrError::Coercion { kind: "float", .. })),
                "{:?} was accepted",
                raw
            );
        }
    }

    #[test]
    fn float_encode_refuses_non_finite_values() {
        let ty = AttributeType::float();
        assert!(ty.encode(&AttrValue::Float(f64::INFINITY)).is_err());
        assert!(ty.encode(&AttrValue::Float(f64::NAN)).is_err());
        assert_eq!(ty.encode(&AttrValue::Float(5.5)).unwrap(), json!(5.5));
    }

    #[test]
    fn boolean_encode_table() {
        let ty = AttributeType::boolean();
        assert_eq!(ty.encode(&AttrValue::Null).unwrap(), Value::Null);
        assert_eq!(ty.encode(&s("")).unwrap(), Value::Null);
        assert_eq!(ty.encode(&s("true")).unwrap(), json!(1));
        assert_eq!(ty.encode(&s("false")).unwrap(), json!(0));
        assert_eq!(ty.encode(&AttrValue::Boolean(true)).unwrap(), json!(1));
        assert_eq!(ty.encode(&AttrValue::Boolean(false)).unwrap(), json!(0));
    }

    #[test]
    fn boolean_parses_integer_like_input() {
        let ty = AttributeType::boolean();
        assert_eq!(ty.parse(&s("1")).unwrap(), AttrValue::Boolean(true));
        assert_eq!(ty.parse(&s("0")).unwrap(), AttrValue::Boolean(false));
        assert_eq!(ty.parse(&s("1.2")).unwrap(), AttrValue::Boolean(true));
        assert_eq!(ty.parse(&AttrValue::Integer(0)).unwrap(), AttrValue::Boolean(false));
        assert_eq!(ty.parse(&AttrValue::Integer(1)).unwrap(), AttrValue::Boolean(true));
    }

    #[test]
    fn boolean_parses_boolean_like_input() {
        let ty = AttributeType::boolean();
        assert_eq!(ty.parse(&s("true")).unwrap(), AttrValue::Boolean(true));
        assert_eq!(ty.parse(&s("false")).unwrap(), AttrValue::Boolean(false));
        assert_eq!(ty.parse(&AttrValue::Boolean(true)).unwrap(), AttrValue::Boolean(true));
        assert_eq!(ty.parse(&s("")).unwrap(), AttrValue::Null);
    }

    #[test]
    fn string_decodes_unicode_escapes() {
        let ty = AttributeType::string();
        let parsed = ty
            .parse(&s("Enc\u{f6}ded \u{250} \\u003c \\Upload \\upload"))
            .unwrap();
        assert_eq!(parsed, s("Enc\u{f6}ded \u{250} < \\Upload \\upload"));
    }

    #[test]
    fn string_leaves_null_escape_alone() {
        assert_eq!(unescape_unicode("a\\u0000b"), "a\\u0000b");
        assert_eq!(unescape_unicode("\\ud800"), "\\ud800");
        assert_eq!(unescape_unicode("\\u00E9"), "\u{e9}");
    }

    #[test]
    fn string_stringifies_other_values() {
        let ty = AttributeType::string();
        assert_eq!(ty.parse(&AttrValue::Integer(7)).unwrap(), s("7"));
        assert_eq!(ty.parse(&AttrValue::Boolean(false)).unwrap(), s("false"));
        assert_eq!(ty.parse(&AttrValue::Null).unwrap(), AttrValue::Null);
        assert_eq!(ty.parse(&s("")).unwrap(), s(""));
    }

    #[test]
    fn time_parses_xmlschema() {
        let ty = AttributeType::time();
        let expected = Utc.with_ymd_and_hms(2009, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            ty.parse(&s("2009-01-01T00:00:00Z")).unwrap(),
            AttrValue::Time(expected)
        );
        assert_eq!(
            ty.parse(&s("2009-01-01T02:00:00+02:00")).unwrap(),
            AttrValue::Time(expected)
        );
        assert_eq!(ty.parse(&s("2009-01-01")).unwrap(), AttrValue::Time(expected));
        assert_eq!(
            ty.parse(&AttrValue::Integer(expected.timestamp())).unwrap(),
            AttrValue::Time(expected)
        );
    }

    #[test]
    fn time_rejects_garbage() {
        let ty = AttributeType::time();
        assert!(matches!(
            ty.parse(&s("not a time")),
            Err(AttrError::Coercion { kind: "time", .. })
        ));
        assert_eq!(ty.parse(&s("")).unwrap(), AttrValue::Null);
    }

    #[test]
    fn time_encodes_as_utc_xmlschema() {
        let ty = AttributeType::time();
        let t = Utc.with_ymd_and_hms(2020, 5, 17, 8, 30, 0).unwrap();
        assert_eq!(
            ty.encode(&AttrValue::Time(t)).unwrap(),
            json!("2020-05-17T08:30:00Z")
        );
        assert_eq!(ty.encode(&AttrValue::Null).unwrap(), Value::Null);
        assert_eq!(ty.encode(&AttrValue::Boolean(false)).unwrap(), Value::Null);
    }

    #[test]
    fn array_maps_items() {
        let ty = AttributeType::array(AttributeType::integer());
        let raw = AttrValue::from(vec!["1", "8", "7"]);
        assert_eq!(ty.parse(&raw).unwrap(), AttrValue::from(vec![1, 8, 7]));
        assert_eq!(
            ty.parse(&AttrValue::Array(vec![])).unwrap(),
            AttrValue::Array(vec![])
        );
        assert_eq!(ty.parse(&AttrValue::Null).unwrap(), AttrValue::Null);
        assert_eq!(ty.parse(&s("")).unwrap(), AttrValue::Array(vec![]));
    }

    #[test]
    fn array_encodes_items() {
        let ty = AttributeType::array(AttributeType::boolean());
        let typed = AttrValue::from(vec![true, false]);
        assert_eq!(ty.encode(&typed).unwrap(), json!([1, 0]));
        assert_eq!(ty.encode(&AttrValue::Null).unwrap(), Value::Null);
        assert_eq!(ty.encode(&AttrValue::Array(vec![])).unwrap(), json!([]));
    }

    #[test]
    fn hash_uses_per_key_types() {
        let mut types = BTreeMap::new();
        types.insert("num".to_string(), AttributeType::integer());
        types.insert("started_at".to_string(), AttributeType::time());
        let ty = AttributeType::hash(types, AttributeType::string());

        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let raw = AttrValue::from_json(json!({
            "num": "7",
            "foo": "bar",
            "started_at": "2024-01-01T00:00:00Z",
        }));
        let parsed = ty.parse(&raw).unwrap();

        let hash = parsed.as_hash().unwrap();
        assert_eq!(hash["num"], AttrValue::Integer(7));
        assert_eq!(hash["foo"], s("bar"));
        assert_eq!(hash["started_at"], AttrValue::Time(now));

        assert_eq!(
            ty.encode(&parsed).unwrap(),
            json!({"num": 7, "foo": "bar", "started_at": "2024-01-01T00:00:00Z"})
        );
    }

    #[test]
    fn hash_blank_is_null() {
        let ty = AttributeType::hash(BTreeMap::new(), AttributeType::string());
        assert_eq!(ty.parse(&AttrValue::Null).unwrap(), AttrValue::Null);
        assert_eq!(ty.parse(&s("")).unwrap(), AttrValue::Null);
        assert_eq!(
            ty.parse(&AttrValue::Hash(BTreeMap::new())).unwrap(),
            AttrValue::Null
        );
        assert!(ty.parse(&s("x")).is_err());
    }

    #[test]
    fn default_is_a_fresh_copy() {
        let ty = AttributeType::array(AttributeType::string()).with_default(vec!["a", "b"]);
        let mut first = ty.default();
        if let AttrValue::Array(items) = &mut first {
            items.push(s("c"));
        }
        assert_eq!(ty.default(), AttrValue::from(vec!["a", "b"]));
        assert!(ty.has_default());
        assert!(!AttributeType::string().has_default());
    }
}
