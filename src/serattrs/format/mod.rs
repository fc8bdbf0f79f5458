//! # Container Formats
//!
//! A formatter turns the string-keyed mapping a schema produces into the bytes
//! stored in a record's blob field, and back. Formatters are type-agnostic:
//! they see container primitives only, never the schema's descriptors.
//!
//! ## Contract
//!
//! - An empty mapping encodes to `None` (no bytes at all).
//! - `None` or an empty byte slice decodes to an empty mapping.
//! - Anything else round-trips: `decode(encode(m)) == m`.
//! - Malformed bytes are a [`AttrError::Decode`], never a partial mapping.
//!
//! ## Implementations
//!
//! - [`json::GzipJson`]: gzip-compressed JSON (the default)
//! - [`msgpack::GzipMsgpack`]: gzip-compressed MessagePack
//!
//! [`AttrError::Decode`]: crate::error::AttrError::Decode

use crate::error::{AttrError, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;
use std::sync::Arc;

pub mod json;
pub mod msgpack;

pub use json::GzipJson;
pub use msgpack::GzipMsgpack;

/// Compressed serialization strategy for a blob field.
pub trait Formatter: fmt::Debug + Send + Sync {
    /// Short name used in configuration and diagnostics.
    fn name(&self) -> &'static str;

    /// Serialize and compress. Returns `None` for an empty mapping.
    fn encode(&self, body: &Map<String, Value>) -> Result<Option<Vec<u8>>>;

    /// Decompress and deserialize. Absent or empty input is an empty mapping.
    fn decode(&self, bytes: Option<&[u8]>) -> Result<Map<String, Value>>;
}

/// The formatters selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    #[default]
    Json,
    Msgpack,
}

impl FormatKind {
    pub fn formatter(self) -> Arc<dyn Formatter> {
        match self {
            FormatKind::Json => Arc::new(GzipJson),
            FormatKind::Msgpack => Arc::new(GzipMsgpack),
        }
    }
}

impl FromStr for FormatKind {
    type Err = AttrError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(FormatKind::Json),
            "msgpack" => Ok(FormatKind::Msgpack),
            other => Err(AttrError::Config(format!("Unknown formatter: {}", other))),
        }
    }
}

pub(crate) fn gzip(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(bytes)?;
    Ok(enc.finish()?)
}

pub(crate) fn gunzip(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut dec = GzDecoder::new(bytes);
    let mut out = Vec::new();
    dec.read_to_end(&mut out)
        .map_err(|e| AttrError::Decode(format!("gzip: {}", e)))?;
    Ok(out)
}

/// The root of a container document must be an object; `null` counts as empty.
pub(crate) fn into_object(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(AttrError::Decode(format!(
            "expected an object at the root, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Treat `None` and empty slices alike.
pub(crate) fn present(bytes: Option<&[u8]>) -> Option<&[u8]> {
    bytes.filter(|b| !b.is_empty())
}
