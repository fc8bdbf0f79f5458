use super::{gunzip, gzip, into_object, present, Formatter};
use crate::error::{AttrError, Result};
use serde_json::{Map, Value};

/// Gzip-compressed MessagePack.
///
/// A binary alternative to [`GzipJson`](super::GzipJson) for the same
/// mappings. Maps are written with string keys so documents stay
/// self-describing.
#[derive(Debug, Clone, Copy, Default)]
pub struct GzipMsgpack;

impl Formatter for GzipMsgpack {
    fn name(&self) -> &'static str {
        "msgpack"
    }

    fn encode(&self, body: &Map<String, Value>) -> Result<Option<Vec<u8>>> {
        if body.is_empty() {
            return Ok(None);
        }
        let packed = rmp_serde::to_vec_named(body)?;
        gzip(&packed).map(Some)
    }

    fn decode(&self, bytes: Option<&[u8]>) -> Result<Map<String, Value>> {
        let Some(bytes) = present(bytes) else {
            return Ok(Map::new());
        };
        let packed = gunzip(bytes)?;
        let value: Value = rmp_serde::from_slice(&packed)
            .map_err(|e| AttrError::Decode(format!("msgpack: {}", e)))?;
        into_object(value)
    }
}
