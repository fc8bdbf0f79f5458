use super::{gunzip, gzip, into_object, present, Formatter};
use crate::error::{AttrError, Result};
use serde_json::{Map, Value};

/// Gzip-compressed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct GzipJson;

impl Formatter for GzipJson {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode(&self, body: &Map<String, Value>) -> Result<Option<Vec<u8>>> {
        if body.is_empty() {
            return Ok(None);
        }
        let json = serde_json::to_vec(body)?;
        gzip(&json).map(Some)
    }

    fn decode(&self, bytes: Option<&[u8]>) -> Result<Map<String, Value>> {
        let Some(bytes) = present(bytes) else {
            return Ok(Map::new());
        };
        let json = gunzip(bytes)?;
        let value: Value = serde_json::from_slice(&json)
            .map_err(|e| AttrError::Decode(format!("json: {}", e)))?;
        into_object(value)
    }
}
