//! Schema definition files.
//!
//! A schema can be declared in JSON instead of code:
//!
//! ```json
//! {
//!   "field": "data",
//!   "formatter": "json",
//!   "fields": [
//!     { "type": "string", "names": ["title", "body"] },
//!     { "type": "array", "names": ["lottery_picks"], "item": "integer" },
//!     { "type": "hash", "names": ["extras"], "types": { "num": "integer" } }
//!   ]
//! }
//! ```
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `field` | `data` | Logical attribute collection name |
//! | `blob` | `raw_<field>` | Name of the byte-holding field |
//! | `formatter` | `json` | `json` (gzip+JSON) or `msgpack` (gzip+MessagePack) |
//! | `fields` | `[]` | Field groups, one type tag each |

use crate::error::{AttrError, Result};
use crate::format::FormatKind;
use crate::registry::TypeRegistry;
use crate::schema::Schema;
use crate::types::FieldOptions;
use crate::value::AttrValue;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

const DEFAULT_FIELD: &str = "data";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemaConfig {
    #[serde(default = "default_field")]
    pub field: String,

    /// Blob field name. When absent, `raw_` + `field`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob: Option<String>,

    #[serde(default)]
    pub formatter: FormatKind,

    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

/// One declaration: a type tag shared by one or more names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldConfig {
    #[serde(rename = "type")]
    pub tag: String,

    pub names: Vec<String>,

    /// Raw default, parsed through the field's type when the schema is built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Item type tag for arrays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,

    /// Per-key type tags for hashes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub types: BTreeMap<String, String>,
}

fn default_field() -> String {
    DEFAULT_FIELD.to_string()
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            field: default_field(),
            blob: None,
            formatter: FormatKind::default(),
            fields: Vec::new(),
        }
    }
}

impl FromStr for SchemaConfig {
    type Err = AttrError;

    fn from_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(AttrError::Serialization)
    }
}

impl SchemaConfig {
    /// Load a schema definition from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(AttrError::Io)?;
        content.parse()
    }

    /// Build the schema, resolving every tag through `registry`.
    pub fn build(&self, registry: &TypeRegistry) -> Result<Schema> {
        if self.field.is_empty() {
            return Err(AttrError::Config("field name must not be empty".into()));
        }

        let mut builder = Schema::builder(registry, self.field.clone())
            .formatter(self.formatter.formatter());
        if let Some(blob) = &self.blob {
            builder = builder.blob(blob.clone());
        }

        for group in &self.fields {
            if group.names.is_empty() {
                return Err(AttrError::Config(format!(
                    "a '{}' declaration has no names",
                    group.tag
                )));
            }
            let options = group.options();
            let names: Vec<&str> = group.names.iter().map(String::as_str).collect();
            builder = builder.field(&group.tag, &names, options);
        }

        builder.build()
    }
}

impl FieldConfig {
    fn options(&self) -> FieldOptions {
        let mut options = FieldOptions::new();
        if let Some(item) = &self.item {
            options = options.item(item.clone());
        }
        for (key, tag) in &self.types {
            options = options.key_type(key.clone(), tag.clone());
        }

        if let Some(raw) = &self.default {
            options = options.default_value(AttrValue::from_json(raw.clone()));
        }
        options
    }
}
