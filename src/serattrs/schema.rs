//! # Schema
//!
//! A [`Schema`] binds a logical attribute collection (`data`) stored in a
//! blob field (`raw_data`) to a sealed set of typed fields. It owns the three
//! operations that move a record between bytes and typed values:
//!
//! - [`Schema::materialize`]: bytes -> [`Projection`] (decode, drop unknown
//!   keys, parse declared ones, seed defaults on brand-new records)
//! - [`Schema::write`]: parse one value into a projection, recording the
//!   pre-write value in the change ledger the first time a name is written
//! - [`Schema::serialize`]: [`Projection`] -> bytes (encode declared fields,
//!   pass undeclared ones through, compress)
//!
//! Schemas are built once through a [`SchemaBuilder`] and never change
//! afterwards; share them behind an `Arc`.
//!
//! ## Absent vs. null
//!
//! A projection never stores `Null`. A field that was never set, or was set
//! to something blank, is simply absent and reads as its default.

use crate::error::{AttrError, Result};
use crate::format::{Formatter, GzipJson};
use crate::registry::TypeRegistry;
use crate::types::{AttributeType, FieldOptions};
use crate::value::AttrValue;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Typed attribute values keyed by name.
pub type AttributeMap = BTreeMap<String, AttrValue>;

/// A declared field: the tag it was declared with and its descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    tag: String,
    ty: AttributeType,
}

impl Field {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn ty(&self) -> &AttributeType {
        &self.ty
    }
}

/// The live state of one record: its typed values and its change ledger.
///
/// A fresh projection always starts with an empty ledger, so re-materializing
/// is what clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    data: AttributeMap,
    changes: AttributeMap,
}

impl Projection {
    pub fn data(&self) -> &AttributeMap {
        &self.data
    }

    /// Pre-write values keyed by name, for names written this cycle.
    pub fn changes(&self) -> &AttributeMap {
        &self.changes
    }

    pub fn is_changed(&self, name: &str) -> bool {
        self.changes.contains_key(name)
    }

    /// Names written this cycle, sorted.
    pub fn changed(&self) -> Vec<String> {
        self.changes.keys().cloned().collect()
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Schema {
    field: String,
    blob_field: String,
    fields: BTreeMap<String, Field>,
    formatter: Arc<dyn Formatter>,
}

impl Schema {
    pub fn builder<'r>(registry: &'r TypeRegistry, field: impl Into<String>) -> SchemaBuilder<'r> {
        SchemaBuilder::new(registry, field)
    }

    /// Logical name of the attribute collection on the host record.
    pub fn field_name(&self) -> &str {
        &self.field
    }

    /// Name of the byte column holding the compressed container.
    pub fn blob_field(&self) -> &str {
        &self.blob_field
    }

    pub fn formatter(&self) -> &dyn Formatter {
        self.formatter.as_ref()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn type_of(&self, name: &str) -> Option<&AttributeType> {
        self.fields.get(name).map(Field::ty)
    }

    pub fn include(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Every declared attribute name, sorted.
    pub fn attribute_names(&self) -> Vec<String> {
        self.fields.keys().cloned().collect()
    }

    /// Decode `bytes` into a fresh projection.
    ///
    /// Keys the schema does not declare are dropped. When `is_new` is set and
    /// the blob held nothing, every field with a default starts out holding a
    /// copy of it.
    pub fn materialize(&self, bytes: Option<&[u8]>, is_new: bool) -> Result<Projection> {
        let raw = self.formatter.decode(bytes)?;
        let blank = raw.is_empty();
        let mut data = self.parse_body(raw)?;

        if blank && is_new {
            for (name, field) in &self.fields {
                if field.ty.has_default() {
                    data.insert(name.clone(), field.ty.default());
                }
            }
        }

        debug!(
            field = %self.field,
            attributes = data.len(),
            is_new,
            "materialized attributes"
        );
        Ok(Projection {
            data,
            changes: AttributeMap::new(),
        })
    }

    /// Parse a decoded container mapping, keeping declared fields only.
    pub fn parse_body(&self, raw: Map<String, Value>) -> Result<AttributeMap> {
        let mut data = AttributeMap::new();
        for (key, value) in raw {
            let Some(field) = self.fields.get(&key) else {
                debug!(field = %self.field, key = %key, "dropping undeclared attribute");
                continue;
            };
            let parsed = field.ty.parse(&AttrValue::from_json(value))?;
            if !parsed.is_null() {
                data.insert(key, parsed);
            }
        }
        Ok(data)
    }

    /// Current value of `name`: the stored value, else the declared default.
    ///
    /// Defaults are computed on demand and never written into the map.
    pub fn read(&self, data: &AttributeMap, name: &str) -> AttrValue {
        match data.get(name) {
            Some(value) => value.clone(),
            None => self
                .fields
                .get(name)
                .map_or(AttrValue::Null, |field| field.ty.default()),
        }
    }

    /// Parse `raw` through the field's type and store it.
    ///
    /// The first write to a name in a projection's lifetime records the value
    /// it had before. A `Null` result removes the name so reads fall back to
    /// the default. Undeclared names are stored untyped.
    pub fn write(
        &self,
        projection: &mut Projection,
        name: &str,
        raw: AttrValue,
    ) -> Result<AttrValue> {
        let parsed = match self.fields.get(name) {
            Some(field) => field.ty.parse(&raw)?,
            None => raw,
        };

        if !projection.changes.contains_key(name) {
            let previous = self.read(&projection.data, name);
            projection.changes.insert(name.to_string(), previous);
        }

        if parsed.is_null() {
            projection.data.remove(name);
        } else {
            projection.data.insert(name.to_string(), parsed.clone());
        }
        Ok(parsed)
    }

    /// Encode a projection's values into a container mapping.
    pub fn encode_body(&self, data: &AttributeMap) -> Result<Map<String, Value>> {
        let mut body = Map::new();
        for (name, value) in data {
            let encoded = match self.fields.get(name) {
                Some(field) => field.ty.encode(value)?,
                None => value.to_stored_json()?,
            };
            body.insert(name.clone(), encoded);
        }
        Ok(body)
    }

    /// Encode and compress a projection into blob bytes.
    ///
    /// `None` when there is nothing to store.
    pub fn serialize(&self, projection: &Projection) -> Result<Option<Vec<u8>>> {
        let body = self.encode_body(&projection.data)?;
        let bytes = self.formatter.encode(&body)?;
        trace!(
            field = %self.field,
            keys = body.len(),
            bytes = bytes.as_ref().map_or(0, Vec::len),
            formatter = self.formatter.name(),
            "serialized attributes"
        );
        Ok(bytes)
    }
}

/// Declares the fields of a [`Schema`].
///
/// Every tag known to the registry is a valid declaration; the builtin tags
/// also have their own verbs. An unknown tag poisons the builder and
/// [`build`](SchemaBuilder::build) reports it.
///
/// ```
/// use serattrs::registry::TypeRegistry;
/// use serattrs::schema::Schema;
/// use serattrs::types::FieldOptions;
///
/// let registry = TypeRegistry::default();
/// let schema = Schema::builder(&registry, "data")
///     .string(&["title", "body"])
///     .integer(&["age"])
///     .field("array", &["lottery_picks"], FieldOptions::new().item("integer"))
///     .build()
///     .unwrap();
/// assert_eq!(schema.blob_field(), "raw_data");
/// ```
pub struct SchemaBuilder<'r> {
    registry: &'r TypeRegistry,
    field: String,
    blob_field: Option<String>,
    formatter: Arc<dyn Formatter>,
    fields: BTreeMap<String, Field>,
    error: Option<AttrError>,
}

impl<'r> SchemaBuilder<'r> {
    pub fn new(registry: &'r TypeRegistry, field: impl Into<String>) -> Self {
        Self {
            registry,
            field: field.into(),
            blob_field: None,
            formatter: Arc::new(GzipJson),
            fields: BTreeMap::new(),
            error: None,
        }
    }

    /// Override the blob field name (defaults to `raw_<field>`).
    pub fn blob(mut self, blob_field: impl Into<String>) -> Self {
        self.blob_field = Some(blob_field.into());
        self
    }

    pub fn formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Declare `names` with the type registered under `tag`.
    pub fn field(mut self, tag: &str, names: &[&str], options: FieldOptions) -> Self {
        if self.error.is_some() {
            return self;
        }
        match self.registry.build(tag, &options) {
            Ok(ty) => {
                for name in names {
                    self.fields.insert(
                        name.to_string(),
                        Field {
                            tag: tag.to_string(),
                            ty: ty.clone(),
                        },
                    );
                }
            }
            Err(e) => self.error = Some(e),
        }
        self
    }

    pub fn string(self, names: &[&str]) -> Self {
        self.field("string", names, FieldOptions::default())
    }

    pub fn integer(self, names: &[&str]) -> Self {
        self.field("integer", names, FieldOptions::default())
    }

    pub fn float(self, names: &[&str]) -> Self {
        self.field("float", names, FieldOptions::default())
    }

    pub fn boolean(self, names: &[&str]) -> Self {
        self.field("boolean", names, FieldOptions::default())
    }

    pub fn time(self, names: &[&str]) -> Self {
        self.field("time", names, FieldOptions::default())
    }

    pub fn array(self, names: &[&str]) -> Self {
        self.field("array", names, FieldOptions::default())
    }

    pub fn hash(self, names: &[&str]) -> Self {
        self.field("hash", names, FieldOptions::default())
    }

    pub fn build(self) -> Result<Schema> {
        if let Some(e) = self.error {
            return Err(e);
        }
        let blob_field = self
            .blob_field
            .unwrap_or_else(|| format!("raw_{}", self.field));
        debug!(
            field = %self.field,
            blob = %blob_field,
            fields = self.fields.len(),
            formatter = self.formatter.name(),
            "built schema"
        );
        Ok(Schema {
            field: self.field,
            blob_field,
            fields: self.fields,
            formatter: self.formatter,
        })
    }
}
