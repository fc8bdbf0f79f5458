//! # Records
//!
//! [`Record`] pairs a [`RecordHost`] (the thing that owns the blob field) with
//! a shared [`Schema`], and keeps that record's projection: the typed values
//! and the change ledger.
//!
//! ## Lifecycle
//!
//! ```text
//!   new ──► (first access) materialize ──► get / set ... ──► save
//!                ▲                                             │
//!                └──────────────── reload ◄────────────────────┘
//! ```
//!
//! - Nothing is decoded until the first accessor call.
//! - `reload` drops the projection; the next access decodes the blob again
//!   with an empty ledger.
//! - `save` always serializes into the blob field before asking the host to
//!   persist, whether or not the host then goes through with it.
//!
//! ## Accessors
//!
//! All accessors take a field name. Typed per-field wrappers are generated by
//! [`attribute_accessors!`](crate::attribute_accessors) for any type
//! implementing [`Attributed`].

use crate::error::{AttrError, Result};
use crate::schema::{AttributeMap, Projection, Schema};
use crate::store::RecordHost;
use crate::value::{cast_string, AttrValue};
use std::sync::Arc;
use tracing::warn;

#[derive(Debug)]
pub struct Record<H: RecordHost> {
    schema: Arc<Schema>,
    host: H,
    projection: Option<Projection>,
}

impl<H: RecordHost> Record<H> {
    pub fn new(schema: Arc<Schema>, host: H) -> Self {
        Self {
            schema,
            host,
            projection: None,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host. Changing the blob here does not affect an
    /// already loaded projection until [`reload`](Self::reload).
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn is_loaded(&self) -> bool {
        self.projection.is_some()
    }

    fn projection(&mut self) -> Result<&mut Projection> {
        let projection = match self.projection.take() {
            Some(projection) => projection,
            None => self
                .schema
                .materialize(self.host.blob(), self.host.is_new_record())?,
        };
        Ok(self.projection.insert(projection))
    }

    /// The live attribute map, decoding the blob on first use.
    pub fn data(&mut self) -> Result<&AttributeMap> {
        Ok(self.projection()?.data())
    }

    /// Current value of `name`, falling back to the field default.
    pub fn get(&mut self, name: &str) -> Result<AttrValue> {
        let schema = Arc::clone(&self.schema);
        let projection = self.projection()?;
        Ok(schema.read(projection.data(), name))
    }

    /// Parse and store `value`, returning the parsed value.
    pub fn set(&mut self, name: &str, value: impl Into<AttrValue>) -> Result<AttrValue> {
        let schema = Arc::clone(&self.schema);
        let projection = self.projection()?;
        schema.write(projection, name, value.into())
    }

    pub fn is_changed(&self, name: &str) -> bool {
        self.projection
            .as_ref()
            .is_some_and(|projection| projection.is_changed(name))
    }

    /// Names written since the last load, sorted.
    pub fn changed(&self) -> Vec<String> {
        self.projection
            .as_ref()
            .map(Projection::changed)
            .unwrap_or_default()
    }

    pub fn has_changes(&self) -> bool {
        self.projection
            .as_ref()
            .is_some_and(Projection::has_changes)
    }

    /// `(previous, current)` for a field written since the last load.
    pub fn change(&mut self, name: &str) -> Result<Option<(AttrValue, AttrValue)>> {
        let previous = match &self.projection {
            Some(projection) => match projection.changes().get(name) {
                Some(previous) => previous.clone(),
                None => return Ok(None),
            },
            None => return Ok(None),
        };
        let current = self.get(name)?;
        Ok(Some((previous, current)))
    }

    /// The current value re-encoded and stringified; `""` when it encodes
    /// to nothing.
    pub fn before_type_cast(&mut self, name: &str) -> Result<String> {
        let value = self.get(name)?;
        let encoded = match self.schema.type_of(name) {
            Some(ty) => ty.encode(&value)?,
            None => value.to_json(),
        };
        Ok(cast_string(&encoded))
    }

    /// The projection contents: every attribute currently stored.
    pub fn attributes(&mut self) -> Result<&AttributeMap> {
        self.data()
    }

    /// Names currently held in the projection, sorted.
    pub fn attribute_names(&mut self) -> Result<Vec<String>> {
        Ok(self.data()?.keys().cloned().collect())
    }

    /// Reads a declared attribute. `None` for names the schema does not
    /// declare, which belong to the host.
    pub fn read_attribute(&mut self, name: &str) -> Result<Option<AttrValue>> {
        if !self.schema.include(name) {
            return Ok(None);
        }
        self.get(name).map(Some)
    }

    /// Drop the projection and the change ledger.
    pub fn reload(&mut self) {
        self.projection = None;
    }

    /// Serialize the projection into the host's blob field.
    pub fn before_save(&mut self) -> Result<()> {
        let schema = Arc::clone(&self.schema);
        let bytes = schema.serialize(self.projection()?)?;
        self.host.set_blob(bytes);
        Ok(())
    }

    /// Run [`before_save`](Self::before_save), then ask the host to persist.
    ///
    /// Returns `Ok(false)` when the host declined.
    pub fn save(&mut self) -> Result<bool> {
        self.before_save()?;
        let saved = self.host.persist()?;
        if !saved {
            warn!(field = %self.schema.field_name(), "host declined to persist record");
        }
        Ok(saved)
    }

    /// Like [`save`](Self::save), but a declined persist is an error.
    pub fn save_checked(&mut self) -> Result<()> {
        if self.save()? {
            Ok(())
        } else {
            Err(AttrError::NotPersisted)
        }
    }
}

/// Types that expose a [`Record`], so typed accessors can be generated for
/// them with [`attribute_accessors!`](crate::attribute_accessors).
pub trait Attributed {
    type Host: RecordHost;

    fn record(&self) -> &Record<Self::Host>;

    fn record_mut(&mut self) -> &mut Record<Self::Host>;
}

impl<H: RecordHost> Attributed for Record<H> {
    type Host = H;

    fn record(&self) -> &Record<H> {
        self
    }

    fn record_mut(&mut self) -> &mut Record<H> {
        self
    }
}
