//! # Serattrs Architecture
//!
//! Serattrs stores a **schema-declared set of typed attributes inside a single
//! compressed blob** on a record, and exposes each attribute as a typed field
//! with defaults, change tracking and before-type-cast views.
//!
//! The host record (whatever owns the blob column) stays in charge of
//! persistence. Serattrs only turns bytes into typed values and back.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Record (record.rs, macros.rs)                              │
//! │  - Per-record projection and change ledger over a host      │
//! │  - Lazy decode, get/set, before_save/save, reload           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Schema (schema.rs, config.rs)                              │
//! │  - Field name -> type descriptor, sealed once built         │
//! │  - materialize / write / serialize                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!              ┌───────────────┴───────────────┐
//!              ▼                               ▼
//! ┌──────────────────────────┐   ┌──────────────────────────────┐
//! │  Types (types.rs,        │   │  Format (format/)            │
//! │  registry.rs)            │   │  - gzip+JSON (default)       │
//! │  - parse / encode        │   │  - gzip+MessagePack          │
//! └──────────────────────────┘   └──────────────────────────────┘
//! ```
//!
//! ## Key Principle: Nothing Null Is Stored
//!
//! A projection holds only present values. Blank input parses to
//! [`AttrValue::Null`], and writing `Null` removes the key so later reads see
//! the field default again. Defaults are eagerly copied into the projection
//! only for a brand-new record whose blob is empty.
//!
//! ## Testing Strategy
//!
//! 1. **Types and format** (`types.rs`, `format/`): unit tests of every
//!    parse/encode rule and the codec round trip.
//! 2. **Schema and record**: unit tests against [`store::memory::MemoryRecord`].
//! 3. **Lifecycle and CLI** (`tests/`): full load/mutate/save cycles and the
//!    binary driven through `assert_cmd`.
//!
//! ## Module Overview
//!
//! - [`value`]: `AttrValue`, the single runtime value type
//! - [`types`]: Type descriptors and their parse/encode rules
//! - [`registry`]: Type tag -> descriptor factory
//! - [`format`]: Container formatters
//! - [`schema`]: Schema building, materialize/write/serialize
//! - [`record`]: Per-record projection and change ledger
//! - [`store`]: The host contract and two hosts
//! - [`config`]: JSON schema definition files
//! - [`macros`]: Typed accessor generation
//! - [`error`]: Error types

pub mod config;
pub mod error;
pub mod format;
pub mod macros;
pub mod record;
pub mod registry;
pub mod schema;
pub mod store;
pub mod types;
pub mod value;

pub use config::SchemaConfig;
pub use error::{AttrError, Result};
pub use format::{FormatKind, Formatter, GzipJson, GzipMsgpack};
pub use record::{Attributed, Record};
pub use registry::TypeRegistry;
pub use schema::{AttributeMap, Projection, Schema, SchemaBuilder};
pub use store::fs::FileRecord;
pub use store::memory::MemoryRecord;
pub use store::RecordHost;
pub use types::{AttributeType, FieldOptions, TypeKind};
pub use value::{AttrValue, FromAttr};

pub use chrono;

#[doc(hidden)]
pub use paste;
