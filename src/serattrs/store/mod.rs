//! # Host Records
//!
//! The codec does not persist anything itself. It is handed bytes by the
//! record that owns the blob field, and hands bytes back to it. [`RecordHost`]
//! is the seam between the two.
//!
//! ## What a host provides
//!
//! - The blob field: [`RecordHost::blob`] / [`RecordHost::set_blob`]
//! - Whether the record has never been persisted: [`RecordHost::is_new_record`]
//! - The persistence attempt itself: [`RecordHost::persist`], which may
//!   decline (the record framework's callbacks, validations, etc.)
//!
//! ## What a host gets
//!
//! [`Record`](crate::record::Record) calls the schema's `serialize` and stores
//! the result with `set_blob` immediately before every `persist` call, even
//! when the host ends up declining.
//!
//! ## Implementations
//!
//! - [`memory::MemoryRecord`]: in-process host for tests and embedding
//! - [`fs::FileRecord`]: a blob kept in a single file

use crate::error::Result;

pub mod fs;
pub mod memory;

/// The record that owns a blob field.
pub trait RecordHost {
    /// Current bytes of the blob field. `None` when the field is empty.
    fn blob(&self) -> Option<&[u8]>;

    /// Replace the blob field's bytes.
    fn set_blob(&mut self, bytes: Option<Vec<u8>>);

    /// `true` until the record has been persisted once.
    fn is_new_record(&self) -> bool;

    /// Attempt to persist the record.
    ///
    /// Returns `Ok(false)` when the host declined to save.
    fn persist(&mut self) -> Result<bool>;
}
