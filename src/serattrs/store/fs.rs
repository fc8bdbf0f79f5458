use super::RecordHost;
use crate::error::{AttrError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A host whose blob field is a single file on disk.
///
/// A missing file is a new record. Persisting writes the blob atomically
/// (temporary file, then rename); an empty blob is written as an empty file.
#[derive(Debug, Clone)]
pub struct FileRecord {
    path: PathBuf,
    blob: Option<Vec<u8>>,
    persisted: bool,
}

impl FileRecord {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Ok(Self {
                path,
                blob: None,
                persisted: false,
            });
        }
        let bytes = fs::read(&path).map_err(AttrError::Io)?;
        Ok(Self {
            path,
            blob: (!bytes.is_empty()).then_some(bytes),
            persisted: true,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "blob".to_string());
        self.path
            .with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
    }
}

impl RecordHost for FileRecord {
    fn blob(&self) -> Option<&[u8]> {
        self.blob.as_deref()
    }

    fn set_blob(&mut self, bytes: Option<Vec<u8>>) {
        self.blob = bytes;
    }

    fn is_new_record(&self) -> bool {
        !self.persisted
    }

    fn persist(&mut self) -> Result<bool> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(AttrError::Io)?;
            }
        }

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, self.blob.as_deref().unwrap_or_default()).map_err(AttrError::Io)?;
        fs::rename(&tmp_path, &self.path).map_err(AttrError::Io)?;

        debug!(
            path = %self.path.display(),
            bytes = self.blob.as_ref().map_or(0, Vec::len),
            "wrote blob"
        );
        self.persisted = true;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_new_record() {
        let dir = tempfile::tempdir().unwrap();
        let host = FileRecord::open(dir.path().join("record.blob")).unwrap();
        assert!(host.is_new_record());
        assert!(host.blob().is_none());
    }

    #[test]
    fn persist_writes_and_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("record.blob");

        let mut host = FileRecord::open(&path).unwrap();
        host.set_blob(Some(vec![0x1f, 0x8b, 0x08]));
        assert!(host.persist().unwrap());
        assert!(!host.is_new_record());

        let reopened = FileRecord::open(&path).unwrap();
        assert!(!reopened.is_new_record());
        assert_eq!(reopened.blob(), Some(&[0x1f, 0x8b, 0x08][..]));
    }

    #[test]
    fn empty_blob_persists_as_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("record.blob");

        let mut host = FileRecord::open(&path).unwrap();
        host.persist().unwrap();

        let reopened = FileRecord::open(&path).unwrap();
        assert!(!reopened.is_new_record());
        assert!(reopened.blob().is_none());
    }
}
