//! File storage for corkboard.
//!
//! Stored files get a fresh UUID name and live in a directory sharded by the
//! first two characters of that name:
//!
//! ```text
//! {base_path}/
//! ├── ab/
//! │   └── ab12cd34-5678-90ab-cdef-123456789012.png
//! └── cd/
//!     └── cd90ab12-3456-7890-abcd-ef1234567890.jpg
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::{CorkboardError, Result};

/// Storage for uploaded files, addressed by stored name.
pub trait FileStore: Send + Sync {
    /// Write `content` under a new unique name derived from `original_name`'s
    /// extension. Returns the stored name.
    fn write_file(&self, content: &[u8], original_name: &str) -> Result<String>;

    /// Delete a stored file. A missing file is not an error.
    fn delete_file(&self, stored_name: &str) -> Result<()>;

    /// Check if a stored file exists.
    fn exists(&self, stored_name: &str) -> bool;

    /// Absolute location of a stored file.
    fn resolve(&self, stored_name: &str) -> Result<PathBuf>;
}

/// Local filesystem storage.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    base_path: PathBuf,
}

impl LocalFileStorage {
    /// Create a new LocalFileStorage with the given base path.
    ///
    /// The base directory is created if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).map_err(|e| storage_error("create", &base_path, e))?;
        Ok(Self { base_path })
    }

    /// Get the base path of this storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the full file path for a stored name.
    fn file_path(&self, stored_name: &str) -> Result<PathBuf> {
        if stored_name.is_empty()
            || stored_name.contains(['/', '\\'])
            || stored_name.starts_with('.')
        {
            return Err(CorkboardError::Storage(format!(
                "invalid stored name: {stored_name}"
            )));
        }
        Ok(self.base_path.join(shard(stored_name)).join(stored_name))
    }
}

impl FileStore for LocalFileStorage {
    fn write_file(&self, content: &[u8], original_name: &str) -> Result<String> {
        let stored_name = generate_stored_name(original_name);
        let file_path = self.file_path(&stored_name)?;

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).map_err(|e| storage_error("create", parent, e))?;
        }
        fs::write(&file_path, content).map_err(|e| storage_error("write", &file_path, e))?;

        Ok(stored_name)
    }

    fn delete_file(&self, stored_name: &str) -> Result<()> {
        let file_path = self.file_path(stored_name)?;

        match fs::remove_file(&file_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error("delete", &file_path, e)),
        }
    }

    fn exists(&self, stored_name: &str) -> bool {
        self.file_path(stored_name)
            .map(|p| p.is_file())
            .unwrap_or(false)
    }

    fn resolve(&self, stored_name: &str) -> Result<PathBuf> {
        self.file_path(stored_name)
    }
}

fn storage_error(action: &str, path: &Path, e: io::Error) -> CorkboardError {
    CorkboardError::Storage(format!("failed to {action} {}: {e}", path.display()))
}

/// First two characters of the stored name.
fn shard(stored_name: &str) -> &str {
    stored_name.get(..2).unwrap_or(stored_name)
}

/// Lowercased extension of a filename, or "bin" if there is none.
fn extract_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "bin".to_string())
}

fn generate_stored_name(original_name: &str) -> String {
    format!("{}.{}", Uuid::new_v4(), extract_extension(original_name))
}
