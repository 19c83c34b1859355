//! File System Port
//!
//! Every read and write in clgen goes through [`FileSystem`] with an explicit
//! path. Nothing here consults or changes the process working directory.

use std::io::Write;
use std::path::Path;

use crate::error::{ClgenError, ClgenResult};

/// Abstract file system interface
///
/// Implementations:
/// - `LocalFs` - standard file I/O with atomic writes
/// - `MockFileSystem` - in-memory for testing
pub trait FileSystem {
    /// Read file content; a missing file is reported as `MissingFile`
    fn read_to_string(&self, path: &Path) -> ClgenResult<String>;

    /// Write file content atomically
    fn write_atomic(&self, path: &Path, content: &str) -> ClgenResult<()>;

    /// Check if file exists
    fn exists(&self, path: &Path) -> bool;
}

/// Local file system implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFs {
    fn read_to_string(&self, path: &Path) -> ClgenResult<String> {
        std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ClgenError::MissingFile {
                path: path.to_path_buf(),
            },
            _ => ClgenError::Io(e),
        })
    }

    /// Uses the tempfile + rename pattern so readers never see a half-written
    /// header.
    fn write_atomic(&self, path: &Path, content: &str) -> ClgenResult<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| ClgenError::Io(e.error))?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Mock file system for testing
///
/// Uses `Arc<Mutex<>>` internally so it can be cloned and shared.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockFileSystem {
    pub files: std::sync::Arc<
        std::sync::Mutex<std::collections::HashMap<std::path::PathBuf, String>>,
    >,
    pub reads: std::sync::Arc<std::sync::Mutex<Vec<std::path::PathBuf>>>,
}

#[cfg(test)]
impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl AsRef<Path>, content: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(path.as_ref().to_path_buf(), content.to_string());
        self
    }

    /// How many times `path` was read
    pub fn read_count(&self, path: impl AsRef<Path>) -> usize {
        let reads = self.reads.lock().unwrap();
        reads.iter().filter(|p| p.as_path() == path.as_ref()).count()
    }
}

#[cfg(test)]
impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> ClgenResult<String> {
        self.reads.lock().unwrap().push(path.to_path_buf());
        let files = self.files.lock().unwrap();
        files
            .get(path)
            .cloned()
            .ok_or_else(|| ClgenError::MissingFile {
                path: path.to_path_buf(),
            })
    }

    fn write_atomic(&self, path: &Path, content: &str) -> ClgenResult<()> {
        let mut files = self.files.lock().unwrap();
        files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        files.contains_key(path)
    }
}
