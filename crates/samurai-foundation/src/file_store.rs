//! File access capability
//!
//! The rewriter never touches `std::fs` directly. It is handed a `FileStore`,
//! which lets the whole pipeline run against an in-memory tree in tests.

use crate::error::{SamuraiError, SamuraiResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Read, enumerate and overwrite files of a (possibly virtual) tree
pub trait FileStore {
    /// All descendant files under `root`, sorted by path
    fn list_files(&self, root: &Path) -> SamuraiResult<Vec<PathBuf>>;

    /// Names of the files (not directories) directly inside `dir`, sorted
    fn file_names_in(&self, dir: &Path) -> SamuraiResult<Vec<String>>;

    fn read_to_string(&self, path: &Path) -> SamuraiResult<String>;

    /// Replace the full contents of an existing file
    fn overwrite(&self, path: &Path, content: &str) -> SamuraiResult<()>;

    fn is_file(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;
}

/// `FileStore` backed by the real file system
#[derive(Debug, Clone, Default)]
pub struct DiskFileStore {
    excluded_dirs: Vec<String>,
}

impl DiskFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip directories with any of these names while enumerating
    pub fn with_excluded_dirs(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.excluded_dirs = names.into_iter().collect();
        self
    }

    fn is_excluded(&self, entry: &walkdir::DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && self
                .excluded_dirs
                .iter()
                .any(|name| entry.file_name().to_string_lossy() == name.as_str())
    }
}

impl FileStore for DiskFileStore {
    fn list_files(&self, root: &Path) -> SamuraiResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.is_excluded(e))
        {
            let entry = entry.map_err(|e| SamuraiError::Io {
                message: e.to_string(),
                path: e.path().map(Path::to_path_buf),
                source: None,
            })?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        files.sort();
        debug!(root = %root.display(), count = files.len(), "Enumerated files");
        Ok(files)
    }

    fn file_names_in(&self, dir: &Path) -> SamuraiResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| SamuraiError::io_at(dir, e))? {
            let entry = entry.map_err(|e| SamuraiError::io_at(dir, e))?;
            if entry.path().is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn read_to_string(&self, path: &Path) -> SamuraiResult<String> {
        fs::read_to_string(path).map_err(|e| SamuraiError::io_at(path, e))
    }

    fn overwrite(&self, path: &Path, content: &str) -> SamuraiResult<()> {
        trace!(path = %path.display(), bytes = content.len(), "Overwriting file");
        fs::write(path, content).map_err(|e| SamuraiError::io_at(path, e))
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// In-memory `FileStore`; directories exist implicitly as file path prefixes
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    files: Mutex<BTreeMap<PathBuf, String>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `(path, content)` pairs
    pub fn from_files<P, C>(files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: Into<PathBuf>,
        C: Into<String>,
    {
        let store = Self::new();
        for (path, content) in files {
            store.insert(path, content);
        }
        store
    }

    /// Create or replace a file
    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        if let Ok(mut files) = self.files.lock() {
            files.insert(path.into(), content.into());
        }
    }

    /// Current contents of a file, if present
    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.lock().ok()?.get(path.as_ref()).cloned()
    }

    fn poisoned() -> SamuraiError {
        SamuraiError::Io {
            message: "in-memory file store lock poisoned".to_string(),
            path: None,
            source: None,
        }
    }

    fn not_found(path: &Path) -> SamuraiError {
        SamuraiError::io_at(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        )
    }
}

impl FileStore for MemoryFileStore {
    fn list_files(&self, root: &Path) -> SamuraiResult<Vec<PathBuf>> {
        let files = self.files.lock().map_err(|_| Self::poisoned())?;
        Ok(files
            .keys()
            .filter(|path| path.starts_with(root))
            .cloned()
            .collect())
    }

    fn file_names_in(&self, dir: &Path) -> SamuraiResult<Vec<String>> {
        let files = self.files.lock().map_err(|_| Self::poisoned())?;
        Ok(files
            .keys()
            .filter(|path| path.parent() == Some(dir))
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect())
    }

    fn read_to_string(&self, path: &Path) -> SamuraiResult<String> {
        let files = self.files.lock().map_err(|_| Self::poisoned())?;
        files.get(path).cloned().ok_or_else(|| Self::not_found(path))
    }

    fn overwrite(&self, path: &Path, content: &str) -> SamuraiResult<()> {
        let mut files = self.files.lock().map_err(|_| Self::poisoned())?;
        match files.get_mut(path) {
            Some(existing) => {
                *existing = content.to_string();
                Ok(())
            }
            None => Err(Self::not_found(path)),
        }
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files
            .lock()
            .map(|files| files.contains_key(path))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.files
            .lock()
            .map(|files| {
                files
                    .keys()
                    .any(|file| file != path && file.starts_with(path))
            })
            .unwrap_or(false)
    }
}
