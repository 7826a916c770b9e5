//! File storage behind the `/files/{name}` endpoints.

use std::fs;
use std::io::ErrorKind::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid file name `{0}`")]
    InvalidName(String),

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub trait FileStorage: Send + Sync {
    /// `Ok(None)` when no file with that name exists.
    fn read(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError>;

    fn write(&self, name: &str, contents: &[u8]) -> Result<(), StorageError>;
}

/// Stores files flat inside one directory.
#[derive(Debug, Clone)]
pub struct DirectoryStorage {
    root: PathBuf,
}

impl DirectoryStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> Option<PathBuf> {
        sanitize_name(name).map(|name| self.root.join(name))
    }
}

impl FileStorage for DirectoryStorage {
    fn read(&self, name: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let Some(path) = self.resolve(name) else {
            return Ok(None);
        };
        debug!(path = %path.display(), "reading file");

        match fs::read(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) => match err.kind() {
                NotFound | IsADirectory => Ok(None),
                _ => Err(StorageError::Io { path, source: err }),
            },
        }
    }

    fn write(&self, name: &str, contents: &[u8]) -> Result<(), StorageError> {
        let path = self
            .resolve(name)
            .ok_or_else(|| StorageError::InvalidName(name.to_string()))?;
        debug!(path = %path.display(), bytes = contents.len(), "writing file");

        fs::write(&path, contents).map_err(|source| StorageError::Io { path, source })
    }
}

/// Only plain file names are accepted: no separators and no `.`/`..`.
fn sanitize_name(name: &str) -> Option<&str> {
    let plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0']);
    plain.then_some(name)
}
