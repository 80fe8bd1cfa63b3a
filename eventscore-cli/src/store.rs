use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use eventscore_game::{ScoreStorage, WeeklyRecord};
use thiserror::Error;

/// Stores each week as `<key>.json` under one directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

#[derive(Debug, Error)]
pub enum FileStorageError {
    #[error("Storage error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Serialization error in {}: {source}", .path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, FileStorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(FileStorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl ScoreStorage for FileStorage {
    type Error = FileStorageError;

    fn load_week(&self, key: &str) -> Result<Option<WeeklyRecord>, Self::Error> {
        let path = self.path_for(key)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(source) if source.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(FileStorageError::Io { path, source }),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| FileStorageError::Serialization { path, source })
    }

    fn save_week(&self, key: &str, record: &WeeklyRecord) -> Result<(), Self::Error> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root).map_err(|source| FileStorageError::Io {
            path: self.root.clone(),
            source,
        })?;
        let json = serde_json::to_string_pretty(record).map_err(|source| {
            FileStorageError::Serialization {
                path: path.clone(),
                source,
            }
        })?;
        fs::write(&path, json).map_err(|source| FileStorageError::Io { path, source })?;
        log::debug!("wrote {key} to {}", self.root.display());
        Ok(())
    }

    fn delete_week(&self, key: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(FileStorageError::Io { path, source }),
        }
    }
}
