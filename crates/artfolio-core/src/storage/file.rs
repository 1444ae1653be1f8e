//! File-based session storage for native platforms.

use super::{BoxFuture, Storage, StorageError, StorageResult, sanitize_id};
use crate::session::SavedSession;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk layout: the caller's id next to the session fields. File names are
/// sanitized, so the id is kept here for [`Storage::list`].
#[derive(Serialize)]
struct StoredSession<'a> {
    id: &'a str,
    #[serde(flatten)]
    session: &'a SavedSession,
}

#[derive(Deserialize)]
struct StoredId {
    id: Option<String>,
}

/// Stores sessions as JSON files in a directory.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create file storage in the default location
    /// (`<local data dir>/artfolio/sessions`).
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;

        Self::new(base.join("artfolio").join("sessions"))
    }

    fn session_path(&self, id: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", sanitize_id(id)))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for FileStorage {
    fn save(&self, id: &str, session: &SavedSession) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.session_path(id);
        let json = serde_json::to_string_pretty(&StoredSession { id, session });

        Box::pin(async move {
            let json = json.map_err(|e| StorageError::Serialization(e.to_string()))?;
            fs::write(&path, json)
                .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
            log::debug!("Saved session to {}", path.display());
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<SavedSession>> {
        let path = self.session_path(id);
        let id = id.to_string();

        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(id));
            }

            let json = fs::read_to_string(&path)
                .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

            SavedSession::from_json(&json).map_err(|e| {
                StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
            })
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.session_path(id);

        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
                })?;
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        let base = self.base_path.clone();

        Box::pin(async move {
            if !base.exists() {
                return Ok(vec![]);
            }

            let entries = fs::read_dir(&base)
                .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

            let ids = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|e| e == "json"))
                .filter_map(|path| stored_id(&path))
                .collect();
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.session_path(id);
        Box::pin(async move { Ok(path.exists()) })
    }
}

/// The id a session file was saved under, falling back to the file stem for
/// files written without one.
fn stored_id(path: &Path) -> Option<String> {
    let from_file = fs::read_to_string(path)
        .ok()
        .and_then(|json| serde_json::from_str::<StoredId>(&json).ok())
        .and_then(|stored| stored.id);
    if from_file.is_none() {
        log::debug!("No stored id in {}, using file name", path.display());
    }
    from_file.or_else(|| path.file_stem().and_then(|s| s.to_str()).map(String::from))
}
