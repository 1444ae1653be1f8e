//! Storage collaborators for saved sessions and exported images.
//!
//! The drawing canvas never talks to a backend itself. Hosts hand the
//! exported image to a [`BlobStore`] and the editable vector state to a
//! [`Storage`] document store.

mod blob;
mod file;
mod memory;

pub use blob::{BlobStore, FileBlobStore, MemoryBlobStore};
pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::session::SavedSession;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Document store for saved drawing sessions.
///
/// Writes are last-write-wins; there is no versioning.
pub trait Storage: Send + Sync {
    /// Save a session.
    fn save(&self, id: &str, session: &SavedSession) -> BoxFuture<'_, StorageResult<()>>;

    /// Load a session.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<SavedSession>>;

    /// Delete a session.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all session IDs.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a session exists.
    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Make an id safe to use as a file name.
pub(crate) fn sanitize_id(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
        .collect()
}
