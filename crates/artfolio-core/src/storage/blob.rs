//! Blob storage for exported snapshot images.

use super::{BoxFuture, StorageError, StorageResult, sanitize_id};
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::RwLock;

const MEMORY_SCHEME: &str = "mem://";
const FILE_SCHEME: &str = "file://";

/// Stores opaque binary objects and hands back a URI for each.
pub trait BlobStore: Send + Sync {
    /// Store `data` under `name`, replacing any previous object, and return its URI.
    fn put(&self, name: &str, data: &[u8]) -> BoxFuture<'_, StorageResult<String>>;

    /// Fetch an object by the URI `put` returned.
    fn get(&self, uri: &str) -> BoxFuture<'_, StorageResult<Vec<u8>>>;
}

/// In-memory blob store, URIs look like `mem://<name>`.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn put(&self, name: &str, data: &[u8]) -> BoxFuture<'_, StorageResult<String>> {
        let uri = format!("{}{}", MEMORY_SCHEME, name);
        let data = data.to_vec();
        Box::pin(async move {
            let mut blobs = self
                .blobs
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            blobs.insert(uri.clone(), data);
            Ok(uri)
        })
    }

    fn get(&self, uri: &str) -> BoxFuture<'_, StorageResult<Vec<u8>>> {
        let uri = uri.to_string();
        Box::pin(async move {
            let blobs = self
                .blobs
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            blobs.get(&uri).cloned().ok_or(StorageError::NotFound(uri))
        })
    }
}

/// Blob store backed by a directory, URIs look like `file:///abs/path`.
pub struct FileBlobStore {
    base_path: PathBuf,
}

impl FileBlobStore {
    /// Create the store, creating the directory if needed.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        fs::create_dir_all(&base_path)
            .map_err(|e| StorageError::Io(format!("Failed to create blob directory: {}", e)))?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl BlobStore for FileBlobStore {
    fn put(&self, name: &str, data: &[u8]) -> BoxFuture<'_, StorageResult<String>> {
        let path = self.base_path.join(sanitize_id(name));
        let data = data.to_vec();
        Box::pin(async move {
            fs::write(&path, &data)
                .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
            Ok(format!("{}{}", FILE_SCHEME, path.display()))
        })
    }

    fn get(&self, uri: &str) -> BoxFuture<'_, StorageResult<Vec<u8>>> {
        let uri = uri.to_string();
        let base = self.base_path.clone();
        Box::pin(async move {
            let path = uri
                .strip_prefix(FILE_SCHEME)
                .map(PathBuf::from)
                .ok_or_else(|| StorageError::Other(format!("Not a file URI: {}", uri)))?;
            // `starts_with` compares components lexically, so `..` must be refused outright.
            let escapes = path.components().any(|c| matches!(c, Component::ParentDir));
            if escapes || !path.starts_with(&base) {
                return Err(StorageError::NotFound(uri));
            }
            if !path.exists() {
                return Err(StorageError::NotFound(uri));
            }
            fs::read(&path).map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;
    use tempfile::tempdir;

    #[test]
    fn test_memory_put_get() {
        let store = MemoryBlobStore::new();
        let uri = block_on(store.put("header.png", b"png")).unwrap();
        assert_eq!(uri, "mem://header.png");
        assert_eq!(block_on(store.get(&uri)).unwrap(), b"png".to_vec());
        assert!(matches!(block_on(store.get("mem://other")), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_file_put_get_overwrite() {
        let dir = tempdir().unwrap();
        let store = FileBlobStore::new(dir.path().join("images")).unwrap();

        let uri = block_on(store.put("header.png", b"first")).unwrap();
        assert!(uri.starts_with("file://"));
        let again = block_on(store.put("header.png", b"second")).unwrap();
        assert_eq!(uri, again);
        assert_eq!(block_on(store.get(&uri)).unwrap(), b"second".to_vec());
    }

    #[test]
    fn test_file_get_rejects_foreign_paths() {
        let dir = tempdir().unwrap();
        let store = FileBlobStore::new(dir.path().join("images")).unwrap();
        assert!(block_on(store.get("file:///etc/passwd")).is_err());
        assert!(block_on(store.get("mem://x")).is_err());
    }

    #[test]
    fn test_file_get_rejects_parent_traversal() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("secret.txt"), b"outside").unwrap();
        let base = dir.path().join("images");
        let store = FileBlobStore::new(base.clone()).unwrap();

        let uri = format!("file://{}/../secret.txt", base.display());
        assert!(matches!(block_on(store.get(&uri)), Err(StorageError::NotFound(_))));
    }
}
