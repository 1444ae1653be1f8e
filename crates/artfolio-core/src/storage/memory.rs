//! In-memory session storage.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::session::SavedSession;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStorage {
    sessions: RwLock<HashMap<String, SavedSession>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, session: &SavedSession) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let session = session.clone();
        Box::pin(async move {
            let mut sessions = self
                .sessions
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            sessions.insert(id, session);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<SavedSession>> {
        let id = id.to_string();
        Box::pin(async move {
            let sessions = self
                .sessions
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            sessions.get(&id).cloned().ok_or(StorageError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut sessions = self
                .sessions
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            sessions.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let sessions = self
                .sessions
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            Ok(sessions.keys().cloned().collect())
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            let sessions = self
                .sessions
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            Ok(sessions.contains_key(&id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Sticker;
    use kurbo::Point;
    use pollster::block_on;

    fn session() -> SavedSession {
        SavedSession::new(Vec::new(), vec![Sticker::new("sun", Point::new(1.0, 1.0), 50.0)])
    }

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        let session = session();

        block_on(storage.save("test", &session)).unwrap();
        let loaded = block_on(storage.load("test")).unwrap();

        assert_eq!(loaded, session);
    }

    #[test]
    fn test_last_write_wins() {
        let storage = MemoryStorage::new();
        block_on(storage.save("test", &session())).unwrap();
        block_on(storage.save("test", &SavedSession::default())).unwrap();
        assert!(block_on(storage.load("test")).unwrap().is_empty());
    }

    #[test]
    fn test_not_found() {
        let storage = MemoryStorage::new();
        let result = block_on(storage.load("nonexistent"));

        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_exists_and_delete() {
        let storage = MemoryStorage::new();

        assert!(!block_on(storage.exists("test")).unwrap());
        block_on(storage.save("test", &session())).unwrap();
        assert!(block_on(storage.exists("test")).unwrap());
        block_on(storage.delete("test")).unwrap();
        assert!(!block_on(storage.exists("test")).unwrap());
    }

    #[test]
    fn test_list() {
        let storage = MemoryStorage::new();

        block_on(storage.save("a", &session())).unwrap();
        block_on(storage.save("b", &session())).unwrap();

        let mut list = block_on(storage.list()).unwrap();
        list.sort();
        assert_eq!(list, vec!["a".to_string(), "b".to_string()]);
    }
}
