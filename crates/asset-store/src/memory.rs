use std::collections::HashMap;
use std::sync::RwLock;

use asset_types::BinaryToken;

use crate::alias::validate_alias;
use crate::error::StoreResult;
use crate::traits::StorageBackend;

/// In-memory, HashMap-based backend.
///
/// Intended for tests and embedding. Content is held behind `RwLock`s and
/// cloned on read and write.
pub struct InMemoryBackend {
    documents: RwLock<HashMap<String, Vec<u8>>>,
    binaries: RwLock<HashMap<(String, BinaryToken), Vec<u8>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            binaries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored documents.
    pub fn document_count(&self) -> usize {
        self.documents.read().expect("lock poisoned").len()
    }

    /// Number of stored side files.
    pub fn binary_count(&self) -> usize {
        self.binaries.read().expect("lock poisoned").len()
    }

    /// Total bytes across all side files.
    pub fn total_binary_bytes(&self) -> u64 {
        self.binaries
            .read()
            .expect("lock poisoned")
            .values()
            .map(|b| b.len() as u64)
            .sum()
    }

    /// Drop a side file. Returns `true` if it existed.
    pub fn remove_binary(&self, alias: &str, token: &BinaryToken) -> bool {
        self.binaries
            .write()
            .expect("lock poisoned")
            .remove(&(alias.to_string(), *token))
            .is_some()
    }

    pub fn clear(&self) {
        self.documents.write().expect("lock poisoned").clear();
        self.binaries.write().expect("lock poisoned").clear();
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for InMemoryBackend {
    fn read_document(&self, alias: &str) -> StoreResult<Option<Vec<u8>>> {
        validate_alias(alias)?;
        let map = self.documents.read().expect("lock poisoned");
        Ok(map.get(alias).cloned())
    }

    fn write_document(&self, alias: &str, bytes: &[u8]) -> StoreResult<()> {
        validate_alias(alias)?;
        let mut map = self.documents.write().expect("lock poisoned");
        map.insert(alias.to_string(), bytes.to_vec());
        Ok(())
    }

    fn document_exists(&self, alias: &str) -> StoreResult<bool> {
        validate_alias(alias)?;
        Ok(self.documents.read().expect("lock poisoned").contains_key(alias))
    }

    fn read_binary(&self, alias: &str, token: &BinaryToken) -> StoreResult<Option<Vec<u8>>> {
        validate_alias(alias)?;
        let map = self.binaries.read().expect("lock poisoned");
        Ok(map.get(&(alias.to_string(), *token)).cloned())
    }

    fn write_binary(&self, alias: &str, token: &BinaryToken, bytes: &[u8]) -> StoreResult<()> {
        validate_alias(alias)?;
        let mut map = self.binaries.write().expect("lock poisoned");
        map.insert((alias.to_string(), *token), bytes.to_vec());
        Ok(())
    }

    fn binary_len(&self, alias: &str, token: &BinaryToken) -> StoreResult<Option<u64>> {
        validate_alias(alias)?;
        let map = self.binaries.read().expect("lock poisoned");
        Ok(map.get(&(alias.to_string(), *token)).map(|b| b.len() as u64))
    }

    fn list_documents(&self) -> StoreResult<Vec<String>> {
        let map = self.documents.read().expect("lock poisoned");
        let mut aliases: Vec<String> = map.keys().cloned().collect();
        aliases.sort();
        Ok(aliases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_backend_is_empty() {
        let backend = InMemoryBackend::new();
        assert_eq!(backend.document_count(), 0);
        assert_eq!(backend.binary_count(), 0);
        assert!(backend.list_documents().unwrap().is_empty());
    }

    #[test]
    fn documents_roundtrip() {
        let backend = InMemoryBackend::new();
        backend.write_document("scene", b"{}").unwrap();
        assert!(backend.document_exists("scene").unwrap());
        assert_eq!(backend.read_document("scene").unwrap().unwrap(), b"{}");
        assert!(backend.read_document("other").unwrap().is_none());
    }

    #[test]
    fn binaries_are_scoped_by_alias() {
        let backend = InMemoryBackend::new();
        let token = BinaryToken::from_digest([7; 16]);
        backend.write_binary("a", &token, &[1, 2]).unwrap();

        assert_eq!(backend.binary_len("a", &token).unwrap(), Some(2));
        assert!(!backend.binary_exists("b", &token).unwrap());
        assert_eq!(backend.total_binary_bytes(), 2);

        assert!(backend.remove_binary("a", &token));
        assert!(!backend.remove_binary("a", &token));
    }

    #[test]
    fn clear_drops_everything() {
        let backend = InMemoryBackend::new();
        backend.write_document("a", b"1").unwrap();
        backend
            .write_binary("a", &BinaryToken::from_digest([0; 16]), &[0])
            .unwrap();
        backend.clear();
        assert_eq!(backend.document_count(), 0);
        assert_eq!(backend.binary_count(), 0);
    }
}
