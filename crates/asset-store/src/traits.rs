use asset_types::BinaryToken;

use crate::error::StoreResult;

/// Location that holds documents and side files.
///
/// Implementations address documents by alias and side files by
/// `(alias, token)`. They never interpret content.
/// - Reads of absent entries return `Ok(None)`, not an error.
/// - Writes replace existing content.
/// - All I/O errors are propagated, never silently ignored.
pub trait StorageBackend: Send + Sync {
    /// Read the document stored under `alias`.
    fn read_document(&self, alias: &str) -> StoreResult<Option<Vec<u8>>>;

    fn write_document(&self, alias: &str, bytes: &[u8]) -> StoreResult<()>;

    fn document_exists(&self, alias: &str) -> StoreResult<bool>;

    /// Read the side file for `token` under `alias`.
    fn read_binary(&self, alias: &str, token: &BinaryToken) -> StoreResult<Option<Vec<u8>>>;

    fn write_binary(&self, alias: &str, token: &BinaryToken, bytes: &[u8]) -> StoreResult<()>;

    /// Size of the side file, if present.
    fn binary_len(&self, alias: &str, token: &BinaryToken) -> StoreResult<Option<u64>>;

    fn binary_exists(&self, alias: &str, token: &BinaryToken) -> StoreResult<bool> {
        Ok(self.binary_len(alias, token)?.is_some())
    }

    /// Aliases of all stored documents, sorted.
    fn list_documents(&self) -> StoreResult<Vec<String>>;
}
