use asset_codec::CodecError;
use asset_tree::TreeError;
use asset_types::BinaryToken;

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No document is stored under the alias.
    #[error("document not found: {0}")]
    DocumentNotFound(String),

    /// The document names a side file that does not exist.
    #[error("side file not found for {alias}: {token}")]
    BinaryNotFound { alias: String, token: BinaryToken },

    /// Side file content does not hash to its token.
    #[error("digest mismatch for {token}: computed {computed}")]
    DigestMismatch {
        token: BinaryToken,
        computed: BinaryToken,
    },

    /// The alias cannot be used as a file name.
    #[error("invalid alias: {0:?}")]
    InvalidAlias(String),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
