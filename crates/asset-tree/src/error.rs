use asset_types::{PropertyId, PropertyKind};

/// Errors from property tree operations.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// An accessor was used on a node whose active tag differs.
    #[error("wrong variant: expected {expected}, found {actual}")]
    WrongVariant {
        expected: PropertyKind,
        actual: PropertyKind,
    },

    /// The handle was not issued by this tree.
    #[error("unknown property handle {0}")]
    UnknownHandle(PropertyId),

    /// The tree has no root node.
    #[error("tree has no root")]
    NoRoot,

    /// Object lookup for a key that is not present.
    #[error("object has no item {0:?}")]
    MissingItem(String),

    /// Array access outside `[0, size)`.
    #[error("array index {index} out of bounds for size {size}")]
    IndexOutOfBounds { index: usize, size: usize },

    /// Array slot inside bounds that was never assigned.
    #[error("array slot {0} is empty")]
    EmptySlot(usize),

    /// Raw access outside `[0, capacity)`.
    #[error("raw access at offset {offset} with length {len} exceeds capacity {capacity}")]
    RawBounds {
        offset: usize,
        len: usize,
        capacity: usize,
    },

    /// `allocate` on a raw buffer that is already allocated.
    #[error("raw buffer is already allocated")]
    AlreadyAllocated,

    /// `free` on a raw buffer that was never allocated.
    #[error("raw buffer is not allocated")]
    NotAllocated,

    /// A fixed-size value had the wrong number of elements.
    #[error("size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// A buffer or texture object does not have the expected layout.
    #[error("malformed asset: {0}")]
    MalformedAsset(String),

    /// I/O error while importing or exporting payloads.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
