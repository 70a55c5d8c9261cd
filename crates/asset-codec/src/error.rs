use asset_tree::TreeError;

/// Errors from projecting trees to and from text.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Tree access failed (wrong variant, unknown handle, missing root).
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// The text is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Nesting exceeded the configured limit.
    #[error("nesting deeper than {limit} levels")]
    DepthExceeded { limit: usize },

    /// NaN and infinities have no JSON form.
    #[error("non-finite real {0}")]
    NonFiniteReal(f32),

    /// A number does not fit the 32-bit tag it would decode to.
    #[error("number {0} out of 32-bit range")]
    NumberOutOfRange(String),

    #[error("document is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
