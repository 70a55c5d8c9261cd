use crate::error::{StoreError, StoreResult};

/// Check that `alias` can serve as a file-name prefix.
///
/// Rejects empty names, `.` and `..`, path separators and control characters.
pub fn validate_alias(alias: &str) -> StoreResult<()> {
    let bad = alias.is_empty()
        || alias == "."
        || alias == ".."
        || alias.chars().any(|c| c == '/' || c == '\\' || c.is_control());
    if bad {
        Err(StoreError::InvalidAlias(alias.to_string()))
    } else {
        Ok(())
    }
}
