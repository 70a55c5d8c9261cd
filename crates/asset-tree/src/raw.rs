use std::fmt;

use crate::error::{TreeError, TreeResult};

/// Owned, explicitly allocated byte buffer.
///
/// A `Raw` starts unallocated. [`allocate`](Raw::allocate) sizes it exactly
/// once; it never grows. Writes and reads are bounds-checked against the
/// allocated capacity and fail rather than clamp.
///
/// An unallocated buffer reports capacity 0. Deserialized trees hold such
/// placeholders until the store attaches their content.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Raw {
    bytes: Option<Box<[u8]>>,
}

impl Raw {
    /// Create an unallocated buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an allocated buffer holding a copy of `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self {
            bytes: Some(data.into()),
        }
    }

    /// Allocate `size` zeroed bytes.
    ///
    /// Fails with [`TreeError::AlreadyAllocated`] if the buffer already holds
    /// an allocation, including a zero-sized one.
    pub fn allocate(&mut self, size: usize) -> TreeResult<()> {
        if self.bytes.is_some() {
            return Err(TreeError::AlreadyAllocated);
        }
        self.bytes = Some(vec![0u8; size].into_boxed_slice());
        Ok(())
    }

    /// Release the allocation. Fails if nothing was allocated.
    pub fn free(&mut self) -> TreeResult<()> {
        match self.bytes.take() {
            Some(_) => Ok(()),
            None => Err(TreeError::NotAllocated),
        }
    }

    /// Returns `true` once `allocate` has succeeded and `free` has not been called.
    pub fn is_allocated(&self) -> bool {
        self.bytes.is_some()
    }

    /// Allocated size in bytes (0 when unallocated).
    pub fn capacity(&self) -> usize {
        self.bytes.as_deref().map_or(0, <[u8]>::len)
    }

    /// Copy `data` into the buffer starting at `offset`.
    ///
    /// Fails if `offset + data.len()` exceeds the capacity.
    pub fn set_bytes(&mut self, data: &[u8], offset: usize) -> TreeResult<()> {
        let capacity = self.capacity();
        let end = offset
            .checked_add(data.len())
            .filter(|end| *end <= capacity)
            .ok_or(TreeError::RawBounds {
                offset,
                len: data.len(),
                capacity,
            })?;
        if let Some(bytes) = self.bytes.as_deref_mut() {
            bytes[offset..end].copy_from_slice(data);
        }
        Ok(())
    }

    /// Read-only view of `[offset, capacity)`.
    ///
    /// Fails if `offset` exceeds the capacity. `offset == capacity` yields an
    /// empty view.
    pub fn bytes(&self, offset: usize) -> TreeResult<&[u8]> {
        let all = self.as_slice();
        if offset > all.len() {
            return Err(TreeError::RawBounds {
                offset,
                len: 0,
                capacity: all.len(),
            });
        }
        Ok(&all[offset..])
    }

    /// The whole buffer (empty when unallocated).
    pub fn as_slice(&self) -> &[u8] {
        self.bytes.as_deref().unwrap_or(&[])
    }
}

impl fmt::Debug for Raw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raw")
            .field("allocated", &self.is_allocated())
            .field("capacity", &self.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // -----------------------------------------------------------------------
    // Allocation lifecycle
    // -----------------------------------------------------------------------

    #[test]
    fn new_is_unallocated() {
        let raw = Raw::new();
        assert!(!raw.is_allocated());
        assert_eq!(raw.capacity(), 0);
        assert!(raw.as_slice().is_empty());
    }

    #[test]
    fn allocate_zeroes_capacity() {
        let mut raw = Raw::new();
        raw.allocate(8).unwrap();
        assert!(raw.is_allocated());
        assert_eq!(raw.bytes(0).unwrap(), &[0u8; 8]);
    }

    #[test]
    fn double_allocate_is_rejected() {
        let mut raw = Raw::new();
        raw.allocate(4).unwrap();
        assert!(matches!(raw.allocate(4), Err(TreeError::AlreadyAllocated)));
    }

    #[test]
    fn zero_sized_allocation_still_counts() {
        let mut raw = Raw::new();
        raw.allocate(0).unwrap();
        assert!(raw.is_allocated());
        assert!(matches!(raw.allocate(1), Err(TreeError::AlreadyAllocated)));
    }

    #[test]
    fn free_before_allocate_is_rejected() {
        let mut raw = Raw::new();
        assert!(matches!(raw.free(), Err(TreeError::NotAllocated)));
    }

    #[test]
    fn free_then_reallocate() {
        let mut raw = Raw::from_bytes(&[1, 2, 3]);
        raw.free().unwrap();
        assert!(!raw.is_allocated());
        raw.allocate(2).unwrap();
        assert_eq!(raw.capacity(), 2);
    }

    // -----------------------------------------------------------------------
    // Bounds enforcement
    // -----------------------------------------------------------------------

    #[test]
    fn set_bytes_within_capacity() {
        let mut raw = Raw::new();
        raw.allocate(6).unwrap();
        raw.set_bytes(&[0xAA, 0xBB], 4).unwrap();
        assert_eq!(raw.as_slice(), &[0, 0, 0, 0, 0xAA, 0xBB]);
    }

    #[test]
    fn set_bytes_past_capacity_fails() {
        let mut raw = Raw::new();
        raw.allocate(4).unwrap();
        let err = raw.set_bytes(&[1, 2, 3], 2).unwrap_err();
        assert!(matches!(
            err,
            TreeError::RawBounds {
                offset: 2,
                len: 3,
                capacity: 4
            }
        ));
        // Nothing was written.
        assert_eq!(raw.as_slice(), &[0u8; 4]);
    }

    #[test]
    fn set_bytes_offset_overflow_fails() {
        let mut raw = Raw::from_bytes(&[0; 4]);
        assert!(raw.set_bytes(&[1], usize::MAX).is_err());
    }

    #[test]
    fn set_bytes_on_placeholder_only_accepts_empty() {
        let mut raw = Raw::new();
        raw.set_bytes(&[], 0).unwrap();
        assert!(raw.set_bytes(&[1], 0).is_err());
    }

    #[test]
    fn get_bytes_views_tail() {
        let raw = Raw::from_bytes(&[1, 2, 3, 4]);
        assert_eq!(raw.bytes(1).unwrap(), &[2, 3, 4]);
        assert!(raw.bytes(4).unwrap().is_empty());
    }

    #[test]
    fn get_bytes_past_capacity_fails() {
        let raw = Raw::from_bytes(&[1, 2, 3, 4]);
        assert!(matches!(
            raw.bytes(5),
            Err(TreeError::RawBounds { offset: 5, .. })
        ));
    }

    #[test]
    fn debug_hides_content() {
        let raw = Raw::from_bytes(&[0xFF; 3]);
        let debug = format!("{raw:?}");
        assert!(debug.contains("capacity: 3"));
        assert!(!debug.contains("255"));
    }

    proptest! {
        #[test]
        fn set_bytes_succeeds_exactly_within_capacity(
            capacity in 0usize..64,
            offset in 0usize..80,
            len in 0usize..80,
        ) {
            let mut raw = Raw::new();
            raw.allocate(capacity).unwrap();
            let data = vec![0x5A; len];
            let fits = offset + len <= capacity;
            prop_assert_eq!(raw.set_bytes(&data, offset).is_ok(), fits);
            if fits {
                prop_assert_eq!(&raw.bytes(offset).unwrap()[..len], &data[..]);
            }
            prop_assert_eq!(raw.bytes(offset).is_ok(), offset <= capacity);
        }
    }
}
