use std::fmt;

use serde::{Deserialize, Serialize};

/// Handle of a node inside a property tree.
///
/// Ids are issued sequentially by the owning tree's arena and never reused,
/// so they can key side-tables in place of node identity. An id is only
/// meaningful for the tree that issued it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(u32);

impl PropertyId {
    /// Wrap a raw arena index.
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// The arena index.
    pub const fn index(&self) -> u32 {
        self.0
    }

    /// The arena index as a `usize` for slice access.
    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyId({})", self.0)
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for PropertyId {
    fn from(index: u32) -> Self {
        Self(index)
    }
}
