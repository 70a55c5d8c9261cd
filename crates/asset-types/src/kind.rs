use std::fmt;

use serde::{Deserialize, Serialize};

/// The active representation of a property node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    /// Absence of a value, distinct from empty string or zero.
    Undefined,
    Bool,
    /// 32-bit signed integer.
    Sint,
    /// 32-bit unsigned integer.
    Uint,
    /// 32-bit float.
    Real,
    String,
    /// Key-ordered mapping of names to child nodes.
    Object,
    /// Size-declared, index-addressed sequence of child nodes.
    Array,
    /// Opaque owned byte buffer.
    Raw,
}

impl PropertyKind {
    /// All kinds, in tag order.
    pub const ALL: [PropertyKind; 9] = [
        Self::Undefined,
        Self::Bool,
        Self::Sint,
        Self::Uint,
        Self::Real,
        Self::String,
        Self::Object,
        Self::Array,
        Self::Raw,
    ];

    /// Returns `true` for kinds that own child nodes.
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Object | Self::Array)
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Bool => write!(f, "bool"),
            Self::Sint => write!(f, "sint"),
            Self::Uint => write!(f, "uint"),
            Self::Real => write!(f, "real"),
            Self::String => write!(f, "string"),
            Self::Object => write!(f, "object"),
            Self::Array => write!(f, "array"),
            Self::Raw => write!(f, "raw"),
        }
    }
}
