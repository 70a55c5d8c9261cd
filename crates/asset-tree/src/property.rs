use std::collections::BTreeMap;

use asset_types::{PropertyId, PropertyKind};

use crate::error::{TreeError, TreeResult};
use crate::raw::Raw;

/// A single node of a property tree.
///
/// Exactly one representation is active. The tag is fixed at construction:
/// setters only update the payload of a node that already has the matching
/// tag and fail with [`TreeError::WrongVariant`] otherwise.
#[derive(Clone, Debug, PartialEq)]
pub enum Property {
    Undefined,
    Bool(bool),
    Sint(i32),
    Uint(u32),
    Real(f32),
    String(String),
    /// Children keyed by name, iterated in key order.
    Object(BTreeMap<String, PropertyId>),
    /// Pre-sized slots; `None` marks a slot that was never assigned.
    Array(Vec<Option<PropertyId>>),
    Raw(Raw),
}

impl Property {
    /// Create a default-initialized node of the given kind.
    pub fn new(kind: PropertyKind) -> Self {
        match kind {
            PropertyKind::Undefined => Self::Undefined,
            PropertyKind::Bool => Self::Bool(false),
            PropertyKind::Sint => Self::Sint(0),
            PropertyKind::Uint => Self::Uint(0),
            PropertyKind::Real => Self::Real(0.0),
            PropertyKind::String => Self::String(String::new()),
            PropertyKind::Object => Self::Object(BTreeMap::new()),
            PropertyKind::Array => Self::Array(Vec::new()),
            PropertyKind::Raw => Self::Raw(Raw::new()),
        }
    }

    /// The active tag.
    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::Undefined => PropertyKind::Undefined,
            Self::Bool(_) => PropertyKind::Bool,
            Self::Sint(_) => PropertyKind::Sint,
            Self::Uint(_) => PropertyKind::Uint,
            Self::Real(_) => PropertyKind::Real,
            Self::String(_) => PropertyKind::String,
            Self::Object(_) => PropertyKind::Object,
            Self::Array(_) => PropertyKind::Array,
            Self::Raw(_) => PropertyKind::Raw,
        }
    }

    fn mismatch(&self, expected: PropertyKind) -> TreeError {
        TreeError::WrongVariant {
            expected,
            actual: self.kind(),
        }
    }

    // ---- Scalars ----

    pub fn as_bool(&self) -> TreeResult<bool> {
        match self {
            Self::Bool(v) => Ok(*v),
            _ => Err(self.mismatch(PropertyKind::Bool)),
        }
    }

    pub fn set_bool(&mut self, value: bool) -> TreeResult<()> {
        match self {
            Self::Bool(v) => {
                *v = value;
                Ok(())
            }
            _ => Err(self.mismatch(PropertyKind::Bool)),
        }
    }

    pub fn as_sint(&self) -> TreeResult<i32> {
        match self {
            Self::Sint(v) => Ok(*v),
            _ => Err(self.mismatch(PropertyKind::Sint)),
        }
    }

    pub fn set_sint(&mut self, value: i32) -> TreeResult<()> {
        match self {
            Self::Sint(v) => {
                *v = value;
                Ok(())
            }
            _ => Err(self.mismatch(PropertyKind::Sint)),
        }
    }

    pub fn as_uint(&self) -> TreeResult<u32> {
        match self {
            Self::Uint(v) => Ok(*v),
            _ => Err(self.mismatch(PropertyKind::Uint)),
        }
    }

    pub fn set_uint(&mut self, value: u32) -> TreeResult<()> {
        match self {
            Self::Uint(v) => {
                *v = value;
                Ok(())
            }
            _ => Err(self.mismatch(PropertyKind::Uint)),
        }
    }

    pub fn as_real(&self) -> TreeResult<f32> {
        match self {
            Self::Real(v) => Ok(*v),
            _ => Err(self.mismatch(PropertyKind::Real)),
        }
    }

    pub fn set_real(&mut self, value: f32) -> TreeResult<()> {
        match self {
            Self::Real(v) => {
                *v = value;
                Ok(())
            }
            _ => Err(self.mismatch(PropertyKind::Real)),
        }
    }

    pub fn as_str(&self) -> TreeResult<&str> {
        match self {
            Self::String(v) => Ok(v),
            _ => Err(self.mismatch(PropertyKind::String)),
        }
    }

    pub fn set_string(&mut self, value: impl Into<String>) -> TreeResult<()> {
        match self {
            Self::String(v) => {
                *v = value.into();
                Ok(())
            }
            _ => Err(self.mismatch(PropertyKind::String)),
        }
    }

    // ---- Object ----

    /// The key-ordered child map.
    pub fn as_object(&self) -> TreeResult<&BTreeMap<String, PropertyId>> {
        match self {
            Self::Object(items) => Ok(items),
            _ => Err(self.mismatch(PropertyKind::Object)),
        }
    }

    fn as_object_mut(&mut self) -> TreeResult<&mut BTreeMap<String, PropertyId>> {
        match self {
            Self::Object(items) => Ok(items),
            _ => Err(self.mismatch(PropertyKind::Object)),
        }
    }

    /// Child stored under `name`. Fails if absent.
    pub fn object_item(&self, name: &str) -> TreeResult<PropertyId> {
        self.as_object()?
            .get(name)
            .copied()
            .ok_or_else(|| TreeError::MissingItem(name.to_string()))
    }

    /// Insert or replace the child stored under `name`.
    pub fn set_object_item(
        &mut self,
        name: impl Into<String>,
        child: PropertyId,
    ) -> TreeResult<()> {
        self.as_object_mut()?.insert(name.into(), child);
        Ok(())
    }

    /// Keys in ascending order.
    pub fn object_keys(&self) -> TreeResult<impl Iterator<Item = &str>> {
        Ok(self.as_object()?.keys().map(String::as_str))
    }

    pub fn has_object_item(&self, name: &str) -> TreeResult<bool> {
        Ok(self.as_object()?.contains_key(name))
    }

    /// Detach the child stored under `name`, returning it if present.
    pub fn remove_object_item(&mut self, name: &str) -> TreeResult<Option<PropertyId>> {
        Ok(self.as_object_mut()?.remove(name))
    }

    // ---- Array ----

    /// The slots of an array node.
    pub fn as_array(&self) -> TreeResult<&[Option<PropertyId>]> {
        match self {
            Self::Array(items) => Ok(items),
            _ => Err(self.mismatch(PropertyKind::Array)),
        }
    }

    fn as_array_mut(&mut self) -> TreeResult<&mut Vec<Option<PropertyId>>> {
        match self {
            Self::Array(items) => Ok(items),
            _ => Err(self.mismatch(PropertyKind::Array)),
        }
    }

    pub fn array_size(&self) -> TreeResult<usize> {
        Ok(self.as_array()?.len())
    }

    /// Declare the number of slots. Growing adds empty slots; shrinking
    /// drops the trailing ones.
    pub fn set_array_size(&mut self, size: usize) -> TreeResult<()> {
        self.as_array_mut()?.resize(size, None);
        Ok(())
    }

    /// Child in slot `index`. Fails outside `[0, size)` or on an empty slot.
    pub fn array_item(&self, index: usize) -> TreeResult<PropertyId> {
        let items = self.as_array()?;
        match items.get(index) {
            Some(Some(id)) => Ok(*id),
            Some(None) => Err(TreeError::EmptySlot(index)),
            None => Err(TreeError::IndexOutOfBounds {
                index,
                size: items.len(),
            }),
        }
    }

    /// Assign slot `index`. Never grows the array.
    pub fn set_array_item(&mut self, index: usize, child: PropertyId) -> TreeResult<()> {
        let items = self.as_array_mut()?;
        let size = items.len();
        let slot = items
            .get_mut(index)
            .ok_or(TreeError::IndexOutOfBounds { index, size })?;
        *slot = Some(child);
        Ok(())
    }

    // ---- Raw ----

    pub fn raw(&self) -> TreeResult<&Raw> {
        match self {
            Self::Raw(raw) => Ok(raw),
            _ => Err(self.mismatch(PropertyKind::Raw)),
        }
    }

    pub fn raw_mut(&mut self) -> TreeResult<&mut Raw> {
        match self {
            Self::Raw(raw) => Ok(raw),
            _ => Err(self.mismatch(PropertyKind::Raw)),
        }
    }

    pub fn raw_allocate(&mut self, size: usize) -> TreeResult<()> {
        self.raw_mut()?.allocate(size)
    }

    pub fn raw_free(&mut self) -> TreeResult<()> {
        self.raw_mut()?.free()
    }

    pub fn set_raw_bytes(&mut self, data: &[u8], offset: usize) -> TreeResult<()> {
        self.raw_mut()?.set_bytes(data, offset)
    }

    pub fn raw_bytes(&self, offset: usize) -> TreeResult<&[u8]> {
        self.raw()?.bytes(offset)
    }
}
