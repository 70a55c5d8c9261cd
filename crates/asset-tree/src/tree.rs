use asset_types::{PropertyId, PropertyKind};

use crate::error::{TreeError, TreeResult};
use crate::property::Property;
use crate::raw::Raw;

/// Recursion limit for structural comparison.
const MAX_COMPARE_DEPTH: usize = 1024;

/// Arena owning every node of one property tree.
///
/// Nodes are created through the tree and addressed by the [`PropertyId`]
/// it returns. Handles stay valid for the tree's lifetime; detaching a child
/// from its parent does not reclaim the node. Dropping the tree releases all
/// nodes, including their raw buffers.
#[derive(Clone, Debug, Default)]
pub struct PropertyTree {
    nodes: Vec<Property>,
    root: Option<PropertyId>,
}

impl PropertyTree {
    /// Create an empty tree without a root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes in the arena, reachable or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no node has been created.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` was issued by this tree.
    pub fn contains(&self, id: PropertyId) -> bool {
        id.as_usize() < self.nodes.len()
    }

    fn check(&self, id: PropertyId) -> TreeResult<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(TreeError::UnknownHandle(id))
        }
    }

    // ---- Construction ----

    /// Add a node with the given tag, default-initialized.
    pub fn create(&mut self, kind: PropertyKind) -> PropertyId {
        self.push(Property::new(kind))
    }

    /// Add a fully formed node.
    ///
    /// Fails if an object or array node refers to a child this tree did not issue.
    pub fn insert(&mut self, property: Property) -> TreeResult<PropertyId> {
        match &property {
            Property::Object(items) => {
                for child in items.values() {
                    self.check(*child)?;
                }
            }
            Property::Array(items) => {
                for child in items.iter().flatten() {
                    self.check(*child)?;
                }
            }
            _ => {}
        }
        Ok(self.push(property))
    }

    pub(crate) fn push(&mut self, property: Property) -> PropertyId {
        let id = PropertyId::new(self.nodes.len() as u32);
        self.nodes.push(property);
        id
    }

    pub fn create_bool(&mut self, value: bool) -> PropertyId {
        self.push(Property::Bool(value))
    }

    pub fn create_sint(&mut self, value: i32) -> PropertyId {
        self.push(Property::Sint(value))
    }

    pub fn create_uint(&mut self, value: u32) -> PropertyId {
        self.push(Property::Uint(value))
    }

    pub fn create_real(&mut self, value: f32) -> PropertyId {
        self.push(Property::Real(value))
    }

    pub fn create_string(&mut self, value: impl Into<String>) -> PropertyId {
        self.push(Property::String(value.into()))
    }

    pub fn create_object(&mut self) -> PropertyId {
        self.create(PropertyKind::Object)
    }

    /// Add an array node with `size` empty slots.
    pub fn create_array(&mut self, size: usize) -> PropertyId {
        self.push(Property::Array(vec![None; size]))
    }

    pub fn create_raw(&mut self, raw: Raw) -> PropertyId {
        self.push(Property::Raw(raw))
    }

    /// Add a raw node holding a copy of `data`.
    pub fn create_raw_from(&mut self, data: &[u8]) -> PropertyId {
        self.create_raw(Raw::from_bytes(data))
    }

    // ---- Access ----

    pub fn get(&self, id: PropertyId) -> TreeResult<&Property> {
        self.nodes
            .get(id.as_usize())
            .ok_or(TreeError::UnknownHandle(id))
    }

    /// Node `id` for in-crate mutation. Callers outside the crate go
    /// through the typed setters so a node keeps its creation-time kind.
    pub(crate) fn get_mut(&mut self, id: PropertyId) -> TreeResult<&mut Property> {
        self.nodes
            .get_mut(id.as_usize())
            .ok_or(TreeError::UnknownHandle(id))
    }

    /// Tag of node `id`.
    pub fn kind(&self, id: PropertyId) -> TreeResult<PropertyKind> {
        Ok(self.get(id)?.kind())
    }

    pub fn root(&self) -> Option<PropertyId> {
        self.root
    }

    /// The root, or [`TreeError::NoRoot`].
    pub fn require_root(&self) -> TreeResult<PropertyId> {
        self.root.ok_or(TreeError::NoRoot)
    }

    pub fn set_root(&mut self, id: PropertyId) -> TreeResult<()> {
        self.check(id)?;
        self.root = Some(id);
        Ok(())
    }

    /// All nodes with their handles, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (PropertyId, &Property)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, p)| (PropertyId::new(i as u32), p))
    }

    // ---- Typed setters ----

    pub fn set_bool(&mut self, id: PropertyId, value: bool) -> TreeResult<()> {
        self.get_mut(id)?.set_bool(value)
    }

    pub fn set_sint(&mut self, id: PropertyId, value: i32) -> TreeResult<()> {
        self.get_mut(id)?.set_sint(value)
    }

    pub fn set_uint(&mut self, id: PropertyId, value: u32) -> TreeResult<()> {
        self.get_mut(id)?.set_uint(value)
    }

    pub fn set_real(&mut self, id: PropertyId, value: f32) -> TreeResult<()> {
        self.get_mut(id)?.set_real(value)
    }

    pub fn set_string(&mut self, id: PropertyId, value: impl Into<String>) -> TreeResult<()> {
        self.get_mut(id)?.set_string(value)
    }

    /// Resize array `id`, keeping existing slots up to the new size.
    pub fn set_array_size(&mut self, id: PropertyId, size: usize) -> TreeResult<()> {
        self.get_mut(id)?.set_array_size(size)
    }

    pub fn remove_object_item(
        &mut self,
        id: PropertyId,
        name: &str,
    ) -> TreeResult<Option<PropertyId>> {
        self.get_mut(id)?.remove_object_item(name)
    }

    /// Buffer of raw node `id`. Fails on any other kind.
    pub fn raw_mut(&mut self, id: PropertyId) -> TreeResult<&mut Raw> {
        self.get_mut(id)?.raw_mut()
    }

    // ---- Linking ----

    /// Store `child` under `name` in object `parent`.
    pub fn set_object_item(
        &mut self,
        parent: PropertyId,
        name: impl Into<String>,
        child: PropertyId,
    ) -> TreeResult<()> {
        self.check(child)?;
        self.get_mut(parent)?.set_object_item(name, child)
    }

    pub fn object_item(&self, parent: PropertyId, name: &str) -> TreeResult<PropertyId> {
        self.get(parent)?.object_item(name)
    }

    /// Assign slot `index` of array `parent`. The array must already be sized.
    pub fn set_array_item(
        &mut self,
        parent: PropertyId,
        index: usize,
        child: PropertyId,
    ) -> TreeResult<()> {
        self.check(child)?;
        self.get_mut(parent)?.set_array_item(index, child)
    }

    pub fn array_item(&self, parent: PropertyId, index: usize) -> TreeResult<PropertyId> {
        self.get(parent)?.array_item(index)
    }

    /// Follow a `/`-separated path of object keys and array indices from `from`.
    ///
    /// An empty path resolves to `from` itself.
    pub fn lookup(&self, from: PropertyId, path: &str) -> TreeResult<PropertyId> {
        let mut current = from;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let node = self.get(current)?;
            current = match node {
                Property::Array(_) => {
                    let index = segment
                        .parse::<usize>()
                        .map_err(|_| TreeError::MissingItem(segment.to_string()))?;
                    node.array_item(index)?
                }
                _ => node.object_item(segment)?,
            };
        }
        Ok(current)
    }

    // ---- Comparison ----

    /// Structural equality of the subtree at `a` with the subtree at `b` in `other`.
    ///
    /// Handles are not compared, only shape and values. Raw nodes compare by
    /// content. Subtrees deeper than an internal limit compare unequal.
    pub fn deep_eq(&self, a: PropertyId, other: &PropertyTree, b: PropertyId) -> bool {
        self.deep_eq_at(a, other, b, 0)
    }

    fn deep_eq_at(&self, a: PropertyId, other: &PropertyTree, b: PropertyId, depth: usize) -> bool {
        if depth > MAX_COMPARE_DEPTH {
            return false;
        }
        let (Ok(left), Ok(right)) = (self.get(a), other.get(b)) else {
            return false;
        };
        match (left, right) {
            (Property::Object(l), Property::Object(r)) => {
                l.len() == r.len()
                    && l.iter().zip(r.iter()).all(|((lk, lv), (rk, rv))| {
                        lk == rk && self.deep_eq_at(*lv, other, *rv, depth + 1)
                    })
            }
            (Property::Array(l), Property::Array(r)) => {
                l.len() == r.len()
                    && l.iter().zip(r.iter()).all(|(lv, rv)| match (lv, rv) {
                        (Some(lv), Some(rv)) => self.deep_eq_at(*lv, other, *rv, depth + 1),
                        (None, None) => true,
                        _ => false,
                    })
            }
            (Property::Raw(l), Property::Raw(r)) => l.as_slice() == r.as_slice(),
            (l, r) => l == r,
        }
    }
}
