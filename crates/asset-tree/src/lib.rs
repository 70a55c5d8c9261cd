//! Property trees for engine assets.
//!
//! A [`PropertyTree`] is an arena of [`Property`] nodes. Each node is a closed
//! tagged union over scalars, objects, arrays and owned [`Raw`] byte buffers;
//! every accessor checks the active tag and fails with
//! [`TreeError::WrongVariant`] instead of coercing.
//!
//! Nodes are addressed by [`PropertyId`] handles issued by the tree. Object
//! and array nodes refer to their children by handle, so several parents may
//! share one node. Trees are expected to be acyclic.
//!
//! The [`vector`] and [`asset`] modules hold the conventions engine code uses
//! on top of the raw tree: fixed-size vectors and matrices as arrays of
//! scalars, and buffer/texture objects wrapping a raw payload.

pub mod asset;
pub mod error;
pub mod property;
pub mod raw;
pub mod tree;
pub mod vector;

pub use asset::{
    create_buffer_property, create_texture_property, export_buffer, import_buffer, BufferView,
    TextureDesc, TextureView,
};
pub use error::{TreeError, TreeResult};
pub use property::Property;
pub use raw::Raw;
pub use tree::PropertyTree;

pub use asset_types::{PropertyId, PropertyKind};
