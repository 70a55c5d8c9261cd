//! Text projection of property trees.
//!
//! [`encode`] lowers a [`PropertyTree`](asset_tree::PropertyTree) into a
//! JSON document. Scalars, objects and arrays map directly; every `raw` node
//! is replaced by the [`BinaryToken`] of its content and recorded in the
//! returned [`Binaries`] side-table. [`decode`] is the mirror: strings shaped
//! like a token become unallocated raw placeholders, recorded in the same
//! kind of side-table for the caller to hydrate.
//!
//! # Known ambiguity
//!
//! Recognition is by shape only. An ordinary string that happens to look like
//! a token decodes as a raw placeholder.
//!
//! # Depth
//!
//! Both directions stop at a configurable depth and fail with
//! [`CodecError::DepthExceeded`]. Trees that reference an ancestor are the
//! usual cause. The configured depth is capped at [`MAX_SUPPORTED_DEPTH`],
//! the deepest node whose document still parses back.

pub mod decode;
pub mod encode;
pub mod error;
pub mod text;

use std::collections::BTreeMap;

use asset_types::{BinaryToken, PropertyId};

pub use decode::{decode, DecodeOptions, Decoded};
pub use encode::{encode, encode_from, EncodeOptions, Encoded};
pub use error::{CodecError, CodecResult};
pub use text::{from_slice, from_str, to_string_pretty, to_vec, to_vec_pretty};

/// Side-table mapping each externalized raw node to its content token.
///
/// Built fresh by every [`encode`] or [`decode`] call.
pub type Binaries = BTreeMap<PropertyId, BinaryToken>;

/// Deepest node depth either direction accepts, whatever the options say.
///
/// The root sits at depth 0. A node at this depth may itself be a container,
/// giving 127 nested JSON containers: one below `serde_json`'s parse limit.
pub const MAX_SUPPORTED_DEPTH: usize = 126;

/// Default recursion limit for both directions.
pub const DEFAULT_MAX_DEPTH: usize = MAX_SUPPORTED_DEPTH;

pub(crate) fn depth_limit(max_depth: usize) -> usize {
    max_depth.min(MAX_SUPPORTED_DEPTH)
}
