//! Foundation types for asset property trees.
//!
//! This crate provides the small, dependency-light types shared by every
//! other asset crate.
//!
//! # Key Types
//!
//! - [`PropertyId`] -- Stable handle of a node inside one property tree
//! - [`PropertyKind`] -- The tag of a node's active representation
//! - [`BinaryToken`] -- Punctuated content-digest token naming an externalized raw payload

pub mod error;
pub mod id;
pub mod kind;
pub mod token;

pub use error::TypeError;
pub use id::PropertyId;
pub use kind::PropertyKind;
pub use token::{BinaryToken, DIGEST_LEN, TOKEN_LEN, TOKEN_SEPARATOR};
