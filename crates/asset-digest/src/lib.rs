//! Content digests for externalized asset payloads.
//!
//! Raw payloads are named by a 128-bit digest of their bytes, rendered as a
//! [`BinaryToken`](asset_types::BinaryToken). Identical bytes always produce
//! the same token, which is what gives the store its deduplication.
//!
//! All digest operations wrap established libraries -- no custom cryptography.

pub mod hasher;

pub use hasher::{ContentHasher, DigestKind, ParseDigestKindError};
