//! Persistence of property trees.
//!
//! A stored tree is one JSON document plus one side file per distinct raw
//! payload. Side files are named after the alias and the content token, so
//! identical payloads collapse onto one file:
//!
//! ```text
//! <root>/scene.json
//! <binaries_dir>/scene-3f-a1-...-9c
//! ```
//!
//! # Storage Backends
//!
//! All backends implement the [`StorageBackend`] trait:
//!
//! - [`LocalBackend`] -- directories on the local filesystem
//! - [`InMemoryBackend`] -- `HashMap`-based backend for tests and embedding
//!
//! # Ordering
//!
//! 1. Save writes every side file before the document, so a readable
//!    document never names a side file that was not written.
//! 2. Load fails as a whole on a missing document or side file; no partially
//!    hydrated tree is returned.
//! 3. Concurrent writers to one alias are not supported.

pub mod alias;
pub mod config;
pub mod error;
pub mod local;
pub mod memory;
pub mod store;
pub mod traits;

pub use alias::validate_alias;
pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use local::LocalBackend;
pub use memory::InMemoryBackend;
pub use store::{AssetStore, DigestFailure, SaveReport, VerifyReport};
pub use traits::StorageBackend;
