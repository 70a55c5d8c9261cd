use std::path::{Path, PathBuf};

use asset_codec::{DecodeOptions, EncodeOptions, DEFAULT_MAX_DEPTH};
use asset_digest::{ContentHasher, DigestKind};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Store settings, usually read from a TOML file.
///
/// ```toml
/// root = "assets"
/// binaries_dir = "cache"
/// digest = "md5"
/// verify_on_load = true
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the JSON documents.
    pub root: PathBuf,
    /// Directory holding side files, relative to `root`. Defaults to `root`.
    pub binaries_dir: Option<PathBuf>,
    pub digest: DigestKind,
    pub max_depth: usize,
    /// Re-hash side files while loading and fail on mismatch.
    pub verify_on_load: bool,
    /// Indent documents with four spaces.
    pub pretty: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            binaries_dir: None,
            digest: DigestKind::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            verify_on_load: false,
            pretty: true,
        }
    }
}

impl StoreConfig {
    /// Default settings rooted at `root`.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(text: &str) -> StoreResult<Self> {
        toml::from_str(text).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Read settings from a TOML file.
    ///
    /// A relative `root` is resolved against the file's directory.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Config(format!("{}: {e}", path.display())))?;
        let mut config = Self::from_toml_str(&text)?;
        if config.root.is_relative() {
            if let Some(dir) = path.parent() {
                config.root = dir.join(&config.root);
            }
        }
        Ok(config)
    }

    pub fn to_toml_string(&self) -> StoreResult<String> {
        toml::to_string_pretty(self).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Resolved side-file directory.
    pub fn binaries_path(&self) -> PathBuf {
        match &self.binaries_dir {
            Some(dir) => self.root.join(dir),
            None => self.root.clone(),
        }
    }

    pub fn hasher(&self) -> ContentHasher {
        ContentHasher::new(self.digest)
    }

    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            hasher: self.hasher(),
            max_depth: self.max_depth,
        }
    }

    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            max_depth: self.max_depth,
        }
    }
}
