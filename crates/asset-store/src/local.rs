use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use asset_types::BinaryToken;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::alias::validate_alias;
use crate::config::StoreConfig;
use crate::error::StoreResult;
use crate::traits::StorageBackend;

const DOCUMENT_EXT: &str = "json";

/// Filesystem backend.
///
/// Documents live at `<root>/<alias>.json`, side files at
/// `<binaries_dir>/<alias><token>`. Every write goes to a temporary file in
/// the target directory and is renamed into place, so readers see either the
/// old or the new content.
#[derive(Clone, Debug)]
pub struct LocalBackend {
    root: PathBuf,
    binaries_dir: PathBuf,
}

impl LocalBackend {
    /// Keep documents and side files side by side in `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            binaries_dir: root.clone(),
            root,
        }
    }

    pub fn with_binaries_dir(root: impl Into<PathBuf>, binaries_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            binaries_dir: binaries_dir.into(),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::with_binaries_dir(config.root.clone(), config.binaries_path())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn binaries_dir(&self) -> &Path {
        &self.binaries_dir
    }

    pub fn document_path(&self, alias: &str) -> StoreResult<PathBuf> {
        validate_alias(alias)?;
        Ok(self.root.join(format!("{alias}.{DOCUMENT_EXT}")))
    }

    pub fn binary_path(&self, alias: &str, token: &BinaryToken) -> StoreResult<PathBuf> {
        validate_alias(alias)?;
        Ok(self.binaries_dir.join(token.file_name(alias)))
    }
}

fn read_optional(path: &Path) -> StoreResult<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    debug!(path = %path.display(), len = bytes.len(), "wrote file");
    Ok(())
}

impl StorageBackend for LocalBackend {
    fn read_document(&self, alias: &str) -> StoreResult<Option<Vec<u8>>> {
        read_optional(&self.document_path(alias)?)
    }

    fn write_document(&self, alias: &str, bytes: &[u8]) -> StoreResult<()> {
        write_atomic(&self.document_path(alias)?, bytes)
    }

    fn document_exists(&self, alias: &str) -> StoreResult<bool> {
        Ok(self.document_path(alias)?.is_file())
    }

    fn read_binary(&self, alias: &str, token: &BinaryToken) -> StoreResult<Option<Vec<u8>>> {
        read_optional(&self.binary_path(alias, token)?)
    }

    fn write_binary(&self, alias: &str, token: &BinaryToken, bytes: &[u8]) -> StoreResult<()> {
        write_atomic(&self.binary_path(alias, token)?, bytes)
    }

    fn binary_len(&self, alias: &str, token: &BinaryToken) -> StoreResult<Option<u64>> {
        match fs::metadata(self.binary_path(alias, token)?) {
            Ok(meta) if meta.is_file() => Ok(Some(meta.len())),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list_documents(&self) -> StoreResult<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut aliases = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(DOCUMENT_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                aliases.push(stem.to_string());
            }
        }
        aliases.sort();
        Ok(aliases)
    }
}
