use std::collections::{BTreeMap, BTreeSet};

use asset_codec::{decode, encode, Binaries, Decoded, DecodeOptions, EncodeOptions};
use asset_digest::ContentHasher;
use asset_tree::PropertyTree;
use asset_types::BinaryToken;
use tracing::{debug, info, warn};

use crate::alias::validate_alias;
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::local::LocalBackend;
use crate::traits::StorageBackend;

/// Outcome of [`AssetStore::save`].
#[derive(Clone, Debug, Default)]
pub struct SaveReport {
    /// Side-table produced while encoding.
    pub binaries: Binaries,
    /// Side files written by this call, one per distinct token.
    pub written: Vec<BinaryToken>,
    /// Side files already present with identical content.
    pub skipped: Vec<BinaryToken>,
    pub document_bytes: usize,
}

/// A side file whose content does not hash to its name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DigestFailure {
    pub token: BinaryToken,
    pub computed: BinaryToken,
}

/// Outcome of [`AssetStore::verify`].
#[derive(Clone, Debug, Default)]
pub struct VerifyReport {
    /// Distinct tokens checked.
    pub checked: usize,
    pub missing: Vec<BinaryToken>,
    pub mismatched: Vec<DigestFailure>,
}

impl VerifyReport {
    /// Every side file is present and matches its token.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.mismatched.is_empty()
    }
}

/// Saves and loads property trees through a [`StorageBackend`].
pub struct AssetStore<B: StorageBackend> {
    backend: B,
    encode: EncodeOptions,
    decode: DecodeOptions,
    verify_on_load: bool,
    pretty: bool,
}

impl AssetStore<LocalBackend> {
    /// Open a filesystem store described by `config`.
    pub fn open(config: &StoreConfig) -> Self {
        Self::with_config(LocalBackend::from_config(config), config)
    }
}

impl<B: StorageBackend> AssetStore<B> {
    /// Wrap a backend with default settings.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, &StoreConfig::default())
    }

    /// Wrap a backend, taking digest, depth and formatting from `config`.
    pub fn with_config(backend: B, config: &StoreConfig) -> Self {
        Self {
            backend,
            encode: config.encode_options(),
            decode: config.decode_options(),
            verify_on_load: config.verify_on_load,
            pretty: config.pretty,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn hasher(&self) -> ContentHasher {
        self.encode.hasher
    }

    pub fn set_verify_on_load(&mut self, verify: bool) {
        self.verify_on_load = verify;
    }

    /// Persist `tree` under `alias`.
    ///
    /// Side files are written first, once per distinct token. A side file
    /// that already holds exactly the payload's bytes is left alone; any
    /// other content is overwritten. The document is written last.
    pub fn save(&self, alias: &str, tree: &PropertyTree) -> StoreResult<SaveReport> {
        validate_alias(alias)?;
        let encoded = encode(tree, &self.encode)?;

        let mut written = Vec::new();
        let mut skipped = Vec::new();
        let mut seen = BTreeSet::new();
        for (id, token) in &encoded.binaries {
            if !seen.insert(*token) {
                continue;
            }
            let bytes = tree.get(*id)?.raw()?.as_slice();
            if self.side_file_matches(alias, token, bytes)? {
                debug!(alias, %token, "side file present, skipping");
                skipped.push(*token);
                continue;
            }
            self.backend.write_binary(alias, token, bytes)?;
            written.push(*token);
        }

        let text = if self.pretty {
            asset_codec::to_vec_pretty(&encoded.document)?
        } else {
            asset_codec::to_vec(&encoded.document)?
        };
        self.backend.write_document(alias, &text)?;

        info!(
            alias,
            binaries = seen.len(),
            written = written.len(),
            skipped = skipped.len(),
            "saved tree"
        );
        Ok(SaveReport {
            binaries: encoded.binaries,
            written,
            skipped,
            document_bytes: text.len(),
        })
    }

    fn side_file_matches(
        &self,
        alias: &str,
        token: &BinaryToken,
        bytes: &[u8],
    ) -> StoreResult<bool> {
        if self.backend.binary_len(alias, token)? != Some(bytes.len() as u64) {
            return Ok(false);
        }
        Ok(self.backend.read_binary(alias, token)?.as_deref() == Some(bytes))
    }

    fn read_decoded(&self, alias: &str) -> StoreResult<Decoded> {
        validate_alias(alias)?;
        let bytes = self
            .backend
            .read_document(alias)?
            .ok_or_else(|| StoreError::DocumentNotFound(alias.to_string()))?;
        let document = asset_codec::from_slice(&bytes)?;
        Ok(decode(&document, &self.decode)?)
    }

    /// Load the tree stored under `alias`, with every raw payload attached.
    pub fn load(&self, alias: &str) -> StoreResult<PropertyTree> {
        Ok(self.load_decoded(alias)?.tree)
    }

    /// Like [`load`](Self::load), also returning the side-table that maps
    /// each raw node to its token.
    ///
    /// Fails without returning a tree if any side file is missing, or, with
    /// verification enabled, does not hash to its token.
    pub fn load_decoded(&self, alias: &str) -> StoreResult<Decoded> {
        let Decoded {
            mut tree,
            binaries,
        } = self.read_decoded(alias)?;

        let mut cache: BTreeMap<BinaryToken, Vec<u8>> = BTreeMap::new();
        for (id, token) in &binaries {
            if !cache.contains_key(token) {
                let data = self.backend.read_binary(alias, token)?.ok_or_else(|| {
                    StoreError::BinaryNotFound {
                        alias: alias.to_string(),
                        token: *token,
                    }
                })?;
                if self.verify_on_load {
                    let computed = self.hasher().token(&data);
                    if computed != *token {
                        return Err(StoreError::DigestMismatch {
                            token: *token,
                            computed,
                        });
                    }
                }
                cache.insert(*token, data);
            }
            let data = &cache[token];
            let raw = tree.raw_mut(*id)?;
            raw.allocate(data.len())?;
            raw.set_bytes(data, 0)?;
        }

        debug!(alias, nodes = tree.len(), binaries = cache.len(), "loaded tree");
        Ok(Decoded { tree, binaries })
    }

    /// Re-hash every side file named by the document under `alias`.
    ///
    /// Missing and mismatched files are reported, not raised.
    pub fn verify(&self, alias: &str) -> StoreResult<VerifyReport> {
        let decoded = self.read_decoded(alias)?;
        let tokens: BTreeSet<BinaryToken> = decoded.binaries.values().copied().collect();

        let mut report = VerifyReport {
            checked: tokens.len(),
            ..VerifyReport::default()
        };
        for token in tokens {
            match self.backend.read_binary(alias, &token)? {
                None => {
                    warn!(alias, %token, "side file missing");
                    report.missing.push(token);
                }
                Some(data) => {
                    let computed = self.hasher().token(&data);
                    if computed != token {
                        warn!(alias, %token, %computed, "side file digest mismatch");
                        report.mismatched.push(DigestFailure { token, computed });
                    }
                }
            }
        }
        Ok(report)
    }

    pub fn exists(&self, alias: &str) -> StoreResult<bool> {
        validate_alias(alias)?;
        self.backend.document_exists(alias)
    }

    /// Aliases of all stored trees.
    pub fn list(&self) -> StoreResult<Vec<String>> {
        self.backend.list_documents()
    }
}
