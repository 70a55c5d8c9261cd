use std::fmt;
use std::str::FromStr;

use asset_types::{BinaryToken, DIGEST_LEN};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

/// The 128-bit digest algorithm used to name raw payloads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestKind {
    /// MD5. Matches side files written by existing asset pipelines.
    #[default]
    Md5,
    /// BLAKE3 extendable output, truncated to 16 bytes.
    Blake3,
}

impl fmt::Display for DigestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Md5 => write!(f, "md5"),
            Self::Blake3 => write!(f, "blake3"),
        }
    }
}

impl FromStr for DigestKind {
    type Err = ParseDigestKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "blake3" => Ok(Self::Blake3),
            _ => Err(ParseDigestKindError(s.to_string())),
        }
    }
}

/// Error returned when a digest name is not recognized.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown digest kind: {0}")]
pub struct ParseDigestKindError(pub String);

/// Content hasher producing [`BinaryToken`]s.
///
/// The token depends on content only, never on which node holds the bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContentHasher {
    kind: DigestKind,
}

impl ContentHasher {
    /// MD5 hasher.
    pub const MD5: Self = Self {
        kind: DigestKind::Md5,
    };
    /// Truncated BLAKE3 hasher.
    pub const BLAKE3: Self = Self {
        kind: DigestKind::Blake3,
    };

    /// Create a hasher for the given digest kind.
    pub const fn new(kind: DigestKind) -> Self {
        Self { kind }
    }

    /// The digest algorithm in use.
    pub fn kind(&self) -> DigestKind {
        self.kind
    }

    /// Raw 128-bit digest of `data`.
    pub fn digest(&self, data: &[u8]) -> [u8; DIGEST_LEN] {
        let mut out = [0u8; DIGEST_LEN];
        match self.kind {
            DigestKind::Md5 => out.copy_from_slice(&Md5::digest(data)),
            DigestKind::Blake3 => {
                let mut hasher = blake3::Hasher::new();
                hasher.update(data);
                hasher.finalize_xof().fill(&mut out);
            }
        }
        out
    }

    /// Token naming `data`.
    pub fn token(&self, data: &[u8]) -> BinaryToken {
        BinaryToken::from_digest(self.digest(data))
    }

    /// Verify that `data` produces the expected token.
    pub fn verify(&self, data: &[u8], expected: &BinaryToken) -> bool {
        self.token(data) == *expected
    }
}
