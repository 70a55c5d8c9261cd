use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Digest width in bytes (128-bit).
pub const DIGEST_LEN: usize = 16;

/// Rendered token width: one separator plus two hex characters per digest byte.
pub const TOKEN_LEN: usize = DIGEST_LEN * 3;

/// Separator placed before every hex pair.
pub const TOKEN_SEPARATOR: char = '-';

static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-[a-f0-9][a-f0-9]){16}$").expect("token pattern compiles")
});

/// Name of an externalized raw payload, derived from its content digest.
///
/// Rendered as `-xx-xx...-xx` (16 lowercase hex pairs, each preceded by `-`),
/// 48 characters in total. The shape is what lets a reader recognize an
/// externalized reference inside an otherwise ordinary JSON string.
///
/// An ordinary string that happens to have exactly this shape cannot be told
/// apart from a real reference.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BinaryToken([u8; DIGEST_LEN]);

impl BinaryToken {
    /// Build a token from a 128-bit digest.
    pub const fn from_digest(digest: [u8; DIGEST_LEN]) -> Self {
        Self(digest)
    }

    /// The digest bytes.
    pub fn digest(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Plain 32-character hex form of the digest.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a plain 32-character hex digest.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != DIGEST_LEN {
            return Err(TypeError::InvalidLength {
                expected: DIGEST_LEN,
                actual: bytes.len(),
            });
        }
        let mut digest = [0u8; DIGEST_LEN];
        digest.copy_from_slice(&bytes);
        Ok(Self(digest))
    }

    /// Returns `true` if `s` has the exact token shape.
    pub fn matches(s: &str) -> bool {
        s.len() == TOKEN_LEN && TOKEN_PATTERN.is_match(s)
    }

    /// Parse the punctuated token form.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        if !Self::matches(s) {
            return Err(TypeError::InvalidToken(s.to_string()));
        }
        let hex: String = s.chars().filter(|c| *c != TOKEN_SEPARATOR).collect();
        Self::from_hex(&hex)
    }

    /// File name of the side file holding this payload for `alias`.
    pub fn file_name(&self, alias: &str) -> String {
        format!("{alias}{self}")
    }
}

impl fmt::Debug for BinaryToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BinaryToken({})", self.to_hex())
    }
}

impl fmt::Display for BinaryToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{TOKEN_SEPARATOR}{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for BinaryToken {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BinaryToken {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<BinaryToken> for String {
    fn from(token: BinaryToken) -> Self {
        token.to_string()
    }
}
