//! Object identifiers
//!
//! An [`Oid`] is the lowercase hex encoding of a SHA-256 digest. It doubles
//! as the file name of a content-addressable file and as the integrity
//! target when that file is written or read.

use crate::config::HashAlgorithm;
use crate::error::{CasError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Lowercase hex identifier of a content-addressable file
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Oid(String);

impl Oid {
    /// Parse an identifier.
    ///
    /// Identifiers are case-sensitive: anything other than exactly 64
    /// characters of `[0-9a-f]` is rejected, never normalized.
    pub fn parse(s: &str) -> Result<Self> {
        let valid = s.len() == HashAlgorithm::Sha256.hex_len()
            && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if !valid {
            return Err(CasError::InvalidOid(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    /// Derive the identifier from the base name of `path`
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| CasError::InvalidOid(path.display().to_string()))?;
        Self::parse(name)
    }

    /// Hex-encode a raw SHA-256 digest.
    ///
    /// Fails with [`CasError::InvalidOid`] unless `digest` is exactly 32 bytes.
    pub fn from_digest(digest: &[u8]) -> Result<Self> {
        if digest.len() != HashAlgorithm::Sha256.output_size() {
            return Err(CasError::InvalidOid(hex::encode(digest)));
        }
        Ok(Self(hex::encode(digest)))
    }

    pub(crate) fn from_sha256(digest: sha2::digest::Output<sha2::Sha256>) -> Self {
        Self(hex::encode(digest))
    }

    /// Identifier of an in-memory buffer
    pub fn of(data: &[u8]) -> Self {
        use sha2::Digest;
        Self::from_sha256(sha2::Sha256::digest(data))
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode back into the raw digest bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        // Validated on construction, decoding cannot fail.
        hex::decode(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Oid {
    type Err = CasError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for Oid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Oid {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Oid {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl<'de> Deserialize<'de> for Oid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Oid::parse(&s).map_err(serde::de::Error::custom)
    }
}
