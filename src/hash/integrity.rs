//! Integrity hashing
//!
//! SHA-256 is the only algorithm: it defines the identifier namespace.
//! All hashers support streaming so bytes are hashed in a single pass.

use super::Oid;
use crate::config::{HashAlgorithm, DEFAULT_BUFFER_SIZE};
use crate::error::{CasError, IoResultExt, Result};
use serde::{Deserialize, Serialize};
use sha2::Digest;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Hash result with the identifier it produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashResult {
    /// The hash algorithm used
    pub algorithm: HashAlgorithm,
    /// Identifier of the hashed content
    pub oid: Oid,
    /// Content size in bytes
    pub size: u64,
}

impl HashResult {
    /// Create a new hash result
    pub fn new(algorithm: HashAlgorithm, oid: Oid, size: u64) -> Self {
        Self { algorithm, oid, size }
    }

    /// Check whether this result names `expected`
    pub fn matches(&self, expected: &Oid) -> bool {
        &self.oid == expected
    }
}

impl std::fmt::Display for HashResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.oid)
    }
}

/// Incremental hasher for content identifiers
#[derive(Clone)]
pub enum Hasher {
    /// SHA-256
    Sha256(sha2::Sha256),
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new(HashAlgorithm::default())
    }
}

impl Hasher {
    /// Create a new hasher for the given algorithm
    pub fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Sha256 => Self::Sha256(sha2::Sha256::new()),
        }
    }

    /// Get the algorithm this hasher uses
    pub fn algorithm(&self) -> HashAlgorithm {
        match self {
            Self::Sha256(_) => HashAlgorithm::Sha256,
        }
    }

    /// Update the hasher with more data
    pub fn update(&mut self, data: &[u8]) {
        match self {
            Self::Sha256(h) => h.update(data),
        }
    }

    /// Identifier of everything hashed so far, without consuming the hasher
    pub fn current(&self) -> Oid {
        self.clone().finalize()
    }

    /// Finalize into an identifier
    pub fn finalize(self) -> Oid {
        match self {
            Self::Sha256(h) => Oid::from_sha256(h.finalize()),
        }
    }
}

/// Streaming hasher that also counts the bytes it has seen
#[derive(Clone, Default)]
pub struct StreamingHasher {
    hasher: Hasher,
    bytes_processed: u64,
}

impl StreamingHasher {
    /// Create a new streaming hasher
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a chunk of data
    pub fn process(&mut self, data: &[u8]) {
        self.hasher.update(data);
        self.bytes_processed += data.len() as u64;
    }

    /// Get bytes processed so far
    pub fn bytes_processed(&self) -> u64 {
        self.bytes_processed
    }

    /// Identifier of everything processed so far
    pub fn current(&self) -> Oid {
        self.hasher.current()
    }

    /// Finalize and get the result
    pub fn finalize(self) -> HashResult {
        let algorithm = self.hasher.algorithm();
        HashResult::new(algorithm, self.hasher.finalize(), self.bytes_processed)
    }
}

/// Compute hash of a file
pub fn hash_file(path: &Path) -> Result<HashResult> {
    hash_file_with_buffer(path, DEFAULT_BUFFER_SIZE)
}

/// Compute hash of a file with custom buffer size
pub fn hash_file_with_buffer(path: &Path, buffer_size: usize) -> Result<HashResult> {
    let mut file = File::open(path).with_path(path)?;
    let mut hasher = StreamingHasher::new();
    let mut buffer = vec![0u8; buffer_size.max(1)];

    loop {
        let bytes_read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CasError::io(path, e)),
        };
        hasher.process(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize())
}

/// Compute hash of data in memory
pub fn hash_bytes(data: &[u8]) -> HashResult {
    let mut hasher = StreamingHasher::new();
    hasher.process(data);
    hasher.finalize()
}

/// Check that a file's content hashes to the identifier in its name
pub fn verify_file(path: &Path) -> Result<bool> {
    let expected = Oid::from_path(path)?;
    Ok(hash_file(path)?.matches(&expected))
}
