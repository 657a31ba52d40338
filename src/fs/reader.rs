//! Verifying reader for content-addressable files
//!
//! Bytes are forwarded to the caller and hashed on the way through. When
//! the verification window closes the digest is compared with the expected
//! identifier, and a mismatch is reported in place of end-of-stream. A
//! caller that reads until EOF and then trusts the data is therefore never
//! handed a clean EOF for corrupt content.

use crate::error::{CasError, IoResultExt, Result};
use crate::hash::{Oid, StreamingHasher};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Streaming,
    Verified,
    Mismatched(Oid),
}

/// Reader that checks its content against an expected [`Oid`].
///
/// Without a declared size the window closes at the source's end-of-stream.
/// With one, reads are capped so that no byte past the declared size is
/// ever requested, hashed or delivered, and the window closes once that
/// many bytes were read (or earlier, at end-of-stream).
///
/// When the window closes during a read that returned data, that data is
/// returned as usual and the verdict comes with the next read: `Ok(0)` on
/// a match, an [`io::ErrorKind::InvalidData`] error carrying
/// [`CasError::ContentMismatch`] otherwise. Bytes already delivered are
/// never retracted; the error means they must not be trusted.
pub struct VerifyingReader<R> {
    inner: R,
    expected: Oid,
    remaining: Option<u64>,
    hasher: StreamingHasher,
    state: State,
}

impl VerifyingReader<File> {
    /// Open `path`, expecting its content to hash to its base name
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let (file, oid) = open_named(path.as_ref())?;
        Ok(Self::new(file, oid))
    }

    /// Open `path`, expecting exactly `size` bytes that hash to its base name
    pub fn open_with_size(path: impl AsRef<Path>, size: u64) -> Result<Self> {
        let (file, oid) = open_named(path.as_ref())?;
        Ok(Self::with_size(file, oid, size))
    }
}

impl<R: Read> VerifyingReader<R> {
    /// Verify `inner` against `expected` at end-of-stream
    pub fn new(inner: R, expected: Oid) -> Self {
        Self::build(inner, expected, None)
    }

    /// Verify the first `size` bytes of `inner` against `expected`
    pub fn with_size(inner: R, expected: Oid, size: u64) -> Self {
        Self::build(inner, expected, Some(size))
    }

    fn build(inner: R, expected: Oid, remaining: Option<u64>) -> Self {
        Self {
            inner,
            expected,
            remaining,
            hasher: StreamingHasher::new(),
            state: State::Streaming,
        }
    }
}

impl<R> VerifyingReader<R> {
    /// Identifier the content must hash to
    pub fn expected_oid(&self) -> &Oid {
        &self.expected
    }

    /// Bytes delivered to the caller so far
    pub fn seen_bytes(&self) -> u64 {
        self.hasher.bytes_processed()
    }

    /// Bytes left before the declared size is reached, if one was declared
    pub fn remaining(&self) -> Option<u64> {
        self.remaining
    }

    /// Whether the window has closed with a matching digest
    pub fn is_verified(&self) -> bool {
        self.state == State::Verified
    }

    /// Get a reference to the underlying reader
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Unwrap the underlying reader
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn close_window(&mut self) {
        let actual = self.hasher.current();
        if actual == self.expected {
            debug!("Verified {} ({} bytes)", self.expected, self.seen_bytes());
            self.state = State::Verified;
        } else {
            warn!("Expected OID {}, got {}", self.expected, actual);
            self.state = State::Mismatched(actual);
        }
    }

    fn verdict(&self) -> Option<io::Result<usize>> {
        match &self.state {
            State::Streaming => None,
            State::Verified => Some(Ok(0)),
            State::Mismatched(actual) => Some(Err(CasError::content_mismatch(
                self.expected.as_str(),
                actual.as_str(),
            )
            .into())),
        }
    }
}

impl<R: Read> Read for VerifyingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(verdict) = self.verdict() {
            return verdict;
        }
        if buf.is_empty() {
            return Ok(0);
        }

        let limit = match self.remaining {
            Some(0) => {
                self.close_window();
                return self.verdict().unwrap_or(Ok(0));
            }
            Some(remaining) => buf.len().min(usize::try_from(remaining).unwrap_or(usize::MAX)),
            None => buf.len(),
        };

        let n = self.inner.read(&mut buf[..limit])?;
        if n == 0 {
            self.close_window();
            return self.verdict().unwrap_or(Ok(0));
        }

        self.hasher.process(&buf[..n]);
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = remaining.saturating_sub(n as u64);
            if *remaining == 0 {
                self.close_window();
            }
        }

        Ok(n)
    }
}

impl<R> fmt::Debug for VerifyingReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifyingReader")
            .field("expected", &self.expected)
            .field("remaining", &self.remaining)
            .field("seen_bytes", &self.seen_bytes())
            .field("state", &self.state)
            .finish()
    }
}

fn open_named(path: &Path) -> Result<(File, Oid)> {
    let file = File::open(path).with_path(path)?;
    let oid = Oid::from_path(path)?;
    Ok((file, oid))
}
