//! # casfile - Content-Addressable Files
//!
//! casfile reads and writes files whose name is the SHA-256 digest of
//! their own contents. A file's name can always be trusted: it is never
//! visible at its final path until its content was verified, and reading it
//! back reports corruption or truncation through the normal read-error
//! channel.
//!
//! ## Features
//!
//! - **Atomic Writes**: Content is buffered to a temp sibling and renamed into
//!   place only after its digest matches the file name
//! - **Exclusive Claims**: Both the final path and its temp sibling are created
//!   exclusively, so two writers never race on the same identifier
//! - **Verified Reads**: The digest is recomputed while streaming; a mismatch
//!   replaces end-of-stream
//! - **Length-Bounded Reads**: Bytes beyond a declared size are never hashed or
//!   delivered
//!
//! ## Writing
//!
//! ```no_run
//! use casfile::fs::AtomicWriter;
//! use std::io::Write;
//!
//! let path = "objects/a2b71d6ee8997eb87b25ab42d566c44f6a32871752c7c73eb5578cb1182f7be0";
//! let mut writer = AtomicWriter::new(path)?;
//! writer.write_all(b"SUP")?;
//!
//! // Moves the file to its final location if the OID is verified.
//! // Otherwise dropping the writer removes every trace of it.
//! writer.accept()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Reading
//!
//! ```no_run
//! use casfile::fs::VerifyingReader;
//! use std::io::Read;
//!
//! let path = "objects/a2b71d6ee8997eb87b25ab42d566c44f6a32871752c7c73eb5578cb1182f7be0";
//! let mut reader = VerifyingReader::open_with_size(path, 3)?;
//!
//! let mut content = Vec::new();
//! reader.read_to_end(&mut content)?; // fails if the content is corrupt
//! assert_eq!(reader.seen_bytes(), 3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod fs;
pub mod hash;

// Re-export commonly used types
pub use config::{CasConfig, HashAlgorithm, WriterConfig};
pub use error::{CasError, Result};
pub use fs::{AtomicWriter, VerifyingReader};
pub use hash::Oid;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use casfile::prelude::*;
    //! ```

    pub use crate::config::{CasConfig, HashAlgorithm, WriterConfig};
    pub use crate::error::{CasError, Result};
    pub use crate::fs::{store_bytes, store_from_reader, verify_path, AtomicWriter, VerifyingReader};
    pub use crate::hash::{hash_bytes, hash_file, HashResult, Oid};
}
