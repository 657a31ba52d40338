//! File system operations module
//!
//! Provides the atomic writer and verifying reader for content-addressable
//! files, the file handle abstraction the writer is built on, and
//! convenience operations on top of both.

mod handle;
mod operations;
mod reader;
mod writer;

pub use handle::{FileHandle, FileOpener, FsOpener, WriteSyncer};
pub use operations::*;
pub use reader::VerifyingReader;
pub use writer::AtomicWriter;
