//! Hash computation and identifier handling
//!
//! Provides the SHA-256 hasher used for content addressing, with
//! streaming support so bytes are hashed as they move through a writer or
//! reader.

mod integrity;
mod oid;

pub use integrity::*;
pub use oid::Oid;
