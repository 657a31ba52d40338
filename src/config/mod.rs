//! Configuration module for casfile
//!
//! Provides writer settings (temp suffix, durability, file modes) and the
//! buffer sizes used when hashing whole files.

mod settings;

pub use settings::*;
