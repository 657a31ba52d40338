//! File operations built on the atomic writer and verifying reader
//!
//! Path helpers shared by both components, plus one-call conveniences for
//! storing a stream under its identifier and re-verifying a stored file.

use super::reader::VerifyingReader;
use super::writer::AtomicWriter;
use crate::config::{CasConfig, HashAlgorithm, WriterConfig};
use crate::error::{CasError, IoResultExt, Result};
use crate::hash::{HashResult, Oid};
use std::ffi::OsString;
use std::fs::DirBuilder;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Temp sibling of `path`: the same path with `suffix` appended
pub fn temp_path_for(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Create the parent directories of `path` if they are missing
pub fn create_parent_dirs(path: &Path, mode: u32) -> Result<()> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };

    let mut builder = DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    builder.create(parent).with_path(parent)
}

/// Remove a file, treating an already missing file as success
pub fn remove_if_exists(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CasError::io(path, e)),
    }
}

/// Stream `reader` into the content-addressable file at `path`.
///
/// The file only appears at `path` if the content hashes to the base name.
/// On any failure the writer is abandoned and nothing is left behind.
/// Returns the number of bytes stored.
pub fn store_from_reader<R: Read>(path: &Path, reader: &mut R) -> Result<u64> {
    store_from_reader_with_config(path, reader, &CasConfig::default())
}

/// [`store_from_reader`] with explicit options
pub fn store_from_reader_with_config<R: Read>(
    path: &Path,
    reader: &mut R,
    config: &CasConfig,
) -> Result<u64> {
    config.validate()?;
    let mut writer = AtomicWriter::with_config(path, &config.writer)?;

    let result = copy_into(&mut writer, reader, config.buffer_size).and_then(|()| writer.accept());
    if let Err(e) = result {
        if let Err(cleanup) = writer.close() {
            warn!("Failed to abandon {:?}: {}", path, cleanup);
        }
        return Err(e);
    }

    Ok(writer.bytes_written())
}

fn copy_into<R: Read>(writer: &mut AtomicWriter, reader: &mut R, buffer_size: usize) -> Result<()> {
    let mut buffer = vec![0u8; buffer_size];
    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CasError::from_read_error(PathBuf::new(), e)),
        };

        writer
            .write_all(&buffer[..bytes_read])
            .with_path(writer.temp_path())?;
    }
}

/// Store `data` under `root/<oid>` and return the final path
pub fn store_bytes(root: &Path, data: &[u8]) -> Result<PathBuf> {
    store_bytes_with_config(root, data, &WriterConfig::default())
}

/// [`store_bytes`] with explicit writer options
pub fn store_bytes_with_config(root: &Path, data: &[u8], config: &WriterConfig) -> Result<PathBuf> {
    let path = root.join(Oid::of(data).as_str());
    let mut writer = AtomicWriter::with_config(&path, config)?;
    writer.write_all(data).with_path(writer.temp_path())?;
    writer.accept()?;
    Ok(path)
}

/// Read a stored file to the end through a [`VerifyingReader`].
///
/// Fails with [`CasError::ContentMismatch`] if the content does not hash to
/// the file's name.
pub fn verify_path(path: &Path) -> Result<HashResult> {
    let mut reader = VerifyingReader::open(path)?;
    let mut sink = io::sink();
    io::copy(&mut reader, &mut sink).map_err(|e| CasError::from_read_error(path, e))?;
    Ok(HashResult::new(
        HashAlgorithm::Sha256,
        reader.expected_oid().clone(),
        reader.seen_bytes(),
    ))
}
