//! Writable file handles
//!
//! The atomic writer only needs a small capability set from the files it
//! owns: write, report its path, sync and close. Keeping that behind a
//! trait lets tests swap in handles that fail on demand.

use crate::config::WriterConfig;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A writable file that knows its own path
pub trait WriteSyncer: Write + Send {
    /// Path the handle was opened at
    fn name(&self) -> &Path;

    /// Flush data and metadata to disk
    fn sync(&mut self) -> io::Result<()>;

    /// Release the handle
    fn close(self: Box<Self>) -> io::Result<()>;
}

/// Creates the handles an [`AtomicWriter`](super::AtomicWriter) works with
pub trait FileOpener {
    /// Create `path`, failing if it already exists
    fn create_exclusive(&self, path: &Path, config: &WriterConfig) -> io::Result<Box<dyn WriteSyncer>>;
}

/// Opens real files on the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsOpener;

impl FileOpener for FsOpener {
    fn create_exclusive(&self, path: &Path, config: &WriterConfig) -> io::Result<Box<dyn WriteSyncer>> {
        FileHandle::create_exclusive(path, config.file_mode)
            .map(|handle| Box::new(handle) as Box<dyn WriteSyncer>)
    }
}

/// `std::fs::File` paired with the path it was created at
#[derive(Debug)]
pub struct FileHandle {
    file: File,
    path: PathBuf,
}

impl FileHandle {
    /// Create a new file in exclusive mode
    pub fn create_exclusive(path: &Path, mode: u32) -> io::Result<Self> {
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(mode);
        }
        #[cfg(not(unix))]
        let _ = mode;

        let file = options.open(path)?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }
}

impl Write for FileHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl WriteSyncer for FileHandle {
    fn name(&self) -> &Path {
        &self.path
    }

    fn sync(&mut self) -> io::Result<()> {
        self.file.sync_all()
    }

    fn close(self: Box<Self>) -> io::Result<()> {
        drop(self.file);
        Ok(())
    }
}
