//! Atomic writer for content-addressable files
//!
//! Bytes go to a temp sibling of the final path while they are hashed.
//! The final path is held by an empty placeholder created in exclusive
//! mode, so no other writer can claim the same identifier. Only when the
//! digest matches the identifier is the placeholder removed and the temp
//! file renamed over it.

use super::handle::{FileOpener, FsOpener, WriteSyncer};
use super::operations::{create_parent_dirs, remove_if_exists, temp_path_for};
use crate::config::WriterConfig;
use crate::error::{CasError, IoResultExt, Result};
use crate::hash::{Oid, StreamingHasher};
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Writes a content-addressable file and commits it only once verified.
///
/// ```no_run
/// use casfile::fs::AtomicWriter;
/// use std::io::Write;
///
/// let path = "objects/a2b71d6ee8997eb87b25ab42d566c44f6a32871752c7c73eb5578cb1182f7be0";
/// let mut writer = AtomicWriter::new(path)?;
/// writer.write_all(b"SUP")?;
/// writer.accept()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// Dropping a writer that was never accepted abandons it.
pub struct AtomicWriter {
    oid: Oid,
    path: PathBuf,
    temp_path: PathBuf,
    file: Option<Box<dyn WriteSyncer>>,
    temp_file: Option<Box<dyn WriteSyncer>>,
    hasher: StreamingHasher,
    sync_on_commit: bool,
}

impl AtomicWriter {
    /// Start writing `path` using the default temp suffix
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_config(path, &WriterConfig::default())
    }

    /// Start writing `path`, naming the temp file `path` + `suffix`
    pub fn with_suffix(path: impl AsRef<Path>, suffix: &str) -> Result<Self> {
        Self::with_config(path, &WriterConfig::with_suffix(suffix))
    }

    /// Start writing `path` with explicit options
    pub fn with_config(path: impl AsRef<Path>, config: &WriterConfig) -> Result<Self> {
        Self::with_opener(path, config, &FsOpener)
    }

    /// Start writing `path`, creating both handles through `opener`.
    ///
    /// The identifier is taken from the base name of `path`. Missing parent
    /// directories are created. Both the temp path and `path` are created
    /// exclusively; if either exists the call fails with
    /// [`CasError::AlreadyExists`] and leaves nothing behind.
    pub fn with_opener(
        path: impl AsRef<Path>,
        config: &WriterConfig,
        opener: &dyn FileOpener,
    ) -> Result<Self> {
        config.validate()?;
        let path = path.as_ref();
        let oid = Oid::from_path(path)?;

        create_parent_dirs(path, config.dir_mode)?;

        let temp_path = temp_path_for(path, &config.temp_suffix);
        let temp_file = opener
            .create_exclusive(&temp_path, config)
            .with_path(&temp_path)?;

        let file = match opener.create_exclusive(path, config) {
            Ok(file) => file,
            Err(e) => {
                if let Err(cleanup) = cleanup_file(temp_file, &temp_path) {
                    warn!("Failed to remove {:?} after aborted create: {}", temp_path, cleanup);
                }
                return Err(CasError::io(path, e));
            }
        };

        debug!("Opened {:?} for writing (temp {:?})", path, temp_path);

        Ok(Self {
            oid,
            path: path.to_path_buf(),
            temp_path,
            file: Some(file),
            temp_file: Some(temp_file),
            hasher: StreamingHasher::new(),
            sync_on_commit: config.sync_on_commit,
        })
    }

    /// Identifier the content must hash to
    pub fn oid(&self) -> &Oid {
        &self.oid
    }

    /// Final path of the file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path bytes are buffered at until commit
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Bytes fed to the digest so far
    pub fn bytes_written(&self) -> u64 {
        self.hasher.bytes_processed()
    }

    /// Whether the writer was committed or abandoned
    pub fn is_closed(&self) -> bool {
        self.temp_file.is_none() || self.file.is_none()
    }

    /// Verify the written content and move it to the final path.
    ///
    /// On [`CasError::ContentMismatch`] nothing is touched; call
    /// [`close`](Self::close) to remove both files. After success the
    /// writer is closed and `close` does nothing.
    pub fn accept(&mut self) -> Result<()> {
        if self.is_closed() {
            return Err(CasError::AlreadyClosed);
        }

        let actual = self.hasher.current();
        if actual != self.oid {
            warn!("Content mismatch for {:?}: got {}", self.path, actual);
            return Err(CasError::content_mismatch(self.oid.as_str(), actual.as_str()));
        }

        if let Some(file) = self.file.take() {
            if let Err(e) = cleanup_file(file, &self.path) {
                self.close_after_failure();
                return Err(e);
            }
        }

        if self.sync_on_commit {
            if let Some(temp_file) = self.temp_file.as_mut() {
                temp_file.sync().with_path(&self.temp_path)?;
            }
        }

        if let Some(temp_file) = self.temp_file.take() {
            if let Err(e) = temp_file.close() {
                if let Err(cleanup) = remove_if_exists(&self.temp_path) {
                    warn!("Failed to remove {:?}: {}", self.temp_path, cleanup);
                }
                return Err(CasError::io(&self.temp_path, e));
            }
        }

        // Both handles are gone now, so a later close() is a no-op.
        if let Err(e) = std::fs::rename(&self.temp_path, &self.path) {
            if let Err(cleanup) = remove_if_exists(&self.temp_path) {
                warn!("Failed to remove {:?}: {}", self.temp_path, cleanup);
            }
            return Err(CasError::io(&self.path, e));
        }

        debug!("Committed {} ({} bytes)", self.oid, self.bytes_written());
        Ok(())
    }

    /// Abandon the write, removing the temp file and the placeholder.
    ///
    /// Safe to call any number of times, including after a successful
    /// [`accept`](Self::accept). Both removals are attempted even if the
    /// first fails; the first error is returned.
    pub fn close(&mut self) -> Result<()> {
        let mut first_err = None;
        let mut released = false;

        if let Some(temp_file) = self.temp_file.take() {
            released = true;
            if let Err(e) = cleanup_file(temp_file, &self.temp_path) {
                first_err.get_or_insert(e);
            }
        }

        if let Some(file) = self.file.take() {
            released = true;
            if let Err(e) = cleanup_file(file, &self.path) {
                first_err.get_or_insert(e);
            }
        }

        if released {
            debug!("Abandoned {:?}", self.path);
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn close_after_failure(&mut self) {
        if let Err(e) = self.close() {
            warn!("Cleanup of {:?} failed: {}", self.path, e);
        }
    }
}

impl Write for AtomicWriter {
    /// Append to the temp file, then hash the same bytes.
    ///
    /// The whole buffer is written or an error is returned. The digest is
    /// updated either way, so a writer that failed a write must be closed
    /// rather than reused.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let (Some(temp_file), Some(_)) = (self.temp_file.as_mut(), self.file.as_ref()) else {
            return Err(CasError::AlreadyClosed.into());
        };

        let result = temp_file.write_all(buf);
        self.hasher.process(buf);
        result.map(|()| buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.temp_file.as_mut() {
            Some(temp_file) => temp_file.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for AtomicWriter {
    fn drop(&mut self) {
        if self.temp_file.is_some() || self.file.is_some() {
            self.close_after_failure();
        }
    }
}

impl fmt::Debug for AtomicWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomicWriter")
            .field("oid", &self.oid)
            .field("path", &self.path)
            .field("temp_path", &self.temp_path)
            .field("bytes_written", &self.bytes_written())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Close `handle` and remove the file at `expected`.
///
/// Refuses to touch anything if the handle reports a different path than
/// the one tracked for it. A removal error takes precedence over a close
/// error; the file is removed even if closing failed.
fn cleanup_file(handle: Box<dyn WriteSyncer>, expected: &Path) -> Result<()> {
    if handle.name() != expected {
        return Err(CasError::InvalidFilename {
            expected: expected.to_path_buf(),
            actual: handle.name().to_path_buf(),
        });
    }

    let closed = handle.close();
    remove_if_exists(expected)?;
    closed.with_path(expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::FileHandle;
    use proptest::prelude::*;
    use tempfile::TempDir;

    const SUP_OID: &str = "a2b71d6ee8997eb87b25ab42d566c44f6a32871752c7c73eb5578cb1182f7be0";
    const OTHER_OID: &str = "b2b71d6ee8997eb87b25ab42d566c44f6a32871752c7c73eb5578cb1182f7be0";

    fn assert_gone(path: &Path) {
        assert!(
            std::fs::symlink_metadata(path).is_err(),
            "{:?} still exists",
            path
        );
    }

    #[derive(Default)]
    struct FaultyOpener {
        fail_close: Option<PathBuf>,
        fail_sync: Option<PathBuf>,
        fail_write: Option<PathBuf>,
        misname: Option<PathBuf>,
        // (handle path, directory created at the final path when that handle closes)
        block_rename: Option<(PathBuf, PathBuf)>,
    }

    struct FaultyHandle {
        inner: FileHandle,
        reported_name: PathBuf,
        fail_close: bool,
        fail_sync: bool,
        fail_write: bool,
        block_on_close: Option<PathBuf>,
    }

    impl FileOpener for FaultyOpener {
        fn create_exclusive(
            &self,
            path: &Path,
            config: &WriterConfig,
        ) -> io::Result<Box<dyn WriteSyncer>> {
            let inner = FileHandle::create_exclusive(path, config.file_mode)?;
            let is = |target: &Option<PathBuf>| target.as_deref() == Some(path);
            Ok(Box::new(FaultyHandle {
                inner,
                reported_name: if is(&self.misname) {
                    path.with_file_name("somebody-else")
                } else {
                    path.to_path_buf()
                },
                fail_close: is(&self.fail_close),
                fail_sync: is(&self.fail_sync),
                fail_write: is(&self.fail_write),
                block_on_close: self
                    .block_rename
                    .as_ref()
                    .filter(|(handle, _)| handle == path)
                    .map(|(_, blocker)| blocker.clone()),
            }))
        }
    }

    impl Write for FaultyHandle {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.fail_write {
                return Err(io::Error::other("test write error"));
            }
            self.inner.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            self.inner.flush()
        }
    }

    impl WriteSyncer for FaultyHandle {
        fn name(&self) -> &Path {
            &self.reported_name
        }

        fn sync(&mut self) -> io::Result<()> {
            if self.fail_sync {
                return Err(io::Error::other("test sync error"));
            }
            self.inner.sync()
        }

        fn close(self: Box<Self>) -> io::Result<()> {
            let fail = self.fail_close;
            if let Some(blocker) = &self.block_on_close {
                std::fs::create_dir_all(blocker.join("occupied"))?;
            }
            Box::new(self.inner).close()?;
            if fail {
                return Err(io::Error::other("test close error"));
            }
            Ok(())
        }
    }

    #[test]
    fn test_accept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SUP_OID);

        let mut writer = AtomicWriter::new(&path).unwrap();
        assert_eq!(writer.path(), path.as_path());
        assert_eq!(writer.oid(), &SUP_OID);

        writer.write_all(b"SUP").unwrap();
        assert_eq!(writer.bytes_written(), 3);

        // Bytes land in the temp file, the placeholder stays empty.
        assert_eq!(std::fs::read(writer.temp_path()).unwrap(), b"SUP");
        assert_eq!(std::fs::read(&path).unwrap(), b"");

        writer.accept().unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"SUP");
        assert_gone(writer.temp_path());
        assert!(writer.is_closed());

        writer.close().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"SUP");
    }

    #[test]
    fn test_accept_empty_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(Oid::of(b"").as_str());

        let mut writer = AtomicWriter::new(&path).unwrap();
        writer.accept().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"");
    }

    #[test]
    fn test_mismatch() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(OTHER_OID);

        let mut writer = AtomicWriter::new(&path).unwrap();
        writer.write_all(b"SUP").unwrap();

        match writer.accept() {
            Err(CasError::ContentMismatch { expected, actual }) => {
                assert_eq!(expected, OTHER_OID);
                assert_eq!(actual, SUP_OID);
            }
            other => panic!("expected mismatch, got {:?}", other),
        }

        // Nothing was committed and the writer can still be abandoned.
        assert_eq!(std::fs::read(&path).unwrap(), b"");
        assert!(!writer.is_closed());

        writer.close().unwrap();
        assert_gone(&path);
        assert_gone(writer.temp_path());
    }

    #[test]
    fn test_cancel() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SUP_OID);

        let mut writer = AtomicWriter::new(&path).unwrap();
        writer.write_all(b"SUP").unwrap();
        writer.close().unwrap();

        assert_gone(&path);
        assert_gone(writer.temp_path());

        // Repeat closes are no-ops.
        writer.close().unwrap();
    }

    #[test]
    fn test_closed_rejects_use() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SUP_OID);

        let mut writer = AtomicWriter::new(&path).unwrap();
        writer.close().unwrap();

        let err = writer.write(b"SUP").unwrap_err();
        assert!(matches!(CasError::from_io_ref(&err), Some(CasError::AlreadyClosed)));
        assert!(matches!(writer.accept(), Err(CasError::AlreadyClosed)));
    }

    #[test]
    fn test_accept_twice() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SUP_OID);

        let mut writer = AtomicWriter::new(&path).unwrap();
        writer.write_all(b"SUP").unwrap();
        writer.accept().unwrap();

        assert!(matches!(writer.accept(), Err(CasError::AlreadyClosed)));
        assert!(writer.write(b"more").is_err());
        assert_eq!(std::fs::read(&path).unwrap(), b"SUP");
    }

    #[test]
    fn test_locks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SUP_OID);

        let mut writer = AtomicWriter::with_suffix(&path, "-wat").unwrap();
        assert_eq!(writer.temp_path(), dir.path().join(format!("{}-wat", SUP_OID)));

        let paths = [path.clone(), writer.temp_path().to_path_buf()];
        for name in &paths {
            assert!(FileHandle::create_exclusive(name, 0o644).is_err(), "able to open {:?}", name);
        }

        writer.close().unwrap();

        for name in &paths {
            FileHandle::create_exclusive(name, 0o644).unwrap();
        }
    }

    #[test]
    fn test_duel() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SUP_OID);

        let _writer = AtomicWriter::new(&path).unwrap();
        let err = AtomicWriter::new(&path).unwrap_err();
        assert!(matches!(err, CasError::AlreadyExists { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_concurrent_writers_one_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SUP_OID);

        let results: Vec<Result<AtomicWriter>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8).map(|_| s.spawn(|| AtomicWriter::new(&path))).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1);
        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            assert!(matches!(err, CasError::AlreadyExists { .. }), "{:?}", err);
        }
    }

    #[test]
    fn test_leftover_temp_is_left_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SUP_OID);
        let temp = temp_path_for(&path, "-temp");
        std::fs::write(&temp, b"someone else").unwrap();

        let err = AtomicWriter::new(&path).unwrap_err();
        assert!(matches!(err, CasError::AlreadyExists { ref path } if path == &temp));

        assert_eq!(std::fs::read(&temp).unwrap(), b"someone else");
        assert_gone(&path);
    }

    #[test]
    fn test_existing_final_cleans_temp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SUP_OID);
        std::fs::write(&path, b"SUP").unwrap();

        let err = AtomicWriter::new(&path).unwrap_err();
        assert!(matches!(err, CasError::AlreadyExists { path: ref p } if p == &path));

        assert_gone(&temp_path_for(&path, "-temp"));
        assert_eq!(std::fs::read(&path).unwrap(), b"SUP");
    }

    #[test]
    fn test_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a2").join("b7").join(SUP_OID);

        let mut writer = AtomicWriter::new(&path).unwrap();
        writer.write_all(b"SUP").unwrap();
        writer.accept().unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"SUP");
    }

    #[test]
    fn test_invalid_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("not-an-oid");

        let err = AtomicWriter::new(&path).unwrap_err();
        assert!(matches!(err, CasError::InvalidOid(_)));
        assert_gone(&path);
    }

    #[test]
    fn test_drop_abandons() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SUP_OID);

        let temp_path = {
            let mut writer = AtomicWriter::new(&path).unwrap();
            writer.write_all(b"SUP").unwrap();
            writer.temp_path().to_path_buf()
        };

        assert_gone(&path);
        assert_gone(&temp_path);
    }

    #[test]
    fn test_bad_accept_file_close() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SUP_OID);
        let opener = FaultyOpener {
            fail_close: Some(path.clone()),
            ..Default::default()
        };

        let mut writer = AtomicWriter::with_opener(&path, &WriterConfig::default(), &opener).unwrap();
        writer.write_all(b"SUP").unwrap();
        assert_eq!(std::fs::read(writer.temp_path()).unwrap(), b"SUP");

        match writer.accept() {
            Err(CasError::Io { source, .. }) => assert_eq!(source.to_string(), "test close error"),
            other => panic!("expected close error, got {:?}", other),
        }

        assert_gone(&path);
        assert_gone(writer.temp_path());
        assert!(writer.is_closed());
    }

    #[test]
    fn test_bad_accept_temp_close() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SUP_OID);
        let temp = temp_path_for(&path, "-temp");
        let opener = FaultyOpener {
            fail_close: Some(temp.clone()),
            ..Default::default()
        };

        let mut writer = AtomicWriter::with_opener(&path, &WriterConfig::default(), &opener).unwrap();
        writer.write_all(b"SUP").unwrap();

        match writer.accept() {
            Err(CasError::Io { path: failed, source }) => {
                assert_eq!(failed, temp);
                assert_eq!(source.to_string(), "test close error");
            }
            other => panic!("expected close error, got {:?}", other),
        }

        assert_gone(&path);
        assert_gone(&temp);
        assert!(writer.is_closed());
        writer.close().unwrap();
    }

    #[test]
    fn test_bad_accept_rename() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SUP_OID);
        let temp = temp_path_for(&path, "-temp");
        // A directory appears at the final path between cleanup and rename.
        let opener = FaultyOpener {
            block_rename: Some((temp.clone(), path.clone())),
            ..Default::default()
        };

        let mut writer = AtomicWriter::with_opener(&path, &WriterConfig::default(), &opener).unwrap();
        writer.write_all(b"SUP").unwrap();

        match writer.accept() {
            Err(CasError::Io { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected rename error, got {:?}", other),
        }

        assert_gone(&temp);
        assert!(path.is_dir());
        assert!(writer.is_closed());
        writer.close().unwrap();
        assert!(path.join("occupied").is_dir());
    }

    #[test]
    fn test_bad_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SUP_OID);
        let temp = temp_path_for(&path, "-temp");
        let opener = FaultyOpener {
            fail_write: Some(temp.clone()),
            ..Default::default()
        };

        let mut writer = AtomicWriter::with_opener(&path, &WriterConfig::default(), &opener).unwrap();
        let err = writer.write_all(b"SUP").unwrap_err();
        assert_eq!(err.to_string(), "test write error");

        // The attempted bytes still count toward the digest.
        assert_eq!(writer.bytes_written(), 3);
        assert!(!writer.is_closed());

        writer.close().unwrap();
        assert_gone(&path);
        assert_gone(&temp);
    }

    #[test]
    fn test_bad_accept_sync() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SUP_OID);
        let temp = temp_path_for(&path, "-temp");
        let opener = FaultyOpener {
            fail_sync: Some(temp.clone()),
            ..Default::default()
        };

        let mut writer = AtomicWriter::with_opener(&path, &WriterConfig::default(), &opener).unwrap();
        writer.write_all(b"SUP").unwrap();

        match writer.accept() {
            Err(CasError::Io { source, .. }) => assert_eq!(source.to_string(), "test sync error"),
            other => panic!("expected sync error, got {:?}", other),
        }
        assert!(writer.is_closed());

        writer.close().unwrap();
        assert_gone(&path);
        assert_gone(&temp);
    }

    #[test]
    fn test_sync_can_be_disabled() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SUP_OID);
        let temp = temp_path_for(&path, "-temp");
        let opener = FaultyOpener {
            fail_sync: Some(temp),
            ..Default::default()
        };
        let config = WriterConfig {
            sync_on_commit: false,
            ..Default::default()
        };

        let mut writer = AtomicWriter::with_opener(&path, &config, &opener).unwrap();
        writer.write_all(b"SUP").unwrap();
        writer.accept().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"SUP");
    }

    #[test]
    fn test_misnamed_handle() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SUP_OID);
        let opener = FaultyOpener {
            misname: Some(path.clone()),
            ..Default::default()
        };

        let mut writer = AtomicWriter::with_opener(&path, &WriterConfig::default(), &opener).unwrap();
        writer.write_all(b"SUP").unwrap();

        match writer.accept() {
            Err(CasError::InvalidFilename { expected, actual }) => {
                assert_eq!(expected, path);
                assert_eq!(actual, dir.path().join("somebody-else"));
            }
            other => panic!("expected invalid filename, got {:?}", other),
        }

        // The content never reached the final path.
        assert_eq!(std::fs::read(&path).unwrap(), b"");
        assert_gone(writer.temp_path());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_commit_stores_exact_bytes(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join(Oid::of(&data).as_str());

            let mut writer = AtomicWriter::new(&path).unwrap();
            for chunk in data.chunks(100) {
                writer.write_all(chunk).unwrap();
            }
            writer.accept().unwrap();

            prop_assert_eq!(std::fs::read(&path).unwrap(), data);
            prop_assert!(std::fs::symlink_metadata(writer.temp_path()).is_err());
        }

        #[test]
        fn prop_wrong_oid_leaves_no_trace(data in proptest::collection::vec(any::<u8>(), 1..1024)) {
            let dir = TempDir::new().unwrap();
            let mut wrong = data.clone();
            wrong[0] ^= 0xff;
            let path = dir.path().join(Oid::of(&wrong).as_str());

            let mut writer = AtomicWriter::new(&path).unwrap();
            writer.write_all(&data).unwrap();
            prop_assert!(writer.accept().unwrap_err().is_mismatch());
            writer.close().unwrap();

            prop_assert!(std::fs::symlink_metadata(&path).is_err());
            prop_assert!(std::fs::symlink_metadata(writer.temp_path()).is_err());
        }
    }
}
