//! Directory-backed object store
//!
//! Layout:
//! ```text
//! <root>/
//!   <pathname segment 1>/
//!     .../
//!       <pathname segment n>/
//!         <filename>
//! ```
//!
//! The `PathKey` of every object is recomputed from its key on each call;
//! the filesystem is the only index.

use crate::path::{IdentityTransform, PathKey, PathTransform};
use crate::store::blob::Blob;
use crate::{Error, Result, DEFAULT_ROOT};
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, info, instrument};

/// Construction options for a [`Store`]
#[derive(Clone, Default)]
pub struct StoreOptions {
    /// Base directory; `DEFAULT_ROOT` when unset or empty
    pub root: Option<PathBuf>,
    /// Key transform; `IdentityTransform` when unset
    pub transform: Option<Arc<dyn PathTransform>>,
    /// Stream writes into a temp file and rename it into place
    pub atomic_writes: bool,
}

impl StoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_transform(mut self, transform: impl PathTransform + 'static) -> Self {
        self.transform = Some(Arc::new(transform));
        self
    }

    pub fn with_atomic_writes(mut self, enabled: bool) -> Self {
        self.atomic_writes = enabled;
        self
    }
}

impl fmt::Debug for StoreOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreOptions")
            .field("root", &self.root)
            .field("transform", &self.transform.as_ref().map(|_| ".."))
            .field("atomic_writes", &self.atomic_writes)
            .finish()
    }
}

/// A content-addressable blob store rooted at a directory
///
/// Holds no state besides its options and no file handles between calls.
/// Concurrent calls are not coordinated: two writers to the same key race
/// and the last one to finish wins.
#[derive(Clone)]
pub struct Store {
    root: PathBuf,
    transform: Arc<dyn PathTransform>,
    atomic_writes: bool,
}

/// A key resolved to its on-disk location
struct Location {
    key: PathKey,
    /// Directory the object file lives in
    dir: PathBuf,
    /// The object file itself
    file: PathBuf,
}

impl Store {
    /// Create a store, filling unset options with their defaults.
    /// Nothing is touched on disk until the first write.
    pub fn new(options: StoreOptions) -> Self {
        let root = options
            .root
            .filter(|r| !r.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT));
        let transform = options
            .transform
            .unwrap_or_else(|| Arc::new(IdentityTransform));

        Store {
            root,
            transform,
            atomic_writes: options.atomic_writes,
        }
    }

    /// Get the root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn atomic_writes(&self) -> bool {
        self.atomic_writes
    }

    /// The `PathKey` the configured transform produces for `key`
    pub fn path_key(&self, key: &str) -> PathKey {
        self.transform.transform(key)
    }

    /// Full path of the object stored under `key`
    pub fn location(&self, key: &str) -> Result<PathBuf> {
        Ok(self.resolve(key)?.file)
    }

    /// Check whether an object is stored under `key`
    ///
    /// A missing file, or a path whose parent is not a directory, is
    /// `Ok(false)`; any other filesystem failure is returned.
    pub fn has(&self, key: &str) -> Result<bool> {
        let location = self.resolve(key)?;
        match fs::metadata(&location.file) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if is_missing(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Store the whole stream under `key`, replacing any previous object.
    /// Returns the number of bytes copied.
    ///
    /// Missing directories are created. If the copy fails midway the error
    /// is returned; without atomic writes the truncated file stays on disk.
    #[instrument(skip(self, reader), level = "debug")]
    pub fn write<R: Read>(&self, key: &str, mut reader: R) -> Result<u64> {
        let location = self.resolve(key)?;
        fs::create_dir_all(&location.dir)?;

        let written = if self.atomic_writes {
            let mut tmp = temp_file_in(&location.dir)?;
            let n = io::copy(&mut reader, &mut tmp)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&location.file).map_err(|e| e.error)?;
            n
        } else {
            let mut file = File::create(&location.file)?;
            io::copy(&mut reader, &mut file)?
        };

        debug!(
            path = %location.file.display(),
            bytes = written,
            "wrote object"
        );
        Ok(written)
    }

    /// Store an in-memory buffer under `key`
    pub fn write_bytes(&self, key: &str, data: &[u8]) -> Result<u64> {
        self.write(key, data)
    }

    /// Open the object stored under `key`
    pub fn read(&self, key: &str) -> Result<Blob> {
        let location = self.resolve(key)?;
        let not_found = || Error::NotFound(key.to_string());

        let file = File::open(&location.file).map_err(|e| {
            if is_missing(&e) {
                not_found()
            } else {
                Error::Io(e)
            }
        })?;

        let meta = file.metadata()?;
        if !meta.is_file() {
            return Err(not_found());
        }

        debug!(
            key,
            path = %location.file.display(),
            bytes = meta.len(),
            "opened object"
        );
        Ok(Blob::new(file, meta.len()))
    }

    /// Remove the whole first-segment directory of `key`
    ///
    /// Every object sharing that segment goes with it. A key whose pathname
    /// has no segments removes only its own file. Nothing on disk is a no-op.
    pub fn delete(&self, key: &str) -> Result<()> {
        let location = self.resolve(key)?;
        let first = location.key.first_segment();

        let result = if first.is_empty() {
            fs::remove_file(&location.file)
        } else {
            fs::remove_dir_all(self.root.join(first))
        };
        match result {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        info!(key, "deleted [{}] from disk", location.key.filename);
        Ok(())
    }

    /// Remove the root directory and everything under it
    pub fn clear(&self) -> Result<()> {
        match fs::remove_dir_all(&self.root) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        info!(root = %self.root.display(), "cleared store");
        Ok(())
    }

    fn resolve(&self, key: &str) -> Result<Location> {
        let path_key = self.transform.transform(key);

        let last = path_key.filename.rsplit('/').next().unwrap_or("");
        if last.is_empty() {
            return Err(Error::InvalidKey(format!(
                "{:?} maps to an empty filename",
                key
            )));
        }
        check_inside_root(key, &path_key.pathname)?;
        check_inside_root(key, &path_key.filename)?;

        let file = self.root.join(path_key.full_path());
        let dir = file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());

        Ok(Location {
            key: path_key,
            dir,
            file,
        })
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("root", &self.root)
            .field("atomic_writes", &self.atomic_writes)
            .finish_non_exhaustive()
    }
}

/// Refuse any part that would leave the root: parent references, `.`,
/// absolute paths and drive prefixes.
fn check_inside_root(key: &str, part: &str) -> Result<()> {
    for component in Path::new(part).components() {
        if !matches!(component, Component::Normal(_)) {
            return Err(Error::InvalidKey(format!(
                "{:?} resolves outside the store root",
                key
            )));
        }
    }
    Ok(())
}

/// Temp file next to the object, created with the same mode a plain
/// `File::create` would get (0o666 less the umask)
fn temp_file_in(dir: &Path) -> io::Result<NamedTempFile> {
    #[allow(unused_mut)]
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

/// Not-found conditions for lookups. Removal only ignores `NotFound`.
fn is_missing(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}
