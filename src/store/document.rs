use fs2::FileExt;
use serde::{de::DeserializeOwned, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::StoreError;

/// A JSON document cached in memory and persisted as a whole file.
///
/// Writers are serialized by the write lock and work on a draft copy: the draft is
/// persisted with temp-file-then-rename and only published to readers once it is on
/// disk. A failed mutation or failed write leaves both the file and the cached
/// image untouched. Readers always observe a fully persisted image.
///
/// Other processes (the `stockroom` CLI) may open the same file. Every mutation
/// also holds an exclusive advisory lock on `<file>.lock` and starts from the
/// on-disk image when the file changed since it was cached; reads pick up such
/// changes as well.
pub struct JsonDocument<T> {
    path: PathBuf,
    lock_path: PathBuf,
    state: RwLock<Cached<T>>,
}

struct Cached<T> {
    value: T,
    stamp: Option<FileStamp>,
}

/// Identity of the file as last seen. Every write renames a new file into place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: Option<SystemTime>,
    len: u64,
    #[cfg(unix)]
    ino: u64,
}

fn file_stamp(path: &Path) -> io::Result<Option<FileStamp>> {
    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    Ok(Some(FileStamp {
        modified: meta.modified().ok(),
        len: meta.len(),
        #[cfg(unix)]
        ino: std::os::unix::fs::MetadataExt::ino(&meta),
    }))
}

/// Read `path`; a missing or blank file yields `T::default()`
fn load<T>(path: &Path) -> Result<Cached<T>, StoreError>
where
    T: DeserializeOwned + Default,
{
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let stamp = file_stamp(path).map_err(io_err)?;
    let value = match fs::read(path) {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => T::default(),
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?,
        Err(e) if e.kind() == ErrorKind::NotFound => T::default(),
        Err(source) => return Err(io_err(source)),
    };

    Ok(Cached { value, stamp })
}

impl<T> JsonDocument<T>
where
    T: Serialize + DeserializeOwned + Default + Clone,
{
    /// Load the document from `path`. A missing or blank file yields `T::default()`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let cached = load(&path)?;

        let mut lock_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        lock_name.push(".lock");

        Ok(Self {
            lock_path: path.with_file_name(lock_name),
            path,
            state: RwLock::new(cached),
        })
    }

    /// Clone of the current image
    pub async fn snapshot(&self) -> T {
        self.refresh().await;
        self.state.read().await.value.clone()
    }

    /// Run `f` against the current image under the read lock
    pub async fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.refresh().await;
        let guard = self.state.read().await;
        f(&guard.value)
    }

    /// Read-modify-write under the document's write lock and the cross-process file lock.
    ///
    /// `f` receives a draft; returning `Err` discards it without touching disk.
    pub async fn mutate<R, E>(&self, f: impl FnOnce(&mut T) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        let mut guard = self.state.write().await;
        // Released when dropped at the end of this call
        let _file_lock = self.lock_file().await?;

        let on_disk = file_stamp(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        if on_disk != guard.stamp {
            debug!("{} changed on disk, reloading before write", self.path.display());
            *guard = load(&self.path)?;
        }

        let mut draft = guard.value.clone();
        let out = f(&mut draft)?;
        write_json_atomic(&self.path, &draft)?;

        let stamp = file_stamp(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        *guard = Cached { value: draft, stamp };
        Ok(out)
    }

    /// Reload the cached image if another process replaced the file.
    /// A failed reload keeps serving the cached image.
    async fn refresh(&self) {
        let on_disk = match file_stamp(&self.path) {
            Ok(stamp) => stamp,
            Err(e) => {
                warn!("Cannot stat {}: {}", self.path.display(), e);
                return;
            }
        };
        if self.state.read().await.stamp == on_disk {
            return;
        }

        let mut guard = self.state.write().await;
        if guard.stamp == on_disk {
            return;
        }
        match load(&self.path) {
            Ok(cached) => {
                debug!("Reloaded {} after an external write", self.path.display());
                *guard = cached;
            }
            Err(e) => warn!("Keeping cached {}: {}", self.path.display(), e),
        }
    }

    async fn lock_file(&self) -> Result<File, StoreError> {
        let lock_path = self.lock_path.clone();
        let locked = tokio::task::spawn_blocking(move || -> io::Result<File> {
            let file = OpenOptions::new()
                .create(true)
                .truncate(false)
                .write(true)
                .open(&lock_path)?;
            file.lock_exclusive()?;
            Ok(file)
        })
        .await;

        match locked {
            Ok(Ok(file)) => Ok(file),
            Ok(Err(source)) => Err(StoreError::Io {
                path: self.lock_path.clone(),
                source,
            }),
            Err(join) => Err(StoreError::Io {
                path: self.lock_path.clone(),
                source: io::Error::new(ErrorKind::Other, join),
            }),
        }
    }
}

/// Serialize `value` next to `path` and rename it into place
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|source| StoreError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    serde_json::to_writer_pretty(&mut temp, value).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    temp.write_all(b"\n").map_err(io_err)?;
    temp.as_file().sync_all().map_err(io_err)?;
    temp.persist(path).map_err(|e| StoreError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}
