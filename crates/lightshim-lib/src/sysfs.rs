//! Control-file access: the [`ControlFs`] seam, the real sysfs backend, and
//! the [`FileWriter`] that every controller writes through.
//!
//! Every write opens the file, writes a decimal value followed by a newline,
//! and closes it again. No descriptor outlives a single write.

use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{LightsError, Result};

// ── Trait ──

/// Filesystem operations needed to drive kernel control files.
pub trait ControlFs {
    /// Open `path` for read/write (without creating it) and write `value`.
    fn write_value(&self, path: &Path, value: &str) -> io::Result<()>;

    /// Whether `path` currently exists. Never cached by callers.
    fn exists(&self, path: &Path) -> bool;
}

impl<T: ControlFs + ?Sized> ControlFs for &T {
    fn write_value(&self, path: &Path, value: &str) -> io::Result<()> {
        (**self).write_value(path, value)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }
}

impl<T: ControlFs + ?Sized> ControlFs for Arc<T> {
    fn write_value(&self, path: &Path, value: &str) -> io::Result<()> {
        (**self).write_value(path, value)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }
}

// ── Real backend ──

/// Kernel control files, optionally relocated under a root prefix.
///
/// With an empty root, paths are used as given. With a root such as
/// `/tmp/mirror`, `/sys/class/leds/red/brightness` becomes
/// `/tmp/mirror/sys/class/leds/red/brightness`.
#[derive(Debug, Clone, Default)]
pub struct SysFs {
    root: PathBuf,
}

impl SysFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        SysFs { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a control path onto the root prefix.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if self.root.as_os_str().is_empty() {
            return path.to_path_buf();
        }
        let relative = path.strip_prefix("/").unwrap_or(path);
        self.root.join(relative)
    }
}

impl ControlFs for SysFs {
    fn write_value(&self, path: &Path, value: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .truncate(true)
            .open(self.resolve(path))?;
        file.write_all(value.as_bytes())
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }
}

// ── Writer ──

/// Decimal-value writer with per-path failure suppression.
///
/// The first failure on a path is logged at error level; repeats on the same
/// path drop to debug so a missing LED does not flood the log.
#[derive(Debug)]
pub struct FileWriter<F> {
    fs: F,
    warned: HashSet<PathBuf>,
}

impl<F: ControlFs> FileWriter<F> {
    pub fn new(fs: F) -> Self {
        FileWriter {
            fs,
            warned: HashSet::new(),
        }
    }

    pub fn exists(&self, path: &Path) -> bool {
        self.fs.exists(path)
    }

    /// Write `value` as decimal text to `path`.
    pub fn write_int(&mut self, path: &Path, value: u32) -> Result<()> {
        match self.fs.write_value(path, &format!("{value}\n")) {
            Ok(()) => {
                log::debug!("{} <- {value}", path.display());
                Ok(())
            }
            Err(source) => {
                if self.warned.insert(path.to_path_buf()) {
                    log::error!("failed to write {}: {source}", path.display());
                } else {
                    log::debug!("failed to write {} again: {source}", path.display());
                }
                Err(LightsError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    /// Whether a failure on `path` has already been reported.
    pub fn has_warned(&self, path: &Path) -> bool {
        self.warned.contains(path)
    }
}

// ── Mock filesystem for testing ──

/// In-memory control files for unit and integration tests.
///
/// Always compiled (zero runtime cost), hidden from public docs.
#[doc(hidden)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Mutex, MutexGuard};

    /// Records every successful write. Writes succeed unless the path was
    /// registered with [`MockFs::fail`]; `exists` only reports paths added
    /// with [`MockFs::add`].
    #[derive(Debug, Default)]
    pub struct MockFs {
        /// Paths reported by `exists`.
        pub present: Mutex<HashSet<PathBuf>>,
        /// Paths whose writes fail, with the errno to report.
        pub failing: Mutex<HashMap<PathBuf, i32>>,
        /// Successful writes in order: (path, raw text).
        pub writes: Mutex<Vec<(PathBuf, String)>>,
    }

    fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
        m.lock().unwrap_or_else(|e| e.into_inner())
    }

    impl MockFs {
        pub fn new() -> Self {
            Self::default()
        }

        /// Mark a path as present.
        pub fn add(&self, path: impl Into<PathBuf>) {
            lock(&self.present).insert(path.into());
        }

        /// Mark a path as absent.
        pub fn remove(&self, path: impl AsRef<Path>) {
            lock(&self.present).remove(path.as_ref());
        }

        /// Make writes to `path` fail with `errno`.
        pub fn fail(&self, path: impl Into<PathBuf>, errno: i32) {
            lock(&self.failing).insert(path.into(), errno);
        }

        /// Snapshot of all writes as (path, parsed value).
        pub fn written(&self) -> Vec<(PathBuf, u32)> {
            lock(&self.writes)
                .iter()
                .map(|(p, v)| (p.clone(), v.trim().parse().unwrap_or(u32::MAX)))
                .collect()
        }

        /// Values written to one path, in order.
        pub fn values(&self, path: impl AsRef<Path>) -> Vec<u32> {
            let path = path.as_ref();
            self.written()
                .into_iter()
                .filter(|(p, _)| p == path)
                .map(|(_, v)| v)
                .collect()
        }

        /// Last value written to `path`.
        pub fn last(&self, path: impl AsRef<Path>) -> Option<u32> {
            self.values(path).last().copied()
        }

        /// Paths written, in order.
        pub fn paths(&self) -> Vec<PathBuf> {
            lock(&self.writes).iter().map(|(p, _)| p.clone()).collect()
        }

        pub fn clear(&self) {
            lock(&self.writes).clear();
        }
    }

    impl ControlFs for MockFs {
        fn write_value(&self, path: &Path, value: &str) -> io::Result<()> {
            if let Some(&errno) = lock(&self.failing).get(path) {
                return Err(io::Error::from_raw_os_error(errno));
            }
            lock(&self.writes).push((path.to_path_buf(), value.to_string()));
            Ok(())
        }

        fn exists(&self, path: &Path) -> bool {
            lock(&self.present).contains(path)
        }
    }
}
