//! Markup cache persisted under a directory.
//!
//! [`FileCache`] stores each entry as a single file on disk. The file name is
//! the hex-encoded SHA-256 of the cache key (keys contain `:` and `/`), and the
//! file holds a one-byte tag followed by the markup:
//!
//! ```text
//! [tag: u8][markup bytes]     tag 0 = stored `None`, tag 1 = markup
//! ```
//!
//! Opening a [`FileCache`] compares the `VERSION` file in its root with the
//! requested version; a missing or different version discards every entry.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::Cache;

const TAG_NONE: u8 = 0;
const TAG_MARKUP: u8 = 1;

/// [`Cache`] keeping one file per entry under `root`.
///
/// Directory layout:
/// ```text
/// {root}/
/// +-- VERSION            # contains the cache version string
/// +-- 3f9a...e1          # one file per entry, named by key hash
/// +-- ...
/// ```
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    /// Open the cache at `root` for entries written under `version`.
    ///
    /// Stale or missing directories are recreated. Failures are logged and
    /// leave a cache that simply misses.
    #[must_use]
    pub fn new(root: PathBuf, version: &str) -> Self {
        validate_version(&root, version);
        Self { root }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        self.root.join(hex::encode(hasher.finalize()))
    }
}

impl Cache for FileCache {
    fn get(&self, key: &str) -> Option<String> {
        let bytes = fs::read(self.entry_path(key)).ok()?;
        let (&tag, markup) = bytes.split_first()?;
        if tag != TAG_MARKUP {
            return None;
        }
        String::from_utf8(markup.to_vec()).ok()
    }

    fn set(&self, key: &str, value: Option<&str>) {
        let path = self.entry_path(key);

        // A cache that cannot be written behaves like a miss
        if fs::create_dir_all(&self.root).is_err() {
            return;
        }

        let mut buf = Vec::with_capacity(1 + value.map_or(0, str::len));
        match value {
            Some(markup) => {
                buf.push(TAG_MARKUP);
                buf.extend_from_slice(markup.as_bytes());
            }
            None => buf.push(TAG_NONE),
        }

        if let Err(e) = fs::write(&path, &buf) {
            tracing::debug!("failed to write cache entry {}: {e}", path.display());
        }
    }
}

/// Keep the directory if its `VERSION` matches, otherwise start it afresh.
fn validate_version(root: &Path, version: &str) {
    let version_file = root.join("VERSION");

    let stored = fs::read_to_string(&version_file).ok();
    if stored.as_deref() == Some(version) {
        tracing::debug!("Embed cache at {} is current ({version})", root.display());
        return;
    }

    match stored {
        Some(stored) => tracing::info!(
            "Embed cache version changed from {stored} to {version}, discarding {}",
            root.display()
        ),
        None => tracing::info!("Initializing embed cache at {}", root.display()),
    }
    reset(root, &version_file, version);
}

fn reset(root: &Path, version_file: &Path, version: &str) {
    if root.exists()
        && let Err(e) = fs::remove_dir_all(root)
    {
        tracing::warn!("Cannot remove stale embed cache {}: {e}", root.display());
    }

    let written = fs::create_dir_all(root).and_then(|()| fs::write(version_file, version));
    if let Err(e) = written {
        tracing::warn!("Cannot initialize embed cache {}: {e}", root.display());
    }
}
