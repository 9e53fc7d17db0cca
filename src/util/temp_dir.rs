//! Create temporary directories.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter distinguishing directories created by the same process.
static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Wraps a temporary directory path.
///
/// The directory and its contents are removed when this is dropped.
#[derive(Debug)]
pub struct TempDir(PathBuf);

impl Drop for TempDir {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.0).expect("failed to remove temp dir");
    }
}

impl TempDir {
    /// Create a temporary directory.
    pub fn new() -> Self {
        let count = COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "passerelle_{}_{}",
            std::process::id(),
            count
        ));

        std::fs::create_dir_all(&path)
            .unwrap_or_else(|_| panic!("failed to create temp dir {:?}", path));
        Self(path)
    }

    /// Return the directory path.
    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl Default for TempDir {
    fn default() -> Self {
        Self::new()
    }
}
