//! Ensure only one daybook-server instance serves a data directory.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::File;
use std::path::Path;

const LOCK_FILE: &str = ".daybook-server.lock";

/// A lock guard that releases the lock when dropped
pub struct LockGuard {
    _file: File,
}

/// Acquire an exclusive lock on `data_dir`, failing if another instance
/// already holds it
pub fn acquire_lock(data_dir: &Path) -> Result<LockGuard> {
    let path = data_dir.join(LOCK_FILE);
    let file = File::create(&path).context("Failed to create lock file")?;

    file.try_lock_exclusive().map_err(|_| {
        anyhow::anyhow!(
            "Another daybook-server instance is already serving {}.\n\
            If you believe this is an error, remove: {}",
            data_dir.display(),
            path.display()
        )
    })?;

    Ok(LockGuard { _file: file })
}
