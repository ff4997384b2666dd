//! RAII claim guard.

use std::fs;
use std::path::PathBuf;

/// Held claim on an artifact. Dropping it deletes the claim file; a failed
/// delete is reported as a warning and leaves a claim that will go stale.
#[derive(Debug)]
pub struct LockGuard {
    path: PathBuf,
}

impl LockGuard {
    pub(super) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[cfg(test)]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            eprintln!(
                "Warning: failed to release claim '{}': {}",
                self.path.display(),
                e
            );
        }
    }
}
