//! Claim listing information.

use super::metadata::LockMetadata;
use std::fmt;
use std::path::PathBuf;

/// A claim file found on disk.
#[derive(Debug, Clone)]
pub struct LockInfo {
    pub path: PathBuf,

    /// Claim name (the file stem), as accepted by `lock clear`.
    pub name: String,

    pub metadata: LockMetadata,

    /// Older than `lock_stale_minutes`.
    pub is_stale: bool,
}

impl fmt::Display for LockInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}; owner: {}, age: {}{})",
            self.name,
            self.metadata.artifact,
            self.metadata.owner,
            self.metadata.age_string(),
            if self.is_stale { ", STALE" } else { "" }
        )
    }
}
