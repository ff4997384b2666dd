//! Claim acquisition, listing, and clearing.

use super::guard::LockGuard;
use super::metadata::LockMetadata;
use super::types::LockInfo;
use crate::artifacts::ArtifactKey;
use crate::config::Config;
use crate::context::ProjectContext;
use crate::error::{ForgeError, Result};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

/// Create a claim file exclusively and write its metadata.
///
/// Fails with `LockError` when the file already exists.
fn acquire_lock(lock_path: &Path, metadata: &LockMetadata) -> Result<LockGuard> {
    if let Some(parent) = lock_path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            ForgeError::LockError(format!(
                "failed to create locks directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(lock_path)
        .map_err(|e| {
            if e.kind() == ErrorKind::AlreadyExists {
                let holder = match LockMetadata::from_file(lock_path) {
                    Ok(meta) => format!(
                        " (claimed {} ago by {}, pid {})",
                        meta.age_string(),
                        meta.owner,
                        meta.pid.map_or_else(|| "?".to_string(), |pid| pid.to_string())
                    ),
                    Err(_) => String::new(),
                };
                ForgeError::LockError(format!(
                    "{} is being generated by another process{}",
                    metadata.artifact, holder
                ))
            } else {
                ForgeError::LockError(format!(
                    "failed to create claim '{}': {}",
                    lock_path.display(),
                    e
                ))
            }
        })?;

    // From here on the guard owns the file and removes it on any error.
    let guard = LockGuard::new(lock_path.to_path_buf());

    let json = metadata.to_json()?;
    file.write_all(json.as_bytes())
        .and_then(|_| file.sync_all())
        .map_err(|e| ForgeError::LockError(format!("failed to write claim metadata: {}", e)))?;

    Ok(guard)
}

/// Claim `key` for the stage named by `action`.
///
/// The caller must re-check the artifact after this returns; another process
/// may have finished it between the caller's first check and the claim.
pub fn acquire_artifact_claim(
    ctx: &ProjectContext,
    key: &ArtifactKey,
    action: &str,
) -> Result<LockGuard> {
    let metadata = LockMetadata::new(action, &key.to_string());
    acquire_lock(&ctx.lock_path(&key.claim_name()), &metadata)
}

/// All claim files, sorted by name. Unparseable files are skipped.
pub fn list_locks(ctx: &ProjectContext, config: &Config) -> Result<Vec<LockInfo>> {
    let mut locks = Vec::new();

    if !ctx.locks_dir.exists() {
        return Ok(locks);
    }

    let entries = fs::read_dir(&ctx.locks_dir).map_err(|e| {
        ForgeError::UserError(format!(
            "failed to read locks directory '{}': {}",
            ctx.locks_dir.display(),
            e
        ))
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| {
            ForgeError::UserError(format!("failed to read locks directory entry: {}", e))
        })?;
        let path = entry.path();

        if path.extension().and_then(|e| e.to_str()) != Some("lock") {
            continue;
        }
        let Ok(metadata) = LockMetadata::from_file(&path) else {
            continue;
        };
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let is_stale = metadata.is_stale(config.lock_stale_minutes);

        locks.push(LockInfo {
            path,
            name,
            metadata,
            is_stale,
        });
    }

    locks.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(locks)
}

/// Remove the claim named `name`.
///
/// Refuses a claim that is not yet stale unless `force` is set, since its
/// holder may still be running.
pub fn clear_lock(
    ctx: &ProjectContext,
    name: &str,
    force: bool,
    config: &Config,
) -> Result<LockInfo> {
    if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
        return Err(ForgeError::UserError(format!(
            "invalid claim name '{}'",
            name
        )));
    }

    let lock_path = ctx.lock_path(name);
    if !lock_path.exists() {
        return Err(ForgeError::UserError(format!(
            "claim '{}' does not exist at: {}",
            name,
            lock_path.display()
        )));
    }

    let metadata = LockMetadata::from_file(&lock_path)?;
    let is_stale = metadata.is_stale(config.lock_stale_minutes);

    if !is_stale && !force {
        return Err(ForgeError::UserError(format!(
            "claim '{}' is held by {} (age {}) and is not stale.\n\
             Use --force to clear it anyway.",
            name,
            metadata.owner,
            metadata.age_string()
        )));
    }

    fs::remove_file(&lock_path).map_err(|e| {
        ForgeError::UserError(format!(
            "failed to clear claim '{}': {}",
            lock_path.display(),
            e
        ))
    })?;

    Ok(LockInfo {
        path: lock_path,
        name: name.to_string(),
        metadata,
        is_stale,
    })
}
