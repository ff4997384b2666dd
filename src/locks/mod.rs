//! Artifact claims.
//!
//! Before a stage computes an artifact it takes a claim on it: a lock file
//! under `.tintforge/locks/` created with **create_new** semantics, so two
//! tintforge processes racing on the same artifact can never both compute
//! and write it. The holder re-checks the artifact after claiming; whoever
//! loses the race finds it already present.
//!
//! Each claim file holds JSON metadata (`owner`, `pid`, `created_at`,
//! `action`, `artifact`). Claims are released through an RAII guard; a claim
//! left behind by a crashed process shows up as stale in `tintforge lock list`
//! once it is older than `lock_stale_minutes`.

mod guard;
mod metadata;
mod operations;
mod types;


pub use guard::LockGuard;
pub use metadata::LockMetadata;
pub(crate) use metadata::owner_string;
pub use operations::{acquire_artifact_claim, clear_lock, list_locks};
pub use types::LockInfo;
