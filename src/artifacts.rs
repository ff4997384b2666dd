//! Artifact store.
//!
//! Artifacts are the images each stage persists. Their existence is the only
//! record of stage completion: nothing else is consulted when deciding what
//! to run, and an existing artifact is never rewritten.

use crate::config::Config;
use crate::context::ProjectContext;
use crate::error::{ForgeError, Result};
use crate::fs::atomic_write;
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// What an artifact is, relative to its task.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Stage 0 output.
    Base,
    /// Palette-reduced base image for a scheme.
    Recolored(String),
    /// Stage 1 output for a scheme.
    Final(String),
    /// Stage 2 output for a scheme.
    Variant(String),
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Base => "base",
            ArtifactKind::Recolored(_) => "recolored",
            ArtifactKind::Final(_) => "final",
            ArtifactKind::Variant(_) => "variant",
        }
    }

    pub fn scheme(&self) -> Option<&str> {
        match self {
            ArtifactKind::Base => None,
            ArtifactKind::Recolored(scheme)
            | ArtifactKind::Final(scheme)
            | ArtifactKind::Variant(scheme) => Some(scheme),
        }
    }
}

/// Identifies one artifact of one task.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactKey {
    pub task: String,
    pub kind: ArtifactKind,
}

impl ArtifactKey {
    pub fn base(task: &str) -> Self {
        Self::new(task, ArtifactKind::Base)
    }

    pub fn recolored(task: &str, scheme: &str) -> Self {
        Self::new(task, ArtifactKind::Recolored(scheme.to_string()))
    }

    pub fn final_image(task: &str, scheme: &str) -> Self {
        Self::new(task, ArtifactKind::Final(scheme.to_string()))
    }

    pub fn variant(task: &str, scheme: &str) -> Self {
        Self::new(task, ArtifactKind::Variant(scheme.to_string()))
    }

    fn new(task: &str, kind: ArtifactKind) -> Self {
        Self {
            task: task.to_string(),
            kind,
        }
    }

    /// File-name-safe name used for this artifact's claim file.
    ///
    /// Distinct keys always get distinct names: `/` becomes `~`
    /// and every other byte outside `[A-Za-z0-9_-]` is written as `%XX`.
    pub fn claim_name(&self) -> String {
        let mut name = escape_claim_part(&self.task);
        name.push('.');
        name.push_str(self.kind.as_str());
        if let Some(scheme) = self.kind.scheme() {
            name.push('.');
            name.push_str(&escape_claim_part(scheme));
        }
        name
    }
}

fn escape_claim_part(part: &str) -> String {
    let mut escaped = String::with_capacity(part.len());
    for byte in part.bytes() {
        match byte {
            b'/' => escaped.push('~'),
            b if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_') => escaped.push(b as char),
            b => escaped.push_str(&format!("%{:02X}", b)),
        }
    }
    escaped
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind.scheme() {
            Some(scheme) => write!(f, "{} [{} {}]", self.task, self.kind.as_str(), scheme),
            None => write!(f, "{} [{}]", self.task, self.kind.as_str()),
        }
    }
}

/// Persistent storage for artifacts.
pub trait ArtifactStore {
    fn exists(&self, key: &ArtifactKey) -> bool;

    fn read(&self, key: &ArtifactKey) -> Result<Vec<u8>>;

    /// Persist a new artifact. Writing a key that already exists is an error.
    fn write(&self, key: &ArtifactKey, bytes: &[u8]) -> Result<()>;

    /// Where the artifact lives, for reporting.
    fn location(&self, key: &ArtifactKey) -> PathBuf;
}

/// Artifact store laid out on the project filesystem.
///
/// ```text
/// <tasks>/<task>.png                          base
/// <recolored>/<scheme>/<task>.png             recolored intermediate
/// <output>/<scheme>/<task>.png                final
/// <output>/<scheme>/<task>_<suffix>.png       variant
/// ```
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    tasks_dir: PathBuf,
    recolored_dir: PathBuf,
    output_dir: PathBuf,
    image_extension: String,
    variant_suffix: String,
}

impl FsArtifactStore {
    pub fn new(ctx: &ProjectContext, config: &Config) -> Self {
        Self {
            tasks_dir: ctx.tasks_dir.clone(),
            recolored_dir: ctx.recolored_dir.clone(),
            output_dir: ctx.output_dir.clone(),
            image_extension: config.image_extension.clone(),
            variant_suffix: config.variant.suffix.clone(),
        }
    }

    fn path_for(&self, key: &ArtifactKey) -> PathBuf {
        let relative: PathBuf = key.task.split('/').collect();
        let file_name = |suffix: &str| {
            let stem = relative
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            relative.with_file_name(format!("{}{}.{}", stem, suffix, self.image_extension))
        };

        match &key.kind {
            ArtifactKind::Base => self.tasks_dir.join(file_name("")),
            ArtifactKind::Recolored(scheme) => self.recolored_dir.join(scheme).join(file_name("")),
            ArtifactKind::Final(scheme) => self.output_dir.join(scheme).join(file_name("")),
            ArtifactKind::Variant(scheme) => self
                .output_dir
                .join(scheme)
                .join(file_name(&format!("_{}", self.variant_suffix))),
        }
    }
}

impl ArtifactStore for FsArtifactStore {
    fn exists(&self, key: &ArtifactKey) -> bool {
        self.path_for(key).is_file()
    }

    fn read(&self, key: &ArtifactKey) -> Result<Vec<u8>> {
        let path = self.path_for(key);
        fs::read(&path).map_err(|e| {
            ForgeError::ImageError(format!(
                "failed to read artifact '{}': {}",
                path.display(),
                e
            ))
        })
    }

    fn write(&self, key: &ArtifactKey, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            return Err(ForgeError::UserError(format!(
                "refusing to overwrite existing artifact '{}'",
                path.display()
            )));
        }
        atomic_write(&path, bytes)
    }

    fn location(&self, key: &ArtifactKey) -> PathBuf {
        self.path_for(key)
    }
}
