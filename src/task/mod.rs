//! Task descriptor model for tintforge.
//!
//! Each task is one JSON descriptor somewhere under the task tree. The
//! descriptor carries the text-conditioned generation parameters; every field
//! except `prompt` has a default.
//!
//! # Descriptor Format
//!
//! ```text
//! {
//!   "prompt": "an owl perched on a lantern",
//!   "negative_prompt": "blurry",
//!   "width": 768,
//!   "seed": 1234,
//!   "prompt-img2img": "an owl, flat illustration"
//! }
//! ```
//!
//! A task is identified by its descriptor path relative to the tree root,
//! without extension, with `/` separators (`forest/owl`).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

mod io;

/// Seed value meaning "let the backend choose".
pub const RANDOM_SEED: i64 = -1;

/// A parsed task descriptor.
///
/// Known fields are explicitly typed, while unknown fields are preserved
/// in the `extra` map so descriptors written by other tools stay readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    /// Core prompt text for the task.
    pub prompt: String,

    #[serde(default)]
    pub negative_prompt: String,

    #[serde(default = "default_size")]
    pub width: u32,

    #[serde(default = "default_size")]
    pub height: u32,

    #[serde(default = "default_steps")]
    pub steps: u32,

    /// Fixed seed, or any negative value for "unspecified".
    #[serde(default = "default_seed")]
    pub seed: i64,

    #[serde(default = "default_sampler", alias = "sampler")]
    pub sampler_name: String,

    #[serde(default = "default_scheduler")]
    pub scheduler: String,

    #[serde(default = "default_cfg_scale", alias = "guidance_scale")]
    pub cfg_scale: f64,

    /// Prompt override for the image-conditioned stages, used verbatim.
    #[serde(
        default,
        rename = "prompt-img2img",
        alias = "style_prompt",
        skip_serializing_if = "Option::is_none"
    )]
    pub style_prompt: Option<String>,

    /// Any fields not explicitly defined above.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn default_size() -> u32 {
    768
}

fn default_steps() -> u32 {
    26
}

fn default_seed() -> i64 {
    RANDOM_SEED
}

fn default_sampler() -> String {
    "Euler a".to_string()
}

fn default_scheduler() -> String {
    "Karras".to_string()
}

fn default_cfg_scale() -> f64 {
    7.0
}

impl TaskDescriptor {
    /// Descriptor with the given prompt and every other field defaulted.
    #[cfg(test)]
    pub fn with_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            negative_prompt: String::new(),
            width: default_size(),
            height: default_size(),
            steps: default_steps(),
            seed: default_seed(),
            sampler_name: default_sampler(),
            scheduler: default_scheduler(),
            cfg_scale: default_cfg_scale(),
            style_prompt: None,
            extra: BTreeMap::new(),
        }
    }

    /// The fixed seed, if one was given.
    pub fn fixed_seed(&self) -> Option<i64> {
        (self.seed >= 0).then_some(self.seed)
    }

    /// Seed as sent on the wire (`-1` when unspecified).
    pub fn wire_seed(&self) -> i64 {
        self.fixed_seed().unwrap_or(RANDOM_SEED)
    }

    /// Style override exactly as written, if present.
    pub fn style_override(&self) -> Option<&str> {
        self.style_prompt.as_deref()
    }
}

/// A discovered task: its identifier and where its descriptor lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRef {
    /// Descriptor path relative to the tree root, no extension, `/` separated.
    pub id: String,

    /// Absolute path of the descriptor file.
    pub descriptor_path: PathBuf,
}

impl TaskRef {
    /// Build a task reference for `descriptor_path` under `tasks_root`.
    ///
    /// Returns `None` when the path is not inside the root or has no
    /// UTF-8 file stem.
    pub fn from_path(tasks_root: &Path, descriptor_path: &Path) -> Option<Self> {
        let relative = descriptor_path.strip_prefix(tasks_root).ok()?;
        let stem = relative.file_stem()?.to_str()?;

        let mut parts: Vec<&str> = Vec::new();
        if let Some(parent) = relative.parent() {
            for component in parent.components() {
                parts.push(component.as_os_str().to_str()?);
            }
        }
        parts.push(stem);

        Some(Self {
            id: parts.join("/"),
            descriptor_path: descriptor_path.to_path_buf(),
        })
    }

    /// Directory containing the descriptor; fragment resolution starts here.
    pub fn dir(&self) -> &Path {
        self.descriptor_path.parent().unwrap_or(Path::new("."))
    }
}
