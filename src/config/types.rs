//! Configuration sections and defaults for tintforge.
//!
//! This module defines the nested setting groups and default value functions
//! used by the Config struct.

use crate::palette::RecolorMode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which recoloring strategy the styling stage uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecolorStrategy {
    /// Seeded k-means reduction, then palette mapping (default).
    #[default]
    Clustered,
    /// Per-pixel palette mapping; dithers between ambiguous colors.
    Direct,
}

/// Recoloring settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecolorSettings {
    /// Recoloring strategy.
    pub mode: RecolorStrategy,

    /// Representative colors kept by clustered mapping.
    pub num_reduced_colors: usize,

    /// Seed for clustered mapping.
    pub seed: u64,

    /// Upper bound on k-means iterations.
    pub max_iterations: u32,

    /// Whether to blur the recolored image before submitting it.
    pub blur: bool,

    /// Blur radius (Gaussian sigma).
    pub blur_radius: f32,
}

impl Default for RecolorSettings {
    fn default() -> Self {
        Self {
            mode: RecolorStrategy::default(),
            num_reduced_colors: 10,
            seed: 42,
            max_iterations: 50,
            blur: true,
            blur_radius: 1.3,
        }
    }
}

impl RecolorSettings {
    /// The recolorer mode these settings describe.
    pub fn recolor_mode(&self) -> RecolorMode {
        match self.mode {
            RecolorStrategy::Direct => RecolorMode::Direct,
            RecolorStrategy::Clustered => RecolorMode::Clustered {
                clusters: self.num_reduced_colors,
                seed: self.seed,
                max_iterations: self.max_iterations,
            },
        }
    }

    /// Blur radius to apply, or `None` when smoothing is off.
    pub fn smoothing_radius(&self) -> Option<f32> {
        (self.blur && self.blur_radius > 0.0).then_some(self.blur_radius)
    }
}

/// Fixed generation parameters for the per-scheme styling stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylingSettings {
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    pub cfg_scale: f64,
    pub denoising_strength: f64,
    /// Backend resize policy for the source image (1 = crop and resize).
    pub resize_mode: u8,
}

impl Default for StylingSettings {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
            steps: 32,
            cfg_scale: 7.0,
            denoising_strength: 0.6,
            resize_mode: 1,
        }
    }
}

/// Settings for the optional stylized-variant stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantSettings {
    /// Whether the variant stage runs at all.
    pub enabled: bool,

    /// File name suffix for variant artifacts (`owl_<suffix>.png`).
    pub suffix: String,

    /// Style adapter selector prepended to the prompt (e.g. `<lora:name>`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adapter_prefix: Option<String>,

    pub steps: u32,
    pub denoising_strength: f64,

    /// Backend model checkpoint to switch to for this stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<String>,
}

impl Default for VariantSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            suffix: "stylized".to_string(),
            adapter_prefix: None,
            steps: 42,
            denoising_strength: 0.65,
            checkpoint: None,
        }
    }
}

/// Default color schemes.
pub fn default_color_schemes() -> BTreeMap<String, Vec<String>> {
    let scheme = |colors: &[&str]| colors.iter().map(|c| c.to_string()).collect::<Vec<_>>();

    BTreeMap::from([
        (
            "CrimsonTwilight".to_string(),
            scheme(&[
                "#C56D70", "#241B28", "#566B7B", "#4DB5BF", "#76353F", "#324557", "#EFDBC2",
                "#4B92A5", "#BFB5BF", "#5C6464",
            ]),
        ),
        (
            "EnchantedGrove".to_string(),
            scheme(&[
                "#3B5A3A", "#CFD8B7", "#97BC90", "#192111", "#879F6D", "#659B7E", "#69915A",
                "#B7BF4D", "#89AAA5", "#B4741C",
            ]),
        ),
    ])
}

// Default value functions for serde
pub(crate) fn default_api_url() -> String {
    "http://127.0.0.1:7860".to_string()
}
pub(crate) fn default_request_timeout_seconds() -> u64 {
    600
}
pub(crate) fn default_tasks_dir() -> String {
    "ImgIdeas".to_string()
}
pub(crate) fn default_recolored_dir() -> String {
    "RecoloredTemp".to_string()
}
pub(crate) fn default_output_dir() -> String {
    "Images".to_string()
}
pub(crate) fn default_descriptor_extension() -> String {
    "json".to_string()
}
pub(crate) fn default_image_extension() -> String {
    "png".to_string()
}
pub(crate) fn default_ignore_marker() -> String {
    "ignore".to_string()
}
pub(crate) fn default_prefix_fragment() -> String {
    "prefix".to_string()
}
pub(crate) fn default_suffix_fragment() -> String {
    "suffix".to_string()
}
pub(crate) fn default_fragment_extension() -> String {
    "txt".to_string()
}
pub(crate) fn default_lock_stale_minutes() -> u32 {
    120
}
