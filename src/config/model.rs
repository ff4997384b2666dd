//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for a tintforge project.
///
/// This struct represents the contents of `tintforge.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Backend
    // =========================================================================
    /// Base URL of the generation backend.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout; an expired request fails its unit.
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    // =========================================================================
    // Layout (relative to the project root)
    // =========================================================================
    /// Root of the task tree.
    #[serde(default = "default_tasks_dir")]
    pub tasks_dir: String,

    /// Where recolored intermediates are kept, per scheme.
    #[serde(default = "default_recolored_dir")]
    pub recolored_dir: String,

    /// Where final and variant images are written, per scheme.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    // =========================================================================
    // Task tree conventions
    // =========================================================================
    /// Extension of task descriptor files (no leading dot).
    #[serde(default = "default_descriptor_extension")]
    pub descriptor_extension: String,

    /// Extension of generated images (no leading dot). Images are PNG, so
    /// only `png` in any case is accepted.
    #[serde(default = "default_image_extension")]
    pub image_extension: String,

    /// File name whose presence excludes a directory subtree.
    #[serde(default = "default_ignore_marker")]
    pub ignore_marker: String,

    /// Name of the fragment placed before the task prompt.
    #[serde(default = "default_prefix_fragment")]
    pub prefix_fragment: String,

    /// Name of the fragment placed after the task prompt.
    #[serde(default = "default_suffix_fragment")]
    pub suffix_fragment: String,

    /// Extension of fragment files (no leading dot).
    #[serde(default = "default_fragment_extension")]
    pub fragment_extension: String,

    // =========================================================================
    // Palettes and stages
    // =========================================================================
    /// Color schemes keyed by name; each is a list of `#RRGGBB` values.
    #[serde(default = "default_color_schemes")]
    pub color_schemes: BTreeMap<String, Vec<String>>,

    /// Recoloring settings.
    #[serde(default)]
    pub recolor: RecolorSettings,

    /// Styling stage parameters.
    #[serde(default)]
    pub styling: StylingSettings,

    /// Stylized variant stage parameters.
    #[serde(default)]
    pub variant: VariantSettings,

    // =========================================================================
    // Lock settings
    // =========================================================================
    /// Minutes after which an artifact claim is considered stale.
    #[serde(default = "default_lock_stale_minutes")]
    pub lock_stale_minutes: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_seconds: default_request_timeout_seconds(),
            tasks_dir: default_tasks_dir(),
            recolored_dir: default_recolored_dir(),
            output_dir: default_output_dir(),
            descriptor_extension: default_descriptor_extension(),
            image_extension: default_image_extension(),
            ignore_marker: default_ignore_marker(),
            prefix_fragment: default_prefix_fragment(),
            suffix_fragment: default_suffix_fragment(),
            fragment_extension: default_fragment_extension(),
            color_schemes: default_color_schemes(),
            recolor: RecolorSettings::default(),
            styling: StylingSettings::default(),
            variant: VariantSettings::default(),
            lock_stale_minutes: default_lock_stale_minutes(),
        }
    }
}
