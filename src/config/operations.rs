//! Config loading, validation, and utility operations.

use super::model::Config;
use crate::error::{ForgeError, Result};
use crate::palette::ColorScheme;
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            ForgeError::ConfigError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load config from `path` if it exists, otherwise validated defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            let config = Self::default();
            config.validate()?;
            Ok(config)
        }
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes as unit, not as an empty mapping.
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml)
                .map_err(|e| ForgeError::ConfigError(format!("failed to parse config YAML: {}", e)))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            ForgeError::ConfigError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Color schemes are checked here so an empty or malformed palette is
    /// reported once at startup rather than once per task.
    pub fn validate(&self) -> Result<()> {
        if self.color_schemes.is_empty() {
            return Err(ForgeError::ConfigError(
                "at least one color scheme must be configured".to_string(),
            ));
        }
        self.palettes()?;

        if self.recolor.num_reduced_colors == 0 {
            return Err(ForgeError::ConfigError(
                "recolor.num_reduced_colors must be greater than 0".to_string(),
            ));
        }

        if !self.recolor.blur_radius.is_finite() || self.recolor.blur_radius < 0.0 {
            return Err(ForgeError::ConfigError(format!(
                "recolor.blur_radius must be a non-negative number (found {})",
                self.recolor.blur_radius
            )));
        }

        for (field, value) in [
            ("styling.denoising_strength", self.styling.denoising_strength),
            ("variant.denoising_strength", self.variant.denoising_strength),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ForgeError::ConfigError(format!(
                    "{} must be between 0 and 1 (found {})",
                    field, value
                )));
            }
        }

        if self.variant.enabled && self.variant.suffix.trim().is_empty() {
            return Err(ForgeError::ConfigError(
                "variant.suffix must be non-empty when the variant stage is enabled".to_string(),
            ));
        }

        if self.lock_stale_minutes == 0 {
            return Err(ForgeError::ConfigError(
                "lock_stale_minutes must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout_seconds == 0 {
            return Err(ForgeError::ConfigError(
                "request_timeout_seconds must be greater than 0".to_string(),
            ));
        }

        for (field, ext) in [
            ("descriptor_extension", &self.descriptor_extension),
            ("image_extension", &self.image_extension),
            ("fragment_extension", &self.fragment_extension),
        ] {
            if ext.is_empty() {
                return Err(ForgeError::ConfigError(format!(
                    "{} must be non-empty",
                    field
                )));
            }
            if ext.starts_with('.') {
                return Err(ForgeError::ConfigError(format!(
                    "{} must not have a leading dot (found '{}'). Use '{}' instead.",
                    field,
                    ext,
                    ext.trim_start_matches('.')
                )));
            }
        }

        // Artifacts are always PNG data.
        if !self.image_extension.eq_ignore_ascii_case("png") {
            return Err(ForgeError::ConfigError(format!(
                "image_extension must be 'png' (found '{}')",
                self.image_extension
            )));
        }

        if self.ignore_marker.is_empty() {
            return Err(ForgeError::ConfigError(
                "ignore_marker must be non-empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Parsed color schemes in name order.
    pub fn palettes(&self) -> Result<Vec<ColorScheme>> {
        self.color_schemes
            .iter()
            .map(|(name, colors)| ColorScheme::from_hex_list(name, colors))
            .collect()
    }

    /// Fragment names recognized in the task tree.
    pub fn fragment_names(&self) -> [&str; 2] {
        [self.prefix_fragment.as_str(), self.suffix_fragment.as_str()]
    }
}
