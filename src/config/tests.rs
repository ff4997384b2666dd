//! Tests for config functionality.

use crate::config::types::default_color_schemes;
use crate::config::{Config, RecolorStrategy};
use crate::error::ForgeError;
use crate::palette::{RecolorMode, Rgb};

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.api_url, "http://127.0.0.1:7860");
    assert_eq!(config.tasks_dir, "ImgIdeas");
    assert_eq!(config.recolored_dir, "RecoloredTemp");
    assert_eq!(config.output_dir, "Images");
    assert_eq!(config.descriptor_extension, "json");
    assert_eq!(config.ignore_marker, "ignore");
    assert_eq!(config.fragment_names(), ["prefix", "suffix"]);
    assert_eq!(config.recolor.mode, RecolorStrategy::Clustered);
    assert_eq!(config.recolor.num_reduced_colors, 10);
    assert_eq!(config.recolor.seed, 42);
    assert!(config.recolor.blur);
    assert_eq!(config.styling.width, 1024);
    assert_eq!(config.styling.steps, 32);
    assert_eq!(config.styling.denoising_strength, 0.6);
    assert!(!config.variant.enabled);
    assert_eq!(config.variant.steps, 42);
    assert_eq!(config.lock_stale_minutes, 120);
    assert!(config.validate().is_ok());
}

#[test]
fn test_parse_minimal_yaml() {
    let config = Config::from_yaml("").unwrap();

    assert_eq!(config.tasks_dir, "ImgIdeas");
    assert_eq!(config.color_schemes, default_color_schemes());
}

#[test]
fn test_parse_partial_yaml() {
    let yaml = r#"
api_url: http://gpu-box:7860
recolor:
  mode: direct
  blur: false
variant:
  enabled: true
  suffix: bichu
  adapter_prefix: "<lora:bichu-v0612>"
  checkpoint: "dreamshaper_8.safetensors"
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.api_url, "http://gpu-box:7860");
    assert_eq!(config.recolor.mode, RecolorStrategy::Direct);
    assert_eq!(config.recolor.recolor_mode(), RecolorMode::Direct);
    assert_eq!(config.recolor.smoothing_radius(), None);
    // Unspecified nested fields keep their defaults.
    assert_eq!(config.recolor.num_reduced_colors, 10);
    assert!(config.variant.enabled);
    assert_eq!(config.variant.suffix, "bichu");
    assert_eq!(
        config.variant.adapter_prefix.as_deref(),
        Some("<lora:bichu-v0612>")
    );
    assert_eq!(config.variant.denoising_strength, 0.65);
}

#[test]
fn test_custom_color_schemes_replace_defaults() {
    let yaml = r##"
color_schemes:
  Dusk: ["#000000", "#FF8800"]
"##;
    let config = Config::from_yaml(yaml).unwrap();
    let palettes = config.palettes().unwrap();

    assert_eq!(palettes.len(), 1);
    assert_eq!(palettes[0].name, "Dusk");
    assert_eq!(palettes[0].colors, vec![Rgb([0, 0, 0]), Rgb([0xFF, 0x88, 0x00])]);
}

#[test]
fn test_empty_color_scheme_is_rejected_at_load() {
    let yaml = r##"
color_schemes:
  Dusk: ["#000000"]
  Void: []
"##;
    let err = Config::from_yaml(yaml).unwrap_err();
    assert!(matches!(err, ForgeError::PaletteEmpty(ref name) if name == "Void"));
}

#[test]
fn test_invalid_color_is_rejected() {
    let yaml = r##"
color_schemes:
  Dusk: ["#000000", "#12345"]
"##;
    let err = Config::from_yaml(yaml).unwrap_err();
    assert!(err.to_string().contains("#12345"));
}

#[test]
fn test_no_color_schemes_is_rejected() {
    let err = Config::from_yaml("color_schemes: {}").unwrap_err();
    assert!(err.to_string().contains("at least one color scheme"));
}

#[test]
fn test_parse_yaml_with_unknown_fields() {
    let yaml = r#"
tasks_dir: ideas
unknown_field: "some value"
another_unknown:
  nested: true
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.tasks_dir, "ideas");
    assert_eq!(config.output_dir, "Images");
}

#[test]
fn test_validate_zero_clusters() {
    let err = Config::from_yaml("recolor:\n  num_reduced_colors: 0").unwrap_err();
    assert!(err.to_string().contains("num_reduced_colors"));
}

#[test]
fn test_validate_negative_blur_radius() {
    let err = Config::from_yaml("recolor:\n  blur_radius: -1.0").unwrap_err();
    assert!(err.to_string().contains("blur_radius"));
}

#[test]
fn test_validate_denoising_out_of_range() {
    let err = Config::from_yaml("styling:\n  denoising_strength: 1.5").unwrap_err();
    assert!(err.to_string().contains("styling.denoising_strength"));
}

#[test]
fn test_validate_extension_with_leading_dot() {
    let err = Config::from_yaml("descriptor_extension: .json").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("descriptor_extension"));
    assert!(msg.contains("Use 'json' instead"));
}

#[test]
fn test_validate_non_png_image_extension() {
    let err = Config::from_yaml("image_extension: jpg").unwrap_err();
    assert!(matches!(err, ForgeError::ConfigError(_)));
    assert!(err.to_string().contains("image_extension must be 'png'"));

    let config = Config::from_yaml("image_extension: PNG").unwrap();
    assert_eq!(config.image_extension, "PNG");
}

#[test]
fn test_validate_zero_lock_stale_minutes() {
    let err = Config::from_yaml("lock_stale_minutes: 0").unwrap_err();
    assert!(err.to_string().contains("lock_stale_minutes"));
    assert!(err.to_string().contains("greater than 0"));
}

#[test]
fn test_to_yaml_round_trips() {
    let config = Config::default();
    let yaml = config.to_yaml().unwrap();

    let parsed = Config::from_yaml(&yaml).unwrap();
    assert_eq!(parsed.color_schemes, config.color_schemes);
    assert_eq!(parsed.recolor, config.recolor);
    assert_eq!(parsed.variant, config.variant);
}

#[test]
fn test_config_load_from_file() {
    use std::io::Write;
    use tempfile::NamedTempFile;

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "tasks_dir: ideas").unwrap();
    writeln!(file, "output_dir: out").unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.tasks_dir, "ideas");
    assert_eq!(config.output_dir, "out");
}

#[test]
fn test_config_load_missing_file() {
    let err = Config::load("/nonexistent/path/tintforge.yaml").unwrap_err();
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
fn test_load_or_default_without_file() {
    let config = Config::load_or_default("/nonexistent/path/tintforge.yaml").unwrap();
    assert_eq!(config.tasks_dir, "ImgIdeas");
}
