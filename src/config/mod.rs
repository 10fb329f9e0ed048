//! Configuration file support for shotframe.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/shotframe/config.toml`. Settings include the drawing style for
//! new annotations, frame treatment, the default background, and export options.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

pub use enums::{BackgroundSettings, ColorSpec};
pub use types::{DrawingConfig, ExportConfig, FrameSettings};

use crate::draw::font::{parse_style, parse_weight};
use crate::draw::{Background, FontDescriptor, FrameConfig, color::WHITE, parse_aspect_ratio};
use crate::export::{ExportFormat, FileSaveConfig, file::expand_tilde};
use crate::input::ToolStyle;
use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [drawing]
/// default_color = "red"
/// stroke_width = 3.0
/// font_size = 22.0
///
/// [frame]
/// padding = 48
/// corner_radius = 12
/// aspect_ratio = "16:9"
/// shadow = true
///
/// [background]
/// type = "preset"
/// index = 1
///
/// [export]
/// save_directory = "~/Pictures/Shotframe"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Style for new annotations
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Padding, rounding, aspect ratio and shadow around the subject
    #[serde(default)]
    pub frame: FrameSettings,

    /// Background behind the framed subject
    #[serde(default)]
    pub background: BackgroundSettings,

    /// Export destination and naming
    #[serde(default)]
    pub export: ExportConfig,
}

/// Clamps `value` into `range`, logging a warning when it was out of bounds.
fn clamp_f64(value: &mut f64, min: f64, max: f64, name: &str) {
    if !(min..=max).contains(&*value) {
        log::warn!(
            "Invalid {} {:.1}, clamping to {:.1}-{:.1} range",
            name,
            value,
            min,
            max
        );
        *value = if value.is_nan() { min } else { (*value).clamp(min, max) };
    }
}

fn clamp_i32(value: &mut i32, min: i32, max: i32, name: &str) {
    if !(min..=max).contains(&*value) {
        log::warn!(
            "Invalid {} {}, clamping to {}-{} range",
            name,
            value,
            min,
            max
        );
        *value = (*value).clamp(min, max);
    }
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `stroke_width`: 1.0 - 50.0
    /// - `font_size`: 8.0 - 200.0
    /// - `arrow_head_size`: 5.0 - 100.0
    /// - `censor_block`: 2.0 - 64.0
    /// - `padding`: 0 - 1000, `corner_radius`: 0 - 500
    /// - `aspect_ratio`: "auto" or 0.2 - 5.0
    pub fn validate_and_clamp(&mut self) {
        let drawing = &mut self.drawing;
        clamp_f64(&mut drawing.stroke_width, 1.0, 50.0, "stroke_width");
        clamp_f64(&mut drawing.font_size, 8.0, 200.0, "font_size");
        clamp_f64(&mut drawing.arrow_head_size, 5.0, 100.0, "arrow_head_size");
        clamp_f64(&mut drawing.highlighter_width, 1.0, 100.0, "highlighter_width");
        clamp_f64(&mut drawing.censor_block, 2.0, 64.0, "censor_block");
        clamp_f64(&mut drawing.number_radius, 4.0, 100.0, "number_radius");
        clamp_f64(
            &mut drawing.rectangle_corner_radius,
            0.0,
            500.0,
            "rectangle_corner_radius",
        );

        if parse_weight(&drawing.font_weight).is_none() {
            log::warn!(
                "Invalid font_weight '{}', falling back to 'bold'",
                drawing.font_weight
            );
            drawing.font_weight = "bold".to_string();
        }

        if parse_style(&drawing.font_style).is_none() {
            log::warn!(
                "Invalid font_style '{}', falling back to 'normal'",
                drawing.font_style
            );
            drawing.font_style = "normal".to_string();
        }

        clamp_i32(&mut self.frame.padding, 0, 1000, "padding");
        clamp_i32(&mut self.frame.corner_radius, 0, 500, "corner_radius");

        let aspect = self.frame.aspect_ratio.trim();
        if !aspect.is_empty()
            && !aspect.eq_ignore_ascii_case("auto")
            && parse_aspect_ratio(aspect).is_none()
        {
            log::warn!(
                "Invalid aspect_ratio '{}', falling back to 'auto'",
                self.frame.aspect_ratio
            );
            self.frame.aspect_ratio = "auto".to_string();
        }

        match &mut self.background {
            BackgroundSettings::Gradient { angle, .. } => {
                if !angle.is_finite() {
                    log::warn!("Invalid gradient angle, using 0");
                    *angle = 0.0;
                } else if !(0.0..360.0).contains(&*angle) {
                    *angle = angle.rem_euclid(360.0);
                }
            }
            BackgroundSettings::Preset { index } => {
                let max = crate::draw::GRADIENT_PRESETS.len() - 1;
                if *index > max {
                    log::warn!("Invalid gradient preset {}, clamping to 0-{}", index, max);
                    *index = max;
                }
            }
            BackgroundSettings::Image { .. } | BackgroundSettings::Solid { .. } => {}
        }
        if matches!(&self.background, BackgroundSettings::Image { path } if path.trim().is_empty())
        {
            log::warn!("Empty background image path, using the default background");
            self.background = BackgroundSettings::default();
        }

        if self.export.filename_template.trim().is_empty() {
            log::warn!("Empty export filename_template, using default");
            self.export.filename_template = ExportConfig::default().filename_template;
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/shotframe/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("shotframe");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default path, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads and validates configuration from an explicit file.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config = Self::from_toml_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        config.validate_and_clamp();
        Ok(config)
    }

    /// Parses TOML text and clamps the result.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(text).context("Invalid config TOML")?;
        config.validate_and_clamp();
        Ok(config)
    }

    /// Saves the configuration to the default path, creating the directory if needed.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, config_str)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// Creates a default configuration file with documentation comments.
    ///
    /// # Errors
    /// Returns an error if:
    /// - A config file already exists at the target path
    /// - The config directory cannot be created
    /// - The file cannot be written
    pub fn create_default_file() -> Result<PathBuf> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                config_path.display()
            ));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let default_config = include_str!("../../config.example.toml");
        fs::write(&config_path, default_config)?;

        info!("Created default config at {}", config_path.display());
        Ok(config_path)
    }

    /// JSON schema describing the config file, for editors and tooling.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Style for new annotations.
    pub fn tool_style(&self) -> ToolStyle {
        let drawing = &self.drawing;
        ToolStyle {
            color: drawing.default_color.to_color_or(WHITE),
            fill: drawing.fill_color.as_ref().map(|c| c.to_color_or(WHITE)),
            stroke_width: drawing.stroke_width,
            font_size: drawing.font_size,
            font: FontDescriptor::new(
                drawing.font_family.clone(),
                drawing.font_weight.clone(),
                drawing.font_style.clone(),
            ),
            arrow_head_size: drawing.arrow_head_size,
            highlighter_width: drawing.highlighter_width,
            censor_block: drawing.censor_block,
            number_radius: drawing.number_radius,
            corner_radius: drawing.rectangle_corner_radius,
        }
    }

    pub fn frame_config(&self) -> FrameConfig {
        FrameConfig {
            padding: self.frame.padding,
            corner_radius: self.frame.corner_radius,
            aspect_ratio: parse_aspect_ratio(&self.frame.aspect_ratio),
            shadow_enabled: self.frame.shadow,
        }
    }

    pub fn background(&self) -> Background {
        self.background.to_background()
    }

    pub fn file_save_config(&self) -> FileSaveConfig {
        FileSaveConfig {
            save_directory: expand_tilde(&self.export.save_directory),
            filename_template: self.export.filename_template.clone(),
        }
    }

    pub fn export_format(&self) -> ExportFormat {
        self.export.format
    }
}
