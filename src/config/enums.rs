//! Configuration enum types.

use crate::draw::{Background, Color, GRADIENT_PRESETS, Raster, color::*};
use crate::export::file::expand_tilde;
use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Color specification - a named color, a hex string, or RGB(A) values.
///
/// # Examples
/// ```toml
/// # Named color
/// default_color = "red"
///
/// # Hex, optionally with alpha
/// default_color = "#ff8800cc"
///
/// # Custom RGB color (0-255 per component)
/// default_color = [255, 128, 0]
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Named color (red, green, blue, yellow, orange, pink, white, black) or `#rrggbb[aa]`
    Name(String),
    /// RGB color as [red, green, blue] where each component is 0-255
    Rgb([u8; 3]),
    /// RGBA color as [red, green, blue, alpha]
    Rgba([u8; 4]),
}

impl ColorSpec {
    /// Converts the color specification to a [`Color`].
    ///
    /// Unknown names fall back to `fallback` with a warning.
    pub fn to_color_or(&self, fallback: Color) -> Color {
        match self {
            ColorSpec::Name(name) => name_to_color(name)
                .or_else(|| Color::from_hex(name))
                .unwrap_or_else(|| {
                    warn!("Unknown color '{}', using {}", name, fallback.to_hex());
                    fallback
                }),
            ColorSpec::Rgb([r, g, b]) => Color::rgb(*r, *g, *b),
            ColorSpec::Rgba([r, g, b, a]) => Color::rgba(*r, *g, *b, *a),
        }
    }

    pub fn to_color(&self) -> Color {
        self.to_color_or(WHITE)
    }
}

impl From<Color> for ColorSpec {
    fn from(color: Color) -> Self {
        ColorSpec::Name(color.to_hex())
    }
}

/// Background used for new sessions.
///
/// # Examples
/// ```toml
/// [background]
/// type = "gradient"
/// start = "#4a90e2"
/// end = "#50e3c2"
/// angle = 0.0
///
/// # or
/// [background]
/// type = "preset"
/// index = 2
///
/// # or a wallpaper, scaled to cover the canvas
/// [background]
/// type = "image"
/// path = "~/Pictures/wallpaper.jpg"
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BackgroundSettings {
    Solid {
        #[serde(default = "default_solid_color")]
        color: ColorSpec,
    },
    Gradient {
        #[serde(default = "default_gradient_start")]
        start: ColorSpec,
        #[serde(default = "default_gradient_end")]
        end: ColorSpec,
        /// Direction in degrees; 0 runs left to right, 90 top to bottom
        #[serde(default)]
        angle: f64,
    },
    /// One of the built-in gradient presets (0-based)
    Preset {
        #[serde(default)]
        index: usize,
    },
    /// PNG, JPEG or WebP file (`~` is expanded)
    Image { path: String },
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        BackgroundSettings::Gradient {
            start: default_gradient_start(),
            end: default_gradient_end(),
            angle: 0.0,
        }
    }
}

impl BackgroundSettings {
    /// Builds the background; an image that cannot be read falls back to the
    /// default background with a warning.
    pub fn to_background(&self) -> Background {
        match self {
            BackgroundSettings::Solid { color } => Background::Solid {
                color: color.to_color_or(BLACK),
            },
            BackgroundSettings::Gradient { start, end, angle } => Background::Gradient {
                start: start.to_color_or(BLACK),
                end: end.to_color_or(WHITE),
                angle_degrees: *angle,
            },
            BackgroundSettings::Preset { index } => {
                let (start, end, angle_degrees) =
                    GRADIENT_PRESETS[(*index).min(GRADIENT_PRESETS.len() - 1)];
                Background::Gradient {
                    start,
                    end,
                    angle_degrees,
                }
            }
            BackgroundSettings::Image { path } => match Raster::open(&expand_tilde(path)) {
                Ok(raster) => Background::Image {
                    source: Arc::new(raster),
                },
                Err(e) => {
                    warn!("Failed to load background image '{}': {}", path, e);
                    Background::default()
                }
            },
        }
    }
}

fn default_solid_color() -> ColorSpec {
    ColorSpec::Name("#ffffff".to_string())
}

fn default_gradient_start() -> ColorSpec {
    ColorSpec::Name("#4a90e2".to_string())
}

fn default_gradient_end() -> ColorSpec {
    ColorSpec::Name("#50e3c2".to_string())
}
