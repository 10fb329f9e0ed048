//! Configuration type definitions.

use super::enums::ColorSpec;
use crate::export::ExportFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Drawing-related settings.
///
/// Controls the style applied to new annotations when a session starts.
/// Front-ends can change these values at runtime through the tool options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Default annotation color - a named color, `#rrggbb[aa]`, or an RGB(A) array
    #[serde(default = "default_color")]
    pub default_color: ColorSpec,

    /// Optional fill for rectangles and ellipses; unset means outline only
    #[serde(default)]
    pub fill_color: Option<ColorSpec>,

    /// Stroke width in pixels (valid range: 1.0 - 50.0)
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,

    /// Font size for the text tool in points (valid range: 8.0 - 200.0)
    #[serde(default = "default_font_size")]
    pub font_size: f64,

    /// Font family name for text rendering (e.g., "Sans", "Monospace", "Caveat")
    /// Falls back to the system default if the family is not installed
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Font weight (e.g., "normal", "bold", "light", 400, 700)
    #[serde(default = "default_font_weight")]
    pub font_weight: String,

    /// Font style (e.g., "normal", "italic", "oblique")
    #[serde(default = "default_font_style")]
    pub font_style: String,

    /// Arrowhead length in pixels (valid range: 5.0 - 100.0)
    #[serde(default = "default_arrow_head_size")]
    pub arrow_head_size: f64,

    /// Highlighter stroke width in pixels (valid range: 1.0 - 100.0)
    #[serde(default = "default_highlighter_width")]
    pub highlighter_width: f64,

    /// Censor pixelation block size in pixels (valid range: 2.0 - 64.0)
    #[serde(default = "default_censor_block")]
    pub censor_block: f64,

    /// Number marker radius in pixels (valid range: 4.0 - 100.0)
    #[serde(default = "default_number_radius")]
    pub number_radius: f64,

    /// Corner radius for new rectangles in pixels
    #[serde(default)]
    pub rectangle_corner_radius: f64,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_color: default_color(),
            fill_color: None,
            stroke_width: default_stroke_width(),
            font_size: default_font_size(),
            font_family: default_font_family(),
            font_weight: default_font_weight(),
            font_style: default_font_style(),
            arrow_head_size: default_arrow_head_size(),
            highlighter_width: default_highlighter_width(),
            censor_block: default_censor_block(),
            number_radius: default_number_radius(),
            rectangle_corner_radius: 0.0,
        }
    }
}

/// Frame treatment around the subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FrameSettings {
    /// Padding around the subject in pixels (valid range: 0 - 1000)
    #[serde(default = "default_padding")]
    pub padding: i32,

    /// Rounded corner radius of the subject in pixels (valid range: 0 - 500)
    #[serde(default = "default_corner_radius")]
    pub corner_radius: i32,

    /// Forced aspect ratio such as "16:9" or "1.5"; "auto" keeps the natural size
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,

    /// Draw a soft drop shadow beneath the subject
    #[serde(default = "default_shadow")]
    pub shadow: bool,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            padding: default_padding(),
            corner_radius: default_corner_radius(),
            aspect_ratio: default_aspect_ratio(),
            shadow: default_shadow(),
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExportConfig {
    /// Directory for exported images (`~` is expanded)
    #[serde(default = "default_save_directory")]
    pub save_directory: String,

    /// File name template using chrono format specifiers, without extension
    #[serde(default = "default_filename_template")]
    pub filename_template: String,

    /// Encoded format: "png", "jpeg" (quality 90) or "webp" (lossless)
    #[serde(default)]
    pub format: ExportFormat,

    /// Also copy exports to the clipboard when a provider is available
    #[serde(default)]
    pub copy_to_clipboard: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            save_directory: default_save_directory(),
            filename_template: default_filename_template(),
            format: ExportFormat::default(),
            copy_to_clipboard: false,
        }
    }
}

fn default_color() -> ColorSpec {
    ColorSpec::Rgba([255, 255, 255, 204])
}

fn default_stroke_width() -> f64 {
    3.0
}

fn default_font_size() -> f64 {
    22.0
}

fn default_font_family() -> String {
    "Sans".to_string()
}

fn default_font_weight() -> String {
    "bold".to_string()
}

fn default_font_style() -> String {
    "normal".to_string()
}

fn default_arrow_head_size() -> f64 {
    25.0
}

fn default_highlighter_width() -> f64 {
    12.0
}

fn default_censor_block() -> f64 {
    8.0
}

fn default_number_radius() -> f64 {
    16.0
}

fn default_padding() -> i32 {
    48
}

fn default_corner_radius() -> i32 {
    12
}

fn default_aspect_ratio() -> String {
    "auto".to_string()
}

fn default_shadow() -> bool {
    true
}

fn default_save_directory() -> String {
    "~/Pictures/Shotframe".to_string()
}

fn default_filename_template() -> String {
    "shotframe_%Y-%m-%d_%H%M%S".to_string()
}
