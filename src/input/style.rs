//! Style applied to newly created annotations.

use crate::draw::color::HIGHLIGHTER_ALPHA;
use crate::draw::{Color, FontDescriptor};

pub const MIN_STROKE_WIDTH: f64 = 1.0;
pub const MIN_ARROW_HEAD_SIZE: f64 = 5.0;
pub const MIN_FONT_SIZE: f64 = 8.0;
pub const MIN_CENSOR_BLOCK: f64 = crate::draw::render::MIN_CENSOR_BLOCK;
pub const MIN_NUMBER_RADIUS: f64 = 4.0;

/// Current drawing parameters, pushed in by the front-end's tool options.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolStyle {
    /// Stroke color for pens, lines and shape outlines; also text and marker color
    pub color: Color,
    /// Optional fill for rectangles and ellipses
    pub fill: Option<Color>,
    pub stroke_width: f64,
    pub font_size: f64,
    pub font: FontDescriptor,
    pub arrow_head_size: f64,
    pub highlighter_width: f64,
    /// Pixelation block size for the censor tool
    pub censor_block: f64,
    pub number_radius: f64,
    /// Corner radius for new rectangles
    pub corner_radius: f64,
}

impl Default for ToolStyle {
    fn default() -> Self {
        Self {
            color: Color::rgba(255, 255, 255, 204),
            fill: None,
            stroke_width: 3.0,
            font_size: 22.0,
            font: FontDescriptor::default(),
            arrow_head_size: 25.0,
            highlighter_width: 12.0,
            censor_block: 8.0,
            number_radius: 16.0,
            corner_radius: 0.0,
        }
    }
}

impl ToolStyle {
    /// Highlighter color: the current color at the fixed highlighter opacity.
    pub fn highlighter_color(&self) -> Color {
        self.color.with_alpha(HIGHLIGHTER_ALPHA)
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        self.stroke_width = width.max(MIN_STROKE_WIDTH);
    }

    pub fn set_arrow_head_size(&mut self, size: f64) {
        self.arrow_head_size = size.max(MIN_ARROW_HEAD_SIZE);
    }

    pub fn set_font_size(&mut self, size: f64) {
        self.font_size = size.max(MIN_FONT_SIZE);
    }

    pub fn set_highlighter_width(&mut self, width: f64) {
        self.highlighter_width = width.max(MIN_STROKE_WIDTH);
    }

    pub fn set_censor_block(&mut self, block: f64) {
        self.censor_block = block.max(MIN_CENSOR_BLOCK);
    }

    pub fn set_number_radius(&mut self, radius: f64) {
        self.number_radius = radius.max(MIN_NUMBER_RADIUS);
    }

    pub fn set_corner_radius(&mut self, radius: f64) {
        self.corner_radius = radius.max(0.0);
    }
}
