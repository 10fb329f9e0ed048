//! Screen-to-image coordinate mapping supplied by the view layer.

use crate::util::Point;

/// Uniform zoom plus pan: `screen = image * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ViewTransform {
    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    /// Creates a transform; non-positive or non-finite scales fall back to 1.0.
    pub fn new(scale: f64, offset_x: f64, offset_y: f64) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        Self {
            scale,
            offset_x,
            offset_y,
        }
    }

    pub fn screen_to_image(&self, x: f64, y: f64) -> Point {
        Point::new((x - self.offset_x) / self.scale, (y - self.offset_y) / self.scale)
    }

    pub fn image_to_screen(&self, point: Point) -> (f64, f64) {
        (
            point.x * self.scale + self.offset_x,
            point.y * self.scale + self.offset_y,
        )
    }

    /// Converts a screen-space distance (e.g. a handle radius) to image space.
    pub fn image_distance(&self, screen_pixels: f64) -> f64 {
        screen_pixels / self.scale
    }
}
