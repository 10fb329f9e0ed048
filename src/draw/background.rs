//! Background generation: solid fills, linear gradients and cover-scaled images.
//!
//! Every generator produces an opaque raster of exactly the requested size so
//! the frame compositor can place the subject on top of it.

use super::color::Color;
use super::raster::{Raster, check_dimensions};
use crate::error::Result;
use cairo::{Context, Extend, Filter, SurfacePattern};
use std::f64::consts::PI;
use std::sync::Arc;

/// Background descriptor owned by the scene.
///
/// Immutable once built; changing the background replaces the whole value.
#[derive(Clone, Debug)]
pub enum Background {
    /// Uniform opaque color.
    Solid { color: Color },
    /// Linear gradient from `start` to `end` along `angle_degrees` (0 = left to right).
    Gradient {
        start: Color,
        end: Color,
        angle_degrees: f64,
    },
    /// Image scaled to cover the canvas and cropped around its center.
    Image { source: Arc<Raster> },
}

impl PartialEq for Background {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Background::Solid { color: a }, Background::Solid { color: b }) => a == b,
            (
                Background::Gradient {
                    start: s1,
                    end: e1,
                    angle_degrees: a1,
                },
                Background::Gradient {
                    start: s2,
                    end: e2,
                    angle_degrees: a2,
                },
            ) => s1 == s2 && e1 == e2 && a1 == a2,
            // Image backgrounds compare by identity; pixel comparison would be
            // too costly for cache lookups.
            (Background::Image { source: a }, Background::Image { source: b }) => {
                Arc::ptr_eq(a, b)
            }
            _ => false,
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        let (start, end, angle_degrees) = GRADIENT_PRESETS[0];
        Background::Gradient {
            start,
            end,
            angle_degrees,
        }
    }
}

/// Built-in gradient presets as `(start, end, angle)`.
pub const GRADIENT_PRESETS: [(Color, Color, f64); 7] = [
    (Color::rgb(0x4a, 0x90, 0xe2), Color::rgb(0x50, 0xe3, 0xc2), 0.0),
    (Color::rgb(0x36, 0xd1, 0xdc), Color::rgb(0x5b, 0x86, 0xe5), 90.0),
    (Color::rgb(0xff, 0x5f, 0x6d), Color::rgb(0xff, 0xc3, 0x71), 45.0),
    (Color::rgb(0x45, 0x33, 0x83), Color::rgb(0x54, 0x94, 0xe8), 0.0),
    (Color::rgb(0x00, 0xc6, 0xff), Color::rgb(0x00, 0x72, 0xff), 180.0),
    (Color::rgb(0x8f, 0xf0, 0xa4), Color::rgb(0x2e, 0xc2, 0x7e), 135.0),
    (Color::rgb(0xf6, 0xf5, 0xf4), Color::rgb(0x5e, 0x5c, 0x64), 135.0),
];

impl Background {
    /// Renders this background into a `width` x `height` raster.
    ///
    /// # Errors
    /// [`EngineError::InvalidDimensions`](crate::EngineError::InvalidDimensions)
    /// when either dimension is not positive.
    pub fn generate(&self, width: i32, height: i32) -> Result<Raster> {
        match self {
            Background::Solid { color } => Raster::filled(width, height, color.with_alpha(255)),
            Background::Gradient {
                start,
                end,
                angle_degrees,
            } => generate_gradient(width, height, *start, *end, *angle_degrees),
            Background::Image { source } => generate_image_fill(source, width, height),
        }
    }
}

/// Projection of pixel coordinates onto a gradient axis.
///
/// `t(x, y)` is the interpolation parameter used for the pixel at `(x, y)`.
#[derive(Clone, Copy, Debug)]
pub struct GradientAxis {
    cos_a: f64,
    sin_a: f64,
    min: f64,
    range: f64,
}

impl GradientAxis {
    pub fn new(width: i32, height: i32, angle_degrees: f64) -> Self {
        let cos_a = (angle_degrees * PI / 180.0).cos();
        let sin_a = (angle_degrees * PI / 180.0).sin();

        let w = (width - 1) as f64;
        let h = (height - 1) as f64;
        let corners = [0.0, w * cos_a, h * sin_a, w * cos_a + h * sin_a];

        let mut min = corners[0];
        let mut max = corners[0];
        for &corner in &corners[1..] {
            if corner < min {
                min = corner;
            }
            if corner > max {
                max = corner;
            }
        }

        let mut range = max - min;
        if range == 0.0 {
            range = 1.0;
        }

        Self {
            cos_a,
            sin_a,
            min,
            range,
        }
    }

    pub fn t(&self, x: i32, y: i32) -> f64 {
        let coord = x as f64 * self.cos_a + y as f64 * self.sin_a;
        ((coord - self.min) / self.range).clamp(0.0, 1.0)
    }
}

fn lerp_channel(start: u8, end: u8, t: f64) -> u8 {
    (start as f64 + (end as f64 - start as f64) * t) as u8
}

/// Generates an opaque linear gradient.
///
/// Channels are interpolated per pixel and truncated, never rounded, so the
/// output is reproducible bit for bit.
pub fn generate_gradient(
    width: i32,
    height: i32,
    start: Color,
    end: Color,
    angle_degrees: f64,
) -> Result<Raster> {
    check_dimensions(width, height)?;
    let axis = GradientAxis::new(width, height, angle_degrees);

    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            let t = axis.t(x, y);
            data.extend_from_slice(&[
                lerp_channel(start.r, end.r, t),
                lerp_channel(start.g, end.g, t),
                lerp_channel(start.b, end.b, t),
                255,
            ]);
        }
    }

    Raster::from_rgba(width, height, data)
}

/// Scales `source` uniformly so it covers the target, cropping the overflow evenly.
fn generate_image_fill(source: &Raster, width: i32, height: i32) -> Result<Raster> {
    check_dimensions(width, height)?;

    let (sw, sh) = (source.width() as f64, source.height() as f64);
    let scale = (width as f64 / sw).max(height as f64 / sh);
    let offset_x = (width as f64 - sw * scale) / 2.0;
    let offset_y = (height as f64 - sh * scale) / 2.0;

    let mut target = Raster::filled(width, height, Color::rgb(0, 0, 0))?;
    let source_surface = source.to_surface()?;
    target.paint_with(|ctx: &Context| {
        ctx.translate(offset_x, offset_y);
        ctx.scale(scale, scale);
        let pattern = SurfacePattern::create(&source_surface);
        pattern.set_extend(Extend::Pad);
        pattern.set_filter(Filter::Good);
        if ctx.set_source(&pattern).is_ok() {
            let _ = ctx.paint();
        }
    })?;

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    const BLACK: Color = Color::rgb(0, 0, 0);
    const WHITE: Color = Color::rgb(255, 255, 255);

    #[test]
    fn horizontal_gradient_truncates_channels() {
        let raster = generate_gradient(100, 1, BLACK, WHITE, 0.0).unwrap();
        assert_eq!(raster.pixel(0, 0), Some(Color::rgb(0, 0, 0)));
        assert_eq!(raster.pixel(99, 0), Some(Color::rgb(255, 255, 255)));
        assert_eq!(raster.pixel(49, 0), Some(Color::rgb(126, 126, 126)));
    }

    #[test]
    fn single_pixel_gradient_uses_start_color() {
        let start = Color::rgb(10, 20, 30);
        let raster = generate_gradient(1, 1, start, WHITE, 37.0).unwrap();
        assert_eq!(raster.pixel(0, 0), Some(start));
    }

    #[test]
    fn vertical_gradient_runs_top_to_bottom() {
        let raster = generate_gradient(3, 11, BLACK, WHITE, 90.0).unwrap();
        assert_eq!(raster.pixel(2, 0), Some(BLACK));
        assert_eq!(raster.pixel(0, 10), Some(WHITE));
        let mid = raster.pixel(1, 5).unwrap();
        assert!(mid.r > 100 && mid.r < 150);
    }

    #[test]
    fn corner_parameters_follow_the_axis() {
        for angle in 0..360 {
            let axis = GradientAxis::new(64, 48, angle as f64);
            let radians = angle as f64 * PI / 180.0;
            let corners = [(0, 0), (63, 0), (0, 47), (63, 47)];
            let projections: Vec<f64> = corners
                .iter()
                .map(|&(x, y)| x as f64 * radians.cos() + y as f64 * radians.sin())
                .collect();
            for i in 0..4 {
                for j in 0..4 {
                    if projections[i] < projections[j] - 1e-9 {
                        let (xi, yi) = corners[i];
                        let (xj, yj) = corners[j];
                        assert!(
                            axis.t(xi, yi) <= axis.t(xj, yj),
                            "angle {angle}: corner {i} should not exceed corner {j}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn invalid_dimensions_are_rejected() {
        let background = Background::Solid { color: BLACK };
        assert!(matches!(
            background.generate(0, 5),
            Err(EngineError::InvalidDimensions { .. })
        ));
        assert!(generate_gradient(5, -2, BLACK, WHITE, 0.0).is_err());
    }

    #[test]
    fn solid_background_is_opaque() {
        let background = Background::Solid {
            color: Color::rgba(10, 20, 30, 40),
        };
        let raster = background.generate(4, 3).unwrap();
        assert_eq!(raster.pixel(3, 2), Some(Color::rgb(10, 20, 30)));
    }

    #[test]
    fn image_background_covers_target() {
        let source = Arc::new(Raster::filled(10, 20, Color::rgb(200, 10, 10)).unwrap());
        let background = Background::Image { source };
        let raster = background.generate(40, 10).unwrap();
        assert_eq!(raster.size(), (40, 10));
        for &(x, y) in &[(0, 0), (39, 0), (0, 9), (39, 9), (20, 5)] {
            assert_eq!(raster.pixel(x, y), Some(Color::rgb(200, 10, 10)));
        }
    }

    #[test]
    fn image_backgrounds_compare_by_identity() {
        let source = Arc::new(Raster::filled(2, 2, BLACK).unwrap());
        let a = Background::Image {
            source: source.clone(),
        };
        let b = Background::Image { source };
        let c = Background::Image {
            source: Arc::new(Raster::filled(2, 2, BLACK).unwrap()),
        };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
