//! Frame compositing: padding, aspect-ratio fitting, rounded corners and drop shadow.
//!
//! The compositor turns the subject screenshot into a canvas-sized raster that
//! is later blended over the generated background. Geometry is integer pixel
//! math so the subject lands on exact pixel boundaries.

use super::raster::{Raster, check_dimensions};
use crate::error::Result;
use crate::util::Point;

/// Gaussian-equivalent blur radius of the drop shadow, in pixels.
pub const SHADOW_BLUR_RADIUS: i32 = 10;
/// Shadow displacement relative to the subject, in pixels.
pub const SHADOW_OFFSET: (i32, i32) = (6, 6);
/// Peak opacity of the (black) shadow.
pub const SHADOW_ALPHA: u8 = 150;

/// Accepted aspect ratios, matching what the editor exposes.
pub const MIN_ASPECT_RATIO: f64 = 0.2;
pub const MAX_ASPECT_RATIO: f64 = 5.0;

const SUPERSAMPLE: i32 = 4;

/// Frame treatment applied to the subject before background compositing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameConfig {
    /// Uniform padding around the subject in pixels.
    pub padding: i32,
    /// Radius of the subject's rounded corners in pixels (0 = square).
    pub corner_radius: i32,
    /// Forced `width / height` ratio reached by extra padding; `None` keeps the natural size.
    pub aspect_ratio: Option<f64>,
    pub shadow_enabled: bool,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            padding: 48,
            corner_radius: 12,
            aspect_ratio: None,
            shadow_enabled: true,
        }
    }
}

impl FrameConfig {
    /// Canvas size for a subject of `width` x `height`.
    pub fn canvas_size(&self, width: i32, height: i32) -> (i32, i32) {
        let padding = self.padding.max(0);
        let mut canvas_w = width + padding * 2;
        let mut canvas_h = height + padding * 2;

        if let Some(ratio) = self.aspect_ratio.filter(|r| r.is_finite() && *r > 0.0) {
            let current = canvas_w as f64 / canvas_h as f64;
            if current < ratio {
                canvas_w = (canvas_h as f64 * ratio) as i32;
            } else if current > ratio {
                canvas_h = (canvas_w as f64 / ratio) as i32;
            }
        }

        (canvas_w.max(width), canvas_h.max(height))
    }

    /// Top-left position of the subject inside the canvas.
    pub fn subject_origin(&self, width: i32, height: i32) -> (i32, i32) {
        let (canvas_w, canvas_h) = self.canvas_size(width, height);
        ((canvas_w - width) / 2, (canvas_h - height) / 2)
    }
}

/// Parses an aspect ratio written as `"16:9"` or a decimal like `"1.5"`.
///
/// `"auto"` and the empty string mean no forced ratio. Values outside
/// 0.2..=5.0 or malformed input are rejected with `None` and a warning.
pub fn parse_aspect_ratio(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("auto") {
        return None;
    }

    let ratio = match text.split_once(':') {
        Some((w, h)) => {
            let w = w.trim().parse::<f64>().ok();
            let h = h.trim().parse::<f64>().ok();
            match (w, h) {
                (Some(w), Some(h)) if h != 0.0 => Some(w / h),
                _ => None,
            }
        }
        None => text.parse::<f64>().ok(),
    };

    match ratio {
        Some(r) if r.is_finite() && (MIN_ASPECT_RATIO..=MAX_ASPECT_RATIO).contains(&r) => Some(r),
        _ => {
            log::warn!("Ignoring invalid aspect ratio '{}'", text);
            None
        }
    }
}

/// Output of [`compose_frame`].
#[derive(Clone, Debug)]
pub struct FramedImage {
    /// Canvas-sized raster containing the padded, rounded, shadowed subject.
    pub raster: Raster,
    /// Where the subject's top-left pixel sits inside `raster`.
    pub origin: Point,
}

/// Applies `config` to `subject`.
///
/// Padding is transparent unless `backdrop` is given, in which case the
/// backdrop (expected to be canvas-sized) shows through instead.
pub fn compose_frame(
    subject: &Raster,
    config: &FrameConfig,
    backdrop: Option<&Raster>,
) -> Result<FramedImage> {
    let (width, height) = subject.size();
    check_dimensions(width, height)?;
    let (canvas_w, canvas_h) = config.canvas_size(width, height);
    let (origin_x, origin_y) = config.subject_origin(width, height);

    let mut canvas = Raster::new(canvas_w, canvas_h)?;
    if let Some(backdrop) = backdrop {
        canvas.composite_over(backdrop, 0, 0);
    }

    let mut rounded = subject.clone();
    apply_rounded_corners(&mut rounded, config.corner_radius);

    if config.shadow_enabled {
        let shadow = build_shadow(&rounded, canvas_w, canvas_h, origin_x, origin_y)?;
        canvas.composite_over(&shadow, 0, 0);
    }

    canvas.composite_over(&rounded, origin_x, origin_y);

    Ok(FramedImage {
        raster: canvas,
        origin: Point::new(origin_x as f64, origin_y as f64),
    })
}

/// Multiplies the raster's alpha by a supersampled rounded-rectangle mask.
pub fn apply_rounded_corners(raster: &mut Raster, radius: i32) {
    let (width, height) = raster.size();
    let radius = radius.min(width / 2).min(height / 2);
    if radius <= 0 {
        return;
    }

    let r = radius as f64;
    let corners = [
        (0, 0, r, r),
        (width - radius, 0, width as f64 - r, r),
        (0, height - radius, r, height as f64 - r),
        (width - radius, height - radius, width as f64 - r, height as f64 - r),
    ];

    let samples = (SUPERSAMPLE * SUPERSAMPLE) as u32;
    let data = raster.as_bytes_mut();
    for &(x0, y0, cx, cy) in &corners {
        for y in y0..y0 + radius {
            for x in x0..x0 + radius {
                let mut covered = 0u32;
                for sy in 0..SUPERSAMPLE {
                    for sx in 0..SUPERSAMPLE {
                        let px = x as f64 + (sx as f64 + 0.5) / SUPERSAMPLE as f64;
                        let py = y as f64 + (sy as f64 + 0.5) / SUPERSAMPLE as f64;
                        if (px - cx).hypot(py - cy) <= r {
                            covered += 1;
                        }
                    }
                }
                let i = (y as usize * width as usize + x as usize) * 4 + 3;
                let alpha = data[i] as u32;
                data[i] = ((alpha * covered + samples / 2) / samples) as u8;
            }
        }
    }
}

fn build_shadow(
    subject: &Raster,
    canvas_w: i32,
    canvas_h: i32,
    origin_x: i32,
    origin_y: i32,
) -> Result<Raster> {
    let (cw, ch) = (canvas_w as usize, canvas_h as usize);
    let mut alpha = vec![0f32; cw * ch];

    let (dx, dy) = SHADOW_OFFSET;
    let bytes = subject.as_bytes();
    for y in 0..subject.height() {
        let ty = origin_y + dy + y;
        if ty < 0 || ty >= canvas_h {
            continue;
        }
        for x in 0..subject.width() {
            let tx = origin_x + dx + x;
            if tx < 0 || tx >= canvas_w {
                continue;
            }
            let a = bytes[(y as usize * subject.width() as usize + x as usize) * 4 + 3];
            alpha[ty as usize * cw + tx as usize] = a as f32 * SHADOW_ALPHA as f32 / 255.0;
        }
    }

    // Three box passes approximate a gaussian of the shadow radius.
    let box_radius = (SHADOW_BLUR_RADIUS / 2).max(1) as usize;
    for _ in 0..3 {
        box_blur_horizontal(&mut alpha, cw, ch, box_radius);
        box_blur_vertical(&mut alpha, cw, ch, box_radius);
    }

    let mut data = Vec::with_capacity(cw * ch * 4);
    for a in alpha {
        data.extend_from_slice(&[0, 0, 0, a.round().clamp(0.0, 255.0) as u8]);
    }
    Raster::from_rgba(canvas_w, canvas_h, data)
}

fn box_blur_horizontal(plane: &mut [f32], width: usize, height: usize, radius: usize) {
    let window = (radius * 2 + 1) as f32;
    let mut row = vec![0f32; width];
    for y in 0..height {
        let line = &mut plane[y * width..(y + 1) * width];
        row.copy_from_slice(line);
        let mut sum: f32 = row.iter().take(radius + 1).sum();
        for x in 0..width {
            line[x] = sum / window;
            if x + radius + 1 < width {
                sum += row[x + radius + 1];
            }
            if x >= radius {
                sum -= row[x - radius];
            }
        }
    }
}

fn box_blur_vertical(plane: &mut [f32], width: usize, height: usize, radius: usize) {
    let window = (radius * 2 + 1) as f32;
    let mut column = vec![0f32; height];
    for x in 0..width {
        for y in 0..height {
            column[y] = plane[y * width + x];
        }
        let mut sum: f32 = column.iter().take(radius + 1).sum();
        for y in 0..height {
            plane[y * width + x] = sum / window;
            if y + radius + 1 < height {
                sum += column[y + radius + 1];
            }
            if y >= radius {
                sum -= column[y - radius];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::Color;

    fn square_config(padding: i32) -> FrameConfig {
        FrameConfig {
            padding,
            corner_radius: 0,
            aspect_ratio: None,
            shadow_enabled: false,
        }
    }

    #[test]
    fn padding_grows_canvas_on_every_side() {
        let subject = Raster::filled(30, 20, Color::rgb(0, 0, 255)).unwrap();
        let framed = compose_frame(&subject, &square_config(10), None).unwrap();
        assert_eq!(framed.raster.size(), (50, 40));
        assert_eq!(framed.origin, Point::new(10.0, 10.0));
        assert_eq!(framed.raster.pixel(0, 0), Some(Color::rgba(0, 0, 0, 0)));
        assert_eq!(framed.raster.pixel(10, 10), Some(Color::rgb(0, 0, 255)));
        assert_eq!(framed.raster.pixel(39, 29), Some(Color::rgb(0, 0, 255)));
        assert_eq!(framed.raster.pixel(40, 30), Some(Color::rgba(0, 0, 0, 0)));
    }

    #[test]
    fn aspect_ratio_is_reached_by_padding_only() {
        let config = FrameConfig {
            aspect_ratio: Some(16.0 / 9.0),
            ..square_config(0)
        };
        assert_eq!(config.canvas_size(100, 100), (177, 100));
        assert_eq!(config.subject_origin(100, 100), (38, 0));

        let tall = FrameConfig {
            aspect_ratio: Some(0.5),
            ..square_config(0)
        };
        assert_eq!(tall.canvas_size(100, 100), (100, 200));
    }

    #[test]
    fn rounded_corners_clear_the_outer_corner() {
        let mut raster = Raster::filled(40, 40, Color::rgb(255, 255, 255)).unwrap();
        apply_rounded_corners(&mut raster, 10);
        assert_eq!(raster.pixel(0, 0).unwrap().a, 0);
        assert_eq!(raster.pixel(39, 0).unwrap().a, 0);
        assert_eq!(raster.pixel(0, 39).unwrap().a, 0);
        assert_eq!(raster.pixel(39, 39).unwrap().a, 0);
        assert_eq!(raster.pixel(20, 0).unwrap().a, 255);
        assert_eq!(raster.pixel(5, 5).unwrap().a, 255);
        let edge = raster.pixel(1, 4).unwrap().a;
        assert!(edge > 0 && edge < 255);
    }

    #[test]
    fn corner_radius_is_clamped_to_half_the_short_side() {
        let mut raster = Raster::filled(10, 4, Color::rgb(255, 255, 255)).unwrap();
        apply_rounded_corners(&mut raster, 100);
        assert!(raster.pixel(0, 0).unwrap().a < 255);
        assert_eq!(raster.pixel(2, 0).unwrap().a, 255);
        assert_eq!(raster.pixel(5, 2).unwrap().a, 255);
    }

    #[test]
    fn shadow_darkens_padding_below_subject() {
        let subject = Raster::filled(20, 20, Color::rgb(255, 255, 255)).unwrap();
        let config = FrameConfig {
            shadow_enabled: true,
            ..square_config(30)
        };
        let framed = compose_frame(&subject, &config, None).unwrap();
        let below = framed.raster.pixel(45, 53).unwrap();
        assert_eq!((below.r, below.g, below.b), (0, 0, 0));
        assert!(below.a > 0 && below.a <= SHADOW_ALPHA);
        assert_eq!(framed.raster.pixel(0, 0).unwrap().a, 0);
        assert_eq!(framed.raster.pixel(40, 40), Some(Color::rgb(255, 255, 255)));
    }

    #[test]
    fn backdrop_fills_padding() {
        let subject = Raster::filled(4, 4, Color::rgb(0, 0, 255)).unwrap();
        let backdrop = Raster::filled(8, 8, Color::rgb(9, 9, 9)).unwrap();
        let framed = compose_frame(&subject, &square_config(2), Some(&backdrop)).unwrap();
        assert_eq!(framed.raster.pixel(0, 0), Some(Color::rgb(9, 9, 9)));
        assert_eq!(framed.raster.pixel(3, 3), Some(Color::rgb(0, 0, 255)));
    }

    #[test]
    fn parses_aspect_ratio_strings() {
        assert_eq!(parse_aspect_ratio("auto"), None);
        assert_eq!(parse_aspect_ratio(""), None);
        assert_eq!(parse_aspect_ratio("2:1"), Some(2.0));
        assert_eq!(parse_aspect_ratio(" 1.5 "), Some(1.5));
        assert_eq!(parse_aspect_ratio("16:0"), None);
        assert_eq!(parse_aspect_ratio("10:1"), None);
        assert_eq!(parse_aspect_ratio("wide"), None);
    }
}
