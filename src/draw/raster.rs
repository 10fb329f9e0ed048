//! Owned RGBA pixel buffers and their bridge to cairo image surfaces.
//!
//! Compositing math (gradients, masks, shadows, pixelation) runs directly on
//! [`Raster`] pixels so results are exact. Vector painting borrows cairo by
//! converting to an ARGB32 surface and back; opaque pixels survive that round
//! trip unchanged.

use super::color::Color;
use crate::error::{EngineError, Result};
use cairo::{Context, Format, ImageSurface};
use std::io::Cursor;
use std::path::Path;

/// A straight-alpha RGBA8 image, row-major with no padding between rows.
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    width: i32,
    height: i32,
    data: Vec<u8>,
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

pub(crate) fn check_dimensions(width: i32, height: i32) -> Result<()> {
    if width <= 0 || height <= 0 {
        return Err(EngineError::InvalidDimensions { width, height });
    }
    Ok(())
}

impl Raster {
    /// Creates a fully transparent raster.
    pub fn new(width: i32, height: i32) -> Result<Self> {
        Self::filled(width, height, Color::rgba(0, 0, 0, 0))
    }

    pub fn filled(width: i32, height: i32, color: Color) -> Result<Self> {
        check_dimensions(width, height)?;
        let data = color
            .to_array()
            .repeat(width as usize * height as usize);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wraps existing RGBA bytes. The buffer length must match the dimensions exactly.
    pub fn from_rgba(width: i32, height: i32, data: Vec<u8>) -> Result<Self> {
        check_dimensions(width, height)?;
        if data.len() != width as usize * height as usize * 4 {
            return Err(EngineError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Raw RGBA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        let i = self.offset(x, y)?;
        let p = &self.data[i..i + 4];
        Some(Color::rgba(p[0], p[1], p[2], p[3]))
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.offset(x, y) {
            self.data[i..i + 4].copy_from_slice(&color.to_array());
        }
    }

    /// Blends `src` over this raster with its top-left corner at `(x, y)`.
    ///
    /// Pixels of `src` falling outside this raster are ignored.
    pub fn composite_over(&mut self, src: &Raster, x: i32, y: i32) {
        for sy in 0..src.height {
            let dy = y + sy;
            if dy < 0 || dy >= self.height {
                continue;
            }
            for sx in 0..src.width {
                let dx = x + sx;
                let (Some(si), Some(di)) = (src.offset(sx, sy), self.offset(dx, dy)) else {
                    continue;
                };
                let s: [u8; 4] = [
                    src.data[si],
                    src.data[si + 1],
                    src.data[si + 2],
                    src.data[si + 3],
                ];
                blend_over(&mut self.data[di..di + 4], s);
            }
        }
    }

    // ------------------------------------------------------------------
    // Cairo bridge
    // ------------------------------------------------------------------

    /// Copies the pixels into a new premultiplied ARGB32 cairo surface.
    pub fn to_surface(&self) -> Result<ImageSurface> {
        let mut surface = ImageSurface::create(Format::ARgb32, self.width, self.height)?;
        let stride = surface.stride() as usize;
        {
            let mut dest = surface.data()?;
            for y in 0..self.height as usize {
                let src_row = &self.data[y * self.width as usize * 4..][..self.width as usize * 4];
                let dest_row = &mut dest[y * stride..][..self.width as usize * 4];
                for (src, dst) in src_row.chunks_exact(4).zip(dest_row.chunks_exact_mut(4)) {
                    let a = src[3] as u32;
                    let premul = |c: u8| (c as u32 * a + 127) / 255;
                    let argb =
                        (a << 24) | (premul(src[0]) << 16) | (premul(src[1]) << 8) | premul(src[2]);
                    dst.copy_from_slice(&argb.to_ne_bytes());
                }
            }
        }
        surface.mark_dirty();
        Ok(surface)
    }

    /// Reads a cairo surface back into a straight-alpha raster.
    ///
    /// Any context drawing on `surface` must be dropped first, otherwise the
    /// pixel data cannot be borrowed. Formats other than ARGB32/RGB24 are
    /// converted by painting onto an ARGB32 surface.
    pub fn from_surface(surface: &mut ImageSurface) -> Result<Self> {
        let format = surface.format();
        if !matches!(format, Format::ARgb32 | Format::Rgb24) {
            let mut converted =
                ImageSurface::create(Format::ARgb32, surface.width(), surface.height())?;
            {
                let ctx = Context::new(&converted)?;
                ctx.set_source_surface(&*surface, 0.0, 0.0)?;
                ctx.paint()?;
            }
            return Self::from_surface(&mut converted);
        }

        surface.flush();
        let width = surface.width();
        let height = surface.height();
        check_dimensions(width, height)?;
        let stride = surface.stride() as usize;
        let opaque = format == Format::Rgb24;
        let src = surface.data()?;

        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height as usize {
            let row = &src[y * stride..][..width as usize * 4];
            for px in row.chunks_exact(4) {
                let argb = u32::from_ne_bytes([px[0], px[1], px[2], px[3]]);
                let a = if opaque { 255 } else { argb >> 24 };
                let r = (argb >> 16) & 0xff;
                let g = (argb >> 8) & 0xff;
                let b = argb & 0xff;
                if a == 0 {
                    data.extend_from_slice(&[0, 0, 0, 0]);
                } else {
                    let unpremul = |c: u32| ((c * 255 + a / 2) / a).min(255) as u8;
                    data.extend_from_slice(&[unpremul(r), unpremul(g), unpremul(b), a as u8]);
                }
            }
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Runs `paint` against a cairo context targeting this raster, then stores the result.
    pub fn paint_with<F>(&mut self, paint: F) -> Result<()>
    where
        F: FnOnce(&Context),
    {
        let mut surface = self.to_surface()?;
        {
            let ctx = Context::new(&surface)?;
            paint(&ctx);
        }
        *self = Self::from_surface(&mut surface)?;
        Ok(())
    }

    /// Encodes the raster as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let surface = self.to_surface()?;
        let mut buffer = Vec::new();
        surface.write_to_png(&mut buffer)?;
        Ok(buffer)
    }

    /// Reads a PNG, JPEG or WebP file, detecting the format from its contents.
    pub fn open(path: &Path) -> Result<Self> {
        let image = image::ImageReader::open(path)?
            .with_guessed_format()?
            .decode()?
            .to_rgba8();
        let (width, height) = image.dimensions();
        Self::from_rgba(width as i32, height as i32, image.into_raw())
    }

    /// Decodes PNG bytes into a raster.
    pub fn decode_png(bytes: &[u8]) -> Result<Self> {
        let mut reader = Cursor::new(bytes);
        let mut surface = ImageSurface::create_from_png(&mut reader)?;
        Self::from_surface(&mut surface)
    }
}

/// Straight-alpha source-over for one RGBA pixel.
pub(crate) fn blend_over(dst: &mut [u8], src: [u8; 4]) {
    let sa = src[3] as f64 / 255.0;
    if sa >= 1.0 {
        dst.copy_from_slice(&src);
        return;
    }
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f64 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for c in 0..3 {
        let value = (src[c] as f64 * sa + dst[c] as f64 * da * (1.0 - sa)) / out_a;
        dst[c] = value.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}
