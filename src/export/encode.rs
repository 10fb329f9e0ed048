//! Encoding of rendered rasters into the export formats.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};

use super::types::{ExportError, ExportFormat, JPEG_QUALITY};
use crate::draw::Raster;

/// Encodes `raster` as `format`.
pub fn encode(raster: &Raster, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Png => Ok(raster.encode_png()?),
        ExportFormat::Jpeg => encode_jpeg(raster),
        ExportFormat::Webp => encode_webp(raster),
    }
}

fn rgba_image(raster: &Raster) -> Result<RgbaImage, ExportError> {
    RgbaImage::from_raw(
        raster.width() as u32,
        raster.height() as u32,
        raster.as_bytes().to_vec(),
    )
    .ok_or_else(|| ExportError::Task("raster buffer does not match its size".to_string()))
}

// JPEG has no alpha channel.
fn flatten_onto_white(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let alpha = a as u32;
        let over = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        image::Rgb([over(r), over(g), over(b)])
    })
}

fn encode_jpeg(raster: &Raster) -> Result<Vec<u8>, ExportError> {
    let rgb = flatten_onto_white(&rgba_image(raster)?);
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY).write_image(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(buffer)
}

// The encoder only supports lossless WebP.
fn encode_webp(raster: &Raster) -> Result<Vec<u8>, ExportError> {
    let rgba = rgba_image(raster)?;
    let mut buffer = Vec::new();
    WebPEncoder::new_lossless(&mut buffer).write_image(
        rgba.as_raw(),
        rgba.width(),
        rgba.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(buffer)
}
