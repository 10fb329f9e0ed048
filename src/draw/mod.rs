//! Pixel and vector primitives (Cairo-based).
//!
//! This module defines the building blocks of a framed screenshot:
//! - [`Raster`]: owned RGBA pixels with a bridge to cairo surfaces
//! - [`Background`]: solid, gradient and image-fill background generation
//! - [`FrameConfig`] / [`compose_frame`]: padding, rounding, aspect fitting and shadow
//! - [`Shape`]: annotation geometry, plus the painting functions in [`render`]

pub mod background;
pub mod color;
pub mod font;
pub mod frame;
pub mod raster;
pub mod render;
pub mod shape;

// Re-export commonly used types at module level
pub use background::{Background, GRADIENT_PRESETS, generate_gradient};
pub use color::Color;
pub use font::FontDescriptor;
pub use frame::{FrameConfig, FramedImage, compose_frame, parse_aspect_ratio};
pub use raster::Raster;
pub use render::{pixelate_region, render_shape};
pub use shape::{ResizeHandle, Shape};
