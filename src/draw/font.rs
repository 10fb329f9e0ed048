//! Text annotation fonts and Pango measurement.
//!
//! Sizes are absolute pixels in image space, independent of any screen DPI,
//! so an exported text annotation matches what was drawn in the editor.

use pango::{FontDescription, Style, Weight};

use crate::util::Rect;

/// Family, weight and style of a text annotation.
///
/// Weight and style are kept as the user wrote them (`"bold"`, `"600"`,
/// `"italic"`); unrecognized values fall back to normal when painting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDescriptor {
    pub family: String,
    pub weight: String,
    pub style: String,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            family: "Sans".to_string(),
            weight: "bold".to_string(),
            style: "normal".to_string(),
        }
    }
}

impl FontDescriptor {
    pub fn new(family: String, weight: String, style: String) -> Self {
        Self {
            family,
            weight,
            style,
        }
    }

    /// Pango description for this font at `size` pixels.
    pub fn description(&self, size: f64) -> FontDescription {
        let mut desc = FontDescription::new();
        desc.set_family(&self.family);
        desc.set_weight(parse_weight(&self.weight).unwrap_or(Weight::Normal));
        desc.set_style(parse_style(&self.style).unwrap_or(Style::Normal));
        desc.set_absolute_size(size.max(1.0) * pango::SCALE as f64);
        desc
    }

    /// Builds a Pango layout for `text` on `ctx` using this font.
    pub(crate) fn layout(&self, ctx: &cairo::Context, text: &str, size: f64) -> pango::Layout {
        let layout = pangocairo::functions::create_layout(ctx);
        layout.set_font_description(Some(&self.description(size)));
        layout.set_text(text);
        layout
    }
}

/// Parses a weight name or a CSS-style numeric weight (100-900).
pub fn parse_weight(text: &str) -> Option<Weight> {
    let weight = match text.trim().to_ascii_lowercase().as_str() {
        "thin" => Weight::Thin,
        "ultralight" | "extralight" => Weight::Ultralight,
        "light" => Weight::Light,
        "book" => Weight::Book,
        "normal" | "regular" => Weight::Normal,
        "medium" => Weight::Medium,
        "semibold" => Weight::Semibold,
        "bold" => Weight::Bold,
        "ultrabold" | "extrabold" => Weight::Ultrabold,
        "heavy" | "black" => Weight::Heavy,
        other => {
            let numeric: u32 = other.parse().ok()?;
            if !(100..=900).contains(&numeric) {
                return None;
            }
            match (numeric + 50) / 100 {
                1 => Weight::Thin,
                2 => Weight::Ultralight,
                3 => Weight::Light,
                4 => Weight::Normal,
                5 => Weight::Medium,
                6 => Weight::Semibold,
                7 => Weight::Bold,
                8 => Weight::Ultrabold,
                _ => Weight::Heavy,
            }
        }
    };
    Some(weight)
}

pub fn parse_style(text: &str) -> Option<Style> {
    match text.trim().to_ascii_lowercase().as_str() {
        "normal" => Some(Style::Normal),
        "italic" => Some(Style::Italic),
        "oblique" => Some(Style::Oblique),
        _ => None,
    }
}

/// Measures the logical box of `text` when drawn with its top-left corner at `(x, y)`.
///
/// Empty text still occupies one line height with a minimal width so the
/// caret of a fresh text annotation remains selectable.
pub fn measure_text(text: &str, size: f64, font: &FontDescriptor, x: f64, y: f64) -> Rect {
    let fallback = Rect::new(x, y, size * 0.6 * text.chars().count().max(1) as f64, size * 1.2);

    let Ok(surface) = cairo::ImageSurface::create(cairo::Format::ARgb32, 1, 1) else {
        return fallback;
    };
    let Ok(ctx) = cairo::Context::new(&surface) else {
        return fallback;
    };

    let layout = font.layout(&ctx, text, size);
    let (_ink, logical) = layout.extents();
    let width = logical.width() as f64 / pango::SCALE as f64;
    let height = logical.height() as f64 / pango::SCALE as f64;

    Rect::new(x, y, width.max(size * 0.3), height.max(size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_accept_names_and_numbers() {
        assert_eq!(parse_weight("Bold"), Some(Weight::Bold));
        assert_eq!(parse_weight("600"), Some(Weight::Semibold));
        assert_eq!(parse_weight("449"), Some(Weight::Normal));
        assert_eq!(parse_weight("950"), None);
        assert_eq!(parse_weight("chunky"), None);
    }

    #[test]
    fn description_carries_family_and_pixel_size() {
        let font = FontDescriptor::new(
            "Monospace".to_string(),
            "normal".to_string(),
            "italic".to_string(),
        );
        let desc = font.description(24.0);
        assert_eq!(desc.family().as_deref(), Some("Monospace"));
        assert_eq!(desc.style(), Style::Italic);
        assert!(desc.is_size_absolute());
        assert_eq!(desc.size(), 24 * pango::SCALE);
    }

    #[test]
    fn longer_text_measures_wider() {
        let font = FontDescriptor::default();
        let short = measure_text("ab", 20.0, &font, 0.0, 0.0);
        let long = measure_text("abcdefghij", 20.0, &font, 0.0, 0.0);
        assert!(long.width > short.width);
        assert!(short.height >= 20.0);
    }

    #[test]
    fn empty_text_keeps_a_selectable_box() {
        let rect = measure_text("", 22.0, &FontDescriptor::default(), 5.0, 6.0);
        assert_eq!((rect.x, rect.y), (5.0, 6.0));
        assert!(rect.width > 0.0 && rect.height > 0.0);
    }
}
