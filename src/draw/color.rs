//! RGBA color type and predefined color constants.

/// An 8-bit straight-alpha RGBA color.
///
/// Rasters store the same layout, so colors can be written to pixels without
/// any conversion. Cairo painting goes through [`Color::apply`].
///
/// # Examples
///
/// ```
/// use shotframe::draw::Color;
/// let red = Color::rgb(255, 0, 0);
/// let teal = Color::from_hex("#50E3C2").unwrap();
/// assert_eq!(teal, Color::rgb(0x50, 0xe3, 0xc2));
/// assert_eq!(red.with_alpha(128).a, 128);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(text: &str) -> Option<Self> {
        let hex = text.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        match hex.len() {
            3 => {
                let nibble = |i: usize| channel(i..i + 1).map(|v| v * 17);
                Some(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Some(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Some(Self::rgba(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => None,
        }
    }

    /// Formats as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Sets this color as the current cairo source.
    pub fn apply(self, ctx: &cairo::Context) {
        ctx.set_source_rgba(
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
            self.a as f64 / 255.0,
        );
    }

    /// Perceived brightness in `0.0..=1.0`.
    pub fn luminance(self) -> f64 {
        (self.r as f64 * 0.299 + self.g as f64 * 0.587 + self.b as f64 * 0.114) / 255.0
    }
}

/// Maps color name strings to Color values.
///
/// Used by the configuration system and the command line for named colors.
pub fn name_to_color(name: &str) -> Option<Color> {
    match name.to_lowercase().as_str() {
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "yellow" => Some(YELLOW),
        "orange" => Some(ORANGE),
        "pink" => Some(PINK),
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        "transparent" => Some(TRANSPARENT),
        _ => None,
    }
}

// ============================================================================
// Predefined Color Constants
// ============================================================================

pub const RED: Color = Color::rgb(0xf6, 0x61, 0x51);
pub const GREEN: Color = Color::rgb(0x33, 0xd1, 0x7a);
pub const BLUE: Color = Color::rgb(0x35, 0x84, 0xe4);
pub const YELLOW: Color = Color::rgb(0xf6, 0xd3, 0x2d);
pub const ORANGE: Color = Color::rgb(0xff, 0xa3, 0x48);
pub const PINK: Color = Color::rgb(0xc0, 0x61, 0xcb);
pub const WHITE: Color = Color::rgb(255, 255, 255);
pub const BLACK: Color = Color::rgb(0, 0, 0);
pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

/// Alpha applied to every highlighter stroke (about 30% opacity).
pub const HIGHLIGHTER_ALPHA: u8 = 77;
