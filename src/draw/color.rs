//! RGBA color type and the small palette used by the sketchpad.

/// Represents an RGBA color with floating-point components.
///
/// All components are in the range 0.0 (minimum) to 1.0 (maximum).
///
/// # Examples
///
/// ```
/// use digitpad::draw::Color;
/// let ink = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
/// assert_eq!(ink.to_argb32(), 0xFF00_0000);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red component (0.0 = no red, 1.0 = full red)
    pub r: f64,
    /// Green component (0.0 = no green, 1.0 = full green)
    pub g: f64,
    /// Blue component (0.0 = no blue, 1.0 = full blue)
    pub b: f64,
    /// Alpha/transparency (0.0 = fully transparent, 1.0 = fully opaque)
    pub a: f64,
}

impl Color {
    /// Creates a new color from RGBA components.
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Applies this color as the Cairo source.
    pub fn apply(&self, ctx: &cairo::Context) {
        ctx.set_source_rgba(self.r, self.g, self.b, self.a);
    }

    /// Packs the color the way Cairo stores an ARGB32 pixel (premultiplied alpha).
    pub fn to_argb32(&self) -> u32 {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        let a = self.a.clamp(0.0, 1.0);
        (channel(a) << 24)
            | (channel(self.r * a) << 16)
            | (channel(self.g * a) << 8)
            | channel(self.b * a)
    }
}

// ============================================================================
// Canvas colors
// ============================================================================

/// Canvas background.
pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

/// Ink color for strokes.
pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

// ============================================================================
// Panel palette
// ============================================================================

/// Window background behind the canvas and result panel.
pub const PANEL_BG: Color = Color::new(0.09, 0.10, 0.14, 0.96);

/// Primary accent (enabled Predict button, top-ranked entry).
pub const ACCENT: Color = Color::new(0.39, 0.40, 0.95, 1.0);

/// Secondary/disabled elements.
pub const MUTED: Color = Color::new(0.45, 0.47, 0.55, 1.0);

/// Regular panel text.
pub const TEXT: Color = Color::new(0.95, 0.95, 0.97, 1.0);

/// Error notice background.
pub const ERROR_RED: Color = Color::new(0.94, 0.27, 0.27, 0.95);
