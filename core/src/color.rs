//! Linear color and RGBA8 quantization.

use bytemuck::{Pod, Zeroable};

/// Linear-space RGBA color with f32 channels.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LinearColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl LinearColor {
    /// Opaque white, the default for unbound color channels.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Quantize to 8-bit RGBA without sRGB encoding.
    ///
    /// Channels are clamped to [0, 1] and rounded to the nearest step.
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
            quantize(self.a),
        ]
    }
}

impl Default for LinearColor {
    fn default() -> Self {
        Self::WHITE
    }
}

#[inline]
fn quantize(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Scale a quantized color's alpha byte by a [0, 1] multiplier.
///
/// The multiply happens on the u8 value and truncates, so a multiplier of 1
/// leaves the quantized alpha exactly unchanged.
#[inline]
pub fn scale_alpha(mut color: [u8; 4], alpha: f32) -> [u8; 4] {
    color[3] = (color[3] as f32 * alpha) as u8;
    color
}
