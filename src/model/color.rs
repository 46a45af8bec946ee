//! Color values.

use serde::{Deserialize, Serialize};

/// An sRGB color with float channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub red: f32,
    /// Green channel
    pub green: f32,
    /// Blue channel
    pub blue: f32,
    /// Opacity (1.0 = opaque)
    pub alpha: f32,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    /// Opaque red.
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    /// Opaque blue.
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

    /// Creates a color from float channels, clamping each to `0.0..=1.0`.
    pub fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red: red.clamp(0.0, 1.0),
            green: green.clamp(0.0, 1.0),
            blue: blue.clamp(0.0, 1.0),
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    /// Creates an opaque color from float channels.
    pub const fn rgb(red: f32, green: f32, blue: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }

    /// Creates a color from 8-bit channels and a float alpha.
    pub fn from_rgba8(red: u8, green: u8, blue: u8, alpha: f32) -> Self {
        Self::new(
            red as f32 / 255.0,
            green as f32 / 255.0,
            blue as f32 / 255.0,
            alpha,
        )
    }

    /// Returns the 8-bit channels, truncating `channel * 255`.
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        (
            channel_to_u8(self.red),
            channel_to_u8(self.green),
            channel_to_u8(self.blue),
        )
    }
}

/// Bound on `255 * |fl32(n / 255) - n / 255|`, so channels built from 8-bit
/// values truncate back to the same value.
const CHANNEL_TOLERANCE: f64 = 1e-5;

/// Truncates `channel * 255` to an integer channel. The product is exact in f64.
fn channel_to_u8(channel: f32) -> u8 {
    (f64::from(channel.clamp(0.0, 1.0)) * 255.0 + CHANNEL_TOLERANCE).trunc() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba8_round_trip() {
        for value in 0..=255u8 {
            let color = Color::from_rgba8(value, 255 - value, value / 2, 1.0);
            assert_eq!(color.to_rgb8(), (value, 255 - value, value / 2));
        }
    }

    #[test]
    fn test_truncates_fractional_channels() {
        let color = Color::rgb(0.5, 0.999, 0.0);
        assert_eq!(color.to_rgb8(), (127, 254, 0));
        let color = Color::rgb(0.999997, 0.003, 1.0);
        assert_eq!(color.to_rgb8(), (254, 0, 255));
    }

    #[test]
    fn test_new_clamps() {
        let color = Color::new(2.0, -1.0, 0.5, 3.0);
        assert_eq!(color.red, 1.0);
        assert_eq!(color.green, 0.0);
        assert_eq!(color.alpha, 1.0);
    }
}
