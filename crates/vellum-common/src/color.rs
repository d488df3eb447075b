//! Plain RGBA color values shared across the viewer components.

use image::Rgba;
use serde::{Deserialize, Serialize};

/// An 8-bit-per-channel RGBA color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = fully opaque).
    pub a: u8,
}

impl Color {
    /// Opaque white, the fallback paper color.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Create an opaque color from its RGB channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color from all four channels.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to the pixel type used by the raster layer.
    #[must_use]
    pub const fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
