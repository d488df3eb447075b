//! Software raster surfaces and an alpha-blending painter.
//!
//! A [`Surface`] is an RGBA pixel buffer plus the device pixel ratio it was
//! allocated for: a surface for a 30×40 logical rectangle on a 2× display
//! holds 60×80 device pixels. A [`Painter`] draws into such a buffer in
//! *logical* coordinates; it applies an integer translation and the pixel
//! ratio when touching device pixels, so callers never deal with backing
//! scale themselves.

use std::path::Path;

use image::{Rgba, RgbaImage};
use thiserror::Error;

use crate::color::Color;
use crate::geometry::{Point, Rect, Size};

/// Error type for raster operations that touch the filesystem.
#[derive(Debug, Error)]
pub enum RasterError {
    /// The pixel buffer could not be encoded or written.
    #[error("failed to write raster image: {0}")]
    Write(#[from] image::ImageError),
}

/// An RGBA pixel buffer allocated for a specific device pixel ratio.
pub struct Surface {
    buffer: RgbaImage,
    pixel_ratio: f32,
}

impl Surface {
    /// Allocate a transparent surface for `size` logical pixels at the
    /// given device pixel ratio.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(size: Size, pixel_ratio: f32) -> Self {
        let width = (size.width.max(0) as f32 * pixel_ratio).round() as u32;
        let height = (size.height.max(0) as f32 * pixel_ratio).round() as u32;
        Self {
            buffer: RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0])),
            pixel_ratio,
        }
    }

    /// The device pixel ratio this surface was allocated for.
    #[must_use]
    pub const fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    /// Width of the backing buffer in device pixels.
    #[must_use]
    pub fn device_width(&self) -> u32 {
        self.buffer.width()
    }

    /// Height of the backing buffer in device pixels.
    #[must_use]
    pub fn device_height(&self) -> u32 {
        self.buffer.height()
    }

    /// A painter drawing into this surface in logical coordinates.
    pub fn painter(&mut self) -> Painter<'_> {
        Painter::new(&mut self.buffer, self.pixel_ratio)
    }

    /// Consume the surface, returning the backing pixel buffer.
    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.buffer
    }

    /// Borrow the backing pixel buffer.
    #[must_use]
    pub const fn image(&self) -> &RgbaImage {
        &self.buffer
    }

    /// Save the surface contents to a file (format inferred from the
    /// extension).
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be encoded or written.
    pub fn save(&self, path: &Path) -> Result<(), RasterError> {
        self.buffer.save(path)?;
        Ok(())
    }
}

/// A drawing context over an RGBA buffer.
///
/// Positions and rectangles passed to the drawing methods are in logical
/// coordinates; the painter maps them to device pixels using its current
/// translation and the device pixel ratio. Images passed to
/// [`Painter::draw_image`] are expected to already be at device resolution
/// and are blitted one source pixel per device pixel.
pub struct Painter<'a> {
    buffer: &'a mut RgbaImage,
    pixel_ratio: f32,
    offset: Point,
}

impl<'a> Painter<'a> {
    /// Create a painter over `buffer` for the given device pixel ratio.
    pub fn new(buffer: &'a mut RgbaImage, pixel_ratio: f32) -> Self {
        Self {
            buffer,
            pixel_ratio,
            offset: Point::default(),
        }
    }

    /// The device pixel ratio of the underlying buffer.
    #[must_use]
    pub const fn device_pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    /// Shift the painter's origin by `delta` logical pixels.
    pub fn translate(&mut self, delta: Point) {
        self.offset = self.offset + delta;
    }

    /// Map a logical coordinate pair to device pixels.
    #[allow(clippy::cast_possible_truncation)]
    fn to_device(&self, x: i32, y: i32) -> (i64, i64) {
        let dx = ((x + self.offset.x) as f32 * self.pixel_ratio).round() as i64;
        let dy = ((y + self.offset.y) as f32 * self.pixel_ratio).round() as i64;
        (dx, dy)
    }

    /// Fill a logical rectangle with a color, alpha-blending translucent
    /// colors over the existing pixels.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        if rect.is_empty() {
            return;
        }
        let rgba = color.to_rgba();
        let (x0, y0) = self.to_device(rect.x, rect.y);
        let (x1, y1) = self.to_device(rect.right(), rect.bottom());
        let x0 = x0.max(0);
        let y0 = y0.max(0);
        let x1 = x1.min(i64::from(self.buffer.width()));
        let y1 = y1.min(i64::from(self.buffer.height()));
        for py in y0..y1 {
            for px in x0..x1 {
                if color.a == 255 {
                    self.buffer.put_pixel(px as u32, py as u32, rgba);
                } else if color.a > 0 {
                    let bg = *self.buffer.get_pixel(px as u32, py as u32);
                    let blended = alpha_blend(rgba, bg, color.a);
                    self.buffer.put_pixel(px as u32, py as u32, blended);
                }
            }
        }
    }

    /// Draw a device-resolution image with its top-left corner at the
    /// logical position `pos`, alpha-blending onto the existing pixels.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn draw_image(&mut self, pos: Point, image: &RgbaImage) {
        let (ox, oy) = self.to_device(pos.x, pos.y);
        for (sx, sy, pixel) in image.enumerate_pixels() {
            let px = ox + i64::from(sx);
            let py = oy + i64::from(sy);
            if px < 0
                || py < 0
                || px >= i64::from(self.buffer.width())
                || py >= i64::from(self.buffer.height())
            {
                continue;
            }
            let alpha = pixel[3];
            if alpha == 0 {
                continue;
            }
            if alpha == 255 {
                self.buffer.put_pixel(px as u32, py as u32, *pixel);
            } else {
                let bg = *self.buffer.get_pixel(px as u32, py as u32);
                let blended = alpha_blend(*pixel, bg, alpha);
                self.buffer.put_pixel(px as u32, py as u32, blended);
            }
        }
    }
}

/// Alpha blend a foreground color onto a background color.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn alpha_blend(fg: Rgba<u8>, bg: Rgba<u8>, alpha: u8) -> Rgba<u8> {
    let a = f32::from(alpha) / 255.0;
    let inv_a = 1.0 - a;

    Rgba([
        f32::from(fg[0]).mul_add(a, f32::from(bg[0]) * inv_a) as u8,
        f32::from(fg[1]).mul_add(a, f32::from(bg[1]) * inv_a) as u8,
        f32::from(fg[2]).mul_add(a, f32::from(bg[2]) * inv_a) as u8,
        255,
    ])
}
