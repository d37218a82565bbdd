//! Figure Module
//! The drawing context of a single render: an owned RGB pixel buffer.
//!
//! Each render creates its own `Figure`, so there is no shared "current
//! figure" between calls and renders on different threads never interfere.

use crate::charts::spec::{Canvas, Rgb};
use image::{imageops, RgbImage};

pub struct Figure {
    width: u32,
    height: u32,
    background: Rgb,
    pixels: Vec<u8>,
}

impl Figure {
    /// Blank figure sized `width_in * dpi` by `height_in * dpi`.
    pub fn new(canvas: &Canvas, background: Rgb) -> Self {
        let (width, height) = canvas.pixel_size();
        let pixels =
            [background.0, background.1, background.2].repeat(width as usize * height as usize);
        Self {
            width,
            height,
            background,
            pixels,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGB bytes, row-major, for a bitmap backend to draw into.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Finish drawing and crop to the drawn content plus `pad` pixels.
    pub fn into_cropped_image(self, pad: u32) -> Option<RgbImage> {
        let background = self.background;
        let image = RgbImage::from_raw(self.width, self.height, self.pixels)?;
        Some(crop_tight(image, background, pad))
    }
}

/// Inclusive bounding box `(min_x, min_y, max_x, max_y)` of every pixel that
/// differs from `background`, or `None` for a blank image.
pub fn content_bounds(image: &RgbImage, background: Rgb) -> Option<(u32, u32, u32, u32)> {
    let bg = [background.0, background.1, background.2];
    let mut bounds: Option<(u32, u32, u32, u32)> = None;

    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0 == bg {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }

    bounds
}

/// Crop to the content bounding box grown by `pad`, never past the image edge.
/// Blank images are returned unchanged.
pub fn crop_tight(image: RgbImage, background: Rgb, pad: u32) -> RgbImage {
    let Some((x0, y0, x1, y1)) = content_bounds(&image, background) else {
        return image;
    };
    let left = x0.saturating_sub(pad);
    let top = y0.saturating_sub(pad);
    let right = (x1 + pad).min(image.width() - 1);
    let bottom = (y1 + pad).min(image.height() - 1);

    imageops::crop_imm(&image, left, top, right - left + 1, bottom - top + 1).to_image()
}
