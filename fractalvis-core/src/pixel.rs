use std::fmt;

use crate::error::CoreError;

/// A pointer position in device pixels, relative to the image's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A selection rectangle in device pixels with `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl PixelRect {
    /// Build a rectangle spanning two corners given in any order.
    ///
    /// This is what a drag produces: the anchor may lie right of or below the
    /// pointer, but the result always has non-negative width and height.
    pub fn from_corners(a: PixelPoint, b: PixelPoint) -> Self {
        Self {
            x0: a.x.min(b.x),
            y0: a.y.min(b.y),
            x1: a.x.max(b.x),
            y1: a.y.max(b.y),
        }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// A rectangle with zero extent on either axis cannot be mapped.
    pub fn is_degenerate(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }
}

/// The on-screen size of the image area, as reported by the display layer.
///
/// Layout engines report fractional and occasionally NaN sizes (before the
/// first layout pass), so this stays `f64` until validated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Check that both axes are finite and at least one pixel.
    pub fn validate(&self) -> crate::Result<()> {
        let ok = |v: f64| v.is_finite() && v >= 1.0;
        if ok(self.width) && ok(self.height) {
            Ok(())
        } else {
            Err(CoreError::ViewportTooSmall {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Integral dimensions for the engine, truncating fractional pixels.
    pub fn to_pixels(&self) -> crate::Result<(u32, u32)> {
        self.validate()?;
        let clamp = |v: f64| v.min(u32::MAX as f64) as u32;
        Ok((clamp(self.width), clamp(self.height)))
    }
}

/// Byte packing of an engine buffer or assembled image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// One intensity byte per pixel.
    Gray8,
    /// Three bytes per pixel in R, G, B order.
    Rgb24,
}

impl PixelFormat {
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Rgb24 => 3,
        }
    }

    /// Buffer length for a `width × height` image, `None` on overflow.
    pub fn buffer_len(self, width: u32, height: u32) -> Option<usize> {
        (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(self.bytes_per_pixel())
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Gray8 => "Gray8",
            Self::Rgb24 => "RGB24",
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
