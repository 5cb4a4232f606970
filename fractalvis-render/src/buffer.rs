use rayon::prelude::*;

use fractalvis_core::PixelFormat;

use crate::engine::EngineBuffer;
use crate::error::RenderError;

/// A finished image, row-major with no row padding.
///
/// Write-once: the pixel data cannot be modified after assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

/// Copy an engine buffer into an [`Image`] and release the buffer.
///
/// Fails when the buffer length is not `width * height * bytes_per_pixel`.
pub fn assemble(
    buffer: EngineBuffer,
    width: u32,
    height: u32,
    format: PixelFormat,
) -> crate::Result<Image> {
    Image::from_bytes(buffer.as_slice(), width, height, format)
    // `buffer` is dropped here, after the copy.
}

impl Image {
    /// Copy `bytes` into a new image after checking its length.
    pub fn from_bytes(
        bytes: &[u8],
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> crate::Result<Self> {
        let expected = format
            .buffer_len(width, height)
            .ok_or(RenderError::InvalidDimensions { width, height })?;
        if bytes.len() != expected {
            return Err(RenderError::LengthMismatch {
                width,
                height,
                format,
                expected,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            data: bytes.to_vec(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// One row of pixel bytes, `None` past the last row.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.stride();
        Some(&self.data[start..start + self.stride()])
    }

    /// Bytes of the pixel at `(x, y)`: one for Gray8, three for RGB24.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width {
            return None;
        }
        let bpp = self.format.bytes_per_pixel();
        let start = x as usize * bpp;
        self.row(y).map(|row| &row[start..start + bpp])
    }

    /// Expand to opaque RGBA, the layout most display surfaces upload.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.pixel_count() * 4];
        let bpp = self.format.bytes_per_pixel();
        out.par_chunks_mut(4)
            .zip(self.data.par_chunks(bpp))
            .for_each(|(dst, src)| {
                match self.format {
                    PixelFormat::Gray8 => {
                        dst[0] = src[0];
                        dst[1] = src[0];
                        dst[2] = src[0];
                    }
                    PixelFormat::Rgb24 => dst[..3].copy_from_slice(src),
                }
                dst[3] = 255;
            });
        out
    }

    /// Convert into an `image` crate buffer for encoding or further processing.
    pub fn to_dynamic_image(&self) -> image::DynamicImage {
        let (w, h, data) = (self.width, self.height, self.data.clone());
        // Lengths were validated at construction, so `from_raw` always succeeds.
        match self.format {
            PixelFormat::Gray8 => image::GrayImage::from_raw(w, h, data)
                .map(image::DynamicImage::ImageLuma8)
                .unwrap_or_else(|| image::DynamicImage::new_luma8(w, h)),
            PixelFormat::Rgb24 => image::RgbImage::from_raw(w, h, data)
                .map(image::DynamicImage::ImageRgb8)
                .unwrap_or_else(|| image::DynamicImage::new_rgb8(w, h)),
        }
    }
}
