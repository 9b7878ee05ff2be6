// SPDX-License-Identifier: GPL-3.0-only

//! RGBA pixel buffer consumed and produced by the filter engine

use crate::constants::CHANNELS;
use crate::errors::{FilterError, FilterResult};

/// A single RGBA pixel
pub type Rgba = [u8; CHANNELS];

/// Rectangular grid of RGBA pixels, stored row-major with 4 bytes per pixel
///
/// Construction validates the shape, so every `PixelBuffer` in circulation has
/// `width > 0`, `height > 0` and exactly `width * height * 4` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    has_alpha: bool,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes, failing fast on a malformed shape
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> FilterResult<Self> {
        let expected = Self::byte_len(width, height)?;
        if data.len() != expected {
            return Err(FilterError::InvalidArgument(format!(
                "buffer length {} does not match {}x{}x{} = {}",
                data.len(),
                width,
                height,
                CHANNELS,
                expected
            )));
        }

        Ok(Self {
            width,
            height,
            has_alpha: true,
            data,
        })
    }

    /// Create a buffer with every pixel set to `pixel`
    pub fn filled(width: u32, height: u32, pixel: Rgba) -> FilterResult<Self> {
        let len = Self::byte_len(width, height)?;
        let data = pixel.iter().copied().cycle().take(len).collect();
        Self::new(width, height, data)
    }

    /// Create a buffer with the same shape and metadata as `self`, zero-filled
    pub(crate) fn blank_like(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            has_alpha: self.has_alpha,
            data: vec![0; self.data.len()],
        }
    }

    fn byte_len(width: u32, height: u32) -> FilterResult<usize> {
        if width == 0 || height == 0 {
            return Err(FilterError::InvalidArgument(format!(
                "dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }

        (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or_else(|| {
                FilterError::InvalidArgument(format!("{}x{} overflows", width, height))
            })
    }

    /// Mark whether the alpha channel carries meaningful data
    pub fn with_alpha(mut self, has_alpha: bool) -> Self {
        self.has_alpha = has_alpha;
        self
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    /// Bytes per row
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * CHANNELS
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// View the buffer as a flat slice of pixels
    pub fn pixels(&self) -> &[Rgba] {
        bytemuck::cast_slice(&self.data)
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgba] {
        bytemuck::cast_slice_mut(&mut self.data)
    }

    /// Pixels of row `y`
    pub fn row(&self, y: u32) -> Option<&[Rgba]> {
        if y >= self.height {
            return None;
        }
        let w = self.width as usize;
        let start = y as usize * w;
        Some(&self.pixels()[start..start + w])
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width {
            return None;
        }
        self.row(y).map(|row| row[x as usize])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: Rgba) -> FilterResult<()> {
        if x >= self.width || y >= self.height {
            return Err(FilterError::InvalidArgument(format!(
                "pixel ({}, {}) outside {}x{}",
                x, y, self.width, self.height
            )));
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.pixels_mut()[idx] = pixel;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_dimensions() {
        assert!(matches!(
            PixelBuffer::new(0, 4, Vec::new()),
            Err(FilterError::InvalidArgument(_))
        ));
        assert!(matches!(
            PixelBuffer::new(4, 0, Vec::new()),
            Err(FilterError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let res = PixelBuffer::new(2, 2, vec![0; 15]);
        assert!(matches!(res, Err(FilterError::InvalidArgument(_))));
    }

    #[test]
    fn test_filled_and_pixel_access() {
        let mut buf = PixelBuffer::filled(3, 2, [1, 2, 3, 4]).unwrap();
        assert_eq!(buf.as_bytes().len(), 3 * 2 * 4);
        assert_eq!(buf.pixel(2, 1), Some([1, 2, 3, 4]));
        assert_eq!(buf.pixel(3, 0), None);

        buf.set_pixel(1, 1, [9, 9, 9, 9]).unwrap();
        assert_eq!(buf.row(1).unwrap()[1], [9, 9, 9, 9]);
        assert!(buf.set_pixel(0, 2, [0; 4]).is_err());
    }

    #[test]
    fn test_blank_like_keeps_metadata() {
        let buf = PixelBuffer::filled(2, 2, [5; 4]).unwrap().with_alpha(false);
        let blank = buf.blank_like();
        assert_eq!(blank.width(), 2);
        assert!(!blank.has_alpha());
        assert!(blank.as_bytes().iter().all(|&b| b == 0));
    }
}
