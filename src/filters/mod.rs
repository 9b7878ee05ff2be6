// SPDX-License-Identifier: GPL-3.0-only

//! Image filter engine
//!
//! Applies one of a fixed set of artistic filters to an RGBA buffer. Filters
//! fall into three families:
//!
//! - per-pixel 4x5 color matrices (greyscale, sepia, negative, ...)
//! - 3x3 convolutions with wrap-around edges (blur, edge, sharpen, emboss)
//! - the intensity threshold used by the sketch filter
//!
//! The engine is pure: it receives the device capability from the caller and
//! never touches global state. Unknown filters behave as the identity filter.
//!
//! # Example
//!
//! ```
//! use camerart::device::DeviceCapability;
//! use camerart::filters::{FilterCatalog, FilterId, PixelBuffer, apply_filter};
//!
//! let catalog = FilterCatalog::standard();
//! let pixels = PixelBuffer::filled(2, 2, [10, 20, 30, 255]).unwrap();
//! let out = apply_filter(&catalog, pixels, FilterId::Negative, DeviceCapability::Constrained)
//!     .unwrap();
//! assert_eq!(out.pixel(0, 0), Some([245, 235, 225, 255]));
//! ```

mod buffer;
mod catalog;
mod color_matrix;
mod convolution;
mod dispatch;
mod fallback;
mod parallel;
mod sketch;
mod types;

pub use buffer::{PixelBuffer, Rgba};
pub use catalog::{ColorMatrix, ConvolutionKernel, Fallback, FilterCatalog, FilterSpec, ThresholdRule};
pub use color_matrix::{apply_color_matrix, transform_pixel};
pub use convolution::convolve;
pub use dispatch::{ExecutionPath, FilterEngine, apply_filter, apply_filter_rgba, execution_path};
pub use fallback::{apply_fallback, box_blur};
pub use parallel::{CancelToken, ExecutionStrategy};
pub use sketch::{apply_threshold, intensity};
pub use types::FilterId;

/// Clamp to the channel range and truncate toward zero
#[inline]
pub(crate) fn clamp_channel(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_channel() {
        assert_eq!(clamp_channel(-3.0), 0);
        assert_eq!(clamp_channel(300.0), 255);
        assert_eq!(clamp_channel(127.99), 127);
        assert_eq!(clamp_channel(f64::NAN), 0);
    }
}
