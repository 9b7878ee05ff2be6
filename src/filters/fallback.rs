// SPDX-License-Identifier: GPL-3.0-only

//! Cheap approximations for constrained devices
//!
//! The box blur stands in for the Gaussian kernel when the device cannot
//! afford the full convolution: two separable integer passes instead of a
//! floating-point 2D window, with edge-clamped sampling.

use super::buffer::{PixelBuffer, Rgba};
use super::catalog::Fallback;
use super::parallel::{CancelToken, ExecutionStrategy, for_each_row};
use crate::errors::{FilterError, FilterResult};

/// Run a registered fallback
pub fn apply_fallback(
    src: &PixelBuffer,
    fallback: Fallback,
    strategy: ExecutionStrategy,
    cancel: Option<&CancelToken>,
) -> FilterResult<PixelBuffer> {
    match fallback {
        Fallback::BoxBlur { radius } => box_blur(src, radius, strategy, cancel),
    }
}

/// Separable box blur of the given radius
///
/// Each output channel is the truncated mean of the `(2r+1)^2` window around
/// the pixel, with out-of-range coordinates clamped to the nearest edge.
/// Alpha is copied unchanged. The radius may not exceed the longer side of
/// the image.
pub fn box_blur(
    src: &PixelBuffer,
    radius: u32,
    strategy: ExecutionStrategy,
    cancel: Option<&CancelToken>,
) -> FilterResult<PixelBuffer> {
    if radius == 0 {
        return Ok(src.clone());
    }

    let longest = src.width().max(src.height());
    if radius > longest {
        return Err(FilterError::InvalidArgument(format!(
            "box blur radius {} exceeds image side {}",
            radius, longest
        )));
    }

    let width = src.width() as usize;
    let height = src.height() as usize;
    let r = radius as isize;
    let window = 2 * u64::from(radius) + 1;
    let area = window
        .checked_mul(window)
        .filter(|area| area.checked_mul(255).is_some())
        .ok_or_else(|| {
            FilterError::InvalidArgument(format!("box blur radius {} overflows", radius))
        })?;
    let pixels = src.pixels();

    let clamp_x = |x: isize| x.clamp(0, width as isize - 1) as usize;
    let clamp_y = |y: isize| y.clamp(0, height as isize - 1) as usize;

    // Horizontal pass: per-row window sums
    let mut sums = vec![[0u64; 3]; width * height];
    for_each_row(&mut sums, width, strategy, cancel, |y, row| {
        let src_row = &pixels[y * width..(y + 1) * width];
        for (x, sum) in row.iter_mut().enumerate() {
            for dx in -r..=r {
                let px = src_row[clamp_x(x as isize + dx)];
                sum[0] += u64::from(px[0]);
                sum[1] += u64::from(px[1]);
                sum[2] += u64::from(px[2]);
            }
        }
    })?;

    // Vertical pass over the row sums
    let mut dst = src.blank_like();
    let stride = dst.stride();
    for_each_row(dst.as_bytes_mut(), stride, strategy, cancel, |y, row| {
        let out: &mut [Rgba] = bytemuck::cast_slice_mut(row);
        for (x, px) in out.iter_mut().enumerate() {
            let mut total = [0u64; 3];
            for dy in -r..=r {
                let s = sums[clamp_y(y as isize + dy) * width + x];
                total[0] += s[0];
                total[1] += s[1];
                total[2] += s[2];
            }
            *px = [
                (total[0] / area) as u8,
                (total[1] / area) as u8,
                (total[2] / area) as u8,
                pixels[y * width + x][3],
            ];
        }
    })?;

    Ok(dst)
}
