// SPDX-License-Identifier: GPL-3.0-only

//! Sliding-window convolution with toroidal sampling
//!
//! For a destination pixel `(x, y)` and kernel cell `(kx, ky)` the source pixel
//! is read at
//!
//! ```text
//! src_x = (x - kw/2 + kx) mod width
//! src_y = (y - kh/2 + ky) mod height
//! ```
//!
//! so neighborhoods wrap across the image edges instead of clamping. R, G and
//! B are accumulated independently, scaled by the kernel factor, offset by
//! the bias, clamped to `[0, 255]` and truncated. Alpha is copied from the
//! source pixel at the same position.
//!
//! The source is only ever read; results go to a separate buffer because
//! later neighborhoods depend on the original values of earlier pixels.

use super::buffer::{PixelBuffer, Rgba};
use super::catalog::ConvolutionKernel;
use super::clamp_channel;
use super::parallel::{CancelToken, ExecutionStrategy, for_each_row};
use crate::errors::FilterResult;

/// Wrapped source coordinate for kernel tap `tap` around `pos`
#[inline]
fn wrap(pos: usize, tap: usize, center: usize, len: usize) -> usize {
    ((pos + tap) as isize - center as isize).rem_euclid(len as isize) as usize
}

/// Convolve `src` with `kernel` into a new buffer of the same shape
pub fn convolve(
    src: &PixelBuffer,
    kernel: &ConvolutionKernel,
    strategy: ExecutionStrategy,
    cancel: Option<&CancelToken>,
) -> FilterResult<PixelBuffer> {
    let width = src.width() as usize;
    let height = src.height() as usize;
    let (kw, kh) = (kernel.width(), kernel.height());
    let (cx, cy) = (kw / 2, kh / 2);
    let factor = f64::from(kernel.factor());
    let bias = f64::from(kernel.bias());

    // columns[kx * width + x] is the source column sampled by tap kx at x
    let columns: Vec<usize> = (0..kw)
        .flat_map(|kx| (0..width).map(move |x| wrap(x, kx, cx, width)))
        .collect();

    let src_pixels = src.pixels();
    let mut dst = src.blank_like();
    let stride = dst.stride();

    for_each_row(dst.as_bytes_mut(), stride, strategy, cancel, |y, row| {
        let out: &mut [Rgba] = bytemuck::cast_slice_mut(row);
        for (x, px) in out.iter_mut().enumerate() {
            let mut acc = [0f64; 3];
            for ky in 0..kh {
                let sy = wrap(y, ky, cy, height);
                let src_row = &src_pixels[sy * width..(sy + 1) * width];
                for kx in 0..kw {
                    let weight = f64::from(kernel.get(kx, ky));
                    let sample = src_row[columns[kx * width + x]];
                    acc[0] += weight * f64::from(sample[0]);
                    acc[1] += weight * f64::from(sample[1]);
                    acc[2] += weight * f64::from(sample[2]);
                }
            }

            *px = [
                clamp_channel(factor * acc[0] + bias),
                clamp_channel(factor * acc[1] + bias),
                clamp_channel(factor * acc[2] + bias),
                src_pixels[y * width + x][3],
            ];
        }
    })?;

    Ok(dst)
}
