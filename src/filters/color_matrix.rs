// SPDX-License-Identifier: GPL-3.0-only

//! Per-pixel 4x5 affine color transform

use super::buffer::{PixelBuffer, Rgba};
use super::catalog::ColorMatrix;
use super::clamp_channel;
use super::parallel::{CancelToken, ExecutionStrategy, for_each_row};
use crate::errors::FilterResult;

/// Transform one pixel
///
/// Accumulates in f64 so that coefficient sums which are exact in the ratio
/// (e.g. three thirds) never truncate one step low.
#[inline]
pub fn transform_pixel(matrix: &ColorMatrix, px: Rgba) -> Rgba {
    let input = px.map(f64::from);
    let mut out = [0u8; 4];
    for (i, channel) in out.iter_mut().enumerate() {
        let [r, g, b, a, offset] = matrix.row(i).map(f64::from);
        *channel = clamp_channel(
            r * input[0] + g * input[1] + b * input[2] + a * input[3] + offset,
        );
    }
    out
}

/// Apply `matrix` to every pixel of `buffer` in place
pub fn apply_color_matrix(
    buffer: &mut PixelBuffer,
    matrix: &ColorMatrix,
    strategy: ExecutionStrategy,
    cancel: Option<&CancelToken>,
) -> FilterResult<()> {
    let stride = buffer.stride();
    for_each_row(buffer.as_bytes_mut(), stride, strategy, cancel, |_, row| {
        let pixels: &mut [Rgba] = bytemuck::cast_slice_mut(row);
        for px in pixels {
            *px = transform_pixel(matrix, *px);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_matrix_is_noop() {
        for px in [[0, 0, 0, 0], [12, 200, 99, 255], [255, 255, 255, 1]] {
            assert_eq!(transform_pixel(&ColorMatrix::IDENTITY, px), px);
        }
    }

    #[test]
    fn test_offsets_and_clamping() {
        let matrix = ColorMatrix::new([
            2.0, 0.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, -50.0, //
            0.0, 0.0, 0.5, 0.0, 0.7, //
            0.0, 0.0, 0.0, 1.0, 0.0,
        ]);
        // 2*200 clamps high, 20-50 clamps low, 0.5*3+0.7 = 2.2 truncates
        assert_eq!(transform_pixel(&matrix, [200, 20, 3, 77]), [255, 0, 2, 77]);
    }

    #[test]
    fn test_thirds_do_not_lose_a_step() {
        let third = 1.0 / 3.0;
        let matrix = ColorMatrix::new([
            third, third, third, 0.0, 0.0, //
            third, third, third, 0.0, 0.0, //
            third, third, third, 0.0, 0.0, //
            0.0, 0.0, 0.0, 1.0, 0.0,
        ]);
        for v in 0..=255u8 {
            assert_eq!(transform_pixel(&matrix, [v, v, v, 255]), [v, v, v, 255]);
        }
    }

    #[test]
    fn test_apply_in_place_both_strategies() {
        let swap = ColorMatrix::new([
            0.0, 0.0, 1.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 1.0, 0.0,
        ]);
        for strategy in [ExecutionStrategy::Serial, ExecutionStrategy::ParallelRows] {
            let mut buf = PixelBuffer::filled(3, 3, [1, 2, 3, 4]).unwrap();
            apply_color_matrix(&mut buf, &swap, strategy, None).unwrap();
            assert!(buf.pixels().iter().all(|px| *px == [3, 2, 1, 4]));
        }
    }
}
