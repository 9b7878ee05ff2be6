// SPDX-License-Identifier: GPL-3.0-only

//! Intensity threshold posterization

use super::buffer::{PixelBuffer, Rgba};
use super::catalog::ThresholdRule;
use super::parallel::{CancelToken, ExecutionStrategy, for_each_row};
use crate::errors::FilterResult;

/// Integer mean of the color channels
#[inline]
pub fn intensity(px: Rgba) -> u8 {
    ((u16::from(px[0]) + u16::from(px[1]) + u16::from(px[2])) / 3) as u8
}

/// Replace every pixel by its bucket color, keeping alpha
pub fn apply_threshold(
    buffer: &mut PixelBuffer,
    rule: &ThresholdRule,
    strategy: ExecutionStrategy,
    cancel: Option<&CancelToken>,
) -> FilterResult<()> {
    let stride = buffer.stride();
    for_each_row(buffer.as_bytes_mut(), stride, strategy, cancel, |_, row| {
        let pixels: &mut [Rgba] = bytemuck::cast_slice_mut(row);
        for px in pixels {
            let [r, g, b] = rule.bucket(intensity(*px));
            *px = [r, g, b, px[3]];
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intensity_truncates() {
        assert_eq!(intensity([255, 255, 255, 0]), 255);
        assert_eq!(intensity([1, 1, 0, 0]), 0);
        assert_eq!(intensity([100, 101, 102, 0]), 101);
    }

    #[test]
    fn test_sketch_on_mixed_row() {
        let mut buf = PixelBuffer::filled(3, 1, [0, 0, 0, 0]).unwrap();
        buf.set_pixel(0, 0, [200, 200, 200, 9]).unwrap();
        buf.set_pixel(1, 0, [110, 110, 110, 99]).unwrap();
        buf.set_pixel(2, 0, [50, 50, 50, 199]).unwrap();

        apply_threshold(&mut buf, &ThresholdRule::sketch(), ExecutionStrategy::Serial, None)
            .unwrap();

        assert_eq!(buf.pixel(0, 0), Some([255, 255, 255, 9]));
        assert_eq!(buf.pixel(1, 0), Some([150, 150, 150, 99]));
        assert_eq!(buf.pixel(2, 0), Some([0, 0, 0, 199]));
    }
}
