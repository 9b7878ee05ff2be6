// SPDX-License-Identifier: GPL-3.0-only

//! Filter catalog
//!
//! Immutable table mapping every [`FilterId`] to the data that describes it:
//! a 4x5 color matrix, a convolution kernel, a threshold rule, or nothing at
//! all. The table is built once and shared; lookups never fail.
//!
//! Color matrices use the row layout
//!
//! ```text
//! R' = a*R + b*G + c*B + d*A + e
//! G' = f*R + g*G + h*B + i*A + j
//! B' = k*R + l*G + m*B + n*A + o
//! A' = p*R + q*G + r*B + s*A + t
//! ```

use super::FilterId;
use crate::constants::{self, sketch};
use crate::errors::{FilterError, FilterResult};
use std::collections::HashMap;

/// 4-row x 5-column affine color transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix {
    values: [f32; 20],
}

impl ColorMatrix {
    pub const IDENTITY: ColorMatrix = ColorMatrix::new([
        1.0, 0.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]);

    pub const fn new(values: [f32; 20]) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f32; 20] {
        &self.values
    }

    /// Row `i` as `[r, g, b, a, offset]` coefficients
    #[inline]
    pub fn row(&self, i: usize) -> [f32; 5] {
        let r = &self.values[i * 5..i * 5 + 5];
        [r[0], r[1], r[2], r[3], r[4]]
    }
}

/// Convolution kernel with odd dimensions, scale factor and bias
#[derive(Debug, Clone, PartialEq)]
pub struct ConvolutionKernel {
    values: Vec<f32>,
    width: usize,
    height: usize,
    factor: f32,
    bias: f32,
}

impl ConvolutionKernel {
    /// Create a kernel from row-major values
    ///
    /// Both dimensions must be odd so the kernel has a well-defined center.
    pub fn new(
        width: usize,
        height: usize,
        values: Vec<f32>,
        factor: f32,
        bias: f32,
    ) -> FilterResult<Self> {
        if width == 0 || height == 0 || width % 2 == 0 || height % 2 == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "dimensions must be odd and non-zero, got {}x{}",
                width, height
            )));
        }
        if values.len() != width * height {
            return Err(FilterError::InvalidKernel(format!(
                "expected {} values for {}x{}, got {}",
                width * height,
                width,
                height,
                values.len()
            )));
        }
        if !factor.is_finite() || !bias.is_finite() || values.iter().any(|v| !v.is_finite()) {
            return Err(FilterError::InvalidKernel("non-finite coefficient".into()));
        }

        Ok(Self {
            values,
            width,
            height,
            factor,
            bias,
        })
    }

    /// Build a 3x3 kernel; the dimensions are valid by construction
    fn square3(values: [f32; 9], factor: f32, bias: f32) -> Self {
        Self {
            values: values.to_vec(),
            width: 3,
            height: 3,
            factor,
            bias,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn factor(&self) -> f32 {
        self.factor
    }

    #[inline]
    pub fn bias(&self) -> f32 {
        self.bias
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Weight at column `x`, row `y`
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.values[y * self.width + x]
    }

    pub fn sum(&self) -> f32 {
        self.values.iter().sum()
    }
}

/// Intensity bucketing rule
///
/// Intensity is the integer mean of R, G and B. Levels are checked from the
/// highest threshold down; the first threshold strictly below the intensity
/// picks the output color, otherwise `floor` is used. Alpha is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdRule {
    levels: Vec<(u8, [u8; 3])>,
    floor: [u8; 3],
}

impl ThresholdRule {
    pub fn new(mut levels: Vec<(u8, [u8; 3])>, floor: [u8; 3]) -> Self {
        levels.sort_by(|a, b| b.0.cmp(&a.0));
        Self { levels, floor }
    }

    /// The three-level black / grey / white sketch rule
    pub fn sketch() -> Self {
        Self::new(
            vec![
                (sketch::INTENSITY_THRESHOLD, sketch::WHITE),
                (
                    sketch::INTENSITY_THRESHOLD - sketch::GREY_BAND,
                    sketch::GREY,
                ),
            ],
            sketch::BLACK,
        )
    }

    /// Output color for an intensity
    #[inline]
    pub fn bucket(&self, intensity: u8) -> [u8; 3] {
        self.levels
            .iter()
            .find(|(threshold, _)| intensity > *threshold)
            .map(|(_, color)| *color)
            .unwrap_or(self.floor)
    }
}

/// What a catalog entry does to a buffer
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSpec {
    /// Pass-through
    Identity,
    ColorMatrix(ColorMatrix),
    Convolution(ConvolutionKernel),
    Threshold(ThresholdRule),
}

/// Cheaper approximation used on constrained devices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Separable box blur with edge-clamped sampling
    BoxBlur { radius: u32 },
}

static IDENTITY: FilterSpec = FilterSpec::Identity;

/// Immutable lookup table from filter identifier to filter description
#[derive(Debug, Clone, Default)]
pub struct FilterCatalog {
    entries: HashMap<FilterId, FilterSpec>,
    fallbacks: HashMap<FilterId, Fallback>,
}

impl FilterCatalog {
    /// Catalog with no entries; every lookup yields the identity filter
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in filter set
    pub fn standard() -> Self {
        let third = 1.0 / 3.0;

        Self::empty()
            .with_entry(FilterId::None, FilterSpec::Identity)
            .with_entry(
                FilterId::NoGreen,
                FilterSpec::ColorMatrix(ColorMatrix::new([
                    1.0, 0.0, 0.0, 0.0, 0.0, //
                    0.0, 0.0, 0.0, 0.0, 0.0, //
                    0.0, 0.0, 1.0, 0.0, 0.0, //
                    0.0, 0.0, 0.0, 1.0, 0.0,
                ])),
            )
            .with_entry(
                FilterId::Greyscale,
                FilterSpec::ColorMatrix(ColorMatrix::new([
                    third, third, third, 0.0, 0.0, //
                    third, third, third, 0.0, 0.0, //
                    third, third, third, 0.0, 0.0, //
                    0.0, 0.0, 0.0, 1.0, 0.0,
                ])),
            )
            .with_entry(
                FilterId::Sepia,
                FilterSpec::ColorMatrix(ColorMatrix::new([
                    0.393, 0.769, 0.189, 0.0, 0.0, //
                    0.349, 0.686, 0.168, 0.0, 0.0, //
                    0.272, 0.534, 0.131, 0.0, 0.0, //
                    0.0, 0.0, 0.0, 1.0, 0.0,
                ])),
            )
            .with_entry(
                FilterId::Negative,
                FilterSpec::ColorMatrix(ColorMatrix::new([
                    -1.0, 0.0, 0.0, 0.0, 255.0, //
                    0.0, -1.0, 0.0, 0.0, 255.0, //
                    0.0, 0.0, -1.0, 0.0, 255.0, //
                    0.0, 0.0, 0.0, 1.0, 0.0,
                ])),
            )
            .with_entry(
                FilterId::Aqua,
                FilterSpec::ColorMatrix(ColorMatrix::new([
                    0.0, 0.0, 1.0, 0.0, 0.0, //
                    0.0, 1.0, 0.0, 0.0, 0.0, //
                    1.0, 0.0, 0.0, 0.0, 0.0, //
                    0.0, 0.0, 0.0, 1.0, 0.0,
                ])),
            )
            .with_entry(
                FilterId::Faded,
                FilterSpec::ColorMatrix(ColorMatrix::new([
                    0.66, 0.33, 0.33, 0.0, 0.0, //
                    0.33, 0.66, 0.33, 0.0, 0.0, //
                    0.33, 0.33, 0.66, 0.0, 0.0, //
                    0.0, 0.0, 0.0, 1.0, 0.0,
                ])),
            )
            .with_entry(FilterId::Sketch, FilterSpec::Threshold(ThresholdRule::sketch()))
            .with_entry(
                FilterId::GaussianBlur,
                FilterSpec::Convolution(ConvolutionKernel::square3(
                    [1.0, 2.0, 1.0, 2.0, 4.0, 2.0, 1.0, 2.0, 1.0],
                    1.0 / 16.0,
                    0.0,
                )),
            )
            .with_entry(
                FilterId::EdgeDetect,
                FilterSpec::Convolution(ConvolutionKernel::square3(
                    [-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0],
                    1.0,
                    0.0,
                )),
            )
            .with_entry(
                FilterId::SharpenLight,
                FilterSpec::Convolution(ConvolutionKernel::square3(
                    [-1.0, -1.0, -1.0, -1.0, 9.0, -1.0, -1.0, -1.0, -1.0],
                    1.0,
                    0.0,
                )),
            )
            .with_entry(
                FilterId::SharpenHard,
                FilterSpec::Convolution(ConvolutionKernel::square3(
                    [1.0, 1.0, 1.0, 1.0, -7.0, 1.0, 1.0, 1.0, 1.0],
                    1.0,
                    0.0,
                )),
            )
            .with_entry(
                FilterId::Emboss,
                FilterSpec::Convolution(ConvolutionKernel::square3(
                    [-1.0, -1.0, 0.0, -1.0, 0.0, 1.0, 0.0, 1.0, 1.0],
                    1.0,
                    constants::EMBOSS_BIAS,
                )),
            )
            // Only the blur has a cheap stand-in; the other kernels always
            // run the full convolution.
            .with_fallback(
                FilterId::GaussianBlur,
                Fallback::BoxBlur {
                    radius: constants::FALLBACK_BLUR_RADIUS,
                },
            )
    }

    /// Add or replace an entry
    pub fn with_entry(mut self, id: FilterId, spec: FilterSpec) -> Self {
        self.entries.insert(id, spec);
        self
    }

    /// Register a cheap approximation for an entry
    pub fn with_fallback(mut self, id: FilterId, fallback: Fallback) -> Self {
        self.fallbacks.insert(id, fallback);
        self
    }

    /// Description of `id`; missing entries behave as the identity filter
    pub fn lookup(&self, id: FilterId) -> &FilterSpec {
        self.entries.get(&id).unwrap_or(&IDENTITY)
    }

    /// Cheap approximation registered for `id`, if any
    pub fn fallback(&self, id: FilterId) -> Option<Fallback> {
        self.fallbacks.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_covers_every_filter() {
        let catalog = FilterCatalog::standard();
        assert_eq!(catalog.len(), FilterId::ALL.len());
        assert_eq!(catalog.lookup(FilterId::None), &FilterSpec::Identity);
        assert!(matches!(
            catalog.lookup(FilterId::Sepia),
            FilterSpec::ColorMatrix(_)
        ));
        assert!(matches!(
            catalog.lookup(FilterId::Sketch),
            FilterSpec::Threshold(_)
        ));
        for id in FilterId::ALL.iter().filter(|id| id.is_expensive()) {
            assert!(matches!(catalog.lookup(*id), FilterSpec::Convolution(_)));
        }
    }

    #[test]
    fn test_missing_entry_is_identity() {
        let catalog = FilterCatalog::empty();
        assert_eq!(catalog.lookup(FilterId::Emboss), &FilterSpec::Identity);
    }

    #[test]
    fn test_only_blur_has_fallback() {
        let catalog = FilterCatalog::standard();
        assert_eq!(
            catalog.fallback(FilterId::GaussianBlur),
            Some(Fallback::BoxBlur { radius: 1 })
        );
        for id in [
            FilterId::EdgeDetect,
            FilterId::SharpenLight,
            FilterId::SharpenHard,
            FilterId::Emboss,
        ] {
            assert_eq!(catalog.fallback(id), None);
        }
    }

    #[test]
    fn test_kernel_sums() {
        let catalog = FilterCatalog::standard();
        let sum = |id| match catalog.lookup(id) {
            FilterSpec::Convolution(k) => k.sum() * k.factor(),
            _ => panic!("not a kernel"),
        };
        assert_eq!(sum(FilterId::GaussianBlur), 1.0);
        assert_eq!(sum(FilterId::EdgeDetect), 0.0);
        assert_eq!(sum(FilterId::SharpenLight), 1.0);
        assert_eq!(sum(FilterId::SharpenHard), 1.0);
        assert_eq!(sum(FilterId::Emboss), 0.0);
    }

    #[test]
    fn test_kernel_validation() {
        assert!(ConvolutionKernel::new(2, 3, vec![0.0; 6], 1.0, 0.0).is_err());
        assert!(ConvolutionKernel::new(3, 3, vec![0.0; 8], 1.0, 0.0).is_err());
        assert!(ConvolutionKernel::new(3, 3, vec![0.0; 9], f32::NAN, 0.0).is_err());
        let k = ConvolutionKernel::new(3, 1, vec![1.0, 2.0, 3.0], 0.5, 1.0).unwrap();
        assert_eq!(k.get(2, 0), 3.0);
    }

    #[test]
    fn test_sketch_buckets() {
        let rule = ThresholdRule::sketch();
        assert_eq!(rule.bucket(200), [255, 255, 255]);
        assert_eq!(rule.bucket(121), [255, 255, 255]);
        assert_eq!(rule.bucket(120), [150, 150, 150]);
        assert_eq!(rule.bucket(101), [150, 150, 150]);
        assert_eq!(rule.bucket(100), [0, 0, 0]);
        assert_eq!(rule.bucket(0), [0, 0, 0]);
    }
}
