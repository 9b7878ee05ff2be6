// SPDX-License-Identifier: GPL-3.0-only

//! Filter dispatch
//!
//! Resolves a [`FilterId`] through the catalog and runs the matching pass.
//! Convolution filters take the cheap fallback on constrained devices when
//! the catalog registers one; every other convolution runs in full
//! regardless of capability.

use super::buffer::PixelBuffer;
use super::catalog::{
    ColorMatrix, ConvolutionKernel, Fallback, FilterCatalog, FilterSpec, ThresholdRule,
};
use super::color_matrix::apply_color_matrix;
use super::convolution::convolve;
use super::fallback::apply_fallback;
use super::parallel::{CancelToken, ExecutionStrategy};
use super::sketch::apply_threshold;
use super::FilterId;
use crate::device::DeviceCapability;
use crate::errors::FilterResult;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Which pass a filter resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionPath {
    /// Buffer returned untouched
    Identity,
    ColorMatrix,
    Threshold,
    /// Full toroidal convolution
    Convolution,
    /// Cheap approximation of a convolution
    Fallback,
}

/// The pass a filter resolves to, with the data it runs on
enum Pass<'a> {
    Identity,
    ColorMatrix(&'a ColorMatrix),
    Threshold(&'a ThresholdRule),
    Convolution(&'a ConvolutionKernel),
    Fallback(Fallback),
}

impl Pass<'_> {
    fn path(&self) -> ExecutionPath {
        match self {
            Pass::Identity => ExecutionPath::Identity,
            Pass::ColorMatrix(_) => ExecutionPath::ColorMatrix,
            Pass::Threshold(_) => ExecutionPath::Threshold,
            Pass::Convolution(_) => ExecutionPath::Convolution,
            Pass::Fallback(_) => ExecutionPath::Fallback,
        }
    }
}

fn resolve(catalog: &FilterCatalog, filter: FilterId, capability: DeviceCapability) -> Pass<'_> {
    match catalog.lookup(filter) {
        FilterSpec::Identity => Pass::Identity,
        FilterSpec::ColorMatrix(matrix) => Pass::ColorMatrix(matrix),
        FilterSpec::Threshold(rule) => Pass::Threshold(rule),
        FilterSpec::Convolution(kernel) => match catalog.fallback(filter) {
            Some(fallback) if !capability.is_high_powered() => Pass::Fallback(fallback),
            _ => Pass::Convolution(kernel),
        },
    }
}

/// Resolve the pass for `filter` without running it
pub fn execution_path(
    catalog: &FilterCatalog,
    filter: FilterId,
    capability: DeviceCapability,
) -> ExecutionPath {
    resolve(catalog, filter, capability).path()
}

fn dispatch(
    catalog: &FilterCatalog,
    mut pixels: PixelBuffer,
    filter: FilterId,
    capability: DeviceCapability,
    strategy: ExecutionStrategy,
    cancel: Option<&CancelToken>,
) -> FilterResult<PixelBuffer> {
    let pass = resolve(catalog, filter, capability);
    let path = pass.path();
    let start = Instant::now();

    let result = match pass {
        Pass::Identity => return Ok(pixels),
        Pass::ColorMatrix(matrix) => {
            apply_color_matrix(&mut pixels, matrix, strategy, cancel)?;
            pixels
        }
        Pass::Threshold(rule) => {
            apply_threshold(&mut pixels, rule, strategy, cancel)?;
            pixels
        }
        Pass::Fallback(fallback) => apply_fallback(&pixels, fallback, strategy, cancel)?,
        Pass::Convolution(kernel) => convolve(&pixels, kernel, strategy, cancel)?,
    };

    debug!(
        filter = filter.name(),
        width = result.width(),
        height = result.height(),
        ?path,
        ?strategy,
        elapsed_us = start.elapsed().as_micros() as u64,
        "Filter applied"
    );

    Ok(result)
}

/// Apply `filter` to `pixels`
///
/// The identity filter (and any filter missing from the catalog) hands the
/// very same buffer back without copying.
pub fn apply_filter(
    catalog: &FilterCatalog,
    pixels: PixelBuffer,
    filter: FilterId,
    capability: DeviceCapability,
) -> FilterResult<PixelBuffer> {
    dispatch(
        catalog,
        pixels,
        filter,
        capability,
        ExecutionStrategy::default(),
        None,
    )
}

/// Apply `filter` to raw RGBA bytes, validating the shape first
pub fn apply_filter_rgba(
    catalog: &FilterCatalog,
    width: u32,
    height: u32,
    data: Vec<u8>,
    filter: FilterId,
    capability: DeviceCapability,
) -> FilterResult<Vec<u8>> {
    let pixels = PixelBuffer::new(width, height, data)?;
    apply_filter(catalog, pixels, filter, capability).map(PixelBuffer::into_raw)
}

/// Filter engine bound to a shared catalog and a device capability
#[derive(Debug, Clone)]
pub struct FilterEngine {
    catalog: Arc<FilterCatalog>,
    capability: DeviceCapability,
    strategy: ExecutionStrategy,
}

impl FilterEngine {
    pub fn new(catalog: Arc<FilterCatalog>, capability: DeviceCapability) -> Self {
        Self {
            catalog,
            capability,
            strategy: ExecutionStrategy::default(),
        }
    }

    /// Engine over the built-in catalog
    pub fn standard(capability: DeviceCapability) -> Self {
        Self::new(Arc::new(FilterCatalog::standard()), capability)
    }

    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn catalog(&self) -> &FilterCatalog {
        &self.catalog
    }

    pub fn capability(&self) -> DeviceCapability {
        self.capability
    }

    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    pub fn path_for(&self, filter: FilterId) -> ExecutionPath {
        execution_path(&self.catalog, filter, self.capability)
    }

    pub fn apply(&self, pixels: PixelBuffer, filter: FilterId) -> FilterResult<PixelBuffer> {
        dispatch(
            &self.catalog,
            pixels,
            filter,
            self.capability,
            self.strategy,
            None,
        )
    }

    /// Like [`FilterEngine::apply`], stopping between scanlines once `cancel` is set
    pub fn apply_cancellable(
        &self,
        pixels: PixelBuffer,
        filter: FilterId,
        cancel: &CancelToken,
    ) -> FilterResult<PixelBuffer> {
        dispatch(
            &self.catalog,
            pixels,
            filter,
            self.capability,
            self.strategy,
            Some(cancel),
        )
    }
}
