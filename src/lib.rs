// SPDX-License-Identifier: GPL-3.0-only

//! CamerArt - artistic filters for camera captures
//!
//! This library provides the filter engine behind the CamerArt camera app:
//! color-matrix, convolution and threshold filters over RGBA buffers, plus the
//! device probe, configuration and async photo pipeline around it.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`filters`]: The pure filter engine
//! - [`device`]: One-shot device capability probe
//! - [`pipelines`]: Async post-processing of captures
//! - [`config`]: User configuration handling
//!
//! # Example
//!
//! ```
//! use camerart::{DeviceCapability, FilterEngine, FilterId, PixelBuffer};
//!
//! let engine = FilterEngine::standard(DeviceCapability::HighPowered);
//! let pixels = PixelBuffer::filled(4, 4, [200, 100, 50, 255]).unwrap();
//! let out = engine.apply(pixels, FilterId::Greyscale).unwrap();
//! assert_eq!(out.pixel(0, 0), Some([116, 116, 116, 255]));
//! ```

pub mod config;
pub mod constants;
pub mod device;
pub mod errors;
pub mod filters;
pub mod pipelines;

// Re-export commonly used types
pub use config::Config;
pub use device::DeviceCapability;
pub use errors::{AppError, FilterError};
pub use filters::{
    CancelToken, ExecutionStrategy, FilterCatalog, FilterEngine, FilterId, PixelBuffer,
    apply_filter,
};
