// SPDX-License-Identifier: GPL-3.0-only

//! Async photo pipeline
//!
//! ```text
//! Capture → Post-Processing (blocking pool) → caller
//!     ↓
//! Caller keeps running
//! ```

pub mod processing;

pub use processing::{PostProcessingConfig, PostProcessor};
