// SPDX-License-Identifier: GPL-3.0-only

//! Processing pipelines around the filter engine
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────┐
//! │   Capture    │ ──▶ │  Photo Pipeline   │ ──▶ │   Filtered   │
//! │   (RGBA)     │     │  - Filter engine  │     │    RGBA      │
//! │              │     │  - Blocking pool  │     │              │
//! └──────────────┘     └───────────────────┘     └──────────────┘
//! ```
//!
//! - [`photo`]: async post-processing of captured photos

pub mod photo;
