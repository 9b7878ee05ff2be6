// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! This module provides command-line functionality for:
//! - Applying a filter to an image file
//! - Listing the filters available on this device
//! - Probing and caching the device capability

use crate::DeviceArg;
use camerart::config::Config;
use camerart::device::{self, DeviceCapability};
use camerart::errors::{AppError, AppResult, FilterError};
use camerart::filters::{ExecutionStrategy, FilterEngine, FilterId, PixelBuffer};
use camerart::pipelines::photo::{PostProcessingConfig, PostProcessor};
use chrono::Local;
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::warn;

/// Load the user config, or defaults when there is no usable config dir
fn load_config() -> (Config, Option<PathBuf>) {
    let path = match Config::default_path() {
        Ok(path) => path,
        Err(e) => {
            warn!(error = %e, "Using default configuration");
            return (Config::default(), None);
        }
    };

    match Config::load_from(&path) {
        Ok(config) => (config, Some(path)),
        Err(e) => {
            warn!(error = %e, "Ignoring unreadable configuration");
            (Config::default(), Some(path))
        }
    }
}

/// Resolve the capability for a device argument, probing on first run
fn resolve_capability(
    device: DeviceArg,
    config: &mut Config,
    config_path: Option<&Path>,
) -> DeviceCapability {
    match device {
        DeviceArg::High => DeviceCapability::HighPowered,
        DeviceArg::Low => DeviceCapability::Constrained,
        DeviceArg::Auto => {
            let first_run = config.capability().is_none();
            let capability = config.capability_or_probe(device::probe);
            if let (true, Some(path)) = (first_run, config_path) {
                if let Err(e) = config.save_to(path) {
                    warn!(error = %e, "Failed to cache probe result");
                }
            }
            capability
        }
    }
}

/// Apply a filter to an image file
pub fn apply(
    input: PathBuf,
    output: Option<PathBuf>,
    filter: Option<String>,
    device: DeviceArg,
    serial: bool,
) -> AppResult<()> {
    let (mut config, config_path) = load_config();
    let capability = resolve_capability(device, &mut config, config_path.as_deref());

    let filter = match filter {
        Some(name) => FilterId::from_name(&name).unwrap_or_else(|| {
            println!("Unknown filter '{}', leaving the image unfiltered", name);
            FilterId::None
        }),
        None => config.filter,
    };

    let strategy = if serial {
        ExecutionStrategy::Serial
    } else {
        config.execution
    };

    // Determine output path
    let output_path = if let Some(path) = output {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        path
    } else {
        let dir = config.output_dir_or_default();
        std::fs::create_dir_all(&dir)?;
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        dir.join(format!("filtered_{}.png", timestamp))
    };

    println!("Loading {}", input.display());
    let pixels = load_image(&input)?;
    let (width, height) = (pixels.width(), pixels.height());

    println!("Image size: {}x{}", width, height);
    println!(
        "Filter: {} ({} device)",
        filter.display_name(),
        capability.display_name()
    );

    let engine = FilterEngine::standard(capability).with_strategy(strategy);
    let processor = PostProcessor::new(
        engine,
        PostProcessingConfig {
            filter,
            fallback_to_source: false,
        },
    );

    // Set up Ctrl+C handler
    let cancel = processor.cancel_token().clone();
    ctrlc::set_handler(move || cancel.cancel())
        .map_err(|e| AppError::from(format!("Failed to install Ctrl+C handler: {}", e)))?;

    let start = Instant::now();
    let runtime = tokio::runtime::Runtime::new()?;
    let filtered = match runtime.block_on(processor.process(pixels)) {
        Ok(filtered) => filtered,
        Err(FilterError::Cancelled) => {
            println!();
            println!("Cancelled, nothing written");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    println!("Processing time: {:.2}s", start.elapsed().as_secs_f64());

    save_image(filtered, &output_path)?;

    println!("Saved to: {}", output_path.display());
    Ok(())
}

/// Decode an image file into an RGBA buffer, remembering whether it had alpha
fn load_image(path: &Path) -> AppResult<PixelBuffer> {
    let source = image::open(path)?;
    let has_alpha = source.color().has_alpha();
    let rgba = source.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(PixelBuffer::new(width, height, rgba.into_raw())?.with_alpha(has_alpha))
}

/// Whether files of this format can carry an alpha channel
fn format_keeps_alpha(format: ImageFormat) -> bool {
    !matches!(
        format,
        ImageFormat::Jpeg | ImageFormat::Pnm | ImageFormat::Hdr
    )
}

/// Encode `pixels` to `path`, dropping alpha when the source had none or
/// the target format cannot store it
fn save_image(pixels: PixelBuffer, path: &Path) -> AppResult<()> {
    let keep_alpha = pixels.has_alpha()
        && ImageFormat::from_path(path).map_or(true, format_keeps_alpha);
    let (width, height) = (pixels.width(), pixels.height());
    let image = RgbaImage::from_raw(width, height, pixels.into_raw())
        .ok_or_else(|| AppError::from("Filtered buffer does not match the image size"))?;

    if keep_alpha {
        image.save(path)?;
    } else {
        DynamicImage::ImageRgba8(image).to_rgb8().save(path)?;
    }
    Ok(())
}

/// List the filters available for a device class
pub fn list_filters(device: DeviceArg) -> AppResult<()> {
    let (mut config, config_path) = load_config();
    let capability = resolve_capability(device, &mut config, config_path.as_deref());

    println!("Filters for {} devices:", capability.display_name());
    println!();
    for id in FilterId::available_for(capability) {
        let marker = if id.is_expensive() { " *" } else { "" };
        let selected = if id == config.filter { " (selected)" } else { "" };
        println!(
            "  [{:>2}] {:<14} {}{}{}",
            id.code(),
            id.name(),
            id.display_name(),
            marker,
            selected
        );
    }

    if capability.is_high_powered() {
        println!();
        println!("  * convolution filter");
    }

    Ok(())
}

/// Probe the device and optionally cache the result
pub fn probe(save: bool) -> AppResult<()> {
    let capability = device::probe();
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);

    println!("Cores: {}", cores);
    println!("Capability: {}", capability.display_name());

    if save {
        let path = Config::default_path()?;
        let mut config = Config::load_from(&path)?;
        config.high_powered = Some(capability.is_high_powered());
        config.save_to(&path)?;
        println!("Saved to: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translucent() -> PixelBuffer {
        PixelBuffer::filled(3, 2, [200, 100, 50, 128]).unwrap()
    }

    #[test]
    fn test_jpeg_output_drops_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        save_image(translucent(), &path).unwrap();

        let decoded = image::open(&path).unwrap();
        assert!(!decoded.color().has_alpha());
        assert_eq!(decoded.width(), 3);
    }

    #[test]
    fn test_png_output_keeps_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        save_image(translucent(), &path).unwrap();

        let loaded = load_image(&path).unwrap();
        assert!(loaded.has_alpha());
        assert_eq!(loaded.pixel(2, 1), Some([200, 100, 50, 128]));
    }

    #[test]
    fn test_missing_input_is_image_error() {
        let dir = tempfile::tempdir().unwrap();
        let res = load_image(&dir.path().join("absent.png"));
        assert!(matches!(res, Err(AppError::Image(_))));
    }
}
