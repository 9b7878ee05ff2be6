// SPDX-License-Identifier: GPL-3.0-only

//! Filter identifiers

use crate::device::DeviceCapability;
use serde::{Deserialize, Serialize};

/// Stable identifier of a catalog entry
///
/// Codes and names are persisted in user configuration, so they must never be
/// renumbered. Anything that does not name a known filter resolves to
/// [`FilterId::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum FilterId {
    /// No filter applied
    #[default]
    None,
    /// Green channel removed
    NoGreen,
    /// Channel average
    Greyscale,
    /// Warm brownish tone
    Sepia,
    /// Inverted colors
    Negative,
    /// Red and blue swapped
    Aqua,
    /// Washed-out colors
    Faded,
    /// Three-level intensity posterization
    Sketch,
    /// 3x3 Gaussian smoothing
    GaussianBlur,
    /// 3x3 Laplacian edge detection
    EdgeDetect,
    /// Mild 3x3 sharpening
    SharpenLight,
    /// Aggressive 3x3 sharpening
    SharpenHard,
    /// 3x3 relief effect
    Emboss,
}

impl FilterId {
    /// All filters in menu order; the expensive ones come last
    pub const ALL: [FilterId; 13] = [
        FilterId::None,
        FilterId::NoGreen,
        FilterId::Greyscale,
        FilterId::Sepia,
        FilterId::Negative,
        FilterId::Aqua,
        FilterId::Faded,
        FilterId::Sketch,
        FilterId::GaussianBlur,
        FilterId::EdgeDetect,
        FilterId::SharpenLight,
        FilterId::SharpenHard,
        FilterId::Emboss,
    ];

    /// Resolve a numeric code; unknown codes select no filter
    pub fn from_code(code: u32) -> FilterId {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.code() == code)
            .unwrap_or(FilterId::None)
    }

    pub fn code(self) -> u32 {
        match self {
            FilterId::None => 0,
            FilterId::NoGreen => 1,
            FilterId::Greyscale => 2,
            FilterId::Sepia => 3,
            FilterId::Negative => 4,
            FilterId::Aqua => 5,
            FilterId::Faded => 6,
            FilterId::Sketch => 7,
            FilterId::GaussianBlur => 8,
            FilterId::EdgeDetect => 9,
            FilterId::SharpenLight => 10,
            FilterId::SharpenHard => 11,
            FilterId::Emboss => 12,
        }
    }

    /// Preference value stored in configuration
    pub fn name(self) -> &'static str {
        match self {
            FilterId::None => "none",
            FilterId::NoGreen => "no_green",
            FilterId::Greyscale => "grey",
            FilterId::Sepia => "sepia",
            FilterId::Negative => "negative",
            FilterId::Aqua => "aqua",
            FilterId::Faded => "faded",
            FilterId::Sketch => "sketch",
            FilterId::GaussianBlur => "blur",
            FilterId::EdgeDetect => "edge",
            FilterId::SharpenLight => "sharpen_light",
            FilterId::SharpenHard => "sharpen_hard",
            FilterId::Emboss => "emboss",
        }
    }

    /// Get display name for the filter
    pub fn display_name(self) -> &'static str {
        match self {
            FilterId::None => "Original",
            FilterId::NoGreen => "No Green",
            FilterId::Greyscale => "Greyscale",
            FilterId::Sepia => "Sepia",
            FilterId::Negative => "Negative",
            FilterId::Aqua => "Aqua",
            FilterId::Faded => "Faded",
            FilterId::Sketch => "Sketch",
            FilterId::GaussianBlur => "Blur",
            FilterId::EdgeDetect => "Edge",
            FilterId::SharpenLight => "Sharpen (light)",
            FilterId::SharpenHard => "Sharpen (hard)",
            FilterId::Emboss => "Emboss",
        }
    }

    /// Strict name lookup, case-insensitive, with a few common aliases
    pub fn from_name(name: &str) -> Option<FilterId> {
        let name = name.trim().to_ascii_lowercase().replace('-', "_");
        let id = match name.as_str() {
            "none" | "original" => FilterId::None,
            "no_green" | "nogreen" => FilterId::NoGreen,
            "grey" | "gray" | "greyscale" | "grayscale" => FilterId::Greyscale,
            "sepia" => FilterId::Sepia,
            "negative" => FilterId::Negative,
            "aqua" => FilterId::Aqua,
            "faded" => FilterId::Faded,
            "sketch" => FilterId::Sketch,
            "blur" | "gaussian_blur" => FilterId::GaussianBlur,
            "edge" | "edge_detect" => FilterId::EdgeDetect,
            "sharpen_light" | "sharpen" => FilterId::SharpenLight,
            "sharpen_hard" => FilterId::SharpenHard,
            "emboss" => FilterId::Emboss,
            _ => return None,
        };
        Some(id)
    }

    /// Convolution filters, hidden from the menu on constrained devices
    pub fn is_expensive(self) -> bool {
        matches!(
            self,
            FilterId::GaussianBlur
                | FilterId::EdgeDetect
                | FilterId::SharpenLight
                | FilterId::SharpenHard
                | FilterId::Emboss
        )
    }

    /// Filters offered to the user on a device of the given capability
    pub fn available_for(capability: DeviceCapability) -> Vec<FilterId> {
        Self::ALL
            .iter()
            .copied()
            .filter(|id| capability.is_high_powered() || !id.is_expensive())
            .collect()
    }
}

impl From<&str> for FilterId {
    fn from(name: &str) -> Self {
        FilterId::from_name(name).unwrap_or(FilterId::None)
    }
}

impl From<String> for FilterId {
    fn from(name: String) -> Self {
        FilterId::from(name.as_str())
    }
}

impl From<FilterId> for &'static str {
    fn from(id: FilterId) -> Self {
        id.name()
    }
}

impl std::fmt::Display for FilterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
