// SPDX-License-Identifier: GPL-3.0-only

//! Device capability probe
//!
//! Decides once whether the host can afford the full convolution filters.
//! The filter engine only ever receives the answer; it never probes.

use crate::constants::{device, units};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Whether the device meets the core-count and memory thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceCapability {
    /// Enough cores and memory for full convolution
    HighPowered,
    /// Use cheap approximations where they exist
    #[default]
    Constrained,
}

impl DeviceCapability {
    pub fn is_high_powered(self) -> bool {
        self == DeviceCapability::HighPowered
    }

    /// Get display name for the capability
    pub fn display_name(self) -> &'static str {
        match self {
            DeviceCapability::HighPowered => "high-powered",
            DeviceCapability::Constrained => "constrained",
        }
    }
}

impl From<bool> for DeviceCapability {
    fn from(high_powered: bool) -> Self {
        if high_powered {
            DeviceCapability::HighPowered
        } else {
            DeviceCapability::Constrained
        }
    }
}

impl From<DeviceCapability> for bool {
    fn from(capability: DeviceCapability) -> Self {
        capability.is_high_powered()
    }
}

/// Classify a device from its core count and total memory in bytes
///
/// Unknown memory counts as constrained.
pub fn classify(cores: usize, total_memory: Option<u64>) -> DeviceCapability {
    let enough_memory = total_memory.is_some_and(|m| m >= device::MIN_MEMORY_GIB * units::GIB);
    DeviceCapability::from(cores >= device::MIN_CORES && enough_memory)
}

/// Parse the total memory, in bytes, out of a `/proc/meminfo` style report
///
/// The value may be followed by `kB`, `MB` or `GB` (binary multiples,
/// case-insensitive). Without a recognized unit the value is taken as bytes.
pub fn parse_mem_total(meminfo: &str) -> Option<u64> {
    let line = meminfo
        .lines()
        .find(|line| line.starts_with(device::MEMINFO_TOTAL_KEY))?;
    let mut tokens = line[device::MEMINFO_TOTAL_KEY.len()..].split_whitespace();
    let value: u64 = tokens.next()?.parse().ok()?;

    let multiplier = match tokens.next().map(str::to_ascii_uppercase).as_deref() {
        Some("KB") => units::KIB,
        Some("MB") => units::MIB,
        Some("GB") => units::GIB,
        _ => 1,
    };

    value.checked_mul(multiplier)
}

/// Probe the running system
///
/// Failures to read or parse the memory report are logged and classify the
/// device as constrained.
pub fn probe() -> DeviceCapability {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);

    // Memory only matters once the core count qualifies
    if cores < device::MIN_CORES {
        debug!(cores, "Device below core threshold");
        return DeviceCapability::Constrained;
    }

    let total_memory = match std::fs::read_to_string(device::MEMINFO_PATH) {
        Ok(report) => {
            let total = parse_mem_total(&report);
            if total.is_none() {
                warn!(path = device::MEMINFO_PATH, "No usable MemTotal entry");
            }
            total
        }
        Err(e) => {
            warn!(path = device::MEMINFO_PATH, error = %e, "Failed to read memory report");
            None
        }
    };

    let capability = classify(cores, total_memory);
    debug!(cores, ?total_memory, capability = capability.display_name(), "Device probed");
    capability
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "MemTotal:        2940592 kB\nMemFree:          123456 kB\n";

    #[test]
    fn test_parse_kb_report() {
        assert_eq!(parse_mem_total(SAMPLE), Some(2_940_592 * 1024));
    }

    #[test]
    fn test_parse_units_and_bare_values() {
        assert_eq!(parse_mem_total("MemTotal: 8 GB"), Some(8 * units::GIB));
        assert_eq!(parse_mem_total("MemTotal: 512 mb"), Some(512 * units::MIB));
        assert_eq!(parse_mem_total("MemTotal: 4096"), Some(4096));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_mem_total("MemFree: 10 kB"), None);
        assert_eq!(parse_mem_total("MemTotal: lots kB"), None);
        assert_eq!(parse_mem_total("MemTotal:"), None);
        assert_eq!(parse_mem_total(&format!("MemTotal: {} GB", u64::MAX)), None);
    }

    #[test]
    fn test_classify_thresholds() {
        let seven_gib = Some(7 * units::GIB);
        assert_eq!(classify(8, seven_gib), DeviceCapability::HighPowered);
        assert_eq!(classify(7, seven_gib), DeviceCapability::HighPowered);
        assert_eq!(classify(6, seven_gib), DeviceCapability::Constrained);
        assert_eq!(classify(8, Some(7 * units::GIB - 1)), DeviceCapability::Constrained);
        assert_eq!(classify(64, None), DeviceCapability::Constrained);
    }

    #[test]
    fn test_bool_conversions() {
        assert_eq!(DeviceCapability::from(true), DeviceCapability::HighPowered);
        assert!(!bool::from(DeviceCapability::Constrained));
    }
}
