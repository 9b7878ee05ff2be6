// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the device capability probe

use camerart::constants::units::GIB;
use camerart::device::{self, DeviceCapability};
use camerart::filters::FilterId;

const MEMINFO: &str = "\
MemTotal:       16318480 kB
MemFree:         9051212 kB
MemAvailable:   12617232 kB
Buffers:          305764 kB
";

#[test]
fn test_parse_real_meminfo() {
    assert_eq!(device::parse_mem_total(MEMINFO), Some(16_318_480 * 1024));
}

#[test]
fn test_desktop_is_high_powered() {
    let memory = device::parse_mem_total(MEMINFO);
    assert_eq!(device::classify(8, memory), DeviceCapability::HighPowered);
}

#[test]
fn test_phone_class_device_is_constrained() {
    assert_eq!(
        device::classify(8, Some(4 * GIB)),
        DeviceCapability::Constrained
    );
    assert_eq!(
        device::classify(4, Some(16 * GIB)),
        DeviceCapability::Constrained
    );
}

#[test]
fn test_probe_never_fails() {
    // Whatever the host is, the probe yields one of the two classes
    let capability = device::probe();
    assert!(matches!(
        capability,
        DeviceCapability::HighPowered | DeviceCapability::Constrained
    ));
}

#[test]
fn test_filter_menu_per_capability() {
    let full = FilterId::available_for(DeviceCapability::HighPowered);
    let reduced = FilterId::available_for(DeviceCapability::Constrained);

    assert_eq!(full.len(), FilterId::ALL.len());
    assert!(reduced.iter().all(|id| !id.is_expensive()));
    assert!(reduced.contains(&FilterId::Sketch));
    assert!(!reduced.contains(&FilterId::GaussianBlur));
}

#[test]
fn test_capability_serializes_snake_case() {
    let json = serde_json::to_string(&DeviceCapability::HighPowered).unwrap();
    assert_eq!(json, "\"high_powered\"");
}
