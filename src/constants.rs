// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Number of channels in every pixel buffer (R, G, B, A)
pub const CHANNELS: usize = 4;

/// Device capability thresholds
///
/// A device is considered high-powered when it has at least this many cores
/// and at least this much physical memory.
pub mod device {
    /// Minimum number of logical cores
    pub const MIN_CORES: usize = 7;
    /// Minimum total memory in GiB
    pub const MIN_MEMORY_GIB: u64 = 7;
    /// Kernel memory report parsed by the probe
    pub const MEMINFO_PATH: &str = "/proc/meminfo";
    /// Key of the total memory line in the memory report
    pub const MEMINFO_TOTAL_KEY: &str = "MemTotal:";
}

/// Sketch (threshold posterization) parameters
pub mod sketch {
    /// Intensities strictly above this value become white
    pub const INTENSITY_THRESHOLD: u8 = 120;
    /// Width of the grey band just below the white threshold
    pub const GREY_BAND: u8 = 20;
    /// Output color of the grey band
    pub const GREY: [u8; 3] = [150, 150, 150];
    pub const WHITE: [u8; 3] = [255, 255, 255];
    pub const BLACK: [u8; 3] = [0, 0, 0];
}

/// Radius of the box blur used in place of the Gaussian kernel on constrained devices
pub const FALLBACK_BLUR_RADIUS: u32 = 1;

/// Bias added by the emboss kernel so flat regions land on mid-grey
pub const EMBOSS_BIAS: f32 = 128.0;

/// Storage locations
pub mod storage {
    /// Directory name under the user config dir
    pub const CONFIG_DIR_NAME: &str = "camerart";
    /// Configuration file name
    pub const CONFIG_FILE_NAME: &str = "config.json";
    /// Default folder name for saving filtered photos
    pub const DEFAULT_SAVE_FOLDER: &str = "CamerArt";
}

/// Binary size multiples used when parsing memory reports
pub mod units {
    pub const KIB: u64 = 1024;
    pub const MIB: u64 = 1024 * KIB;
    pub const GIB: u64 = 1024 * MIB;
}
