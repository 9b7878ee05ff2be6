// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "camerart")]
#[command(about = "Artistic filters for camera photos")]
#[command(version = env!("GIT_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Device class to filter for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DeviceArg {
    /// Use the cached probe result, probing on first run
    #[default]
    Auto,
    /// Treat the device as high-powered
    High,
    /// Treat the device as constrained
    Low,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a filter to an image
    Apply {
        /// Input image
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (default: ~/Pictures/CamerArt/filtered_TIMESTAMP.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Filter name (from 'camerart list'); defaults to the configured filter
        #[arg(short, long)]
        filter: Option<String>,

        /// Device class
        #[arg(short, long, value_enum, default_value_t = DeviceArg::Auto)]
        device: DeviceArg,

        /// Run every row on a single thread
        #[arg(long)]
        serial: bool,
    },

    /// List available filters
    List {
        /// Device class
        #[arg(short, long, value_enum, default_value_t = DeviceArg::Auto)]
        device: DeviceArg,
    },

    /// Probe the device capability
    Probe {
        /// Cache the result in the config file
        #[arg(long)]
        save: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=camerart=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Apply {
            input,
            output,
            filter,
            device,
            serial,
        } => cli::apply(input, output, filter, device, serial),
        Commands::List { device } => cli::list_filters(device),
        Commands::Probe { save } => cli::probe(save),
    };

    result.map_err(Into::into)
}
