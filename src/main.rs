// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "qr-scanner")]
#[command(about = "QR code scanning engine for the COSMIC desktop")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a QR code from a single image
    Scan {
        /// Image file to decode
        image: PathBuf,
    },

    /// Continuously scan a looping sequence of images
    Watch {
        /// Image files streamed as camera frames
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Scan delay in milliseconds (clamped to 10-1000)
        #[arg(short, long)]
        delay: Option<u32>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=qr_scanner=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { image } => cli::scan_image(image),
        Commands::Watch { images, delay } => cli::watch(images, delay),
    }
}
