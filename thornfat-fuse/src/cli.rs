use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version, about = "Build and inspect ThornFAT images")]
pub struct Cli {
    /// Image file
    #[arg(long, short)]
    pub image: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a blank filesystem
    Format {
        /// Image size in MiB
        #[arg(long, short, default_value_t = 16)]
        size_mib: u64,

        /// Multiple of 320, at least 640
        #[arg(long, short, default_value_t = 640)]
        block_size: usize,
    },
    /// Copy a host directory tree into the image
    Pack {
        #[arg(long, short)]
        source: PathBuf,

        /// Directory inside the image
        #[arg(long, short, default_value = "/")]
        target: String,
    },
    /// List a directory
    Ls {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Print a file
    Cat { path: String },
    /// Show usage statistics
    Df,
}
