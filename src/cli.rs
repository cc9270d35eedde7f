use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ffmpegwrapper")]
#[command(author, version, about = "Build ffmpeg command lines and follow ffmpeg's progress")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the ffmpeg command line a job expands to
    Args {
        /// Job file to expand
        #[arg(required = true)]
        job: PathBuf,
    },

    /// Run a job and report ffmpeg's progress
    Run {
        /// Job file to run
        #[arg(required = true)]
        job: PathBuf,

        /// Print progress as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Validate a job file against the configuration
    Validate {
        /// Job file to validate
        #[arg(required = true)]
        job: PathBuf,
    },

    /// Display version information
    Version,
}
