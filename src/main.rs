mod cli;

use ffmpegwrapper::{config, job, runner};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use ffmpegwrapper_av::Progress;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load_config_or_default(cli.config.as_deref())?;

    // Respect RUST_LOG env var if set, otherwise use the config or the defaults
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "ffmpegwrapper=trace,ffmpegwrapper_av=trace".to_string()
        } else {
            config
                .log
                .filter
                .clone()
                .unwrap_or_else(|| "ffmpegwrapper=info,ffmpegwrapper_av=info".to_string())
        }
    });

    // stdout carries command output; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Args { job } => print_args(&job, &config),
        Commands::Run { job, json } => {
            let code = run_job(&job, &config, json)?;
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Commands::Validate { job } => validate_job(&job, &config),
        Commands::Version => {
            println!("ffmpegwrapper {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn print_args(path: &Path, config: &config::Config) -> Result<()> {
    let job = job::load_job(path)?;
    println!("{}", runner::command_line(&job.to_ffmpeg(config)));
    Ok(())
}

fn run_job(path: &Path, config: &config::Config, json: bool) -> Result<i32> {
    let job = job::load_job(path)?;
    let mut ffmpeg = job.to_ffmpeg(config);

    let summary = runner::run(&mut ffmpeg, |progress| {
        if json {
            match serde_json::to_string(progress) {
                Ok(line) => println!("{}", line),
                Err(e) => tracing::warn!("Failed to serialize progress: {}", e),
            }
        } else {
            println!("{}", describe_progress(progress, job.duration_secs));
        }
    })?;

    if !json {
        println!("ffmpeg exited with {}", summary.status);
    }
    Ok(summary.exit_code())
}

fn describe_progress(progress: &Progress, duration_secs: Option<f64>) -> String {
    let mut parts = Vec::new();
    if let Some(fraction) = duration_secs.and_then(|d| progress.fraction(d)) {
        parts.push(format!("{:5.1}%", fraction * 100.0));
    }
    if let Some(frame) = progress.frame {
        parts.push(format!("frame={}", frame));
    }
    if let Some(secs) = progress.time_secs {
        parts.push(format!("time={:.2}s", secs));
    }
    if let Some(ref size) = progress.size {
        parts.push(format!("size={}", size));
    }
    if let Some(speed) = progress.speed {
        parts.push(format!("speed={}x", speed));
    }
    parts.join(" ")
}

fn validate_job(path: &Path, config: &config::Config) -> Result<()> {
    let job = job::load_job(path)?;
    let ffmpeg = job.to_ffmpeg(config);

    println!("Job is valid: {:?}", path);
    println!("  Inputs: {}", job.inputs.len());
    println!("  Outputs: {}", job.outputs.len());
    println!("  Arguments: {}", ffmpeg.args().len() - 1);
    Ok(())
}
