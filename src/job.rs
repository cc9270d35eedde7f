//! Job files: a TOML description of one ffmpeg invocation.
//!
//! ```toml
//! options = [{ flag = "-hide_banner" }]
//! duration_secs = 120.0
//!
//! [[inputs]]
//! path = "in.mkv"
//! options = [{ flag = "-ss", value = "30" }]
//!
//! [[outputs]]
//! path = "out.mp4"
//! overwrite = true
//! video_filters = ["scale=1280:-2"]
//! options = [{ flag = "-c:v", value = "libx264" }]
//! ```

use anyhow::{Context, Result};
use ffmpegwrapper_av::{CmdOption, FFmpeg, FilterChain, Input, Item, Output};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::Config;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Job {
    /// Global options, emitted before the inputs
    #[serde(default)]
    pub options: Vec<CmdOption>,

    #[serde(default)]
    pub inputs: Vec<InputSpec>,

    #[serde(default)]
    pub outputs: Vec<OutputSpec>,

    /// Source duration, used to turn progress into a percentage
    #[serde(default)]
    pub duration_secs: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputSpec {
    pub path: String,

    #[serde(default)]
    pub options: Vec<CmdOption>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputSpec {
    pub path: String,

    #[serde(default)]
    pub overwrite: bool,

    #[serde(default)]
    pub options: Vec<CmdOption>,

    #[serde(default)]
    pub video_filters: Vec<String>,

    #[serde(default)]
    pub audio_filters: Vec<String>,
}

/// Load a job from a TOML file
pub fn load_job(path: &Path) -> Result<Job> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read job file: {:?}", path))?;

    let job: Job = toml::from_str(&content)
        .with_context(|| format!("Failed to parse job file: {:?}", path))?;

    validate_job(&job)?;

    Ok(job)
}

/// Validate a job
///
/// Paths and flags are passed to ffmpeg untouched; this only rejects jobs
/// that cannot form a command line at all.
pub fn validate_job(job: &Job) -> Result<()> {
    if job.inputs.is_empty() {
        anyhow::bail!("Job has no inputs");
    }
    if job.outputs.is_empty() {
        anyhow::bail!("Job has no outputs");
    }

    if let Some(duration) = job.duration_secs {
        if duration <= 0.0 {
            anyhow::bail!("duration_secs must be positive, got {}", duration);
        }
    }

    Ok(())
}

impl Job {
    /// Build the ffmpeg command for this job.
    ///
    /// Everything listed in the config and the job is a construction-time
    /// item, so the file order is the command-line order.
    pub fn to_ffmpeg(&self, config: &Config) -> FFmpeg {
        let mut items: Vec<Item> = Vec::new();
        items.extend(config.ffmpeg.global_options.iter().cloned().map(Item::from));
        items.extend(self.options.iter().cloned().map(Item::from));
        items.extend(self.inputs.iter().map(|spec| Item::from(spec.to_input())));
        items.extend(
            self.outputs
                .iter()
                .map(|spec| Item::from(spec.to_output(config.ffmpeg.overwrite))),
        );

        FFmpeg::with_items(config.ffmpeg.binary.clone(), items)
    }
}

impl InputSpec {
    fn to_input(&self) -> Input {
        Input::with_items(self.path.clone(), self.options.iter().cloned())
    }
}

impl OutputSpec {
    fn to_output(&self, force_overwrite: bool) -> Output {
        let mut items: Vec<Item> = self.options.iter().cloned().map(Item::from).collect();

        if !self.video_filters.is_empty() {
            let mut chain = FilterChain::video();
            for filter in &self.video_filters {
                chain.push(filter.as_str());
            }
            items.push(chain.into());
        }
        if !self.audio_filters.is_empty() {
            let mut chain = FilterChain::audio();
            for filter in &self.audio_filters {
                chain.push(filter.as_str());
            }
            items.push(chain.into());
        }

        let mut output = Output::with_items(self.path.clone(), items);
        if self.overwrite || force_overwrite {
            output.overwrite();
        }
        output
    }
}
