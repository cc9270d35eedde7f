use ffmpegwrapper_av::{CmdOption, DEFAULT_BINARY};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub ffmpeg: FfmpegConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FfmpegConfig {
    /// Binary name or path handed to the process spawn
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Add `-y` to every output
    #[serde(default)]
    pub overwrite: bool,

    /// Options placed before every job's own options
    #[serde(default)]
    pub global_options: Vec<CmdOption>,
}

fn default_binary() -> String {
    DEFAULT_BINARY.to_string()
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            overwrite: false,
            global_options: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LogConfig {
    /// Filter directive used when RUST_LOG is unset, e.g. "ffmpegwrapper=info"
    #[serde(default)]
    pub filter: Option<String>,
}
