//! Drive a built ffmpeg command to completion.

use anyhow::{Context, Result};
use ffmpegwrapper_av::{FFmpeg, Progress, Tokens};
use std::process::ExitStatus;

/// What a finished run looked like.
#[derive(Debug)]
pub struct RunSummary {
    pub status: ExitStatus,
    /// Last stats line ffmpeg printed, if any
    pub last_progress: Option<Progress>,
    /// Diagnostic lines that were not stats lines
    pub message_lines: usize,
}

impl RunSummary {
    /// Exit code suitable for this process, mapping signals to 128 + signo.
    #[cfg(unix)]
    pub fn exit_code(&self) -> i32 {
        use std::os::unix::process::ExitStatusExt;

        self.status
            .code()
            .or_else(|| self.status.signal().map(|signo| 128 + signo))
            .unwrap_or(1)
    }

    /// Exit code suitable for this process.
    #[cfg(not(unix))]
    pub fn exit_code(&self) -> i32 {
        self.status.code().unwrap_or(1)
    }
}

/// Spawn `ffmpeg`, log its diagnostic stream and report progress until it exits.
///
/// Stats lines go to `on_progress`; every other line is logged at debug
/// level under the `ffmpegwrapper::ffmpeg` target.
pub fn run(ffmpeg: &mut FFmpeg, mut on_progress: impl FnMut(&Progress)) -> Result<RunSummary> {
    let binary = ffmpeg.binary().to_string();
    tracing::info!("Running: {}", command_line(ffmpeg));

    ffmpeg
        .run()
        .with_context(|| format!("Failed to start {}", binary))?;

    let mut last_progress = None;
    let mut message_lines = 0;

    for line in ffmpeg.diagnostic_lines() {
        let line = line.context("Failed to read ffmpeg diagnostics")?;
        match Progress::parse(&line) {
            Some(progress) => {
                on_progress(&progress);
                last_progress = Some(progress);
            }
            None => {
                message_lines += 1;
                tracing::debug!(target: "ffmpegwrapper::ffmpeg", "{}", line);
            }
        }
    }

    let status = ffmpeg
        .poll()?
        .context("ffmpeg stopped producing output but has not exited")?;

    if status.success() {
        tracing::info!("{} finished", binary);
    } else {
        tracing::warn!("{} exited with {}", binary, status);
    }

    Ok(RunSummary {
        status,
        last_progress,
        message_lines,
    })
}

/// Render the argument vector as a single shell-pasteable line.
pub fn command_line(ffmpeg: &FFmpeg) -> String {
    ffmpeg.tokens().map(shell_quote).collect::<Vec<_>>().join(" ")
}

fn shell_quote(token: &str) -> String {
    let safe = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=,+@%".contains(c));

    if safe {
        token.to_string()
    } else {
        format!("'{}'", token.replace('\'', r"'\''"))
    }
}
