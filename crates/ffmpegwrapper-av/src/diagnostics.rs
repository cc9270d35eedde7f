//! Reading and interpreting ffmpeg's stderr.

#[cfg(unix)]
use crate::ffmpeg::{FFmpeg, Readiness};
#[cfg(unix)]
use crate::Result;

#[cfg(unix)]
const CHUNK: usize = 4096;

/// Line iterator over the diagnostic stream of a running [`FFmpeg`].
///
/// Lines end at `\n` or `\r`; ffmpeg redraws its stats line with carriage
/// returns, so each redraw becomes its own line. Empty lines are skipped and
/// bytes are decoded as lossy UTF-8.
///
/// Once the process has exited the stream is drained before the iterator
/// ends, so output written right before exit is not lost. If the child
/// closes stderr while it keeps running, the iterator blocks on the child's
/// exit instead of polling a hung-up pipe.
#[cfg(unix)]
pub struct DiagnosticLines<'a> {
    ffmpeg: &'a mut FFmpeg,
    pending: Vec<u8>,
    exited: bool,
}

#[cfg(unix)]
impl<'a> DiagnosticLines<'a> {
    pub(crate) fn new(ffmpeg: &'a mut FFmpeg) -> Self {
        Self {
            ffmpeg,
            pending: Vec::new(),
            exited: false,
        }
    }

    /// Read what is available; `Ok(true)` means stderr reached end of stream.
    fn fill(&mut self) -> Result<bool> {
        let mut chunk = [0u8; CHUNK];
        match self.ffmpeg.read_diagnostics(&mut chunk)? {
            Some(0) => Ok(true),
            Some(n) => {
                self.pending.extend_from_slice(&chunk[..n]);
                Ok(false)
            }
            None => Ok(false),
        }
    }

    fn drain(&mut self) -> Result<()> {
        let mut chunk = [0u8; CHUNK];
        while let Some(n) = self.ffmpeg.read_diagnostics(&mut chunk)? {
            if n == 0 {
                break;
            }
            self.pending.extend_from_slice(&chunk[..n]);
        }
        Ok(())
    }

    fn next_line(&mut self) -> Option<String> {
        while let Some(end) = self.pending.iter().position(|b| matches!(b, b'\n' | b'\r')) {
            let line: Vec<u8> = self.pending.drain(..=end).take(end).collect();
            if !line.is_empty() {
                return Some(String::from_utf8_lossy(&line).into_owned());
            }
        }
        None
    }

    fn remainder(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let line = std::mem::take(&mut self.pending);
        Some(String::from_utf8_lossy(&line).into_owned())
    }
}

#[cfg(unix)]
impl Iterator for DiagnosticLines<'_> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(line) = self.next_line() {
                return Some(Ok(line));
            }
            if self.exited {
                return self.remainder().map(Ok);
            }

            let step = match self.ffmpeg.wait_for_data() {
                // After EOF there is nothing left to poll for; wait for exit.
                Ok(Readiness::DataReady) => match self.fill() {
                    Ok(true) => {
                        self.exited = true;
                        self.ffmpeg.wait().map(|_| ())
                    }
                    Ok(false) => Ok(()),
                    Err(e) => Err(e),
                },
                Ok(Readiness::Exited) => {
                    self.exited = true;
                    self.drain()
                }
                Err(e) => Err(e),
            };

            if let Err(e) = step {
                self.exited = true;
                return Some(Err(e));
            }
        }
    }
}

/// One snapshot of ffmpeg's encoding stats line.
///
/// Parsed from lines such as
/// `frame=  240 fps= 60 q=28.0 size=     256kB time=00:00:08.00 bitrate= 262.1kbits/s speed=2.01x`.
/// Fields ffmpeg reports as `N/A` are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Progress {
    pub frame: Option<u64>,
    pub fps: Option<f64>,
    pub size: Option<String>,
    /// Output timestamp reached so far, in seconds.
    pub time_secs: Option<f64>,
    pub bitrate: Option<String>,
    /// Encoding speed as a multiple of realtime.
    pub speed: Option<f64>,
}

impl Progress {
    /// Parse a stats line. Returns `None` for lines that are not stats.
    pub fn parse(line: &str) -> Option<Self> {
        let pairs = key_values(line);
        if !pairs.iter().any(|(key, _)| matches!(*key, "frame" | "time")) {
            return None;
        }

        let mut progress = Progress::default();
        for (key, value) in pairs {
            if value.is_empty() || value == "N/A" {
                continue;
            }
            match key {
                "frame" => progress.frame = value.parse().ok(),
                "fps" => progress.fps = value.parse().ok(),
                "size" | "Lsize" => progress.size = Some(value.to_string()),
                "time" => progress.time_secs = parse_timestamp(value),
                "bitrate" => progress.bitrate = Some(value.to_string()),
                "speed" => progress.speed = value.trim_end_matches('x').parse().ok(),
                _ => {}
            }
        }
        Some(progress)
    }

    /// Fraction of `duration_secs` covered so far, clamped to `0.0..=1.0`.
    pub fn fraction(&self, duration_secs: f64) -> Option<f64> {
        if duration_secs <= 0.0 {
            return None;
        }
        self.time_secs
            .map(|secs| (secs / duration_secs).clamp(0.0, 1.0))
    }
}

/// Split `key=value` pairs, joining a value that ffmpeg padded onto the
/// following whitespace-separated token (`fps= 60`).
fn key_values(line: &str) -> Vec<(&str, &str)> {
    let mut pairs = Vec::new();
    let mut words = line.split_whitespace();
    while let Some(word) = words.next() {
        let Some((key, value)) = word.split_once('=') else {
            continue;
        };
        if value.is_empty() {
            let padded = words.clone().next().filter(|next| !next.contains('='));
            if padded.is_some() {
                words.next();
            }
            pairs.push((key, padded.unwrap_or("")));
        } else {
            pairs.push((key, value));
        }
    }
    pairs
}

/// Parse `HH:MM:SS.ss` into seconds. Negative timestamps are rejected.
fn parse_timestamp(value: &str) -> Option<f64> {
    let mut parts = value.splitn(3, ':');
    let hours: f64 = parts.next()?.parse().ok()?;
    let minutes: f64 = parts.next()?.parse().ok()?;
    let seconds: f64 = parts.next()?.parse().ok()?;
    let total = hours * 3600.0 + minutes * 60.0 + seconds;
    (total >= 0.0 && !value.starts_with('-')).then_some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_padded_stats_line() {
        let line = "frame=  240 fps= 60 q=28.0 size=     256kB time=00:00:08.00 bitrate= 262.1kbits/s speed=2.01x";
        let progress = Progress::parse(line).unwrap();
        assert_eq!(progress.frame, Some(240));
        assert_eq!(progress.fps, Some(60.0));
        assert_eq!(progress.size.as_deref(), Some("256kB"));
        assert_eq!(progress.time_secs, Some(8.0));
        assert_eq!(progress.bitrate.as_deref(), Some("262.1kbits/s"));
        assert_eq!(progress.speed, Some(2.01));
    }

    #[test]
    fn final_line_uses_lsize() {
        let line = "frame= 1500 fps=120 q=-1.0 Lsize=    4096kB time=00:01:02.50 bitrate= 536.9kbits/s speed=4.8x";
        let progress = Progress::parse(line).unwrap();
        assert_eq!(progress.size.as_deref(), Some("4096kB"));
        assert_eq!(progress.time_secs, Some(62.5));
    }

    #[test]
    fn audio_only_line_has_no_frame() {
        let line = "size=     512kB time=00:00:30.00 bitrate= 139.8kbits/s speed=30.5x";
        let progress = Progress::parse(line).unwrap();
        assert_eq!(progress.frame, None);
        assert_eq!(progress.time_secs, Some(30.0));
    }

    #[test]
    fn not_available_fields_are_none() {
        let line = "frame=    0 fps=0.0 q=0.0 size=       0kB time=N/A bitrate=N/A speed=N/A";
        let progress = Progress::parse(line).unwrap();
        assert_eq!(progress.frame, Some(0));
        assert_eq!(progress.time_secs, None);
        assert_eq!(progress.bitrate, None);
        assert_eq!(progress.speed, None);
    }

    #[test]
    fn negative_timestamp_is_none() {
        let line = "frame=    0 fps=0.0 q=0.0 size=       0kB time=-577014:32:22.77 bitrate=  -0.0kbits/s speed=N/A";
        assert_eq!(Progress::parse(line).unwrap().time_secs, None);
    }

    #[test]
    fn empty_value_does_not_swallow_next_pair() {
        let progress = Progress::parse("size= time=00:00:01.00 bitrate= speed=1.5x").unwrap();
        assert_eq!(progress.size, None);
        assert_eq!(progress.time_secs, Some(1.0));
        assert_eq!(progress.bitrate, None);
        assert_eq!(progress.speed, Some(1.5));
    }

    #[test]
    fn other_lines_are_ignored() {
        assert!(Progress::parse("Input #0, matroska,webm, from 'in.mkv':").is_none());
        assert!(Progress::parse("  Stream #0:0: Video: hevc (Main 10)").is_none());
        assert!(Progress::parse("").is_none());
    }

    #[test]
    fn fraction_is_clamped() {
        let progress = Progress {
            time_secs: Some(90.0),
            ..Progress::default()
        };
        assert_eq!(progress.fraction(60.0), Some(1.0));
        assert_eq!(progress.fraction(180.0), Some(0.5));
        assert_eq!(progress.fraction(0.0), None);
    }

    #[cfg(unix)]
    mod lines {
        use crate::{CmdOption, FFmpeg};

        fn lines_of(script: &str) -> Vec<String> {
            let mut ffmpeg = FFmpeg::with_items("sh", [CmdOption::valued("-c", script)]);
            ffmpeg.run().unwrap();
            ffmpeg.diagnostic_lines().collect::<Result<_, _>>().unwrap()
        }

        #[test]
        fn splits_on_newlines_and_carriage_returns() {
            let lines = lines_of(r"printf 'one\ntwo\rthree\r\nfour' >&2");
            assert_eq!(lines, ["one", "two", "three", "four"]);
        }

        #[test]
        fn output_written_right_before_exit_is_drained() {
            let lines = lines_of("echo last words >&2; exit 1");
            assert_eq!(lines, ["last words"]);
        }

        #[test]
        fn silent_process_yields_nothing() {
            assert!(lines_of("exit 0").is_empty());
        }

        #[test]
        fn closed_stderr_waits_for_exit() {
            let mut ffmpeg =
                FFmpeg::with_items("sh", [CmdOption::valued("-c", "echo bye >&2; exec 2>&-; sleep 1")]);
            ffmpeg.run().unwrap();

            let lines: Vec<String> = ffmpeg.diagnostic_lines().collect::<Result<_, _>>().unwrap();
            assert_eq!(lines, ["bye"]);
            assert!(ffmpeg.poll().unwrap().is_some());
        }

        #[test]
        fn lines_across_several_writes() {
            let lines = lines_of("printf 'par' >&2; sleep 0.2; printf 'tial\\n' >&2; sleep 0.2");
            assert_eq!(lines, ["partial"]);
        }
    }
}
