//! # ffmpegwrapper-av
//!
//! Compose ffmpeg command lines from ordered option stores and drive the
//! ffmpeg process while draining its stderr.
//!
//! This crate provides:
//!
//! - **Option stores** ([`OptionStore`], [`CmdOption`]) -- ordered, nestable
//!   collections of flags that flatten into command-line tokens.
//! - **Files** ([`Input`], [`Output`]) -- stores bound to a path, rendered as
//!   `... -i <path>` and `... <path>`.
//! - **Filters** ([`FilterChain`]) -- `-vf`/`-af` graphs built filter by filter.
//! - **Process driving** ([`FFmpeg`]) -- spawn the binary, wait for stderr
//!   readiness without busy looping, and poll for the exit status.
//! - **Diagnostics** ([`DiagnosticLines`], [`Progress`]) -- split stderr into
//!   lines and parse ffmpeg's stats line.
//!
//! ## Features
//!
//! - `serialize` - serde support for [`CmdOption`] and [`Progress`]
//! - `tracing` - Enable tracing support
//!
//! ## Example
//!
//! ```no_run
//! use ffmpegwrapper_av::{FFmpeg, Input, Item, Output, Progress};
//!
//! let mut output = Output::new("/path/to/out.mp4");
//! output.add_option("-c:v", Some("libx264")).overwrite();
//!
//! let mut ffmpeg = FFmpeg::with_items(
//!     "ffmpeg",
//!     [Item::from(Input::new("/path/to/in.mkv")), output.into()],
//! );
//! ffmpeg.run()?;
//!
//! for line in ffmpeg.diagnostic_lines() {
//!     if let Some(progress) = Progress::parse(&line?) {
//!         println!("{:?}", progress.time_secs);
//!     }
//! }
//! let status = ffmpeg.poll()?;
//! println!("exited: {:?}", status);
//! # Ok::<(), ffmpegwrapper_av::Error>(())
//! ```

mod diagnostics;
mod error;
mod ffmpeg;
mod file;
mod filter;
mod options;

// Re-exports
#[cfg(unix)]
pub use diagnostics::DiagnosticLines;
pub use diagnostics::Progress;
pub use error::{Error, Result};
pub use ffmpeg::{FFmpeg, Readiness, DEFAULT_BINARY};
pub use file::{Input, Output};
pub use filter::FilterChain;
pub use options::{CmdOption, Item, OptionStore, Tokens};
