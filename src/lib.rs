//! ffmpegwrapper - run ffmpeg jobs described in TOML files
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod job;
pub mod runner;
