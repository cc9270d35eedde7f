//! Error types for ffmpegwrapper-av.

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the external binary.
///
/// A non-zero exit of the child is not an error; it is reported through
/// [`FFmpeg::poll`](crate::FFmpeg::poll).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The process could not be started (missing binary, permissions).
    #[error("failed to spawn {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    /// A process operation was requested before `run()`.
    #[error("process is not running; call run() first")]
    NotRunning,

    /// An I/O error occurred on the diagnostic stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A readiness or descriptor syscall failed.
    #[cfg(unix)]
    #[error("system call failed: {0}")]
    Sys(#[from] nix::Error),
}

impl Error {
    /// Create a spawn error.
    pub fn spawn(binary: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            binary: binary.into(),
            source,
        }
    }
}
