//! The ffmpeg command: argument vector assembly and process driving.

#[cfg(unix)]
use std::process::ExitStatus;

use crate::options::{Item, OptionStore, Tokens};

#[cfg(unix)]
use crate::diagnostics::DiagnosticLines;
#[cfg(unix)]
use crate::{Error, Result};

/// Binary used when none is given.
pub const DEFAULT_BINARY: &str = "ffmpeg";

/// Outcome of [`FFmpeg::wait_for_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// The diagnostic stream can be read without blocking.
    DataReady,
    /// The process has exited. Output written just before exit may still
    /// be buffered in the pipe.
    Exited,
}

#[derive(Debug)]
struct Running {
    child: std::process::Child,
    stderr: std::process::ChildStderr,
}

/// A complete ffmpeg invocation.
///
/// Iterating [`tokens`](Tokens::tokens) yields the binary name followed by
/// every option, input and output in stored order. That sequence is exactly
/// what [`run`](Self::run) hands to the process.
///
/// ```
/// use ffmpegwrapper_av::{FFmpeg, Input, Item, Output};
///
/// let mut output = Output::new("out.mp4");
/// output.overwrite();
///
/// let ffmpeg = FFmpeg::with_items("ffmpeg", [Item::from(Input::new("in.mp4")), output.into()]);
/// assert_eq!(ffmpeg.args(), ["ffmpeg", "-i", "in.mp4", "-y", "out.mp4"]);
/// ```
#[derive(Debug)]
pub struct FFmpeg {
    binary: String,
    store: OptionStore,
    process: Option<Running>,
}

impl Default for FFmpeg {
    fn default() -> Self {
        Self::new()
    }
}

impl FFmpeg {
    /// Create a command for the default `ffmpeg` binary.
    pub fn new() -> Self {
        Self::with_binary(DEFAULT_BINARY)
    }

    /// Create a command for a specific binary name or path.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            store: OptionStore::new(),
            process: None,
        }
    }

    /// Create a command from a binary and its children, kept in order.
    pub fn with_items<I>(binary: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Item>,
    {
        Self {
            binary: binary.into(),
            store: OptionStore::with_items(items),
            process: None,
        }
    }

    /// Insert a global option at the front of the top-level option list.
    pub fn add_option(&mut self, flag: impl Into<String>, value: Option<&str>) -> &mut Self {
        self.store.add_option(flag, value);
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub fn options(&self) -> &OptionStore {
        &self.store
    }

    /// Owned copy of the full argument vector, binary first.
    pub fn args(&self) -> Vec<String> {
        self.tokens().map(str::to_string).collect()
    }

    /// Whether [`run`](Self::run) has spawned a process.
    pub fn is_started(&self) -> bool {
        self.process.is_some()
    }

    /// OS process id of the spawned child.
    pub fn pid(&self) -> Option<u32> {
        self.process.as_ref().map(|running| running.child.id())
    }
}

#[cfg(unix)]
impl FFmpeg {
    /// Spawn the binary with the argument vector.
    ///
    /// Only stderr is captured; stdin and stdout are inherited. The stderr
    /// descriptor is switched to non-blocking mode right after spawning.
    /// Calling `run` again spawns a new process and releases the handle of
    /// the previous one without killing it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Spawn`] if the process cannot be started.
    pub fn run(&mut self) -> Result<&mut Self> {
        use std::os::fd::AsRawFd;
        use std::process::{Command, Stdio};

        use nix::fcntl::{fcntl, FcntlArg, OFlag};

        #[cfg(feature = "tracing")]
        tracing::debug!(args = ?self.args(), "spawning {}", self.binary);

        let mut child = Command::new(&self.binary)
            .args(self.store.tokens())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::spawn(&self.binary, e))?;

        let stderr = child.stderr.take().ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "stderr was not captured",
            ))
        })?;

        let fd = stderr.as_raw_fd();
        let flags = OFlag::from_bits_truncate(fcntl(fd, FcntlArg::F_GETFL)?);
        fcntl(fd, FcntlArg::F_SETFL(flags | OFlag::O_NONBLOCK))?;

        self.process = Some(Running { child, stderr });
        Ok(self)
    }

    /// Block until stderr is readable or the process has exited.
    ///
    /// There is no timeout: if the child neither writes nor exits, this
    /// blocks indefinitely. [`Readiness::Exited`] is returned as soon as the
    /// process is seen to be gone, even if stderr still holds unread bytes;
    /// [`diagnostic_lines`](Self::diagnostic_lines) drains those.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotRunning`] before [`run`](Self::run).
    pub fn wait_for_data(&mut self) -> Result<Readiness> {
        use std::os::fd::AsFd;

        use nix::errno::Errno;
        use nix::poll::{poll, PollFd, PollFlags, PollTimeout};

        let running = self.process.as_mut().ok_or(Error::NotRunning)?;

        while running.child.try_wait()?.is_none() {
            let mut fds = [PollFd::new(running.stderr.as_fd(), PollFlags::POLLIN)];
            match poll(&mut fds, PollTimeout::NONE) {
                Ok(_) => {}
                Err(Errno::EINTR) => continue,
                Err(e) => return Err(e.into()),
            }

            // A hung-up pipe counts as readable: the next read returns EOF.
            let ready = fds[0].revents().is_some_and(|events| {
                events.intersects(PollFlags::POLLIN | PollFlags::POLLHUP | PollFlags::POLLERR)
            });
            if ready {
                #[cfg(feature = "tracing")]
                tracing::trace!("stderr ready");
                return Ok(Readiness::DataReady);
            }
        }

        Ok(Readiness::Exited)
    }

    /// Exit status of the child, or `None` while it is still running.
    ///
    /// Never blocks. Exit codes are reported as-is.
    pub fn poll(&mut self) -> Result<Option<ExitStatus>> {
        let running = self.process.as_mut().ok_or(Error::NotRunning)?;
        let status = running.child.try_wait()?;

        #[cfg(feature = "tracing")]
        if let Some(status) = status {
            tracing::debug!("{} exited with {}", self.binary, status);
        }

        Ok(status)
    }

    /// Block until the child exits and return its status.
    pub fn wait(&mut self) -> Result<ExitStatus> {
        let running = self.process.as_mut().ok_or(Error::NotRunning)?;
        Ok(running.child.wait()?)
    }

    /// Read one chunk of diagnostic output without blocking.
    ///
    /// Returns `Ok(None)` when nothing is available right now and
    /// `Ok(Some(0))` once the child has closed its stderr.
    pub fn read_diagnostics(&mut self, buf: &mut [u8]) -> Result<Option<usize>> {
        use std::io::{ErrorKind, Read};

        let running = self.process.as_mut().ok_or(Error::NotRunning)?;
        match running.stderr.read(buf) {
            Ok(n) => Ok(Some(n)),
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Iterate stderr line by line until the process exits.
    pub fn diagnostic_lines(&mut self) -> DiagnosticLines<'_> {
        DiagnosticLines::new(self)
    }
}

impl Tokens for FFmpeg {
    fn tokens(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(std::iter::once(self.binary.as_str()).chain(self.store.tokens()))
    }
}
