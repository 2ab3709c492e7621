//! Renderer invocation.
//!
//! Definition sources are templates; an external renderer expands each one
//! into a complete XML document on stdout. The renderer runs as
//! `<program> <definition-file>` with stdin closed.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;
use wait_timeout::ChildExt;

use crate::report::FailureCode;

/// Failure to render one definition file.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to start renderer '{}': {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("renderer exited with {status}: {stderr}")]
    Exit { status: ExitStatus, stderr: String },

    #[error("renderer timed out after {}s", timeout.as_secs_f64())]
    Timeout { timeout: Duration },

    #[error("failed to collect renderer output: {0}")]
    Io(#[from] std::io::Error),

    #[error("renderer output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl RenderError {
    pub fn failure_code(&self) -> FailureCode {
        match self {
            Self::Spawn { .. } => FailureCode::RenderSpawn,
            Self::Exit { .. } => FailureCode::RenderExit,
            Self::Timeout { .. } => FailureCode::RenderTimeout,
            Self::Io(_) | Self::Utf8(_) => FailureCode::RenderOutput,
        }
    }
}

/// External template renderer.
#[derive(Debug, Clone)]
pub struct Renderer {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl Renderer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    /// Kills the renderer when it runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Renders one definition file, returning stdout as text.
    pub fn render(&self, definition: &Path) -> Result<String, RenderError> {
        let mut child = Command::new(&self.program)
            .arg(definition)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RenderError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // Pipes are drained concurrently with the wait.
        let stdout_thread = child.stdout.take().map(spawn_reader);
        let stderr_thread = child.stderr.take().map(spawn_reader);

        let status = self.wait(&mut child)?;
        let stdout = join_reader(stdout_thread)?;
        let stderr = join_reader(stderr_thread)?;

        if !status.success() {
            return Err(RenderError::Exit {
                status,
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }

        debug!(file = %definition.display(), bytes = stdout.len(), "Rendered definition");
        Ok(String::from_utf8(stdout)?)
    }

    fn wait(&self, child: &mut Child) -> Result<ExitStatus, RenderError> {
        let Some(timeout) = self.timeout else {
            return Ok(child.wait()?);
        };

        match child.wait_timeout(timeout)? {
            Some(status) => Ok(status),
            None => {
                debug!(program = %self.program.display(), ?timeout, "Renderer timed out, killing process");
                let _ = child.kill();
                let _ = child.wait();
                Err(RenderError::Timeout { timeout })
            }
        }
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<std::io::Result<Vec<u8>>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn join_reader(handle: Option<JoinHandle<std::io::Result<Vec<u8>>>>) -> std::io::Result<Vec<u8>> {
    match handle {
        Some(handle) => handle
            .join()
            .unwrap_or_else(|_| Err(std::io::Error::other("pipe reader thread panicked"))),
        None => Ok(Vec::new()),
    }
}
