//! Runs OCR as a child process.
//!
//! The process receives the raw image bytes on stdin and must print one
//! recognized text per line on stdout, exiting with status 0. Blank lines are
//! ignored and stderr is only used to explain failures.
//!
//! On unix the child leads its own process group, and the whole group is
//! killed once recognition finishes or is abandoned, so helpers started by a
//! wrapper script cannot outlive the request.

use crate::{engine::OcrEngine, error::OcrError, image::ImageData};
use async_trait::async_trait;
use log::debug;
use models::recognition::OcrMode;
use std::{
    io::{Error as IoError, ErrorKind},
    process::{Output, Stdio},
};
use tokio::{io::AsyncWriteExt, process::Command};

/// Engine backed by an external OCR executable
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    program: String,
    args: Vec<String>,
}

impl ProcessEngine {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Classifies a failure to start the child
    fn spawn_error(&self, err: IoError) -> OcrError {
        match err.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                OcrError::Unavailable(format!("failed to start `{}`: {err}", self.program))
            }
            _ => OcrError::Unexpected(format!("failed to start `{}`: {err}", self.program)),
        }
    }
}

/// Kills a process group when dropped
#[cfg(unix)]
struct ProcessGroup(libc::pid_t);

#[cfg(unix)]
impl Drop for ProcessGroup {
    fn drop(&mut self) {
        // ESRCH only means every member has already exited
        unsafe {
            libc::killpg(self.0, libc::SIGKILL);
        }
    }
}

/// Splits process stdout into recognized texts
fn parse_output(output: Output) -> Result<Vec<String>, OcrError> {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let status = match output.status.code() {
            Some(code) => format!("exited with code {code}"),
            None => "was terminated by a signal".to_string(),
        };
        return Err(OcrError::BadOutput(format!(
            "OCR process {status}: {}",
            stderr.trim()
        )));
    }

    let stdout = String::from_utf8(output.stdout)
        .map_err(|_| OcrError::BadOutput("OCR process output is not valid UTF-8".to_string()))?;

    Ok(stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

#[async_trait]
impl OcrEngine for ProcessEngine {
    fn name(&self) -> &'static str {
        "process"
    }

    fn mode(&self) -> OcrMode {
        OcrMode::Production
    }

    async fn recognize(&self, image: &ImageData) -> Result<Vec<String>, OcrError> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(unix)]
        command.process_group(0);

        let mut child = command.spawn().map_err(|e| self.spawn_error(e))?;

        debug!("Spawned `{}` (pid {:?})", self.program, child.id());

        // The group id equals the leader's pid
        #[cfg(unix)]
        let _group = child.id().map(|pid| ProcessGroup(pid as libc::pid_t));

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| OcrError::Unexpected("child stdin was not captured".to_string()))?;

        // Feed stdin while draining stdout so neither pipe can fill up and stall
        let bytes = image.as_bytes();
        let feed = async move {
            match stdin.write_all(bytes).await {
                // The process is allowed to stop reading early
                Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
                other => other,
            }
        };

        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output
            .map_err(|e| OcrError::Unexpected(format!("failed to wait for OCR process: {e}")))?;
        fed.map_err(|e| OcrError::Unexpected(format!("failed to send image to OCR process: {e}")))?;

        parse_output(output)
    }
}
