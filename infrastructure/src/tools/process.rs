//! Subprocess runner shared by the shell, package and device tools.
//!
//! Every child is spawned with `kill_on_drop`, so a timed-out child is killed
//! when its wait future is dropped.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    /// `-1` when the process was terminated by a signal
    pub exit_code: i32,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// `STDOUT:` / `STDERR:` sections followed by `EXIT CODE: n`.
    pub fn sectioned(&self) -> String {
        let mut parts = Vec::new();
        if !self.stdout.is_empty() {
            parts.push(format!("STDOUT:\n{}", self.stdout));
        }
        if !self.stderr.is_empty() {
            parts.push(format!("STDERR:\n{}", self.stderr));
        }
        parts.push(format!("EXIT CODE: {}", self.exit_code));
        parts.join("\n")
    }
}

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("'{0}' not found")]
    NotFound(String),

    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// A process to run: program, arguments, optional stdin and working directory.
#[derive(Debug, Clone)]
pub struct ProcessJob<'a> {
    pub program: &'a str,
    pub args: Vec<String>,
    pub stdin: Option<&'a str>,
    pub working_dir: Option<&'a Path>,
    pub timeout: Duration,
}

impl<'a> ProcessJob<'a> {
    pub fn new(program: &'a str, timeout: Duration) -> Self {
        Self {
            program,
            args: Vec::new(),
            stdin: None,
            working_dir: None,
            timeout,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn stdin(mut self, input: &'a str) -> Self {
        self.stdin = Some(input);
        self
    }

    pub fn working_dir(mut self, dir: &'a Path) -> Self {
        self.working_dir = Some(dir);
        self
    }
}

/// Run a process to completion or until its timeout.
pub async fn run(job: ProcessJob<'_>) -> Result<ProcessOutput, ProcessError> {
    let mut cmd = Command::new(job.program);
    cmd.args(&job.args)
        .stdin(if job.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = job.working_dir {
        cmd.current_dir(dir);
    }

    debug!("Spawning '{}' ({} arg(s))", job.program, job.args.len());
    let mut child = cmd.spawn().map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ProcessError::NotFound(job.program.to_string()),
        _ => ProcessError::Io(e),
    })?;

    // stdin is fed alongside the wait so the timeout also covers a child
    // that never reads its input
    let pipe = child.stdin.take();
    let (program, input) = (job.program, job.stdin);
    let feed = async move {
        if let (Some(input), Some(mut pipe)) = (input, pipe)
            && let Err(e) = pipe.write_all(input.as_bytes()).await
        {
            debug!("stdin for '{}' not fully written: {}", program, e);
        }
        // dropping the pipe closes stdin
    };
    let completion = async move {
        let ((), output) = tokio::join!(feed, child.wait_with_output());
        output
    };

    let output = tokio::time::timeout(job.timeout, completion)
        .await
        .map_err(|_| ProcessError::Timeout(job.timeout))??;

    Ok(ProcessOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code: output.status.code().unwrap_or(-1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_captures_stdout_and_exit_code() {
        let out = run(ProcessJob::new("sh", Duration::from_secs(5)).args(["-c", "echo hi; exit 3"]))
            .await
            .unwrap();
        assert_eq!(out.stdout, "hi\n");
        assert_eq!(out.exit_code, 3);
        assert!(!out.success());
        assert_eq!(out.sectioned(), "STDOUT:\nhi\n\nEXIT CODE: 3");
    }

    #[tokio::test]
    async fn test_feeds_stdin() {
        let out = run(ProcessJob::new("cat", Duration::from_secs(5)).stdin("piped text"))
            .await
            .unwrap();
        assert_eq!(out.stdout, "piped text");
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let err = run(ProcessJob::new("definitely-not-a-real-binary-xyz", Duration::from_secs(5)))
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_timeout_covers_unread_stdin() {
        // larger than any pipe buffer, and `sleep` never reads it
        let input = "x".repeat(4 << 20);
        let started = std::time::Instant::now();
        let err = run(ProcessJob::new("sleep", Duration::from_millis(300)).arg("30").stdin(&input))
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessError::Timeout(_)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_child_ignoring_stdin_still_completes() {
        let out = run(ProcessJob::new("sh", Duration::from_secs(5)).args(["-c", "echo done"]).stdin("unused"))
            .await
            .unwrap();
        assert_eq!(out.stdout, "done\n");
        assert!(out.success());
    }

    #[tokio::test]
    async fn test_timeout() {
        let err = run(ProcessJob::new("sleep", Duration::from_millis(200)).arg("5"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessError::Timeout(_)));
    }
}
