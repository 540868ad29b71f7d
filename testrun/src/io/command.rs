//! Command-backed suites with deadlines and bounded output capture.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, warn};
use wait_timeout::ChildExt;

use crate::io::loader::CommandSettings;
use crate::suite::{Suite, SuiteOutcome};

/// Suite that runs a command line from its declaration directory.
pub struct CommandSuite {
    dir: PathBuf,
    command: Vec<String>,
    settings: CommandSettings,
}

impl CommandSuite {
    pub fn new(dir: PathBuf, command: Vec<String>, settings: CommandSettings) -> Self {
        Self {
            dir,
            command,
            settings,
        }
    }
}

impl Suite for CommandSuite {
    fn run(&self, verbosity: u8) -> Result<SuiteOutcome> {
        let mut cmd = Command::new(&self.command[0]);
        cmd.args(&self.command[1..]).current_dir(&self.dir);
        let output = run_with_deadline(
            cmd,
            self.settings.timeout,
            self.settings.output_limit_bytes,
        )?;
        if verbosity >= 2 && !output.stdout.is_empty() {
            print!("{}", String::from_utf8_lossy(&output.stdout));
        }
        if output.timed_out {
            return Ok(SuiteOutcome::Failed {
                detail: format!("timed out after {}s", self.settings.timeout.as_secs()),
            });
        }
        if output.status.success() {
            return Ok(SuiteOutcome::Passed);
        }
        Ok(SuiteOutcome::Failed {
            detail: failure_detail(&output),
        })
    }
}

fn failure_detail(output: &CapturedOutput) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    match (output.status.code(), stderr.is_empty()) {
        (Some(code), true) => format!("exit code {code}"),
        (Some(code), false) => format!("exit code {code}: {stderr}"),
        (None, true) => "terminated by signal".to_string(),
        (None, false) => format!("terminated by signal: {stderr}"),
    }
}

/// Captured output of a finished child.
#[derive(Debug)]
pub struct CapturedOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub timed_out: bool,
}

/// Run `cmd`, killing it at `timeout` and keeping at most `limit` bytes per
/// stream. Streams are drained on reader threads so a chatty child cannot
/// deadlock on a full pipe.
pub fn run_with_deadline(
    mut cmd: Command,
    timeout: Duration,
    limit: usize,
) -> Result<CapturedOutput> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    debug!(timeout_secs = timeout.as_secs(), "spawning suite command");
    let mut child = cmd.spawn().context("spawn suite command")?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;
    let stdout_reader = thread::spawn(move || drain_limited(stdout, limit));
    let stderr_reader = thread::spawn(move || drain_limited(stderr, limit));

    let mut timed_out = false;
    let status = match child.wait_timeout(timeout).context("wait for suite command")? {
        Some(status) => status,
        None => {
            warn!(
                timeout_secs = timeout.as_secs(),
                "suite command timed out, killing"
            );
            timed_out = true;
            child.kill().context("kill suite command")?;
            child.wait().context("wait for killed suite command")?
        }
    };

    let (stdout, stdout_dropped) = join_reader(stdout_reader)?;
    let (stderr, stderr_dropped) = join_reader(stderr_reader)?;
    if stdout_dropped > 0 || stderr_dropped > 0 {
        warn!(stdout_dropped, stderr_dropped, "suite output truncated");
    }

    debug!(exit_code = ?status.code(), timed_out, "suite command finished");
    Ok(CapturedOutput {
        status,
        stdout,
        stderr,
        timed_out,
    })
}

fn join_reader(handle: thread::JoinHandle<Result<(Vec<u8>, usize)>>) -> Result<(Vec<u8>, usize)> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(anyhow!("output reader thread panicked")),
    }
}

fn drain_limited<R: Read>(mut reader: R, limit: usize) -> Result<(Vec<u8>, usize)> {
    let mut kept = Vec::new();
    let mut dropped = 0usize;
    let mut chunk = [0u8; 8192];
    loop {
        let n = reader.read(&mut chunk).context("read suite output")?;
        if n == 0 {
            break;
        }
        let room = limit.saturating_sub(kept.len());
        let keep = n.min(room);
        kept.extend_from_slice(&chunk[..keep]);
        dropped += n - keep;
    }
    Ok((kept, dropped))
}
