use std::path::Path;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::process::Stdio;

use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncRead;
use tokio::io::BufReader;
use tokio::process::Command;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;
use tracing::trace;

use crate::error::SwitchError;
use crate::terminal::DEV_TTY;
use crate::terminal::open_tty;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamKind {
  Stdout,
  Stderr,
}

/// A single line written by a running pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputLine {
  pub stream: StreamKind,
  pub line: String,
}

#[cfg(test)]
impl OutputLine {
  pub(crate) fn stdout(line: impl Into<String>) -> Self {
    Self { stream: StreamKind::Stdout, line: line.into() }
  }

  pub(crate) fn stderr(line: impl Into<String>) -> Self {
    Self { stream: StreamKind::Stderr, line: line.into() }
  }
}

/// Output of a short-lived diagnostic command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Captured {
  pub stdout: String,
  pub stderr: String,
}

/// Runs shell command lines.
pub trait Shell {
  /// Runs `command` to completion and captures both streams.
  async fn capture(&self, command: &str) -> Result<Captured, SwitchError>;

  /// Runs `command`, forwarding each output line to `events` while it runs.
  ///
  /// With `attach_tty` the process talks to the controlling terminal directly and nothing is forwarded.
  async fn stream(
    &self,
    command: &str,
    attach_tty: bool,
    events: UnboundedSender<OutputLine>,
  ) -> Result<ExitStatus, SwitchError>;

  /// Directory the commands run in.
  fn working_dir(&self) -> &Path;
}

/// [`Shell`] backed by `sh -c`.
#[derive(Clone, Debug)]
pub struct SystemShell {
  working_dir: PathBuf,
}

impl SystemShell {
  pub fn new(working_dir: PathBuf) -> Self {
    Self { working_dir }
  }

  fn command(&self, command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command).current_dir(&self.working_dir).stdin(Stdio::null()).kill_on_drop(true);
    cmd
  }
}

impl Shell for SystemShell {
  async fn capture(&self, command: &str) -> Result<Captured, SwitchError> {
    debug!("running `{command}`");
    let output = self.command(command).output().await.map_err(|source| spawn_error(command, source))?;
    let captured = Captured {
      stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    trace!(status = %output.status, stdout = %captured.stdout, stderr = %captured.stderr, "`{command}` finished");
    Ok(captured)
  }

  async fn stream(
    &self,
    command: &str,
    attach_tty: bool,
    events: UnboundedSender<OutputLine>,
  ) -> Result<ExitStatus, SwitchError> {
    let mut cmd = self.command(command);

    if attach_tty {
      debug!("running `{command}` attached to {DEV_TTY}");
      let tty = open_tty(Path::new(DEV_TTY)).map_err(|source| spawn_error(command, source))?;
      let stdout = tty.try_clone().map_err(|source| spawn_error(command, source))?;
      let stderr = tty.try_clone().map_err(|source| spawn_error(command, source))?;
      cmd.stdin(Stdio::from(tty)).stdout(Stdio::from(stdout)).stderr(Stdio::from(stderr));
      return cmd.status().await.map_err(|source| spawn_error(command, source));
    }

    debug!("running `{command}`");
    let mut child =
      cmd.stdout(Stdio::piped()).stderr(Stdio::piped()).spawn().map_err(|source| spawn_error(command, source))?;
    let stdout = child.stdout.take().map(|pipe| forward(pipe, StreamKind::Stdout, events.clone()));
    let stderr = child.stderr.take().map(|pipe| forward(pipe, StreamKind::Stderr, events));

    let (status, _, _) = tokio::join!(child.wait(), optional(stdout), optional(stderr));
    status.map_err(|source| spawn_error(command, source))
  }

  fn working_dir(&self) -> &Path {
    &self.working_dir
  }
}

async fn forward<R>(pipe: R, stream: StreamKind, events: UnboundedSender<OutputLine>)
where
  R: AsyncRead + Unpin,
{
  let mut reader = BufReader::new(pipe);
  let mut buf = Vec::new();
  let mut forwarding = true;
  // The pipe is drained to EOF even once the receiver is gone.
  while let Ok(read) = reader.read_until(b'\n', &mut buf).await {
    if read == 0 {
      break;
    }
    if forwarding {
      let line = String::from_utf8_lossy(buf.strip_suffix(b"\n").unwrap_or(&buf[..]));
      let line = line.strip_suffix('\r').unwrap_or(&line).to_string();
      forwarding = events.send(OutputLine { stream, line }).is_ok();
    }
    buf.clear();
  }
}

async fn optional<F: Future<Output = ()>>(future: Option<F>) {
  if let Some(future) = future {
    future.await
  }
}

fn spawn_error(command: &str, source: std::io::Error) -> SwitchError {
  SwitchError::Spawn { command: command.to_string(), source }
}

#[cfg(all(test, unix))]
mod tests {
  use std::env::temp_dir;

  use tokio::sync::mpsc;

  use crate::shell::Captured;
  use crate::shell::OutputLine;
  use crate::shell::Shell;
  use crate::shell::SystemShell;

  #[tokio::test]
  async fn capture_splits_streams() {
    let shell = SystemShell::new(temp_dir());
    let captured = shell.capture("echo out; echo err >&2").await.unwrap();
    assert_eq!(captured, Captured { stdout: "out\n".into(), stderr: "err\n".into() });
  }

  #[tokio::test]
  async fn stream_forwards_lines() {
    let shell = SystemShell::new(temp_dir());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let status = shell.stream("echo one && echo two >&2 && echo three", false, tx).await.unwrap();
    assert!(status.success());

    let mut lines = vec![];
    while let Some(line) = rx.recv().await {
      lines.push(line);
    }
    assert_eq!(lines.len(), 3);
    assert!(lines.contains(&OutputLine::stdout("one")));
    assert!(lines.contains(&OutputLine::stderr("two")));
    assert!(lines.contains(&OutputLine::stdout("three")));
  }

  #[tokio::test]
  async fn stream_short_circuits() {
    let shell = SystemShell::new(temp_dir());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let status = shell.stream("echo first && false && echo never", false, tx).await.unwrap();
    assert!(!status.success());

    let mut lines = vec![];
    while let Some(line) = rx.recv().await {
      lines.push(line);
    }
    assert_eq!(lines, vec![OutputLine::stdout("first")]);
  }

  #[tokio::test]
  async fn stream_survives_invalid_utf8() {
    let shell = SystemShell::new(temp_dir());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let status = shell.stream("printf 'caf\\351\\n'; echo after; sleep 0.2; echo last", false, tx).await.unwrap();
    assert!(status.success());

    let mut lines = vec![];
    while let Some(line) = rx.recv().await {
      lines.push(line);
    }
    assert_eq!(
      lines,
      vec![OutputLine::stdout("caf\u{FFFD}"), OutputLine::stdout("after"), OutputLine::stdout("last")]
    );
  }
}
