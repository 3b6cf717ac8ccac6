use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitStatus;

use tokio::sync::mpsc::UnboundedSender;

use crate::error::SwitchError;
use crate::shell::Captured;
use crate::shell::OutputLine;
use crate::shell::Shell;

/// A [`Shell`] answering from canned output and recording every command it was asked to run.
#[derive(Debug, Default)]
pub(crate) struct ScriptedShell {
  working_dir: PathBuf,
  responses: HashMap<String, Captured>,
  pipeline_output: Vec<OutputLine>,
  exit_status: ExitStatus,
  captured: RefCell<Vec<String>>,
  streamed: RefCell<Vec<(String, bool)>>,
}

impl ScriptedShell {
  pub(crate) fn new(working_dir: impl Into<PathBuf>) -> Self {
    Self { working_dir: working_dir.into(), ..Default::default() }
  }

  pub(crate) fn respond(mut self, command: &str, stdout: &str) -> Self {
    self.responses.insert(command.to_string(), Captured { stdout: stdout.to_string(), stderr: String::new() });
    self
  }

  pub(crate) fn respond_stderr(mut self, command: &str, stderr: &str) -> Self {
    self.responses.insert(command.to_string(), Captured { stdout: String::new(), stderr: stderr.to_string() });
    self
  }

  pub(crate) fn emit(mut self, line: OutputLine) -> Self {
    self.pipeline_output.push(line);
    self
  }

  #[cfg(unix)]
  pub(crate) fn exit_code(mut self, code: i32) -> Self {
    use std::os::unix::process::ExitStatusExt;

    self.exit_status = ExitStatus::from_raw(code << 8);
    self
  }

  pub(crate) fn captured_commands(&self) -> Vec<String> {
    self.captured.borrow().clone()
  }

  pub(crate) fn streamed_commands(&self) -> Vec<(String, bool)> {
    self.streamed.borrow().clone()
  }
}

impl Shell for ScriptedShell {
  async fn capture(&self, command: &str) -> Result<Captured, SwitchError> {
    self.captured.borrow_mut().push(command.to_string());
    Ok(self.responses.get(command).cloned().unwrap_or_default())
  }

  async fn stream(
    &self,
    command: &str,
    attach_tty: bool,
    events: UnboundedSender<OutputLine>,
  ) -> Result<ExitStatus, SwitchError> {
    self.streamed.borrow_mut().push((command.to_string(), attach_tty));
    if !attach_tty {
      for line in &self.pipeline_output {
        events.send(line.clone()).ok();
      }
    }
    Ok(self.exit_status)
  }

  fn working_dir(&self) -> &Path {
    &self.working_dir
  }
}
