use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

pub const HOMEBREW_INSTALL: &str =
  r#"/bin/bash -c "$(curl -fsSL https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh)""#;
pub const VALET_INSTALL: &str = "composer global require laravel/valet";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
  InvalidArgument,
  Runtime,
  NotFound,
  Pipeline,
}

#[derive(Debug, Error)]
pub enum SwitchError {
  #[error("The type of version entered is invalid: `{0}` (expected major.minor, e.g. 7.1)")]
  InvalidVersion(String),
  #[error("PHP {version} is not installed on Homebrew.\n\nPlease try again after installation:\n\n  $ brew install php@{version}")]
  NotInstalled { version: String },
  #[error("{tool} is not installed.\n\nPlease try again after installation:\n\n  $ {hint}")]
  ToolMissing { tool: &'static str, hint: String },
  #[error("{name} executable not found at {path:?}")]
  ExecutableMissing { name: String, path: PathBuf },
  #[error("Could not find {0} executable. Please ensure `{0}` is in your PATH or pass it with --php.")]
  ExecutableNotOnPath(String),
  #[error("Could not resolve the full version of php@{0} from Homebrew")]
  FullVersionNotFound(String),
  #[error("Failed to run `{command}`")]
  Spawn {
    command: String,
    #[source]
    source: std::io::Error,
  },
  #[error("Switch pipeline stopped early: {0}")]
  PipelineFailed(ExitStatus),
  #[error(transparent)]
  Io(#[from] std::io::Error),
}

impl ErrorKind {
  /// Process exit code reported for errors of this kind.
  pub fn exit_code(self) -> u8 {
    match self {
      ErrorKind::InvalidArgument => 2,
      ErrorKind::Runtime => 3,
      ErrorKind::NotFound => 4,
      ErrorKind::Pipeline => 5,
    }
  }
}

impl SwitchError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      SwitchError::InvalidVersion(_) | SwitchError::NotInstalled { .. } => ErrorKind::InvalidArgument,
      SwitchError::ToolMissing { .. }
      | SwitchError::ExecutableMissing { .. }
      | SwitchError::ExecutableNotOnPath(_)
      | SwitchError::Spawn { .. }
      | SwitchError::Io(_) => ErrorKind::Runtime,
      SwitchError::FullVersionNotFound(_) => ErrorKind::NotFound,
      SwitchError::PipelineFailed(_) => ErrorKind::Pipeline,
    }
  }
}
