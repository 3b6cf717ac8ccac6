use std::fs::File;
use std::fs::OpenOptions;
use std::path::Path;

pub const DEV_TTY: &str = "/dev/tty";

/// Whether a pipeline can be attached to an interactive terminal.
pub trait Terminal {
  fn is_attachable(&self) -> bool;
}

/// The controlling terminal at `/dev/tty`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DevTty;

impl Terminal for DevTty {
  fn is_attachable(&self) -> bool {
    cfg!(not(windows)) && open_tty(Path::new(DEV_TTY)).is_ok()
  }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoTerminal;

impl Terminal for NoTerminal {
  fn is_attachable(&self) -> bool {
    false
  }
}

/// Opens a terminal device the way an attached pipeline uses it: readable and writable.
pub(crate) fn open_tty(path: &Path) -> std::io::Result<File> {
  OpenOptions::new().read(true).write(true).open(path)
}
