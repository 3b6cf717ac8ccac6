mod switch;

use std::path::PathBuf;

use clap_verbosity_flag::InfoLevel;
use clap_verbosity_flag::Verbosity;

use crate::cli::switch::Switch;

pub trait Executable {
  async fn execute(self) -> anyhow::Result<()>;
}

#[derive(Clone, Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
  #[command(subcommand)]
  command: Command,
  #[command(flatten)]
  verbosity: Verbosity<InfoLevel>,
}

#[derive(Clone, Debug, clap::Subcommand)]
enum Command {
  /// Switch PHP version with valet.
  Switch(Switch),
}

impl Cli {
  pub(crate) fn verbosity(&self) -> Verbosity<InfoLevel> {
    self.verbosity
  }
}

impl Executable for Cli {
  async fn execute(self) -> anyhow::Result<()> {
    match self.command {
      Command::Switch(switch) => switch.execute().await,
    }
  }
}

fn parse_working_dir(arg: &str) -> Result<PathBuf, std::io::Error> {
  PathBuf::from(arg).canonicalize().and_then(|dir| {
    if !dir.is_dir() {
      return Err(std::io::Error::from(std::io::ErrorKind::NotADirectory));
    }
    Ok(dir)
  })
}
