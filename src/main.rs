mod cli;

use std::process::ExitCode;

use clap::Parser;
use php_switcher::error::SwitchError;

use crate::cli::Cli;
use crate::cli::Executable;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
  let cli = Cli::parse();

  tracing_subscriber::fmt()
    .with_max_level(cli.verbosity().tracing_level_filter())
    .with_target(false)
    .with_writer(std::io::stderr)
    .init();

  match cli.execute().await {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("Error: {err:?}");
      exit_code(&err)
    }
  }
}

fn exit_code(err: &anyhow::Error) -> ExitCode {
  match err.downcast_ref::<SwitchError>() {
    Some(switch_error) => ExitCode::from(switch_error.kind().exit_code()),
    None => ExitCode::FAILURE,
  }
}
