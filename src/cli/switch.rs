use std::path::PathBuf;

use clap::builder::FalseyValueParser;
use php_switcher::shell::SystemShell;
use php_switcher::switcher::SwitchOptions;
use php_switcher::switcher::Switcher;
use php_switcher::terminal::DevTty;

use crate::cli::Executable;
use crate::cli::parse_working_dir;

#[derive(Clone, Debug, clap::Args)]
pub struct Switch {
  #[arg(help = "Select the version you want to replace.", value_name = "VERSION")]
  version: String,
  #[arg(
    long,
    env = "PHP_SWITCHER_NO_TTY",
    value_parser = FalseyValueParser::new(),
    help = "Do not attach the switch pipeline to /dev/tty"
  )]
  no_tty: bool,
  #[arg(long, env = "PHP", value_name = "PATH", help = "PHP binary used to run a local composer.phar")]
  php: Option<PathBuf>,
  #[arg(
    short = 'd',
    long,
    value_name = "DIR",
    help = "Directory composer and valet are run from",
    default_value_os_t = std::env::current_dir().unwrap_or(PathBuf::from(".")),
    value_parser = parse_working_dir,
  )]
  working_dir: PathBuf,
}

impl Executable for Switch {
  async fn execute(self) -> anyhow::Result<()> {
    let options = SwitchOptions { interactive: !self.no_tty, php: self.php };
    let switcher = Switcher::new(SystemShell::new(self.working_dir), DevTty, options);
    switcher.switch(&self.version, &mut std::io::stdout()).await?;

    Ok(())
  }
}
