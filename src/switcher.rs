//! Switching the linked Homebrew PHP and reinstalling Valet against it.
//!
//! A run goes through `validate → locate tools → scan installed → validate installed → resolve full version →
//! execute pipeline → report`. Every step is awaited before the next one starts and the first failure ends the run.

use std::io::Write;
use std::path::PathBuf;

use nu_ansi_term::Color;
use nu_ansi_term::Style;
use tokio::sync::mpsc;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::error::SwitchError;
use crate::pipeline::Pipeline;
use crate::shell::OutputLine;
use crate::shell::Shell;
use crate::shell::StreamKind;
use crate::terminal::Terminal;
use crate::tools::ToolPaths;
use crate::version::FullVersion;
use crate::version::InstalledVersions;
use crate::version::ShortVersion;

#[derive(Clone, Debug, Default)]
pub struct SwitchOptions {
  /// Attach the pipeline to the controlling terminal when one is available.
  pub interactive: bool,
  /// PHP binary used to run a local `composer.phar`.
  pub php: Option<PathBuf>,
}

/// Everything resolved before the pipeline runs.
#[derive(Clone, Debug)]
pub struct Plan {
  pub version: ShortVersion,
  pub tools: ToolPaths,
  pub installed: InstalledVersions,
  pub full_version: FullVersion,
  pub pipeline: Pipeline,
}

pub struct Switcher<S, T> {
  shell: S,
  terminal: T,
  options: SwitchOptions,
}

impl<S: Shell, T: Terminal> Switcher<S, T> {
  pub fn new(shell: S, terminal: T, options: SwitchOptions) -> Self {
    Self { shell, terminal, options }
  }

  pub async fn switch<W: Write>(&self, version: &str, out: &mut W) -> Result<(), SwitchError> {
    let plan = self.plan(version, out).await?;
    self.execute(&plan, out).await?;

    let ready = format!("PHP {} and Valet ready! Build something amazing.", plan.version);
    writeln!(out, "{}", Color::Yellow.paint(ready))?;
    Ok(())
  }

  /// Validates `version` against the machine and builds the pipeline without running it.
  pub async fn plan<W: Write>(&self, version: &str, out: &mut W) -> Result<Plan, SwitchError> {
    let version = ShortVersion::parse(version)?;
    debug!(%version, "requested version is well formed");

    progress(out, "Checking dependencies...")?;
    let tools = ToolPaths::locate(&self.shell, self.options.php.as_deref()).await?;

    progress(out, "Importing installed PHP versions...")?;
    let installed = self.installed_versions(&tools).await?;
    progress(out, &format!("The PHP versions you have: {{ {installed} }}"))?;

    installed.ensure_installed(&version)?;
    let full_version = self.full_version(&tools, &version).await?;
    info!("{} resolves to PHP {full_version}", version.formula());

    let pipeline = Pipeline::switch(&tools, &installed, &version, &full_version);
    Ok(Plan { version, tools, installed, full_version, pipeline })
  }

  /// Runs the pipeline, writing its output to `out` line by line as it arrives.
  pub async fn execute<W: Write>(&self, plan: &Plan, out: &mut W) -> Result<(), SwitchError> {
    let attach_tty = self.options.interactive && self.terminal.is_attachable();
    let command = plan.pipeline.command();
    debug!(attach_tty, "executing `{command}`");

    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let display = async {
      while let Some(event) = rx.recv().await {
        match event.stream {
          StreamKind::Stdout => writeln!(out, "{}", event.line)?,
          StreamKind::Stderr => writeln!(out, "{}", Style::new().dimmed().paint(event.line))?,
        }
        out.flush()?;
      }
      Ok::<(), std::io::Error>(())
    };

    let (status, displayed) = tokio::join!(self.shell.stream(&command, attach_tty, tx), display);
    let status = status?;
    displayed?;

    if !status.success() {
      warn!("pipeline exited with {status}, later steps were skipped");
      return Err(SwitchError::PipelineFailed(status));
    }
    Ok(())
  }

  async fn installed_versions(&self, tools: &ToolPaths) -> Result<InstalledVersions, SwitchError> {
    let listing = self.shell.capture(&format!("{} list | grep php", tools.brew)).await?;
    let installed = InstalledVersions::parse(&listing.stdout);
    if installed.is_empty() {
      warn!("Homebrew lists no php@ formulae");
    }
    Ok(installed)
  }

  async fn full_version(&self, tools: &ToolPaths, version: &ShortVersion) -> Result<FullVersion, SwitchError> {
    let info = self.shell.capture(&format!("{} info {}", tools.brew, version.formula())).await?;
    FullVersion::extract(&info.stdout).ok_or_else(|| SwitchError::FullVersionNotFound(version.to_string()))
  }
}

fn progress<W: Write>(out: &mut W, message: &str) -> std::io::Result<()> {
  writeln!(out, "{}", Color::Green.paint(message))
}
