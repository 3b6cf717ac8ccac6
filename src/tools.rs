use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::info;

use crate::error::HOMEBREW_INSTALL;
use crate::error::SwitchError;
use crate::error::VALET_INSTALL;
use crate::shell::Shell;

const COMPOSER_PHAR: &str = "composer.phar";

/// How each external tool is invoked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolPaths {
  pub composer: String,
  pub valet: String,
  pub brew: String,
}

impl ToolPaths {
  /// Resolves composer, then valet, then brew.
  pub async fn locate<S: Shell>(shell: &S, php: Option<&Path>) -> Result<Self, SwitchError> {
    let composer = find_composer(shell.working_dir(), php)?;
    let valet = find_valet(shell, &composer).await?;
    let brew = find_brew(shell).await?;

    let tools = Self { composer, valet, brew };
    debug!(?tools, "located tools");
    Ok(tools)
  }
}

/// Finds the location of an executable `name`, preferring an explicitly configured path.
pub fn find_executable(name: &str, explicit: Option<&Path>) -> Result<PathBuf, SwitchError> {
  if let Some(path) = explicit {
    if !path.exists() {
      return Err(SwitchError::ExecutableMissing { name: name.to_string(), path: path.to_path_buf() });
    }
    return Ok(path.to_path_buf());
  }
  which::which(name).map_err(|_| SwitchError::ExecutableNotOnPath(name.to_string()))
}

/// A `composer.phar` in the working directory takes precedence over a global `composer`.
pub fn find_composer(working_dir: &Path, php: Option<&Path>) -> Result<String, SwitchError> {
  if working_dir.join(COMPOSER_PHAR).exists() {
    let php = find_executable("php", php)?;
    return Ok(format!("\"{}\" {COMPOSER_PHAR}", php.display()));
  }
  Ok("composer".to_string())
}

/// Looks for `laravel/valet` among the direct global requirements, then the local ones.
pub async fn find_valet<S: Shell>(shell: &S, composer: &str) -> Result<String, SwitchError> {
  let mut valet = None;

  let global = shell.capture(&format!("{composer} global show -D -N")).await?;
  if mentions_valet(&global.stdout) {
    valet = Some("valet".to_string());
  }

  let local = shell.capture(&format!("{composer} show -D -N")).await?;
  if mentions_valet(&local.stdout) {
    valet = Some(shell.working_dir().join("vendor/bin/valet").display().to_string());
  }

  match valet {
    Some(valet) => {
      info!("using valet at `{valet}`");
      Ok(valet)
    }
    None => Err(SwitchError::ToolMissing { tool: "Valet", hint: VALET_INSTALL.to_string() }),
  }
}

pub async fn find_brew<S: Shell>(shell: &S) -> Result<String, SwitchError> {
  let version = shell.capture("brew -v").await?;
  if !version.stderr.is_empty() {
    debug!(stderr = %version.stderr.trim_end(), "brew -v reported an error");
    return Err(SwitchError::ToolMissing { tool: "Homebrew", hint: HOMEBREW_INSTALL.to_string() });
  }
  Ok("brew".to_string())
}

fn mentions_valet(output: &str) -> bool {
  output.lines().any(|line| line.contains("valet"))
}
