use std::fmt::Display;
use std::fmt::Formatter;

use crate::tools::ToolPaths;
use crate::version::FullVersion;
use crate::version::InstalledVersions;
use crate::version::ShortVersion;

const VALET_SOCKET: &str = "~/.config/valet/valet.sock";
const SEPARATOR: &str = " && ";

/// Ordered shell steps executed as one short-circuiting `sh -c` line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pipeline {
  steps: Vec<String>,
}

impl Pipeline {
  pub fn switch(tools: &ToolPaths, installed: &InstalledVersions, version: &ShortVersion, full: &FullVersion) -> Self {
    let ToolPaths { composer, valet, brew } = tools;
    let formula = version.formula();

    Self {
      steps: vec![
        format!("{valet} stop"),
        format!("{brew} unlink {installed}"),
        format!("{brew} link --force --overwrite {formula}"),
        format!("{brew} services start {formula}"),
        format!("{composer} global config platform.php {full}"),
        format!("{composer} global update"),
        format!("rm -f {VALET_SOCKET}"),
        format!("{valet} install"),
      ],
    }
  }

  pub fn steps(&self) -> &[String] {
    &self.steps
  }

  pub fn command(&self) -> String {
    self.steps.join(SEPARATOR)
  }
}

impl Display for Pipeline {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.command())
  }
}

#[cfg(test)]
mod tests {
  use crate::pipeline::Pipeline;
  use crate::tools::ToolPaths;
  use crate::version::FullVersion;
  use crate::version::InstalledVersions;
  use crate::version::ShortVersion;

  fn tools() -> ToolPaths {
    ToolPaths { composer: "composer".into(), valet: "/site/vendor/bin/valet".into(), brew: "brew".into() }
  }

  #[test]
  fn test_switch_steps() {
    let installed = InstalledVersions::parse("php@5.6\nphp@7.1\nphp@7.2\n");
    let version = ShortVersion::parse("7.2").unwrap();
    let full = FullVersion::extract("php@7.2: stable 7.2.34 (bottled)").unwrap();

    let pipeline = Pipeline::switch(&tools(), &installed, &version, &full);
    assert_eq!(
      pipeline.steps(),
      [
        "/site/vendor/bin/valet stop",
        "brew unlink php@5.6 php@7.1 php@7.2",
        "brew link --force --overwrite php@7.2",
        "brew services start php@7.2",
        "composer global config platform.php 7.2.34",
        "composer global update",
        "rm -f ~/.config/valet/valet.sock",
        "/site/vendor/bin/valet install",
      ]
    );
  }

  #[test]
  fn test_command_joins_with_and() {
    let installed = InstalledVersions::parse("php@7.1");
    let version = ShortVersion::parse("7.1").unwrap();
    let full = FullVersion::extract("7.1.33").unwrap();

    let pipeline = Pipeline::switch(&tools(), &installed, &version, &full);
    let command = pipeline.command();
    assert!(command.starts_with("/site/vendor/bin/valet stop && brew unlink php@7.1 && "));
    assert_eq!(command.split(" && ").count(), 8);
    assert_eq!(pipeline.to_string(), command);
  }
}
