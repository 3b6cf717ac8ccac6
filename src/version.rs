use std::fmt::Display;
use std::fmt::Formatter;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::SwitchError;

static SHORT_VERSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]\.[0-9]$").unwrap());
static FULL_VERSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]\.[0-9]\.[0-9]+").unwrap());

const FORMULA_PREFIX: &str = "php@";

/// A `major.minor` PHP version such as `7.1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShortVersion(String);

impl ShortVersion {
  pub fn parse(version: &str) -> Result<Self, SwitchError> {
    if !SHORT_VERSION.is_match(version) {
      return Err(SwitchError::InvalidVersion(version.to_string()));
    }
    Ok(Self(version.to_string()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Homebrew formula name, e.g. `php@7.1`.
  pub fn formula(&self) -> String {
    format!("{FORMULA_PREFIX}{}", self.0)
  }
}

impl Display for ShortVersion {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

/// A `major.minor.patch` PHP version such as `7.1.29`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FullVersion(String);

impl FullVersion {
  /// Returns the first dotted triple found in `text`, scanning line by line.
  pub fn extract(text: &str) -> Option<Self> {
    text.lines().find_map(|line| FULL_VERSION.find(line)).map(|found| Self(found.as_str().to_string()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl Display for FullVersion {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

/// Installed `php@X.Y` formulae, in the order Homebrew listed them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InstalledVersions(Vec<String>);

impl InstalledVersions {
  pub fn parse(listing: &str) -> Self {
    Self(
      listing
        .lines()
        .map(str::trim)
        .filter(|line| line.contains(FORMULA_PREFIX))
        .map(ToString::to_string)
        .collect(),
    )
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn contains(&self, version: &ShortVersion) -> bool {
    self.0.iter().any(|formula| {
      formula.split_once('@').is_some_and(|(_, installed)| installed == version.as_str())
    })
  }

  pub fn ensure_installed(&self, version: &ShortVersion) -> Result<(), SwitchError> {
    if self.contains(version) {
      return Ok(());
    }
    Err(SwitchError::NotInstalled { version: version.to_string() })
  }
}

impl Display for InstalledVersions {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0.join(" "))
  }
}
