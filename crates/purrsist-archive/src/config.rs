//! Runtime configuration.
//!
//! Read from a YAML (or TOML/JSON, by extension) file layered under
//! `PURRSIST_`-prefixed environment variables, e.g.
//! `PURRSIST_IPFS__IPNS_KEY=archive`.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use purrsist_ipfs::api_url_from_multiaddr;
use serde::Deserialize;

use crate::{
  error::{Error, Result},
  select::BoardRule,
};

const DEFAULT_DB_PATH: &str = "~/.config/Air Labs/Aether/backend/AetherDB.db";
const DEFAULT_API_URL: &str = "http://127.0.0.1:5001";

// ─── Settings ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// Aether backend database. A leading `~/` expands to `$HOME`.
  #[serde(default = "default_db_path")]
  pub db_path:     PathBuf,
  /// Parent directory for the temporary workspace; the system temp dir when
  /// unset.
  #[serde(default)]
  pub scratch_dir: Option<PathBuf>,
  /// Board rules in declaration order.
  #[serde(default)]
  pub boards:      Vec<BoardRuleConfig>,
  #[serde(default)]
  pub feeds:       FeedSettings,
  #[serde(default)]
  pub ipfs:        IpfsSettings,
}

/// One entry of the `boards` list. At least one of `pattern` and
/// `fingerprint` is required; when both are given only the fingerprint is
/// used for matching.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoardRuleConfig {
  #[serde(default)]
  pub pattern:         Option<String>,
  #[serde(default)]
  pub fingerprint:     Option<String>,
  #[serde(default)]
  pub max_threads:     usize,
  #[serde(default)]
  pub exclude_threads: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedSettings {
  #[serde(default = "yes")]
  pub atom:     bool,
  #[serde(default = "yes")]
  pub rss:      bool,
  #[serde(default = "default_feed_title")]
  pub title:    String,
  /// Prefix for feed links. Defaults to the dweb.link gateway URL of the
  /// publishing key.
  #[serde(default)]
  pub base_url: Option<String>,
}

impl Default for FeedSettings {
  fn default() -> Self {
    Self {
      atom:     true,
      rss:      true,
      title:    default_feed_title(),
      base_url: None,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IpfsSettings {
  /// API multiaddr, e.g. `/dns4/localhost/tcp/5001`. Takes precedence over
  /// `api_url`.
  #[serde(default)]
  pub maddr:        Option<String>,
  #[serde(default)]
  pub api_url:      Option<String>,
  #[serde(default = "default_ipns_key")]
  pub ipns_key:     String,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
  #[serde(default)]
  pub pinremote:    PinRemoteSettings,
}

impl Default for IpfsSettings {
  fn default() -> Self {
    Self {
      maddr:        None,
      api_url:      None,
      ipns_key:     default_ipns_key(),
      timeout_secs: default_timeout_secs(),
      pinremote:    PinRemoteSettings::default(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PinRemoteSettings {
  #[serde(default)]
  pub enabled:  bool,
  #[serde(default)]
  pub service:  String,
  #[serde(default)]
  pub pin_name: String,
  /// Pause between removing the old pin and adding the new one.
  #[serde(default = "default_delay_ms")]
  pub delay_ms: u64,
}

impl Default for PinRemoteSettings {
  fn default() -> Self {
    Self {
      enabled:  false,
      service:  String::new(),
      pin_name: String::new(),
      delay_ms: default_delay_ms(),
    }
  }
}

fn default_db_path() -> PathBuf { PathBuf::from(DEFAULT_DB_PATH) }

fn default_feed_title() -> String { "Aether archive".to_string() }

fn default_ipns_key() -> String { "aether".to_string() }

fn default_timeout_secs() -> u64 { 300 }

fn default_delay_ms() -> u64 { 1000 }

fn yes() -> bool { true }

// ─── Loading ─────────────────────────────────────────────────────────────────

impl Settings {
  /// Load settings from `path`, with environment overrides.
  pub fn load(path: &Path) -> Result<Self> {
    Self::from_source(config::File::from(path.to_path_buf()).required(true))
  }

  fn from_source<S>(source: S) -> Result<Self>
  where
    S: config::Source + Send + Sync + 'static,
  {
    let settings: Settings = config::Config::builder()
      .add_source(source)
      .add_source(
        config::Environment::with_prefix("PURRSIST")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()?
      .try_deserialize()?;
    settings.validate()?;
    Ok(settings)
  }

  fn validate(&self) -> Result<()> {
    if self.ipfs.ipns_key.trim().is_empty() {
      return Err(Error::InvalidConfig("ipfs.ipns_key must not be empty".into()));
    }
    let pin = &self.ipfs.pinremote;
    if pin.enabled && (pin.service.is_empty() || pin.pin_name.is_empty()) {
      return Err(Error::InvalidConfig(
        "ipfs.pinremote needs service and pin_name when enabled".into(),
      ));
    }
    Ok(())
  }

  /// Compile the `boards` rules.
  pub fn rules(&self) -> Result<Vec<BoardRule>> {
    self.boards.iter().map(BoardRule::compile).collect()
  }

  /// `db_path` with `~/` expanded.
  pub fn db_path(&self) -> PathBuf { expand_tilde(&self.db_path) }

  /// HTTP base URL of the IPFS API.
  pub fn api_url(&self) -> Result<String> {
    match (&self.ipfs.maddr, &self.ipfs.api_url) {
      (Some(maddr), _) => api_url_from_multiaddr(maddr)
        .map_err(|e| Error::InvalidConfig(format!("ipfs.maddr: {e}"))),
      (None, Some(url)) => Ok(url.clone()),
      (None, None) => Ok(DEFAULT_API_URL.to_string()),
    }
  }

  pub fn api_timeout(&self) -> Duration { Duration::from_secs(self.ipfs.timeout_secs) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use config::{File, FileFormat};

  use super::*;

  fn parse(yaml: &str) -> Result<Settings> {
    Settings::from_source(File::from_str(yaml, FileFormat::Yaml))
  }

  #[test]
  fn defaults_apply_to_empty_file() {
    let settings = parse("{}").unwrap();
    assert_eq!(settings.db_path, PathBuf::from(DEFAULT_DB_PATH));
    assert!(settings.boards.is_empty());
    assert!(settings.feeds.atom && settings.feeds.rss);
    assert_eq!(settings.ipfs.ipns_key, "aether");
    assert_eq!(settings.ipfs.pinremote.delay_ms, 1000);
    assert!(!settings.ipfs.pinremote.enabled);
    assert_eq!(settings.api_url().unwrap(), DEFAULT_API_URL);
  }

  #[test]
  fn board_rules_keep_declaration_order() {
    let settings = parse(
      r#"
boards:
  - pattern: "Rust"
  - pattern: "Linux.*"
    max_threads: 50
    exclude_threads: ["(?i)giveaway"]
  - fingerprint: "0f3c"
"#,
    )
    .unwrap();

    let rules = settings.rules().unwrap();
    assert_eq!(rules.len(), 3);
    assert!(rules[0].pattern.as_ref().unwrap().is_match("Rust"));
    assert_eq!(rules[1].max_threads, 50);
    assert_eq!(rules[1].exclude_threads.len(), 1);
    assert_eq!(rules[2].fingerprint.as_deref(), Some("0f3c"));
  }

  #[test]
  fn maddr_takes_precedence_over_api_url() {
    let settings = parse(
      r#"
ipfs:
  maddr: /ip4/10.0.0.2/tcp/5001
  api_url: http://ignored:1
"#,
    )
    .unwrap();
    assert_eq!(settings.api_url().unwrap(), "http://10.0.0.2:5001");
  }

  #[test]
  fn bad_maddr_is_a_config_error() {
    let settings = parse("ipfs:\n  maddr: localhost:5001\n").unwrap();
    assert!(matches!(settings.api_url(), Err(Error::InvalidConfig(_))));
  }

  #[test]
  fn enabled_pinning_requires_service_and_name() {
    let err = parse("ipfs:\n  pinremote:\n    enabled: true\n").unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));

    let settings = parse(
      "ipfs:\n  pinremote:\n    enabled: true\n    service: pinata\n    pin_name: aether-archive\n",
    )
    .unwrap();
    assert_eq!(settings.ipfs.pinremote.service, "pinata");
  }

  #[test]
  fn tilde_expands_to_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    let expanded = expand_tilde(Path::new("~/db/AetherDB.db"));
    assert_eq!(expanded, PathBuf::from(home).join("db/AetherDB.db"));
    assert_eq!(expand_tilde(Path::new("/abs/db")), PathBuf::from("/abs/db"));
  }
}
