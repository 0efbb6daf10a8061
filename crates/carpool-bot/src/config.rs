//! Runtime configuration, read from an optional TOML file layered under
//! `CARPOOL_*` environment variables.
//!
//! ```toml
//! token        = "123456:ABC..."
//! bot_username = "car_organizer_bot"   # optional, asked from getMe if unset
//! store_path   = "archive/database.sqlite"
//! mode         = "webhook"             # or "polling" (default)
//!
//! [webhook]
//! port         = 8443
//! public_url   = "https://bot.example.org/webhook"
//! secret_token = "change-me"
//! ```
//!
//! Nested keys use a double underscore in the environment, e.g.
//! `CARPOOL_WEBHOOK__PORT=8443`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// How updates reach the bot.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMode {
  #[default]
  Polling,
  Webhook,
}

#[derive(Deserialize, Clone)]
pub struct WebhookConfig {
  #[serde(default = "default_host")]
  pub host:         String,
  #[serde(default = "default_port")]
  pub port:         u16,
  /// If set, registered with Telegram at startup.
  pub public_url:   Option<String>,
  /// Expected `X-Telegram-Bot-Api-Secret-Token` header value.
  pub secret_token: Option<String>,
}

/// Bot configuration. Not `Debug`: it carries the bot token.
#[derive(Deserialize, Clone)]
pub struct BotConfig {
  pub token:             String,
  pub bot_username:      Option<String>,
  #[serde(default = "default_api_url")]
  pub api_url:           String,
  #[serde(default = "default_store_path")]
  pub store_path:        PathBuf,
  #[serde(default = "default_poll_timeout")]
  pub poll_timeout_secs: u64,
  #[serde(default)]
  pub mode:              UpdateMode,
  pub webhook:           Option<WebhookConfig>,
}

fn default_api_url() -> String { "https://api.telegram.org".to_string() }

fn default_store_path() -> PathBuf { PathBuf::from("archive/database.sqlite") }

fn default_poll_timeout() -> u64 { 30 }

fn default_host() -> String { "0.0.0.0".to_string() }

fn default_port() -> u16 { 8080 }

impl BotConfig {
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    Self::load_with_env(path, None)
  }

  /// `env` replaces the process environment when given.
  fn load_with_env(
    path: &Path,
    env: Option<config::Map<String, String>>,
  ) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("CARPOOL")
          .prefix_separator("_")
          .separator("__")
          .source(env),
      )
      .build()?
      .try_deserialize()
  }

  /// The token with everything but its first and last three characters
  /// hidden, for logs.
  pub fn masked_token(&self) -> String {
    let chars: Vec<char> = self.token.chars().collect();
    if chars.len() <= 6 {
      return "...".to_string();
    }
    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 3..].iter().collect();
    format!("{head}...{tail}")
  }
}
