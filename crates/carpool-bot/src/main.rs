//! carpool-bot binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus `CARPOOL_*`
//! environment variables, opens the SQLite roster store, and serves Telegram
//! updates by long polling or through a webhook.

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context as _;
use carpool_bot::{
  Coordinator,
  config::{BotConfig, UpdateMode},
  polling,
  telegram::TelegramClient,
  webhook::{self, WebhookState},
};
use carpool_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Car organizer Telegram bot")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let cfg = BotConfig::load(&cli.config).context("failed to load configuration")?;
  tracing::info!(token = %cfg.masked_token(), "configuration loaded");

  if let Some(dir) = cfg.store_path.parent().filter(|d| !d.as_os_str().is_empty()) {
    std::fs::create_dir_all(dir)
      .with_context(|| format!("failed to create {dir:?}"))?;
  }
  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;

  // The HTTP timeout has to outlast a long poll.
  let http_timeout = Duration::from_secs(cfg.poll_timeout_secs + 10);
  let client = Arc::new(
    TelegramClient::new(&cfg.api_url, &cfg.token, http_timeout)
      .context("failed to build Telegram client")?,
  );

  let bot_username = match cfg.bot_username.clone() {
    Some(name) => name,
    None => client
      .get_me()
      .await
      .context("getMe failed")?
      .username
      .context("bot account has no username")?,
  };
  tracing::info!(%bot_username, "bot identity resolved");

  let coordinator =
    Coordinator::new(Arc::new(store), Arc::clone(&client), &bot_username);

  match cfg.mode {
    UpdateMode::Polling => {
      client
        .delete_webhook()
        .await
        .context("failed to remove webhook before polling")?;
      tokio::select! {
        _ = polling::run(client, coordinator, cfg.poll_timeout_secs) => {}
        _ = tokio::signal::ctrl_c() => tracing::info!("shutting down"),
      }
    }
    UpdateMode::Webhook => {
      let hook = cfg
        .webhook
        .clone()
        .context("webhook mode needs a [webhook] section")?;

      if let Some(url) = hook.public_url.as_deref() {
        client
          .set_webhook(url, hook.secret_token.as_deref())
          .await
          .context("failed to register webhook")?;
        tracing::info!(%url, "webhook registered");
      }

      let app = webhook::router(WebhookState {
        coordinator,
        secret_token: hook.secret_token.as_deref().map(Arc::from),
      });
      let address = format!("{}:{}", hook.host, hook.port);

      tracing::info!("Listening on http://{address}");
      let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

      axum::serve(listener, app)
        .with_graceful_shutdown(async {
          let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("server error")?;
    }
  }

  Ok(())
}
