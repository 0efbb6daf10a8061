//! Telegram Bot API transport.
//!
//! [`TelegramClient`] implements [`Transport`] over the HTTPS Bot API and
//! also exposes the update-intake calls (`getUpdates`, `setWebhook`) used by
//! the polling loop and the binary.

pub mod types;

use std::time::Duration;

use carpool_core::{
  render::Action,
  roster::{ChatId, MessageId, MessageRef},
  transport::Transport,
};
use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use types::{
  ALLOWED_UPDATES, AnswerCallbackQuery, ApiResponse, EditMessageText,
  GetUpdates, InlineKeyboardMarkup, Message, PARSE_MODE, SendMessage,
  SetWebhook, Update, User,
};

#[derive(Debug, Error)]
pub enum TelegramError {
  /// Network or decoding failure. The request URL, which embeds the token,
  /// is stripped.
  #[error("http error: {0}")]
  Http(reqwest::Error),

  #[error("bot api error {code:?}: {description}")]
  Api { code: Option<i64>, description: String },
}

impl From<reqwest::Error> for TelegramError {
  fn from(e: reqwest::Error) -> Self { Self::Http(e.without_url()) }
}

/// Async client for the Telegram Bot API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct TelegramClient {
  client:   Client,
  base_url: String,
}

impl TelegramClient {
  /// `timeout` must exceed the long-poll timeout used with
  /// [`get_updates`](Self::get_updates).
  pub fn new(
    api_url: &str,
    token: &str,
    timeout: Duration,
  ) -> Result<Self, TelegramError> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self {
      client,
      base_url: format!("{}/bot{token}", api_url.trim_end_matches('/')),
    })
  }

  async fn call<P, R>(&self, method: &str, payload: &P) -> Result<R, TelegramError>
  where
    P: Serialize + ?Sized,
    R: DeserializeOwned,
  {
    let resp: ApiResponse<R> = self
      .client
      .post(format!("{}/{method}", self.base_url))
      .json(payload)
      .send()
      .await?
      .json()
      .await?;

    match resp {
      ApiResponse { ok: true, result: Some(result), .. } => Ok(result),
      ApiResponse { description, error_code, .. } => Err(TelegramError::Api {
        code:        error_code,
        description: description
          .unwrap_or_else(|| format!("{method} returned no result")),
      }),
    }
  }

  // ── Update intake ─────────────────────────────────────────────────────────

  /// `getMe`: the bot's own account.
  pub async fn get_me(&self) -> Result<User, TelegramError> {
    self.call("getMe", &serde_json::json!({})).await
  }

  /// Long-poll for updates after `offset`.
  pub async fn get_updates(
    &self,
    offset: Option<i64>,
    timeout_secs: u64,
  ) -> Result<Vec<Update>, TelegramError> {
    let body = GetUpdates {
      offset,
      timeout: timeout_secs,
      allowed_updates: ALLOWED_UPDATES,
    };
    self.call("getUpdates", &body).await
  }

  pub async fn set_webhook(
    &self,
    url: &str,
    secret_token: Option<&str>,
  ) -> Result<(), TelegramError> {
    let body = SetWebhook { url, secret_token, allowed_updates: ALLOWED_UPDATES };
    let _: bool = self.call("setWebhook", &body).await?;
    Ok(())
  }

  /// Telegram refuses `getUpdates` while a webhook is registered.
  pub async fn delete_webhook(&self) -> Result<(), TelegramError> {
    let _: bool = self.call("deleteWebhook", &serde_json::json!({})).await?;
    Ok(())
  }
}

// ─── Transport impl ──────────────────────────────────────────────────────────

impl Transport for TelegramClient {
  type Error = TelegramError;

  async fn send_message(
    &self,
    chat_id: ChatId,
    text:    &str,
    actions: &[Action],
  ) -> Result<MessageId, TelegramError> {
    let body = SendMessage {
      chat_id: chat_id.0,
      text,
      parse_mode: PARSE_MODE,
      reply_markup: InlineKeyboardMarkup::from_actions(actions),
    };
    let message: Message = self.call("sendMessage", &body).await?;
    Ok(MessageId(message.message_id))
  }

  async fn edit_message(
    &self,
    target:  MessageRef,
    text:    &str,
    actions: &[Action],
  ) -> Result<(), TelegramError> {
    let body = EditMessageText {
      chat_id: target.chat_id.0,
      message_id: target.message_id.0,
      text,
      parse_mode: PARSE_MODE,
      reply_markup: InlineKeyboardMarkup::from_actions(actions),
    };
    // The result is the edited message, or `true` for inline messages.
    let _: serde_json::Value = self.call("editMessageText", &body).await?;
    Ok(())
  }

  async fn answer_button(&self, callback_id: &str) -> Result<(), TelegramError> {
    let body = AnswerCallbackQuery { callback_query_id: callback_id };
    let _: bool = self.call("answerCallbackQuery", &body).await?;
    Ok(())
  }
}
