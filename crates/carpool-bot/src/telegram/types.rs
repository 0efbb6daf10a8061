//! Bot API wire types: the subset of `Update` this bot reads, and the request
//! bodies it sends.

use carpool_core::{
  event::ActorProfile,
  render::Action,
  roster::{ActorId, ChatId, MessageId, MessageRef},
};
use serde::{Deserialize, Serialize};

// ─── Inbound ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
  pub update_id:      i64,
  pub message:        Option<Message>,
  pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
  pub message_id: i64,
  pub chat:       Chat,
  pub from:       Option<User>,
  pub text:       Option<String>,
}

impl Message {
  pub fn reference(&self) -> MessageRef {
    MessageRef {
      chat_id:    ChatId(self.chat.id),
      message_id: MessageId(self.message_id),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
  pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
  pub id:         i64,
  pub username:   Option<String>,
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
}

impl From<User> for ActorProfile {
  fn from(user: User) -> Self {
    ActorProfile {
      id:         ActorId(user.id),
      handle:     user.username,
      first_name: user.first_name,
      last_name:  user.last_name,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
  pub id:      String,
  pub from:    User,
  /// Absent when the message carrying the button is too old.
  pub message: Option<Message>,
  pub data:    Option<String>,
}

/// Envelope around every Bot API response.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
  pub ok:          bool,
  pub result:      Option<T>,
  pub description: Option<String>,
  pub error_code:  Option<i64>,
}

// ─── Outbound ────────────────────────────────────────────────────────────────

pub const PARSE_MODE: &str = "HTML";

#[derive(Debug, Serialize)]
pub struct InlineKeyboardButton<'a> {
  pub text:          &'a str,
  pub callback_data: String,
}

#[derive(Debug, Serialize)]
pub struct InlineKeyboardMarkup<'a> {
  pub inline_keyboard: Vec<Vec<InlineKeyboardButton<'a>>>,
}

impl<'a> InlineKeyboardMarkup<'a> {
  /// One button per row. `None` for an empty action list, so the message
  /// carries no keyboard at all.
  pub fn from_actions(actions: &'a [Action]) -> Option<Self> {
    if actions.is_empty() {
      return None;
    }
    let inline_keyboard = actions
      .iter()
      .map(|a| {
        vec![InlineKeyboardButton {
          text:          &a.label,
          callback_data: a.token.to_string(),
        }]
      })
      .collect();
    Some(Self { inline_keyboard })
  }
}

#[derive(Debug, Serialize)]
pub struct SendMessage<'a> {
  pub chat_id:      i64,
  pub text:         &'a str,
  pub parse_mode:   &'static str,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub reply_markup: Option<InlineKeyboardMarkup<'a>>,
}

#[derive(Debug, Serialize)]
pub struct EditMessageText<'a> {
  pub chat_id:      i64,
  pub message_id:   i64,
  pub text:         &'a str,
  pub parse_mode:   &'static str,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub reply_markup: Option<InlineKeyboardMarkup<'a>>,
}

#[derive(Debug, Serialize)]
pub struct AnswerCallbackQuery<'a> {
  pub callback_query_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct GetUpdates {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub offset:          Option<i64>,
  pub timeout:         u64,
  pub allowed_updates: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct SetWebhook<'a> {
  pub url:             &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub secret_token:    Option<&'a str>,
  pub allowed_updates: &'static [&'static str],
}

/// The update kinds this bot handles.
pub const ALLOWED_UPDATES: &[&str] = &["message", "callback_query"];
