//! The `Transport` trait: the outbound half of the chat collaborator.

use std::future::Future;

use crate::{
  render::Action,
  roster::{ChatId, MessageId, MessageRef},
};

pub trait Transport: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Post a new message; `actions` become buttons, one per row.
  fn send_message<'a>(
    &'a self,
    chat_id: ChatId,
    text: &'a str,
    actions: &'a [Action],
  ) -> impl Future<Output = Result<MessageId, Self::Error>> + Send + 'a;

  /// Replace the text and buttons of an existing message.
  fn edit_message<'a>(
    &'a self,
    target: MessageRef,
    text: &'a str,
    actions: &'a [Action],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Acknowledge a button press.
  fn answer_button<'a>(
    &'a self,
    callback_id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
