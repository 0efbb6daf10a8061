//! Inbound events, already stripped of transport-specific framing.

use crate::{
  command::Command,
  roster::{ActorId, ChatId, MessageRef},
};

/// Identity of the actor behind an event, as asserted by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorProfile {
  pub id:         ActorId,
  pub handle:     Option<String>,
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
}

impl ActorProfile {
  pub fn anonymous(id: ActorId) -> Self {
    Self { id, handle: None, first_name: None, last_name: None }
  }
}

/// A text command sent in a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEvent {
  pub chat_id: ChatId,
  /// Absent when the transport could not attribute the message to a user.
  pub actor:   Option<ActorProfile>,
  pub command: Command,
}

/// A press on one of the view's action buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonPress {
  /// Transport handle used to acknowledge the press.
  pub callback_id: String,
  pub chat_id:     ChatId,
  /// The message carrying the pressed button.
  pub message:     MessageRef,
  pub actor:       ActorProfile,
  /// Opaque action token, see [`crate::action::ActionToken`].
  pub token:       String,
}
