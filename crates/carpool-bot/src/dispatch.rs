//! Turns Bot API updates into coordinator events.

use carpool_core::{
  command::Command,
  event::{ButtonPress, CommandEvent},
  roster::ChatId,
  store::RosterStore,
  transport::Transport,
};
use tracing::{debug, trace};

use crate::{coordinator::Coordinator, telegram::types::Update};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
  Command(CommandEvent),
  Button(ButtonPress),
}

/// Extract the event carried by `update`, if it is one this bot handles.
pub fn to_event(update: Update, bot_username: &str) -> Option<Event> {
  if let Some(cq) = update.callback_query {
    let message = cq.message?;
    let token = cq.data?;
    return Some(Event::Button(ButtonPress {
      callback_id: cq.id,
      chat_id: ChatId(message.chat.id),
      message: message.reference(),
      actor: cq.from.into(),
      token,
    }));
  }

  let message = update.message?;
  let command = Command::parse(message.text.as_deref()?, bot_username)?;
  Some(Event::Command(CommandEvent {
    chat_id: ChatId(message.chat.id),
    actor: message.from.map(Into::into),
    command,
  }))
}

/// Route one update to the coordinator.
pub async fn dispatch<S, T>(coordinator: &Coordinator<S, T>, update: Update)
where
  S: RosterStore,
  T: Transport,
{
  let update_id = update.update_id;
  match to_event(update, coordinator.bot_username()) {
    Some(Event::Command(event)) => coordinator.handle_command(event).await,
    Some(Event::Button(press)) => coordinator.handle_button(press).await,
    None => trace!(update_id, "update ignored"),
  }
  debug!(update_id, "update handled");
}

#[cfg(test)]
mod tests {
  use carpool_core::roster::{ActorId, MessageId, MessageRef};
  use serde_json::json;

  use super::*;

  const BOT: &str = "car_organizer_bot";

  fn update(value: serde_json::Value) -> Update {
    serde_json::from_value(value).unwrap()
  }

  #[test]
  fn text_command_becomes_command_event() {
    let u = update(json!({
      "update_id": 1,
      "message": {
        "message_id": 10,
        "chat": { "id": -1001 },
        "from": { "id": 7, "first_name": "Alice", "last_name": "Liddell" },
        "text": "/trip@car_organizer_bot Beach"
      }
    }));

    let Some(Event::Command(event)) = to_event(u, BOT) else {
      panic!("expected a command");
    };
    assert_eq!(event.chat_id, ChatId(-1001));
    assert_eq!(event.command, Command::Trip(Some("Beach".into())));
    let actor = event.actor.unwrap();
    assert_eq!(actor.id, ActorId(7));
    assert_eq!(actor.last_name.as_deref(), Some("Liddell"));
  }

  #[test]
  fn message_without_sender_keeps_command() {
    let u = update(json!({
      "update_id": 2,
      "message": { "message_id": 11, "chat": { "id": -1001 }, "text": "/seats 3" }
    }));
    let Some(Event::Command(event)) = to_event(u, BOT) else {
      panic!("expected a command");
    };
    assert!(event.actor.is_none());
    assert_eq!(event.command, Command::Seats(Some(3)));
  }

  #[test]
  fn plain_chatter_is_ignored() {
    let u = update(json!({
      "update_id": 3,
      "message": { "message_id": 12, "chat": { "id": -1001 }, "text": "see you there" }
    }));
    assert_eq!(to_event(u, BOT), None);

    let u = update(json!({
      "update_id": 4,
      "message": { "message_id": 13, "chat": { "id": -1001 } }
    }));
    assert_eq!(to_event(u, BOT), None);
  }

  #[test]
  fn button_press_becomes_button_event() {
    let u = update(json!({
      "update_id": 5,
      "callback_query": {
        "id": "cb-1",
        "from": { "id": 8, "username": "bob" },
        "message": { "message_id": 14, "chat": { "id": -1001 } },
        "data": "join_2"
      }
    }));
    let Some(Event::Button(press)) = to_event(u, BOT) else {
      panic!("expected a button press");
    };
    assert_eq!(press.callback_id, "cb-1");
    assert_eq!(
      press.message,
      MessageRef { chat_id: ChatId(-1001), message_id: MessageId(14) }
    );
    assert_eq!(press.token, "join_2");
    assert_eq!(press.actor.handle.as_deref(), Some("bob"));
  }

  #[test]
  fn button_press_without_message_is_ignored() {
    let u = update(json!({
      "update_id": 6,
      "callback_query": { "id": "cb-2", "from": { "id": 8 }, "data": "join_2" }
    }));
    assert_eq!(to_event(u, BOT), None);
  }
}
