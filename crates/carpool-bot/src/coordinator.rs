//! The synchronization coordinator.
//!
//! Each inbound intent is applied to the roster store in one transaction;
//! only when that succeeds is the trip re-rendered and pushed to its live
//! view. Storage failures become a notice to the requester. Republishing
//! failures are logged and otherwise ignored: the roster is already correct
//! and the next successful re-render brings the view back in line.
//!
//! There is no lock here. The store's single connection serializes writes,
//! so a view can lag one overlapping mutation behind at worst.

use std::sync::Arc;

use carpool_core::{
  Error, Result,
  action::ActionToken,
  command::Command,
  event::{ActorProfile, ButtonPress, CommandEvent},
  render::{View, initial_view, render},
  roster::{
    CapacityUpdate, CarId, ChatId, JoinCar, MessageRef, RegisterCar, Trip,
    TripId,
  },
  rules::{resolve_display_name, validate_capacity},
  store::RosterStore,
  transport::Transport,
};
use tracing::{debug, error, info, warn};

const TRIP_USAGE: &str = "Please send the command as /trip [name of the trip]";
const SEATS_USAGE: &str = "Please send the command as /seats [number of seats]";
const NAME_USAGE: &str =
  "Please send the command as /name [new name], using letters and digits only";
const NO_USER_ID: &str = "Operation not completed, no user id found.";
const GREETING: &str = "Hello I'm car organizer bot!";

pub struct Coordinator<S, T> {
  store:        Arc<S>,
  transport:    Arc<T>,
  bot_username: Arc<str>,
}

impl<S, T> Clone for Coordinator<S, T> {
  fn clone(&self) -> Self {
    Self {
      store:        Arc::clone(&self.store),
      transport:    Arc::clone(&self.transport),
      bot_username: Arc::clone(&self.bot_username),
    }
  }
}

impl<S, T> Coordinator<S, T>
where
  S: RosterStore,
  T: Transport,
{
  pub fn new(store: Arc<S>, transport: Arc<T>, bot_username: &str) -> Self {
    Self { store, transport, bot_username: Arc::from(bot_username) }
  }

  /// Username used to recognise `/command@username` in group chats.
  pub fn bot_username(&self) -> &str { &self.bot_username }

  pub fn store(&self) -> &S { &self.store }

  // ── Entry points ──────────────────────────────────────────────────────────

  /// Handle a text command. Never fails: errors become notices in the chat.
  pub async fn handle_command(&self, event: CommandEvent) {
    let CommandEvent { chat_id, actor, command } = event;
    debug!(%chat_id, ?command, "command received");

    let result = match command {
      Command::Start => {
        self.notify(chat_id, GREETING).await;
        Ok(())
      }
      Command::Help => {
        self.notify(chat_id, &self.help_text()).await;
        Ok(())
      }
      Command::Trip(name) => self.create_trip(chat_id, name).await.map(drop),
      Command::Seats(seats) => self.set_capacity(chat_id, actor, seats).await,
      Command::Name(name) => self.rename(chat_id, actor, name).await,
    };

    if let Err(e) = result {
      self.report(chat_id, e).await;
    }
  }

  /// Handle a button press. The press is always acknowledged.
  pub async fn handle_button(&self, press: ButtonPress) {
    debug!(chat_id = %press.chat_id, token = %press.token, "button pressed");

    let result = match ActionToken::parse(&press.token) {
      Some(ActionToken::AddCar(trip_id)) => self.add_car(&press, trip_id).await,
      Some(ActionToken::Join(car_id)) => self.join_car(&press, car_id).await,
      None => {
        warn!(token = %press.token, "ignoring unknown action token");
        Ok(())
      }
    };

    if let Err(e) = self.transport.answer_button(&press.callback_id).await {
      warn!(error = %e, "button press not acknowledged");
    }

    if let Err(e) = result {
      self.report(press.chat_id, e).await;
    }
  }

  // ── Intents ───────────────────────────────────────────────────────────────

  /// Create a trip and post its initial view.
  pub async fn create_trip(
    &self,
    chat_id: ChatId,
    name: Option<String>,
  ) -> Result<TripId> {
    let name = name.ok_or_else(|| Error::Validation(TRIP_USAGE.to_string()))?;

    let trip_id = self
      .store
      .create_trip(chat_id, name.clone())
      .await
      .map_err(Error::persistence)?;
    info!(%trip_id, %chat_id, "trip created");

    let view = initial_view(trip_id, &name);
    match self
      .transport
      .send_message(chat_id, &view.text, &view.actions)
      .await
    {
      Ok(message_id) => {
        let view_ref = MessageRef { chat_id, message_id };
        if let Err(e) = self.store.attach_message(trip_id, view_ref).await {
          warn!(%trip_id, error = %e, "trip view posted but not recorded");
        }
      }
      Err(e) => {
        warn!(%trip_id, error = %e, "trip view could not be posted");
      }
    }

    Ok(trip_id)
  }

  async fn set_capacity(
    &self,
    chat_id: ChatId,
    actor: Option<ActorProfile>,
    seats: Option<u32>,
  ) -> Result<()> {
    let actor = require_actor(actor)?;
    let seats = seats.ok_or_else(|| Error::Validation(SEATS_USAGE.to_string()))?;
    let seats = validate_capacity(seats)?;

    match self
      .store
      .set_car_capacity(chat_id, actor.id, seats)
      .await
      .map_err(Error::persistence)?
    {
      CapacityUpdate::NoCar => Err(Error::NotFound("car")),
      CapacityUpdate::Updated { car_id, trip_id } => {
        info!(%car_id, %trip_id, seats, "capacity set");
        self.publish(trip_id, None).await;
        Ok(())
      }
    }
  }

  async fn rename(
    &self,
    chat_id: ChatId,
    actor: Option<ActorProfile>,
    name: Option<String>,
  ) -> Result<()> {
    let actor = require_actor(actor)?;
    let name = name.ok_or_else(|| Error::Validation(NAME_USAGE.to_string()))?;

    let trips = self
      .store
      .rename_actor(actor.id, name.clone())
      .await
      .map_err(Error::persistence)?;
    info!(actor_id = %actor.id, trips = trips.len(), "actor renamed");

    for trip_id in trips {
      self.publish(trip_id, None).await;
    }

    self
      .notify(chat_id, &format!("Ok, I've updated your name in every trip to {name}"))
      .await;
    Ok(())
  }

  async fn add_car(&self, press: &ButtonPress, trip_id: TripId) -> Result<()> {
    let name = resolve_display_name(&press.actor);

    match self
      .store
      .register_car(press.chat_id, trip_id, press.actor.id, name)
      .await
      .map_err(Error::persistence)?
    {
      RegisterCar::TripNotFound => Err(Error::NotFound("trip")),
      RegisterCar::AlreadyRegistered => Err(Error::Conflict),
      RegisterCar::Registered(car_id) => {
        info!(%car_id, %trip_id, actor_id = %press.actor.id, "car registered");
        self.publish(trip_id, Some(press.message)).await;
        Ok(())
      }
    }
  }

  async fn join_car(&self, press: &ButtonPress, car_id: CarId) -> Result<()> {
    let name = resolve_display_name(&press.actor);

    let outcome = self
      .store
      .join_car(car_id, press.actor.id, name)
      .await
      .map_err(Error::persistence)?;

    if outcome == JoinCar::CarNotFound {
      return Err(Error::NotFound("car"));
    }
    match outcome.changed_trip() {
      Some(trip_id) => {
        info!(%car_id, %trip_id, actor_id = %press.actor.id, ?outcome, "seat taken");
        self.publish(trip_id, Some(press.message)).await;
      }
      None => debug!(%car_id, actor_id = %press.actor.id, "already seated"),
    }
    Ok(())
  }

  // ── Rendering and republishing ────────────────────────────────────────────

  /// Render the current view of a trip.
  pub async fn render_trip(&self, trip_id: TripId) -> Result<(Trip, View)> {
    let roster = self
      .store
      .snapshot(trip_id)
      .await
      .map_err(Error::persistence)?
      .ok_or(Error::NotFound("trip"))?;
    let view = render(&roster);
    Ok((roster.trip, view))
  }

  /// Push the trip's view to its recorded message, or to `fallback` when the
  /// trip has none. Failures are logged only.
  async fn publish(&self, trip_id: TripId, fallback: Option<MessageRef>) {
    if let Err(e) = self.try_publish(trip_id, fallback).await {
      warn!(%trip_id, error = %e, "view not republished");
    }
  }

  async fn try_publish(
    &self,
    trip_id: TripId,
    fallback: Option<MessageRef>,
  ) -> Result<()> {
    let (trip, view) = self.render_trip(trip_id).await?;
    let Some(target) = trip.view.or(fallback) else {
      warn!(%trip_id, "trip has no view message");
      return Ok(());
    };
    self
      .transport
      .edit_message(target, &view.text, &view.actions)
      .await
      .map_err(Error::publish)
  }

  // ── Notices ───────────────────────────────────────────────────────────────

  async fn report(&self, chat_id: ChatId, err: Error) {
    match &err {
      Error::Persistence(_) => error!(%chat_id, error = %err, "intent failed"),
      Error::Publish(_) => warn!(%chat_id, error = %err, "intent not published"),
      _ => info!(%chat_id, error = %err, "intent rejected"),
    }
    if let Some(notice) = err.notice() {
      self.notify(chat_id, &notice).await;
    }
  }

  async fn notify(&self, chat_id: ChatId, text: &str) {
    if let Err(e) = self.transport.send_message(chat_id, text, &[]).await {
      warn!(%chat_id, error = %e, "notice not delivered");
    }
  }

  fn help_text(&self) -> String {
    let bot = &self.bot_username;
    format!(
      "{GREETING}
I'm here to help you organize an easy trip with your friends!

Steps:
    1. Add @{bot} to your group of friends
    2. Write <code>/trip name_of_the_trip</code> in the group
    3. Click on the Add Car button to make your car available for your friends
    4. Click on the car of a friend if you want to jump in
    5. You can customize the number of seats by typing <code>/seats 4</code>
    6. You can change the name you appear under with <code>/name NewName</code>
    7. When every member is in a car you are ready to go!"
    )
  }
}

fn require_actor(actor: Option<ActorProfile>) -> Result<ActorProfile> {
  actor.ok_or_else(|| Error::Validation(NO_USER_ID.to_string()))
}
