//! The `RosterStore` trait.
//!
//! Implemented by storage backends (e.g. `carpool-store-sqlite`). Every
//! method is atomic against durable state. Expected domain conditions (a
//! missing trip, a duplicate car) come back as outcome enums; `Self::Error`
//! is reserved for storage faults.

use std::future::Future;

use crate::roster::{
  ActorId, CapacityUpdate, CarId, CarListing, ChatId, JoinCar, MessageRef,
  PassengerListing, RegisterCar, Trip, TripId, TripRoster,
};

pub trait RosterStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Trips ─────────────────────────────────────────────────────────────

  /// Insert a trip owned by `chat_id`, with no message reference yet.
  fn create_trip(
    &self,
    chat_id: ChatId,
    name: String,
  ) -> impl Future<Output = Result<TripId, Self::Error>> + Send + '_;

  /// Record where the trip's live view is rendered, replacing any previous
  /// reference.
  fn attach_message(
    &self,
    trip_id: TripId,
    view: MessageRef,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn get_trip(
    &self,
    trip_id: TripId,
  ) -> impl Future<Output = Result<Option<Trip>, Self::Error>> + Send + '_;

  // ── Cars ──────────────────────────────────────────────────────────────

  /// Register a car for `actor_id` in a trip of `chat_id`.
  ///
  /// At most one car per actor per trip.
  fn register_car(
    &self,
    chat_id: ChatId,
    trip_id: TripId,
    actor_id: ActorId,
    name: String,
  ) -> impl Future<Output = Result<RegisterCar, Self::Error>> + Send + '_;

  /// Set the capacity of the actor's most recently created car among the
  /// trips of `chat_id`.
  fn set_car_capacity(
    &self,
    chat_id: ChatId,
    actor_id: ActorId,
    capacity: u32,
  ) -> impl Future<Output = Result<CapacityUpdate, Self::Error>> + Send + '_;

  // ── Passengers ────────────────────────────────────────────────────────

  /// Put `actor_id` in `car_id`: creates their passenger row for the car's
  /// trip, moves the existing one, or does nothing if already seated there.
  fn join_car(
    &self,
    car_id: CarId,
    actor_id: ActorId,
    name: String,
  ) -> impl Future<Output = Result<JoinCar, Self::Error>> + Send + '_;

  // ── Actors ────────────────────────────────────────────────────────────

  /// Rename every car and passenger row of `actor_id`, in every trip.
  ///
  /// Returns the trips where the actor drives or rides, ascending.
  fn rename_actor(
    &self,
    actor_id: ActorId,
    name: String,
  ) -> impl Future<Output = Result<Vec<TripId>, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Cars of a trip in insertion order.
  fn list_cars(
    &self,
    trip_id: TripId,
  ) -> impl Future<Output = Result<Vec<CarListing>, Self::Error>> + Send + '_;

  /// Passengers of a trip ordered by car name.
  fn list_passengers(
    &self,
    trip_id: TripId,
  ) -> impl Future<Output = Result<Vec<PassengerListing>, Self::Error>> + Send + '_;

  /// Trip, cars and passengers read together. `None` if the trip is missing.
  fn snapshot(
    &self,
    trip_id: TripId,
  ) -> impl Future<Output = Result<Option<TripRoster>, Self::Error>> + Send + '_;
}
