//! The roster model: trips, cars, passengers and the read projections the
//! renderer consumes.
//!
//! Trips and cars are append-only. A passenger row exists at most once per
//! (actor, trip); moving between cars rewrites its car reference.

use std::fmt;

// ─── Identifiers ─────────────────────────────────────────────────────────────

macro_rules! id_type {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct $name(pub i64);

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
      }
    }
  };
}

id_type!(
  /// Store-assigned trip identity.
  TripId
);
id_type!(
  /// Store-assigned car identity.
  CarId
);
id_type!(
  /// Transport-assigned user identity.
  ActorId
);
id_type!(
  /// Transport-assigned chat (group) identity.
  ChatId
);
id_type!(
  /// Transport-assigned message identity, unique within a chat.
  MessageId
);

/// Where a trip's live view is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
  pub chat_id:    ChatId,
  pub message_id: MessageId,
}

// ─── Entities ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
  pub trip_id: TripId,
  /// The group the trip was created in.
  pub chat_id: ChatId,
  /// Only ever one reference; re-attaching replaces it.
  pub view:    Option<MessageRef>,
  pub name:    String,
}

/// One row of the per-trip car listing, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarListing {
  pub car_id:   CarId,
  pub name:     String,
  pub capacity: Option<u32>,
}

/// One row of the per-trip passenger listing, ordered by car name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassengerListing {
  pub passenger_name: String,
  pub car_name:       String,
  pub car_capacity:   Option<u32>,
}

/// Everything the renderer needs for one trip, read in one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripRoster {
  pub trip:       Trip,
  pub cars:       Vec<CarListing>,
  pub passengers: Vec<PassengerListing>,
}

// ─── Mutation outcomes ───────────────────────────────────────────────────────

/// Result of a car registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterCar {
  Registered(CarId),
  /// The trip does not exist, or belongs to another chat.
  TripNotFound,
  AlreadyRegistered,
}

/// Result of setting a car's capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityUpdate {
  Updated { car_id: CarId, trip_id: TripId },
  NoCar,
}

/// Result of joining a car.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinCar {
  Created { trip_id: TripId },
  Moved { trip_id: TripId, from: CarId },
  Unchanged { trip_id: TripId },
  CarNotFound,
}

impl JoinCar {
  /// The trip whose view must be republished, if the roster changed.
  pub fn changed_trip(&self) -> Option<TripId> {
    match *self {
      JoinCar::Created { trip_id } | JoinCar::Moved { trip_id, .. } => {
        Some(trip_id)
      }
      JoinCar::Unchanged { .. } | JoinCar::CarNotFound => None,
    }
  }
}
