//! [`SqliteStore`]: the SQLite implementation of [`RosterStore`].

use std::path::Path;

use carpool_core::{
  roster::{
    ActorId, CapacityUpdate, CarId, CarListing, ChatId, JoinCar, MessageRef,
    PassengerListing, RegisterCar, Trip, TripId, TripRoster,
  },
  rules::{JoinPlan, plan_join},
  store::RosterStore,
};
use rusqlite::{OptionalExtension as _, TransactionBehavior};

use crate::{
  Result,
  encode::{RawCar, RawPassenger, RawTrip, encode_capacity},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A roster store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Shared queries ──────────────────────────────────────────────────────────

fn query_trip(
  conn: &rusqlite::Connection,
  trip_id: i64,
) -> rusqlite::Result<Option<RawTrip>> {
  conn
    .query_row(
      &format!("SELECT {} FROM trip WHERE id = ?1", RawTrip::COLUMNS),
      rusqlite::params![trip_id],
      RawTrip::from_row,
    )
    .optional()
}

fn query_cars(
  conn: &rusqlite::Connection,
  trip_id: i64,
) -> rusqlite::Result<Vec<RawCar>> {
  let mut stmt = conn.prepare_cached(
    "SELECT id, name, max_passengers FROM car WHERE trip_id = ?1 ORDER BY id",
  )?;
  let rows = stmt
    .query_map(rusqlite::params![trip_id], RawCar::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn query_passengers(
  conn: &rusqlite::Connection,
  trip_id: i64,
) -> rusqlite::Result<Vec<RawPassenger>> {
  let mut stmt = conn.prepare_cached(
    "SELECT p.name, c.name, c.max_passengers
     FROM passenger p
     JOIN car c ON c.id = p.car_id
     WHERE c.trip_id = ?1
     ORDER BY c.name, c.id, p.id",
  )?;
  let rows = stmt
    .query_map(rusqlite::params![trip_id], RawPassenger::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

// ─── RosterStore impl ────────────────────────────────────────────────────────

impl RosterStore for SqliteStore {
  type Error = crate::Error;

  // ── Trips ─────────────────────────────────────────────────────────────────

  async fn create_trip(&self, chat_id: ChatId, name: String) -> Result<TripId> {
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO trip (chat_id, name) VALUES (?1, ?2)",
          rusqlite::params![chat_id.0, name],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(TripId(id))
  }

  async fn attach_message(&self, trip_id: TripId, view: MessageRef) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE trip SET view_chat_id = ?2, view_message_id = ?3 WHERE id = ?1",
          rusqlite::params![trip_id.0, view.chat_id.0, view.message_id.0],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_trip(&self, trip_id: TripId) -> Result<Option<Trip>> {
    let raw = self
      .conn
      .call(move |conn| Ok(query_trip(conn, trip_id.0)?))
      .await?;
    Ok(raw.map(RawTrip::into_trip))
  }

  // ── Cars ──────────────────────────────────────────────────────────────────

  async fn register_car(
    &self,
    chat_id:  ChatId,
    trip_id:  TripId,
    actor_id: ActorId,
    name:     String,
  ) -> Result<RegisterCar> {
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let trip_exists = tx
          .query_row(
            "SELECT 1 FROM trip WHERE id = ?1 AND chat_id = ?2",
            rusqlite::params![trip_id.0, chat_id.0],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if !trip_exists {
          return Ok(RegisterCar::TripNotFound);
        }

        let has_car = tx
          .query_row(
            "SELECT 1 FROM car WHERE trip_id = ?1 AND user_id = ?2",
            rusqlite::params![trip_id.0, actor_id.0],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if has_car {
          return Ok(RegisterCar::AlreadyRegistered);
        }

        tx.execute(
          "INSERT INTO car (trip_id, user_id, name) VALUES (?1, ?2, ?3)",
          rusqlite::params![trip_id.0, actor_id.0, name],
        )?;
        let car_id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(RegisterCar::Registered(CarId(car_id)))
      })
      .await?;
    Ok(outcome)
  }

  async fn set_car_capacity(
    &self,
    chat_id:  ChatId,
    actor_id: ActorId,
    capacity: u32,
  ) -> Result<CapacityUpdate> {
    let capacity = encode_capacity(capacity);

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        // Most recent car of this actor among all trips of the chat.
        let car: Option<(i64, i64)> = tx
          .query_row(
            "SELECT car.id, car.trip_id
             FROM car JOIN trip ON car.trip_id = trip.id
             WHERE car.user_id = ?1 AND trip.chat_id = ?2
             ORDER BY car.id DESC
             LIMIT 1",
            rusqlite::params![actor_id.0, chat_id.0],
            |r| Ok((r.get(0)?, r.get(1)?)),
          )
          .optional()?;
        let Some((car_id, trip_id)) = car else {
          return Ok(CapacityUpdate::NoCar);
        };

        tx.execute(
          "UPDATE car SET max_passengers = ?2 WHERE id = ?1",
          rusqlite::params![car_id, capacity],
        )?;
        tx.commit()?;
        Ok(CapacityUpdate::Updated {
          car_id:  CarId(car_id),
          trip_id: TripId(trip_id),
        })
      })
      .await?;
    Ok(outcome)
  }

  // ── Passengers ────────────────────────────────────────────────────────────

  async fn join_car(
    &self,
    car_id:   CarId,
    actor_id: ActorId,
    name:     String,
  ) -> Result<JoinCar> {
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let trip_id: Option<i64> = tx
          .query_row(
            "SELECT trip_id FROM car WHERE id = ?1",
            rusqlite::params![car_id.0],
            |r| r.get(0),
          )
          .optional()?;
        let Some(trip_id) = trip_id else {
          return Ok(JoinCar::CarNotFound);
        };

        let seat: Option<(i64, i64)> = tx
          .query_row(
            "SELECT id, car_id FROM passenger WHERE user_id = ?1 AND trip_id = ?2",
            rusqlite::params![actor_id.0, trip_id],
            |r| Ok((r.get(0)?, r.get(1)?)),
          )
          .optional()?;

        let current = seat.map(|(_, car)| CarId(car));
        let outcome = match plan_join(current, car_id) {
          JoinPlan::Noop => {
            return Ok(JoinCar::Unchanged { trip_id: TripId(trip_id) });
          }
          JoinPlan::Create => {
            tx.execute(
              "INSERT INTO passenger (car_id, trip_id, user_id, name)
               VALUES (?1, ?2, ?3, ?4)",
              rusqlite::params![car_id.0, trip_id, actor_id.0, name],
            )?;
            JoinCar::Created { trip_id: TripId(trip_id) }
          }
          JoinPlan::Move { from } => {
            let passenger_id = seat.map(|(id, _)| id);
            tx.execute(
              "UPDATE passenger SET car_id = ?2 WHERE id = ?1",
              rusqlite::params![passenger_id, car_id.0],
            )?;
            JoinCar::Moved { trip_id: TripId(trip_id), from }
          }
        };
        tx.commit()?;
        Ok(outcome)
      })
      .await?;
    Ok(outcome)
  }

  // ── Actors ────────────────────────────────────────────────────────────────

  async fn rename_actor(&self, actor_id: ActorId, name: String) -> Result<Vec<TripId>> {
    let trips = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
          "UPDATE passenger SET name = ?2 WHERE user_id = ?1",
          rusqlite::params![actor_id.0, name],
        )?;
        tx.execute(
          "UPDATE car SET name = ?2 WHERE user_id = ?1",
          rusqlite::params![actor_id.0, name],
        )?;

        let trips = {
          let mut stmt = tx.prepare(
            "SELECT trip_id FROM car WHERE user_id = ?1
             UNION
             SELECT trip_id FROM passenger WHERE user_id = ?1
             ORDER BY trip_id",
          )?;
          let rows = stmt
            .query_map(rusqlite::params![actor_id.0], |r| r.get::<_, i64>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          rows
        };

        tx.commit()?;
        Ok(trips)
      })
      .await?;
    Ok(trips.into_iter().map(TripId).collect())
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_cars(&self, trip_id: TripId) -> Result<Vec<CarListing>> {
    let raws = self
      .conn
      .call(move |conn| Ok(query_cars(conn, trip_id.0)?))
      .await?;
    raws.into_iter().map(RawCar::into_listing).collect()
  }

  async fn list_passengers(&self, trip_id: TripId) -> Result<Vec<PassengerListing>> {
    let raws = self
      .conn
      .call(move |conn| Ok(query_passengers(conn, trip_id.0)?))
      .await?;
    raws.into_iter().map(RawPassenger::into_listing).collect()
  }

  async fn snapshot(&self, trip_id: TripId) -> Result<Option<TripRoster>> {
    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let Some(trip) = query_trip(&tx, trip_id.0)? else {
          return Ok(None);
        };
        let cars = query_cars(&tx, trip_id.0)?;
        let passengers = query_passengers(&tx, trip_id.0)?;
        tx.commit()?;
        Ok(Some((trip, cars, passengers)))
      })
      .await?;

    let Some((trip, cars, passengers)) = raw else {
      return Ok(None);
    };

    Ok(Some(TripRoster {
      trip:       trip.into_trip(),
      cars:       cars
        .into_iter()
        .map(RawCar::into_listing)
        .collect::<Result<_>>()?,
      passengers: passengers
        .into_iter()
        .map(RawPassenger::into_listing)
        .collect::<Result<_>>()?,
    }))
  }
}
