//! Row types read inside connection closures and decoded into domain types
//! once back on the async side.

use carpool_core::roster::{
  CarId, CarListing, ChatId, MessageId, MessageRef, PassengerListing, Trip,
  TripId,
};

use crate::{Error, Result};

pub fn decode_capacity(raw: Option<i64>) -> Result<Option<u32>> {
  raw
    .map(|v| {
      u32::try_from(v)
        .ok()
        .filter(|c| *c > 0)
        .ok_or(Error::InvalidValue { column: "max_passengers", value: v })
    })
    .transpose()
}

pub fn encode_capacity(capacity: u32) -> i64 { i64::from(capacity) }

pub struct RawTrip {
  pub id:              i64,
  pub chat_id:         i64,
  pub view_chat_id:    Option<i64>,
  pub view_message_id: Option<i64>,
  pub name:            String,
}

impl RawTrip {
  pub const COLUMNS: &'static str =
    "id, chat_id, view_chat_id, view_message_id, name";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:              row.get(0)?,
      chat_id:         row.get(1)?,
      view_chat_id:    row.get(2)?,
      view_message_id: row.get(3)?,
      name:            row.get(4)?,
    })
  }

  pub fn into_trip(self) -> Trip {
    let view = match (self.view_chat_id, self.view_message_id) {
      (Some(chat_id), Some(message_id)) => Some(MessageRef {
        chat_id:    ChatId(chat_id),
        message_id: MessageId(message_id),
      }),
      _ => None,
    };
    Trip {
      trip_id: TripId(self.id),
      chat_id: ChatId(self.chat_id),
      view,
      name: self.name,
    }
  }
}

pub struct RawCar {
  pub id:             i64,
  pub name:           String,
  pub max_passengers: Option<i64>,
}

impl RawCar {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      name:           row.get(1)?,
      max_passengers: row.get(2)?,
    })
  }

  pub fn into_listing(self) -> Result<CarListing> {
    Ok(CarListing {
      car_id:   CarId(self.id),
      name:     self.name,
      capacity: decode_capacity(self.max_passengers)?,
    })
  }
}

pub struct RawPassenger {
  pub passenger_name: String,
  pub car_name:       String,
  pub max_passengers: Option<i64>,
}

impl RawPassenger {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      passenger_name: row.get(0)?,
      car_name:       row.get(1)?,
      max_passengers: row.get(2)?,
    })
  }

  pub fn into_listing(self) -> Result<PassengerListing> {
    Ok(PassengerListing {
      passenger_name: self.passenger_name,
      car_name:       self.car_name,
      car_capacity:   decode_capacity(self.max_passengers)?,
    })
  }
}
