//! SQL schema for the roster store.
//!
//! Executed every time a connection is opened.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS trip (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    chat_id         INTEGER NOT NULL,
    view_chat_id    INTEGER,           -- live view location, replaced on re-attach
    view_message_id INTEGER,
    name            TEXT    NOT NULL
);

-- One car per driver per trip.
CREATE TABLE IF NOT EXISTS car (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    trip_id        INTEGER NOT NULL REFERENCES trip(id),
    user_id        INTEGER NOT NULL,
    name           TEXT    NOT NULL,
    max_passengers INTEGER CHECK (max_passengers IS NULL OR max_passengers > 0),
    UNIQUE (trip_id, user_id)
);

-- trip_id is copied from the car at insert time so that one seat per actor
-- per trip is a plain key, not a join.
CREATE TABLE IF NOT EXISTS passenger (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    car_id  INTEGER NOT NULL REFERENCES car(id),
    trip_id INTEGER NOT NULL REFERENCES trip(id),
    user_id INTEGER NOT NULL,
    name    TEXT    NOT NULL,
    UNIQUE (user_id, trip_id)
);

CREATE INDEX IF NOT EXISTS trip_chat_idx      ON trip(chat_id);
CREATE INDEX IF NOT EXISTS car_user_idx       ON car(user_id);
CREATE INDEX IF NOT EXISTS passenger_car_idx  ON passenger(car_id);
CREATE INDEX IF NOT EXISTS passenger_trip_idx ON passenger(trip_id);

PRAGMA user_version = 1;
";
