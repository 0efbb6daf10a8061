//! Integration tests for `SqliteStore` against an in-memory database.

use carpool_core::{
  render::render,
  roster::{
    ActorId, CapacityUpdate, CarId, ChatId, JoinCar, MessageId, MessageRef,
    RegisterCar, TripId,
  },
  store::RosterStore,
};

use crate::SqliteStore;

const GROUP: ChatId = ChatId(-1001);
const OTHER_GROUP: ChatId = ChatId(-1002);
const ALICE: ActorId = ActorId(10);
const BOB: ActorId = ActorId(20);
const CAROL: ActorId = ActorId(30);

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn car(s: &SqliteStore, trip_id: TripId, actor: ActorId, name: &str) -> CarId {
  match s.register_car(GROUP, trip_id, actor, name.into()).await.unwrap() {
    RegisterCar::Registered(id) => id,
    other => panic!("expected a new car, got {other:?}"),
  }
}

// ─── Trips ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_trip() {
  let s = store().await;
  let trip_id = s.create_trip(GROUP, "Beach".into()).await.unwrap();

  let trip = s.get_trip(trip_id).await.unwrap().unwrap();
  assert_eq!(trip.trip_id, trip_id);
  assert_eq!(trip.chat_id, GROUP);
  assert_eq!(trip.name, "Beach");
  assert_eq!(trip.view, None);
}

#[tokio::test]
async fn get_missing_trip_returns_none() {
  let s = store().await;
  assert!(s.get_trip(TripId(99)).await.unwrap().is_none());
  assert!(s.snapshot(TripId(99)).await.unwrap().is_none());
}

#[tokio::test]
async fn attach_message_replaces_previous_reference() {
  let s = store().await;
  let trip_id = s.create_trip(GROUP, "Beach".into()).await.unwrap();

  let first = MessageRef { chat_id: GROUP, message_id: MessageId(5) };
  let second = MessageRef { chat_id: GROUP, message_id: MessageId(8) };
  s.attach_message(trip_id, first).await.unwrap();
  s.attach_message(trip_id, second).await.unwrap();

  let trip = s.get_trip(trip_id).await.unwrap().unwrap();
  assert_eq!(trip.view, Some(second));
}

// ─── Cars ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn second_car_for_same_actor_is_rejected() {
  let s = store().await;
  let trip_id = s.create_trip(GROUP, "Beach".into()).await.unwrap();
  car(&s, trip_id, ALICE, "alice").await;

  let again = s
    .register_car(GROUP, trip_id, ALICE, "alice".into())
    .await
    .unwrap();
  assert_eq!(again, RegisterCar::AlreadyRegistered);
  assert_eq!(s.list_cars(trip_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn same_actor_may_drive_in_different_trips() {
  let s = store().await;
  let beach = s.create_trip(GROUP, "Beach".into()).await.unwrap();
  let hills = s.create_trip(GROUP, "Hills".into()).await.unwrap();

  let a = car(&s, beach, ALICE, "alice").await;
  let b = car(&s, hills, ALICE, "alice").await;
  assert_ne!(a, b);
}

#[tokio::test]
async fn car_needs_trip_in_the_same_chat() {
  let s = store().await;
  let trip_id = s.create_trip(GROUP, "Beach".into()).await.unwrap();

  let elsewhere = s
    .register_car(OTHER_GROUP, trip_id, ALICE, "alice".into())
    .await
    .unwrap();
  assert_eq!(elsewhere, RegisterCar::TripNotFound);

  let missing = s
    .register_car(GROUP, TripId(404), ALICE, "alice".into())
    .await
    .unwrap();
  assert_eq!(missing, RegisterCar::TripNotFound);
  assert!(s.list_cars(trip_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn cars_are_listed_in_insertion_order() {
  let s = store().await;
  let trip_id = s.create_trip(GROUP, "Beach".into()).await.unwrap();
  car(&s, trip_id, ALICE, "zed").await;
  car(&s, trip_id, BOB, "amy").await;

  let names: Vec<String> = s
    .list_cars(trip_id)
    .await
    .unwrap()
    .into_iter()
    .map(|c| c.name)
    .collect();
  assert_eq!(names, ["zed", "amy"]);
}

#[tokio::test]
async fn capacity_targets_most_recent_car_in_chat() {
  let s = store().await;
  let beach = s.create_trip(GROUP, "Beach".into()).await.unwrap();
  let hills = s.create_trip(GROUP, "Hills".into()).await.unwrap();
  car(&s, beach, ALICE, "alice").await;
  let newest = car(&s, hills, ALICE, "alice").await;

  let update = s.set_car_capacity(GROUP, ALICE, 3).await.unwrap();
  assert_eq!(update, CapacityUpdate::Updated { car_id: newest, trip_id: hills });

  assert_eq!(s.list_cars(hills).await.unwrap()[0].capacity, Some(3));
  assert_eq!(s.list_cars(beach).await.unwrap()[0].capacity, None);
}

#[tokio::test]
async fn capacity_without_car_in_chat() {
  let s = store().await;
  let trip_id = s.create_trip(OTHER_GROUP, "Beach".into()).await.unwrap();
  s.register_car(OTHER_GROUP, trip_id, ALICE, "alice".into())
    .await
    .unwrap();

  let update = s.set_car_capacity(GROUP, ALICE, 3).await.unwrap();
  assert_eq!(update, CapacityUpdate::NoCar);
}

// ─── Passengers ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn join_creates_then_noops() {
  let s = store().await;
  let trip_id = s.create_trip(GROUP, "Beach".into()).await.unwrap();
  let car_id = car(&s, trip_id, ALICE, "alice").await;

  let first = s.join_car(car_id, BOB, "bob".into()).await.unwrap();
  assert_eq!(first, JoinCar::Created { trip_id });

  let second = s.join_car(car_id, BOB, "bob".into()).await.unwrap();
  assert_eq!(second, JoinCar::Unchanged { trip_id });

  assert_eq!(s.list_passengers(trip_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn switching_cars_moves_the_existing_row() {
  let s = store().await;
  let trip_id = s.create_trip(GROUP, "Beach".into()).await.unwrap();
  let alice_car = car(&s, trip_id, ALICE, "alice").await;
  let carol_car = car(&s, trip_id, CAROL, "carol").await;

  s.join_car(alice_car, BOB, "bob".into()).await.unwrap();
  let moved = s.join_car(carol_car, BOB, "bob".into()).await.unwrap();
  assert_eq!(moved, JoinCar::Moved { trip_id, from: alice_car });

  let passengers = s.list_passengers(trip_id).await.unwrap();
  assert_eq!(passengers.len(), 1);
  assert_eq!(passengers[0].passenger_name, "bob");
  assert_eq!(passengers[0].car_name, "carol");
}

#[tokio::test]
async fn seats_are_per_trip() {
  let s = store().await;
  let beach = s.create_trip(GROUP, "Beach".into()).await.unwrap();
  let hills = s.create_trip(GROUP, "Hills".into()).await.unwrap();
  let beach_car = car(&s, beach, ALICE, "alice").await;
  let hills_car = car(&s, hills, ALICE, "alice").await;

  assert_eq!(
    s.join_car(beach_car, BOB, "bob".into()).await.unwrap(),
    JoinCar::Created { trip_id: beach }
  );
  assert_eq!(
    s.join_car(hills_car, BOB, "bob".into()).await.unwrap(),
    JoinCar::Created { trip_id: hills }
  );
  assert_eq!(s.list_passengers(beach).await.unwrap().len(), 1);
  assert_eq!(s.list_passengers(hills).await.unwrap().len(), 1);
}

#[tokio::test]
async fn join_missing_car() {
  let s = store().await;
  let outcome = s.join_car(CarId(77), BOB, "bob".into()).await.unwrap();
  assert_eq!(outcome, JoinCar::CarNotFound);
}

#[tokio::test]
async fn joining_past_capacity_is_allowed() {
  let s = store().await;
  let trip_id = s.create_trip(GROUP, "Beach".into()).await.unwrap();
  let car_id = car(&s, trip_id, ALICE, "alice").await;
  s.set_car_capacity(GROUP, ALICE, 1).await.unwrap();

  s.join_car(car_id, BOB, "bob".into()).await.unwrap();
  let outcome = s.join_car(car_id, CAROL, "carol".into()).await.unwrap();
  assert_eq!(outcome, JoinCar::Created { trip_id });
  assert_eq!(s.list_passengers(trip_id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn passengers_are_ordered_by_car_name() {
  let s = store().await;
  let trip_id = s.create_trip(GROUP, "Beach".into()).await.unwrap();
  let zed = car(&s, trip_id, ALICE, "zed").await;
  let amy = car(&s, trip_id, BOB, "amy").await;

  s.join_car(zed, ActorId(1), "p1".into()).await.unwrap();
  s.join_car(amy, ActorId(2), "p2".into()).await.unwrap();
  s.join_car(zed, ActorId(3), "p3".into()).await.unwrap();

  let order: Vec<(String, String)> = s
    .list_passengers(trip_id)
    .await
    .unwrap()
    .into_iter()
    .map(|p| (p.car_name, p.passenger_name))
    .collect();
  assert_eq!(
    order,
    [
      ("amy".to_string(), "p2".to_string()),
      ("zed".to_string(), "p1".to_string()),
      ("zed".to_string(), "p3".to_string()),
    ]
  );
}

// ─── Rename ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn rename_reaches_every_row_and_reports_trips() {
  let s = store().await;
  let beach = s.create_trip(GROUP, "Beach".into()).await.unwrap();
  let hills = s.create_trip(OTHER_GROUP, "Hills".into()).await.unwrap();
  let lake = s.create_trip(GROUP, "Lake".into()).await.unwrap();

  // Bob drives at the beach and rides in the hills; the lake has no Bob.
  let bob_car = car(&s, beach, BOB, "bob").await;
  let alice_car = s
    .register_car(OTHER_GROUP, hills, ALICE, "alice".into())
    .await
    .unwrap();
  let RegisterCar::Registered(alice_car) = alice_car else {
    panic!("expected a new car");
  };
  s.join_car(alice_car, BOB, "bob".into()).await.unwrap();
  s.join_car(bob_car, BOB, "bob".into()).await.unwrap();
  car(&s, lake, CAROL, "carol").await;

  let trips = s.rename_actor(BOB, "Robert".into()).await.unwrap();
  assert_eq!(trips, [beach, hills]);

  assert_eq!(s.list_cars(beach).await.unwrap()[0].name, "Robert");
  for trip in [beach, hills] {
    let passengers = s.list_passengers(trip).await.unwrap();
    assert!(passengers.iter().all(|p| p.passenger_name == "Robert"));
  }
  assert_eq!(s.list_cars(lake).await.unwrap()[0].name, "carol");
}

#[tokio::test]
async fn rename_unknown_actor_touches_nothing() {
  let s = store().await;
  let trips = s.rename_actor(ActorId(5), "ghost".into()).await.unwrap();
  assert!(trips.is_empty());
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn snapshot_renders_beach_scenario() {
  let s = store().await;
  let trip_id = s.create_trip(GROUP, "Beach".into()).await.unwrap();
  let car_id = car(&s, trip_id, ALICE, "Alice").await;

  let view = render(&s.snapshot(trip_id).await.unwrap().unwrap());
  assert!(view.text.contains("🚙 <b>Alice</b> [0/5]"));
  assert_eq!(view.actions.len(), 2);
  assert_eq!(view.actions[0].label, "Join Alice");
  assert_eq!(view.actions[1].label, "Add 🚙");

  s.join_car(car_id, BOB, "B".into()).await.unwrap();
  let view = render(&s.snapshot(trip_id).await.unwrap().unwrap());
  assert!(view.text.contains("🚙 <b>Alice</b> [1/5] :\n- B\n"));

  s.set_car_capacity(GROUP, ALICE, 1).await.unwrap();
  let snapshot = s.snapshot(trip_id).await.unwrap().unwrap();
  let view = render(&snapshot);
  assert!(view.text.contains("🚗 <b>Alice</b> [1/1] 🚫"));
  assert_eq!(view, render(&s.snapshot(trip_id).await.unwrap().unwrap()));
}

#[tokio::test]
async fn reopening_a_file_keeps_the_roster() {
  let dir = std::env::temp_dir().join(format!(
    "carpool-store-test-{}-{:?}",
    std::process::id(),
    std::thread::current().id()
  ));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("roster.sqlite");
  let _ = std::fs::remove_file(&path);

  let trip_id = {
    let s = SqliteStore::open(&path).await.unwrap();
    let trip_id = s.create_trip(GROUP, "Beach".into()).await.unwrap();
    car(&s, trip_id, ALICE, "alice").await;
    trip_id
  };

  let s = SqliteStore::open(&path).await.unwrap();
  let cars = s.list_cars(trip_id).await.unwrap();
  assert_eq!(cars.len(), 1);
  assert_eq!(cars[0].name, "alice");

  let _ = std::fs::remove_dir_all(&dir);
}
