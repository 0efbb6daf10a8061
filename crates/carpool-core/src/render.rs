//! The trip view: canonical text and action list for one roster.
//!
//! [`render`] is a pure function of a [`TripRoster`]. Text is grouped by car
//! name in ascending order, while the join buttons follow car insertion
//! order. Two cars sharing a name in one trip are merged into one group.

use std::collections::BTreeMap;

use crate::{
  action::ActionToken,
  roster::{CarId, TripId, TripRoster},
  rules::{effective_capacity, is_full},
};

const TRIP_GLYPH: &str = "📆";
const OPEN_GLYPH: &str = "🚙";
const FULL_GLYPH: &str = "🚗";
const BLOCKED_GLYPH: &str = "🚫";

/// A button on the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
  pub label: String,
  pub token: ActionToken,
}

impl Action {
  pub fn join(car_id: CarId, car_name: &str) -> Self {
    Self {
      label: format!("Join {car_name}"),
      token: ActionToken::Join(car_id),
    }
  }

  pub fn add_car(trip_id: TripId) -> Self {
    Self {
      label: format!("Add {OPEN_GLYPH}"),
      token: ActionToken::AddCar(trip_id),
    }
  }
}

/// Rendered trip view. `text` is HTML for the transport's HTML parse mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
  pub text:    String,
  pub actions: Vec<Action>,
}

struct CarGroup<'a> {
  capacity:   Option<u32>,
  passengers: Vec<&'a str>,
}

pub fn render(roster: &TripRoster) -> View {
  let mut text = title(&roster.trip.name);

  // Cars seed their group first so empty cars still show; the lowest-id car
  // carrying a name decides that group's capacity.
  let mut groups: BTreeMap<&str, CarGroup<'_>> = BTreeMap::new();
  for car in &roster.cars {
    groups.entry(car.name.as_str()).or_insert(CarGroup {
      capacity:   car.capacity,
      passengers: Vec::new(),
    });
  }
  for p in &roster.passengers {
    groups
      .entry(p.car_name.as_str())
      .or_insert(CarGroup { capacity: p.car_capacity, passengers: Vec::new() })
      .passengers
      .push(p.passenger_name.as_str());
  }

  for (name, group) in &groups {
    let count = group.passengers.len();
    let full = is_full(count, group.capacity);
    let glyph = if full { FULL_GLYPH } else { OPEN_GLYPH };
    let capacity = effective_capacity(group.capacity);

    let blocked = if full { BLOCKED_GLYPH } else { "" };
    text.push_str(&format!(
      "{glyph} <b>{}</b> [{count}/{capacity}] {blocked}:\n",
      escape_html(name)
    ));

    for passenger in &group.passengers {
      text.push_str(&format!("- {}\n", escape_html(passenger)));
    }
    text.push('\n');
  }

  let mut actions: Vec<Action> = roster
    .cars
    .iter()
    .map(|car| Action::join(car.car_id, &car.name))
    .collect();
  actions.push(Action::add_car(roster.trip.trip_id));

  View { text, actions }
}

/// The view sent when a trip is created: title and the add-car button.
pub fn initial_view(trip_id: TripId, name: &str) -> View {
  View { text: title(name), actions: vec![Action::add_car(trip_id)] }
}

fn title(name: &str) -> String {
  format!("{TRIP_GLYPH} <b>{}</b>\n\n", escape_html(name))
}

fn escape_html(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      c => out.push(c),
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::roster::{CarListing, ChatId, PassengerListing, Trip};

  fn car(id: i64, name: &str, capacity: Option<u32>) -> CarListing {
    CarListing { car_id: CarId(id), name: name.into(), capacity }
  }

  fn rider(name: &str, car_name: &str, capacity: Option<u32>) -> PassengerListing {
    PassengerListing {
      passenger_name: name.into(),
      car_name:       car_name.into(),
      car_capacity:   capacity,
    }
  }

  fn roster(
    cars: Vec<CarListing>,
    passengers: Vec<PassengerListing>,
  ) -> TripRoster {
    TripRoster {
      trip: Trip {
        trip_id: TripId(1),
        chat_id: ChatId(-100),
        view:    None,
        name:    "Beach".into(),
      },
      cars,
      passengers,
    }
  }

  #[test]
  fn empty_trip_has_only_add_car() {
    let view = render(&roster(vec![], vec![]));
    assert_eq!(view.text, "📆 <b>Beach</b>\n\n");
    assert_eq!(view.actions, vec![Action::add_car(TripId(1))]);
    assert_eq!(view, initial_view(TripId(1), "Beach"));
  }

  #[test]
  fn empty_car_is_listed_open() {
    let view = render(&roster(vec![car(1, "Alice", None)], vec![]));
    assert_eq!(view.text, "📆 <b>Beach</b>\n\n🚙 <b>Alice</b> [0/5] :\n\n");
    assert_eq!(view.actions[0].label, "Join Alice");
    assert_eq!(view.actions[0].token.to_string(), "join_1");
    assert_eq!(view.actions[1].label, "Add 🚙");
    assert_eq!(view.actions[1].token.to_string(), "add_car_1");
  }

  #[test]
  fn full_car_is_blocked() {
    let view = render(&roster(
      vec![car(1, "Alice", Some(1))],
      vec![rider("bob", "Alice", Some(1))],
    ));
    assert_eq!(
      view.text,
      "📆 <b>Beach</b>\n\n🚗 <b>Alice</b> [1/1] 🚫:\n- bob\n\n"
    );
  }

  #[test]
  fn text_is_sorted_by_name_buttons_by_id() {
    let view = render(&roster(
      vec![car(1, "Zoe", None), car(2, "Adam", Some(2))],
      vec![
        rider("carl", "Adam", Some(2)),
        rider("dora", "Adam", Some(2)),
        rider("eve", "Zoe", None),
      ],
    ));
    assert_eq!(
      view.text,
      "📆 <b>Beach</b>\n\n\
       🚗 <b>Adam</b> [2/2] 🚫:\n- carl\n- dora\n\n\
       🚙 <b>Zoe</b> [1/5] :\n- eve\n\n"
    );
    let labels: Vec<&str> =
      view.actions.iter().map(|a| a.label.as_str()).collect();
    assert_eq!(labels, ["Join Zoe", "Join Adam", "Add 🚙"]);
  }

  #[test]
  fn cars_sharing_a_name_are_merged() {
    let view = render(&roster(
      vec![car(1, "Sam", Some(3)), car(2, "Sam", None)],
      vec![rider("a", "Sam", Some(3)), rider("b", "Sam", None)],
    ));
    assert!(view.text.contains("🚙 <b>Sam</b> [2/3] :\n- a\n- b\n"));
    assert_eq!(view.text.matches("<b>Sam</b>").count(), 1);
    assert_eq!(view.actions.len(), 3);
  }

  #[test]
  fn over_capacity_still_renders() {
    let view = render(&roster(
      vec![car(1, "Alice", Some(1))],
      vec![rider("bob", "Alice", Some(1)), rider("cat", "Alice", Some(1))],
    ));
    assert!(view.text.contains("🚗 <b>Alice</b> [2/1] 🚫:"));
  }

  #[test]
  fn names_are_escaped_in_text_only() {
    let mut r = roster(vec![car(1, "<R&D>", None)], vec![]);
    r.trip.name = "a<b".into();
    let view = render(&r);
    assert!(view.text.starts_with("📆 <b>a&lt;b</b>"));
    assert!(view.text.contains("<b>&lt;R&amp;D&gt;</b>"));
    assert_eq!(view.actions[0].label, "Join <R&D>");
  }

  #[test]
  fn rendering_is_repeatable() {
    let r = roster(
      vec![car(2, "B", None), car(1, "A", Some(4))],
      vec![rider("x", "A", Some(4)), rider("y", "B", None)],
    );
    assert_eq!(render(&r), render(&r));
  }
}
