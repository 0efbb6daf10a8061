//! Action tokens carried by the view's buttons.
//!
//! Two shapes exist, `add_car_<tripId>` and `join_<carId>`. The suffix must be
//! a plain decimal integer; every other string is rejected.

use std::fmt;

use crate::roster::{CarId, TripId};

const ADD_CAR_PREFIX: &str = "add_car_";
const JOIN_PREFIX: &str = "join_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionToken {
  AddCar(TripId),
  Join(CarId),
}

impl ActionToken {
  pub fn parse(token: &str) -> Option<Self> {
    if let Some(rest) = token.strip_prefix(ADD_CAR_PREFIX) {
      return parse_suffix(rest).map(|id| Self::AddCar(TripId(id)));
    }
    if let Some(rest) = token.strip_prefix(JOIN_PREFIX) {
      return parse_suffix(rest).map(|id| Self::Join(CarId(id)));
    }
    None
  }
}

/// Digits only: `i64::from_str` alone would also take a leading sign.
fn parse_suffix(s: &str) -> Option<i64> {
  if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  s.parse().ok()
}

impl fmt::Display for ActionToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ActionToken::AddCar(trip_id) => write!(f, "{ADD_CAR_PREFIX}{trip_id}"),
      ActionToken::Join(car_id) => write!(f, "{JOIN_PREFIX}{car_id}"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_both_shapes() {
    assert_eq!(
      ActionToken::parse("add_car_12"),
      Some(ActionToken::AddCar(TripId(12)))
    );
    assert_eq!(ActionToken::parse("join_7"), Some(ActionToken::Join(CarId(7))));
  }

  #[test]
  fn formats_what_it_parses() {
    assert_eq!(ActionToken::AddCar(TripId(12)).to_string(), "add_car_12");
    assert_eq!(ActionToken::Join(CarId(7)).to_string(), "join_7");
  }

  #[test]
  fn rejects_everything_else() {
    for token in [
      "",
      "join_",
      "join_x",
      "join_+7",
      "join_-7",
      "join_7 ",
      "join_7a",
      "add_car_",
      "add_car_1.5",
      "addcar_1",
      "JOIN_1",
      "leave_1",
      "join_99999999999999999999",
    ] {
      assert_eq!(ActionToken::parse(token), None, "token {token:?}");
    }
  }
}
