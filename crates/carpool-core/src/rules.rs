//! Capacity and membership rules. Pure functions, no I/O.

use crate::{Error, Result, event::ActorProfile, roster::CarId};

/// Capacity assumed for a car whose driver never set one. Used for display
/// and fullness only; never written to the store.
pub const DEFAULT_CAPACITY: u32 = 5;

pub fn effective_capacity(capacity: Option<u32>) -> u32 {
  capacity.unwrap_or(DEFAULT_CAPACITY)
}

pub fn is_full(passenger_count: usize, capacity: Option<u32>) -> bool {
  passenger_count >= effective_capacity(capacity) as usize
}

/// Reject capacities that cannot be stored.
pub fn validate_capacity(capacity: u32) -> Result<u32> {
  if capacity == 0 {
    return Err(Error::Validation(
      "Operation not completed, a car needs at least one seat.".to_string(),
    ));
  }
  Ok(capacity)
}

/// The name an actor is shown under.
///
/// Checked in order: the transport handle, then `F.Last` built from first and
/// last name, then `ID:<id>`.
pub fn resolve_display_name(actor: &ActorProfile) -> String {
  if let Some(handle) = actor.handle.as_deref().filter(|h| !h.is_empty()) {
    return handle.to_string();
  }

  let first = actor.first_name.as_deref().and_then(|f| f.chars().next());
  let last = actor.last_name.as_deref().filter(|l| !l.is_empty());
  if let (Some(initial), Some(last)) = (first, last) {
    return format!("{initial}.{last}");
  }

  format!("ID:{}", actor.id)
}

/// What joining `target` means for an actor currently riding `current`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinPlan {
  Create,
  Move { from: CarId },
  Noop,
}

/// Decide how a join is applied.
///
/// Capacity is advisory: a full car can still be joined, the view just shows
/// it over capacity.
pub fn plan_join(current: Option<CarId>, target: CarId) -> JoinPlan {
  match current {
    None => JoinPlan::Create,
    Some(car) if car == target => JoinPlan::Noop,
    Some(from) => JoinPlan::Move { from },
  }
}
