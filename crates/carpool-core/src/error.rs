//! Error taxonomy for handling a single inbound intent.
//!
//! Every variant except [`Error::Publish`] ends up in front of the requester
//! as a short notice; see [`Error::notice`].

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed or missing input. The message is shown verbatim.
  #[error("validation error: {0}")]
  Validation(String),

  /// The referenced trip, car or actor scope does not exist.
  #[error("no {0} found")]
  NotFound(&'static str),

  /// The actor already owns a car in this trip.
  #[error("car already added")]
  Conflict,

  /// Storage fault during a read or write. The mutation is assumed not
  /// applied.
  #[error("persistence error: {0}")]
  Persistence(#[source] BoxError),

  /// The transport rejected a post-mutation republish.
  #[error("publish error: {0}")]
  Publish(#[source] BoxError),
}

impl Error {
  pub fn persistence(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Persistence(Box::new(e))
  }

  pub fn publish(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Publish(Box::new(e))
  }

  /// The text shown to the requester, or `None` for errors that are only
  /// logged.
  pub fn notice(&self) -> Option<String> {
    match self {
      Error::Validation(msg) => Some(msg.clone()),
      Error::NotFound(what) => {
        Some(format!("Operation not completed, no {what} found."))
      }
      Error::Conflict => {
        Some("Operation not completed, car already added!".to_string())
      }
      Error::Persistence(_) => {
        Some("Operation not completed for unexpected reason!".to_string())
      }
      Error::Publish(_) => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
