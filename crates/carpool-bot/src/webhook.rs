//! Webhook intake: an axum [`Router`] that receives Bot API updates.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/webhook` | Body: one `Update`. Checks the secret token header |
//! | `GET`  | `/health`  | Always 200 |

use std::sync::Arc;

use axum::{
  Router,
  body::Bytes,
  extract::{FromRequestParts, State},
  http::{HeaderMap, StatusCode, request::Parts},
  routing::{get, post},
};
use carpool_core::{store::RosterStore, transport::Transport};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::{
  coordinator::Coordinator, dispatch::dispatch, error::Error,
  telegram::types::Update,
};

/// Header Telegram sets on webhook calls when a secret token was registered.
pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Shared state threaded through the webhook handlers.
pub struct WebhookState<S, T> {
  pub coordinator:  Coordinator<S, T>,
  pub secret_token: Option<Arc<str>>,
}

impl<S, T> Clone for WebhookState<S, T> {
  fn clone(&self) -> Self {
    Self {
      coordinator:  self.coordinator.clone(),
      secret_token: self.secret_token.clone(),
    }
  }
}

/// Zero-size marker: present in the handler means the call came from
/// Telegram.
pub struct Verified;

/// Check the secret token header. Without a configured secret every caller
/// is accepted.
pub fn verify_secret(headers: &HeaderMap, expected: Option<&str>) -> Result<(), Error> {
  let Some(expected) = expected else {
    return Ok(());
  };
  let given = headers
    .get(SECRET_TOKEN_HEADER)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;
  if given != expected {
    return Err(Error::Unauthorized);
  }
  Ok(())
}

impl<S, T> FromRequestParts<WebhookState<S, T>> for Verified
where
  S: Send + Sync,
  T: Send + Sync,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &WebhookState<S, T>,
  ) -> Result<Self, Self::Rejection> {
    verify_secret(&parts.headers, state.secret_token.as_deref())?;
    Ok(Verified)
  }
}

/// Build the webhook router.
pub fn router<S, T>(state: WebhookState<S, T>) -> Router
where
  S: RosterStore + 'static,
  T: Transport + 'static,
{
  Router::new()
    .route("/webhook", post(receive::<S, T>))
    .route("/health", get(health))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

async fn receive<S, T>(
  _: Verified,
  State(state): State<WebhookState<S, T>>,
  body: Bytes,
) -> Result<StatusCode, Error>
where
  S: RosterStore + 'static,
  T: Transport + 'static,
{
  let update: Update = serde_json::from_slice(&body).map_err(|e| {
    warn!(error = %e, "malformed update");
    Error::BadRequest(e.to_string())
  })?;
  dispatch(&state.coordinator, update).await;
  Ok(StatusCode::OK)
}

async fn health() -> StatusCode { StatusCode::OK }
