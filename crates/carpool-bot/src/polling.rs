//! Long-polling intake: `getUpdates` in a loop, one task per update.

use std::{sync::Arc, time::Duration};

use carpool_core::store::RosterStore;
use tracing::{info, warn};

use crate::{
  coordinator::Coordinator,
  dispatch::dispatch,
  telegram::{TelegramClient, types::Update},
};

const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Offset that acknowledges every update in `batch`.
pub fn next_offset(current: Option<i64>, batch: &[Update]) -> Option<i64> {
  batch
    .iter()
    .map(|u| u.update_id + 1)
    .max()
    .map_or(current, |next| Some(current.map_or(next, |c| c.max(next))))
}

/// Poll forever. Each update runs on its own task, so a slow or failing
/// update never holds up the others.
pub async fn run<S>(
  client: Arc<TelegramClient>,
  coordinator: Coordinator<S, TelegramClient>,
  timeout_secs: u64,
) where
  S: RosterStore + 'static,
{
  info!(timeout_secs, "polling for updates");
  let mut offset = None;

  loop {
    let batch = match client.get_updates(offset, timeout_secs).await {
      Ok(batch) => batch,
      Err(e) => {
        warn!(error = %e, "getUpdates failed, retrying");
        tokio::time::sleep(RETRY_DELAY).await;
        continue;
      }
    };

    offset = next_offset(offset, &batch);
    for update in batch {
      let coordinator = coordinator.clone();
      tokio::spawn(async move { dispatch(&coordinator, update).await });
    }
  }
}
