//! Telegram bot for organizing who rides in which car.
//!
//! The [`coordinator`] applies chat intents to a roster store and keeps each
//! trip's live view message in sync. Updates arrive either through the
//! [`polling`] loop or the [`webhook`] router; both go through [`dispatch`].

pub mod config;
pub mod coordinator;
pub mod dispatch;
pub mod error;
pub mod polling;
pub mod telegram;
pub mod webhook;

pub use coordinator::Coordinator;
pub use error::Error;
