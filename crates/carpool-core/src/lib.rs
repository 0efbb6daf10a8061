//! Core types and trait definitions for the car organizer.
//!
//! This crate holds the roster model, the capacity and naming rules, the view
//! renderer and the parsers for inbound commands and button tokens. It does
//! no I/O: storage and chat transport are reached through the [`RosterStore`]
//! and [`Transport`] traits.
//!
//! [`RosterStore`]: store::RosterStore
//! [`Transport`]: transport::Transport

// Native `async fn` in traits; the trait methods spell out their `Send`
// bounds explicitly.
#![allow(async_fn_in_trait)]

pub mod action;
pub mod command;
pub mod error;
pub mod event;
pub mod render;
pub mod roster;
pub mod rules;
pub mod store;
pub mod transport;

pub use error::{Error, Result};
