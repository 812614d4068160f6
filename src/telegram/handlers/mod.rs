//! Telegram bot handler tree configuration
//!
//! This module provides the main dispatcher schema for the Telegram bot.
//! Handlers receive everything through [`HandlerDeps`], so the same tree is
//! used in production and can be built in tests with a private store.

mod commands;
mod schema;
mod types;
mod uploads;

pub use schema::schema;
pub use types::{HandlerDeps, HandlerError};
