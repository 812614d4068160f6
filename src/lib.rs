//! Planogram bot - finds a product's shelf location by EAN or SAP code
//!
//! The product table lives in memory and is replaced as a whole when the
//! administrator uploads a new spreadsheet through the chat.
//!
//! # Module Structure
//!
//! - `catalog`: Table store, code lookup, card rendering
//! - `sheet`: `.xlsx` decoding (first worksheet only)
//! - `core`: Configuration, errors, logging, web server
//! - `telegram`: Telegram bot integration and handlers
//! - `cli`: Command line interface

pub mod catalog;
pub mod cli;
pub mod core;
pub mod sheet;
pub mod telegram;

// Re-export commonly used types for convenience
pub use crate::catalog::{LookupPolicy, QueryError, QueryHit, QueryRouter, TableStore};
pub use crate::core::{config, AppError, AppResult};
