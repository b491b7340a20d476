//! Core domain + application logic for the railway seat-availability watcher.
//!
//! This crate is intentionally framework-agnostic. Telegram and the e-ticket
//! HTTP API live behind ports (traits) implemented in adapter crates.

pub mod checker;
pub mod config;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod parser;
pub mod policy;
pub mod ports;
pub mod scheduler;
pub mod store;
pub mod texts;

pub use errors::{Error, Result};
