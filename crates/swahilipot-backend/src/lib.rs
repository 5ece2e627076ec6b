//! Backend runtime entry point and public API surface.
//!
//! This crate owns the backend lifecycle and the playback session, routes
//! bridge messages to services, and forwards every session change back to
//! the frontend.

mod app;
mod config;
pub mod controller;
mod runtime;
mod services;
mod state;

#[cfg(test)]
mod testing;

pub use crate::config::{ConfigError, load_config};
pub use crate::controller::SessionController;
pub use crate::runtime::run;
