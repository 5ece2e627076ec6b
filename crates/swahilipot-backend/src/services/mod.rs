//! Backend service handlers for frontend-driven requests.
//!
//! This module groups async request handlers that operate on the shared
//! `AppContext`, drive the playback session, and emit responses back to the
//! frontend.

pub mod config_service;
pub mod playback_service;

/// Represents a type that is used in all handlers as an application context.
pub(crate) type AppContextHandle<D> = std::sync::Arc<crate::app::AppContext<D>>;
