//! Tubely API Library
//!
//! HTTP handlers, authentication and application setup for the media
//! ingestion service.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
mod telemetry;
pub mod utils;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
