//! Tubely DB Library
//!
//! The metadata store contract consumed by the upload pipeline, plus its
//! Postgres and in-memory implementations.

pub mod db;

pub use db::{InMemoryVideoRepository, PgVideoRepository, VideoRepository};
