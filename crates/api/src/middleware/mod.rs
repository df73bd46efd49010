//! Middleware and extractors.

pub mod auth;

pub use auth::{CurrentUser, authenticate};
