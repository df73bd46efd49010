//! Otelier Core - Shared domain types.
//!
//! This crate provides the types shared by every Otelier component:
//! - `api` - The hotel booking HTTP service
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure rules - no I/O, no database
//! access, no HTTP clients. Stay-date validation and the room overlap
//! predicate live here so the database query and the in-memory store agree.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, emails, roles, statuses and stay date ranges

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
