//! Backroom Core - Shared types library.
//!
//! This crate provides common types used across all Backroom components:
//! - `client` - SDK for the back-office REST API
//! - `cli` - Command-line tools driving the SDK
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! storage. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Tenant subdomains, entity IDs, prices, statuses, and the
//!   cached user profile shape

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
