//! Backroom Client - SDK for the multi-tenant back-office REST API.
//!
//! The back-office partitions everything by tenant, and the tenant is
//! whatever subdomain the client is acting as. This crate owns that
//! resolution and everything downstream of it:
//!
//! - [`config`] - environment-driven configuration
//! - [`storage`] - injected key-value session store and the tenant-scoped
//!   key layout
//! - [`session`] - sign-in/sign-up/OAuth, guards, session validation, and
//!   change notifications
//! - [`api`] - the public and tenant request channels, including the
//!   bearer attachment and 401-redirect policy
//! - [`catalog`] - category tree normalization and product listing
//! - [`media`] - multipart uploads
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use backroom_client::catalog::CatalogClient;
//! use backroom_client::config::ClientConfig;
//! use backroom_client::nav::NoopNavigator;
//! use backroom_client::session::SessionManager;
//! use backroom_client::storage::MemoryStore;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let session = SessionManager::new(
//!     &config,
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(NoopNavigator),
//! );
//!
//! if session.validate_session().await {
//!     let catalog = CatalogClient::new(session.api().clone());
//!     let tree = catalog.category_tree().await?;
//!     println!("{} categories", tree.len());
//! }
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod media;
pub mod nav;
pub mod session;
pub mod storage;

pub use error::ClientError;
