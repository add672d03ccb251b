//! Integration tests for Backroom.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p backroom-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `category_tree` - normalization properties across both input shapes
//! - `session_storage` - token key layout, fallback order, and guards
//! - `session_events` - change-notification delivery
//!
//! The tests run against the in-memory session store and the recording
//! navigator; no live backend is required.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use url::Url;

use backroom_client::config::ClientConfig;
use backroom_client::nav::RecordingNavigator;
use backroom_client::session::SessionManager;
use backroom_client::storage::MemoryStore;

/// A session manager wired to in-memory doubles, plus handles to them.
pub struct TestSession {
    pub manager: SessionManager,
    pub store: Arc<MemoryStore>,
    pub navigator: Arc<RecordingNavigator>,
}

/// Build a test session acting as the given host, positioned at the given
/// route.
///
/// # Panics
///
/// Panics if the fixed test base URL fails to parse, which it cannot.
#[must_use]
pub fn test_session(host: &str, current_path: &str) -> TestSession {
    #[allow(clippy::unwrap_used)]
    let api_base = Url::parse("https://api.backroom.test").unwrap();
    let config = ClientConfig::new(api_base, host);

    let store = Arc::new(MemoryStore::new());
    let navigator = Arc::new(RecordingNavigator::at(current_path));
    let manager = SessionManager::new(&config, store.clone(), navigator.clone());

    TestSession {
        manager,
        store,
        navigator,
    }
}
