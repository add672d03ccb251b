//! Session storage abstraction and tenant-scoped key layout.
//!
//! The browser build of the back-office keeps its session state in
//! `localStorage`; the SDK abstracts that as an injected [`KeyValueStore`]
//! so the session layer is testable and embeddable. Two implementations
//! ship here: [`MemoryStore`] for tests and short-lived embedders, and
//! [`FileStore`] for the CLI.
//!
//! # Key layout
//!
//! | Key pattern | Content |
//! |---|---|
//! | `{subdomain}-{brand}-authToken` | bearer token string |
//! | `{subdomain}-{brand}-user` | JSON-encoded user profile |
//! | `{subdomain}-{brand}-company` | JSON-encoded company object |
//!
//! The brand segment exists to survive a product rename: token reads walk
//! the current brand first and fall back to the legacy brand, so existing
//! sessions are not orphaned the day the keys change.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use backroom_core::Subdomain;

/// String key-value store, the SDK's stand-in for persistent client-side
/// storage.
///
/// All operations are infallible at the trait level; an implementation
/// that can fail (disk full, quota exceeded) degrades to best-effort and
/// logs, matching how browser storage failures are treated.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. Empty strings are treated as absent by callers.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, overwriting any previous one.
    fn set(&self, key: &str, value: &str);

    /// Delete a value. Deleting a missing key is a no-op.
    fn remove(&self, key: &str);
}

// =============================================================================
// Key layout
// =============================================================================

/// Host aliases that all map to a local development session. A token
/// written under any of them must remain retrievable whichever spelling
/// the browser used last.
const LOCAL_HOST_ALIASES: [&str; 3] = ["localhost", "127.0.0.1", "local"];

/// Storage suffix for the bearer token.
const TOKEN_SUFFIX: &str = "authToken";
/// Storage suffix for the cached user profile.
const USER_SUFFIX: &str = "user";
/// Storage suffix for the cached company object.
const COMPANY_SUFFIX: &str = "company";

/// Tenant-scoped storage key builder.
///
/// Owns the subdomain/brand triple and produces every key the session
/// layer touches, including the deterministic token lookup chain.
#[derive(Debug, Clone)]
pub struct StorageKeys {
    subdomain: Subdomain,
    brand: String,
    legacy_brand: String,
}

impl StorageKeys {
    /// Create the key builder for a tenant.
    #[must_use]
    pub fn new(subdomain: Subdomain, brand: impl Into<String>, legacy_brand: impl Into<String>) -> Self {
        Self {
            subdomain,
            brand: brand.into(),
            legacy_brand: legacy_brand.into(),
        }
    }

    /// The tenant this key set is scoped to.
    #[must_use]
    pub const fn subdomain(&self) -> &Subdomain {
        &self.subdomain
    }

    /// The preferred token key: `{subdomain}-{brand}-authToken`.
    #[must_use]
    pub fn token_key(&self) -> String {
        format!("{}-{}-{}", self.subdomain, self.brand, TOKEN_SUFFIX)
    }

    /// Key for the cached user profile.
    #[must_use]
    pub fn user_key(&self) -> String {
        format!("{}-{}-{}", self.subdomain, self.brand, USER_SUFFIX)
    }

    /// Key for the cached company object.
    #[must_use]
    pub fn company_key(&self) -> String {
        format!("{}-{}-{}", self.subdomain, self.brand, COMPANY_SUFFIX)
    }

    /// Token lookup chain, in priority order: the preferred key, then the
    /// local host aliases under the current brand, then the same set under
    /// the legacy brand. Duplicates (a local subdomain already covered by
    /// an alias) are skipped.
    #[must_use]
    pub fn token_lookup_chain(&self) -> Vec<String> {
        let mut chain = Vec::with_capacity(2 * (1 + LOCAL_HOST_ALIASES.len()));

        for brand in [&self.brand, &self.legacy_brand] {
            for host in std::iter::once(self.subdomain.as_str()).chain(LOCAL_HOST_ALIASES) {
                let key = format!("{host}-{brand}-{TOKEN_SUFFIX}");
                if !chain.contains(&key) {
                    chain.push(key);
                }
            }
        }

        chain
    }

    /// Legacy-brand keys proactively deleted when a token is persisted, so
    /// a stale credential cannot leak across the brand migration.
    #[must_use]
    pub fn legacy_cleanup_keys(&self) -> [String; 2] {
        [
            format!("local-{}-{}", self.legacy_brand, TOKEN_SUFFIX),
            format!("127.0.0.1-{}-{}", self.legacy_brand, TOKEN_SUFFIX),
        ]
    }
}

/// Retrieve the stored token for a tenant, walking the lookup chain and
/// returning the first non-empty value.
#[must_use]
pub fn retrieve_token(store: &dyn KeyValueStore, keys: &StorageKeys) -> Option<String> {
    keys.token_lookup_chain()
        .into_iter()
        .find_map(|key| store.get(&key).filter(|v| !v.is_empty()))
}

/// Persist a token under the preferred key and clean up known legacy-brand
/// keys. Cleanup is best-effort; the store's `remove` cannot fail, and a
/// missing key is simply a no-op.
pub fn persist_token(store: &dyn KeyValueStore, keys: &StorageKeys, token: &str) {
    store.set(&keys.token_key(), token);

    for key in keys.legacy_cleanup_keys() {
        store.remove(&key);
    }
}

// =============================================================================
// In-memory store
// =============================================================================

/// In-memory [`KeyValueStore`], used by tests and short-lived embedders.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_owned(), value.to_owned());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }
}

// =============================================================================
// File-backed store
// =============================================================================

/// JSON-file-backed [`KeyValueStore`], the CLI's persistent session store.
///
/// The whole map is loaded on open and rewritten on every mutation. Write
/// failures are logged and swallowed; losing a session write degrades to a
/// re-login, not a crash.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStore {
    /// Open a store at the given path, loading any existing contents.
    ///
    /// A missing file yields an empty store; an unreadable or malformed
    /// file is logged and likewise treated as empty.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "session store is malformed, starting empty");
                HashMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "session store is unreadable, starting empty");
                HashMap::new()
            }
        };

        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    fn flush(&self, entries: &HashMap<String, String>) {
        let encoded = match serde_json::to_string_pretty(entries) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode session store");
                return;
            }
        };

        if let Err(e) = std::fs::write(&self.path, encoded) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to write session store");
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_owned(), value.to_owned());
            self.flush(&entries);
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
            self.flush(&entries);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn keys(host: &str) -> StorageKeys {
        StorageKeys::new(Subdomain::from_host(host), "backroom", "stockpilot")
    }

    #[test]
    fn test_preferred_token_key() {
        assert_eq!(keys("acme.backroom.app").token_key(), "acme-backroom-authToken");
        assert_eq!(keys("127.0.0.1").token_key(), "localhost-backroom-authToken");
    }

    #[test]
    fn test_lookup_chain_order() {
        let chain = keys("acme.backroom.app").token_lookup_chain();
        assert_eq!(
            chain,
            vec![
                "acme-backroom-authToken",
                "localhost-backroom-authToken",
                "127.0.0.1-backroom-authToken",
                "local-backroom-authToken",
                "acme-stockpilot-authToken",
                "localhost-stockpilot-authToken",
                "127.0.0.1-stockpilot-authToken",
                "local-stockpilot-authToken",
            ]
        );
    }

    #[test]
    fn test_lookup_chain_dedupes_local_subdomain() {
        let chain = keys("localhost").token_lookup_chain();
        assert_eq!(
            chain,
            vec![
                "localhost-backroom-authToken",
                "127.0.0.1-backroom-authToken",
                "local-backroom-authToken",
                "localhost-stockpilot-authToken",
                "127.0.0.1-stockpilot-authToken",
                "local-stockpilot-authToken",
            ]
        );
    }

    #[test]
    fn test_retrieve_prefers_current_brand() {
        let store = MemoryStore::new();
        let keys = keys("localhost");
        store.set("localhost-stockpilot-authToken", "legacy-token");
        store.set("localhost-backroom-authToken", "current-token");

        assert_eq!(
            retrieve_token(&store, &keys).as_deref(),
            Some("current-token")
        );
    }

    #[test]
    fn test_retrieve_falls_back_to_legacy_brand() {
        let store = MemoryStore::new();
        let keys = keys("localhost");
        store.set("localhost-stockpilot-authToken", "legacy-token");

        assert_eq!(
            retrieve_token(&store, &keys).as_deref(),
            Some("legacy-token")
        );
    }

    #[test]
    fn test_retrieve_skips_empty_values() {
        let store = MemoryStore::new();
        let keys = keys("localhost");
        store.set("localhost-backroom-authToken", "");
        store.set("local-backroom-authToken", "alias-token");

        assert_eq!(
            retrieve_token(&store, &keys).as_deref(),
            Some("alias-token")
        );
    }

    #[test]
    fn test_persist_cleans_legacy_keys() {
        let store = MemoryStore::new();
        let keys = keys("localhost");
        store.set("local-stockpilot-authToken", "stale");
        store.set("127.0.0.1-stockpilot-authToken", "stale");

        persist_token(&store, &keys, "fresh");

        assert_eq!(
            store.get("localhost-backroom-authToken").as_deref(),
            Some("fresh")
        );
        assert!(store.get("local-stockpilot-authToken").is_none());
        assert!(store.get("127.0.0.1-stockpilot-authToken").is_none());
    }

    #[test]
    fn test_memory_store_remove_missing_is_noop() {
        let store = MemoryStore::new();
        store.remove("nope");
        assert!(store.get("nope").is_none());
    }
}
