//! Tenant-aware session management.
//!
//! Derives the active tenant from the configured host, keeps the bearer
//! token and cached profile data under tenant-scoped storage keys, and
//! exposes the sign-in/sign-up/OAuth calls plus the guards the UI shells
//! route through.
//!
//! Most methods hand the [`ApiResponse`] back unmodified and let the
//! caller branch on status; the exceptions ([`SessionManager::get_company`]
//! and [`SessionManager::validate_session`]) absorb failures into typed
//! results because their callers only ever asked "did it work".

mod events;

pub use events::{SessionEvents, Subscription};

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};

use backroom_core::{Subdomain, UserProfile};

use crate::api::{ApiClient, ApiResponse, paths};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::nav::Navigator;
use crate::storage::{self, KeyValueStore};

/// Sign-in credentials.
///
/// The password is secret-wrapped so it cannot leak through `Debug`
/// output; it is exposed only at the moment the request body is built.
#[derive(Clone)]
pub struct Credentials {
    email: String,
    password: SecretString,
}

impl Credentials {
    /// Create credentials from an email/password pair.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Result of a company lookup. Never an error: a missing or unreachable
/// company is a normal outcome the caller renders around.
#[derive(Debug, Clone)]
pub struct CompanyLookup {
    /// HTTP status, when a response was reachable at all.
    pub status: Option<StatusCode>,
    /// The company object, on success.
    pub data: Option<Value>,
}

/// Tenant/session manager.
///
/// Cheap to clone; clones share the underlying client, store, and event
/// registry.
#[derive(Clone)]
pub struct SessionManager {
    api: ApiClient,
    events: SessionEvents,
}

impl SessionManager {
    /// Create a manager for the configured tenant.
    ///
    /// If the configuration carries a pre-provisioned service token and no
    /// token is stored yet, the service token is persisted first so
    /// automation starts out signed in.
    #[must_use]
    pub fn new(
        config: &ClientConfig,
        store: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let manager = Self {
            api: ApiClient::new(config, store, navigator),
            events: SessionEvents::new(),
        };

        if let Some(token) = &config.service_token
            && manager.retrieve_token().is_none()
        {
            manager.persist_token(token.expose_secret());
        }

        manager
    }

    /// The underlying API client, shared with the other SDK surfaces.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// The event registry for user/company change subscriptions.
    #[must_use]
    pub fn events(&self) -> &SessionEvents {
        &self.events
    }

    // =========================================================================
    // Tenant & token resolution
    // =========================================================================

    /// The tenant subdomain resolved from the configured host.
    #[must_use]
    pub fn resolve_subdomain(&self) -> &Subdomain {
        self.api.keys().subdomain()
    }

    /// Retrieve the stored bearer token, walking the brand fallback chain.
    #[must_use]
    pub fn retrieve_token(&self) -> Option<String> {
        self.api.resolve_token()
    }

    /// Persist a bearer token under the preferred key, cleaning up the
    /// known legacy-brand keys.
    pub fn persist_token(&self, token: &str) {
        storage::persist_token(self.api.store().as_ref(), self.api.keys(), token);
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Sign in with credentials against a tenant alias.
    ///
    /// Runs on the public channel (no bearer attached). On 200 the
    /// embedded user payload and token, when present, are cached; when the
    /// response carries no user payload the retained no-op user fetch is
    /// invoked instead. The response is returned unmodified either way.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` only on transport failure.
    pub async fn login(
        &self,
        credentials: &Credentials,
        tenant_alias: &str,
    ) -> Result<ApiResponse, ClientError> {
        let body = json!({
            "email": credentials.email,
            "password": credentials.password.expose_secret(),
            "alias": tenant_alias,
        });

        let response = self.api.public_post(paths::SIGN_IN, &body).await?;

        if response.status == StatusCode::OK {
            if let Some(token) = extract_token(&response.body) {
                self.persist_token(token);
            }

            match embedded_user(&response.body) {
                Some(user) => self.cache_user(user),
                None => self.fetch_current_user().await?,
            }
        }

        Ok(response)
    }

    /// Create an account against a tenant alias.
    ///
    /// The confirm-password field is stripped before posting; it exists
    /// for the form, not the API. Returned user data is stored on 200/201.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` only on transport failure.
    pub async fn signup(
        &self,
        values: Value,
        tenant_alias: &str,
    ) -> Result<ApiResponse, ClientError> {
        let mut body = values;
        if let Some(fields) = body.as_object_mut() {
            fields.remove("confirm_password");
            fields.remove("password_confirmation");
            fields.insert("alias".to_owned(), Value::String(tenant_alias.to_owned()));
        }

        let response = self.api.public_post(paths::SIGN_UP, &body).await?;

        if response.status == StatusCode::OK || response.status == StatusCode::CREATED {
            if let Some(token) = extract_token(&response.body) {
                self.persist_token(token);
            }
            if let Some(user) = embedded_user(&response.body) {
                self.cache_user(user);
            }
        }

        Ok(response)
    }

    /// Submit an email verification token.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` only on transport failure.
    pub async fn verify_email(&self, token: &str) -> Result<ApiResponse, ClientError> {
        let body = json!({ "token": token });
        self.api.public_post(paths::VERIFY_EMAIL, &body).await
    }

    /// Fetch the Google OAuth authorization URL.
    ///
    /// Returns `None` when the backend responds without one.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` only on transport failure.
    pub async fn init_google_login(
        &self,
        redirect_uri: &str,
    ) -> Result<Option<String>, ClientError> {
        let response = self
            .api
            .public_get_with(paths::GOOGLE_INIT, &[("redirect_uri", redirect_uri)])
            .await?;

        let auth_url = response
            .field("auth_url")
            .or_else(|| response.field("url"))
            .and_then(Value::as_str)
            .map(str::to_owned);

        Ok(auth_url)
    }

    /// Exchange a Google OAuth code for a session.
    ///
    /// Runs on the public channel to avoid the sign-in channel's
    /// response-shape assumptions. Contract difference from the other
    /// methods: any reachable HTTP response comes back as `Ok`, whatever
    /// its status, so the caller can treat the error and success channels
    /// uniformly as response-shaped values. Only a response-less transport
    /// fault propagates as `Err`.
    ///
    /// On success the token and user payload are persisted, then a
    /// best-effort profile refresh runs as an independent second step
    /// (no rollback if it fails).
    ///
    /// # Errors
    ///
    /// Returns `ClientError` only when no response was reachable.
    pub async fn continue_with_google(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<ApiResponse, ClientError> {
        let response = self
            .api
            .public_get_with(
                paths::GOOGLE_CONTINUE,
                &[("code", code), ("redirect_uri", redirect_uri)],
            )
            .await?;

        if response.is_success() {
            if let Some(token) = extract_token(&response.body) {
                self.persist_token(token);
            }
            if let Some(user) = embedded_user(&response.body) {
                self.cache_user(user);
            }

            if let Err(e) = self.fetch_current_user().await {
                tracing::debug!(error = %e, "post-oauth profile refresh failed");
            }
        }

        Ok(response)
    }

    /// Placeholder for the removed current-user endpoint.
    ///
    /// The backend embeds the profile in sign-in responses instead of
    /// serving it separately; this stays so call sites keep the shape they
    /// had when the endpoint existed.
    #[allow(clippy::unused_async)]
    pub async fn fetch_current_user(&self) -> Result<(), ClientError> {
        Ok(())
    }

    // =========================================================================
    // Tenant & company metadata
    // =========================================================================

    /// Fetch public tenant metadata by alias. Used to confirm a subdomain
    /// maps to a real tenant before the sign-in form renders.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` only on transport failure.
    pub async fn get_tenant(&self, alias: &str) -> Result<ApiResponse, ClientError> {
        self.api.public_get(&paths::company(alias)).await
    }

    /// Fetch company metadata for the current subdomain.
    ///
    /// On success the company object is cached and the company-changed
    /// notification fires. Failures of any kind are absorbed into a
    /// [`CompanyLookup`] with `data: None`.
    pub async fn get_company(&self) -> CompanyLookup {
        let path = paths::companies(self.resolve_subdomain().as_str());

        match self.api.public_get(&path).await {
            Ok(response) if response.is_success() => {
                self.cache_company(&response.body);
                CompanyLookup {
                    status: Some(response.status),
                    data: Some(response.body),
                }
            }
            Ok(response) => CompanyLookup {
                status: Some(response.status),
                data: None,
            },
            Err(e) => {
                tracing::debug!(error = %e, "company lookup failed");
                CompanyLookup {
                    status: None,
                    data: None,
                }
            }
        }
    }

    // =========================================================================
    // Guards & validation
    // =========================================================================

    /// Guard for non-tenant account pages: with no token present, redirect
    /// to sign-in; otherwise do nothing. No server round trip.
    pub fn user_guard(&self) {
        if self.retrieve_token().is_none() {
            self.api.redirect_to_sign_in();
        }
    }

    /// Guard for tenant dashboard pages.
    ///
    /// Deliberately nothing beyond the token presence check: the session
    /// is validated lazily by the 401 interceptor on whatever data call
    /// the page makes next, not proactively here.
    pub fn dashboard_guard(&self) {
        if self.retrieve_token().is_none() {
            self.api.redirect_to_sign_in();
        }
    }

    /// Proactively confirm the stored token against the server.
    ///
    /// This is the only method that does so. With no token it returns
    /// `false` without a network call. A 200 updates the cached user and
    /// company data from the payload and yields `true`; any other outcome
    /// (error status, transport failure) yields `false`.
    pub async fn validate_session(&self) -> bool {
        if self.retrieve_token().is_none() {
            return false;
        }

        match self.api.tenant_get(paths::CHECK_TOKEN).await {
            Ok(response) if response.status == StatusCode::OK => {
                if let Some(user) = embedded_user(&response.body) {
                    self.cache_user(user);
                }
                if let Some(company) = response.field("company") {
                    self.cache_company(company);
                }
                true
            }
            Ok(response) => {
                tracing::debug!(status = %response.status, "session check rejected");
                false
            }
            Err(e) => {
                tracing::debug!(error = %e, "session check unreachable");
                false
            }
        }
    }

    // =========================================================================
    // Cached profile data
    // =========================================================================

    /// The locally cached user profile, if any.
    #[must_use]
    pub fn cached_user(&self) -> Option<UserProfile> {
        let raw = self.api.store().get(&self.api.keys().user_key())?;
        serde_json::from_str(&raw).ok()
    }

    /// The locally cached company object, if any.
    #[must_use]
    pub fn cached_company(&self) -> Option<Value> {
        let raw = self.api.store().get(&self.api.keys().company_key())?;
        serde_json::from_str(&raw).ok()
    }

    fn cache_user(&self, payload: &Value) {
        let Ok(profile) = serde_json::from_value::<UserProfile>(payload.clone()) else {
            tracing::debug!("user payload not recognizable, cache unchanged");
            return;
        };

        if let Ok(encoded) = serde_json::to_string(&profile) {
            self.api.store().set(&self.api.keys().user_key(), &encoded);
        }
        self.events.emit_user_changed(&profile);
    }

    fn cache_company(&self, company: &Value) {
        self.api
            .store()
            .set(&self.api.keys().company_key(), &company.to_string());
        self.events.emit_company_changed(company);
    }
}

/// Pull a bearer token out of an auth response body, wherever the backend
/// put it this time.
fn extract_token(body: &Value) -> Option<&str> {
    body.get("token")
        .or_else(|| body.get("access_token"))
        .or_else(|| body.get("data").and_then(|d| d.get("token")))
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
}

/// Pull an embedded user payload out of an auth response body.
fn embedded_user(body: &Value) -> Option<&Value> {
    body.get("user")
        .or_else(|| body.get("data").and_then(|d| d.get("user")))
        .filter(|u| u.is_object())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::nav::RecordingNavigator;
    use crate::storage::MemoryStore;
    use url::Url;

    fn manager_with(
        host: &str,
        nav_path: &str,
    ) -> (SessionManager, Arc<MemoryStore>, Arc<RecordingNavigator>) {
        let config = ClientConfig::new(Url::parse("https://api.backroom.app").unwrap(), host);
        let store = Arc::new(MemoryStore::new());
        let navigator = Arc::new(RecordingNavigator::at(nav_path));
        let manager = SessionManager::new(&config, store.clone(), navigator.clone());
        (manager, store, navigator)
    }

    #[test]
    fn test_resolve_subdomain() {
        let (manager, _, _) = manager_with("acme.backroom.app", "/");
        assert_eq!(manager.resolve_subdomain().as_str(), "acme");
    }

    #[test]
    fn test_persist_and_retrieve_token() {
        let (manager, store, _) = manager_with("acme.backroom.app", "/");
        manager.persist_token("tok_123");

        assert_eq!(store.get("acme-backroom-authToken").as_deref(), Some("tok_123"));
        assert_eq!(manager.retrieve_token().as_deref(), Some("tok_123"));
    }

    #[test]
    fn test_user_guard_redirects_without_token() {
        let (manager, _, navigator) = manager_with("acme.backroom.app", "/account");
        manager.user_guard();
        assert_eq!(navigator.assignments(), vec!["/sign-in".to_owned()]);
    }

    #[test]
    fn test_user_guard_noop_with_token() {
        let (manager, _, navigator) = manager_with("acme.backroom.app", "/account");
        manager.persist_token("tok_123");
        manager.user_guard();
        assert!(navigator.assignments().is_empty());
    }

    #[test]
    fn test_dashboard_guard_stays_lazy() {
        // With a token present the guard must not hit the network at all;
        // there is no transport wired up here, so reaching it would panic.
        let (manager, _, navigator) = manager_with("acme.backroom.app", "/dashboard");
        manager.persist_token("tok_123");
        manager.dashboard_guard();
        assert!(navigator.assignments().is_empty());
    }

    #[tokio::test]
    async fn test_validate_session_without_token_skips_network() {
        // An unroutable base URL: any network attempt would error, and a
        // missing token must short-circuit before that.
        let (manager, _, _) = manager_with("acme.backroom.app", "/");
        assert!(!manager.validate_session().await);
    }

    #[test]
    fn test_service_token_seeds_empty_store() {
        let mut config =
            ClientConfig::new(Url::parse("https://api.backroom.app").unwrap(), "localhost");
        config.service_token = Some(SecretString::from("svc_tok"));

        let store = Arc::new(MemoryStore::new());
        let manager = SessionManager::new(
            &config,
            store.clone(),
            Arc::new(RecordingNavigator::at("/")),
        );

        assert_eq!(manager.retrieve_token().as_deref(), Some("svc_tok"));
    }

    #[test]
    fn test_service_token_does_not_clobber_existing_session() {
        let mut config =
            ClientConfig::new(Url::parse("https://api.backroom.app").unwrap(), "localhost");
        config.service_token = Some(SecretString::from("svc_tok"));

        let store = Arc::new(MemoryStore::new());
        store.set("localhost-backroom-authToken", "user_tok");
        let manager = SessionManager::new(
            &config,
            store,
            Arc::new(RecordingNavigator::at("/")),
        );

        assert_eq!(manager.retrieve_token().as_deref(), Some("user_tok"));
    }

    #[test]
    fn test_cache_user_fires_event_and_persists() {
        let (manager, store, _) = manager_with("acme.backroom.app", "/");

        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let _sub = manager.events().on_user_changed(move |profile| {
            seen_clone.lock().unwrap().push(profile.email.clone());
        });

        manager.cache_user(&serde_json::json!({
            "name": "Ada",
            "email": "ada@acme.io",
            "verified_email": true,
        }));

        assert_eq!(*seen.lock().unwrap(), vec!["ada@acme.io".to_owned()]);
        assert!(store.get("acme-backroom-user").is_some());
        assert_eq!(manager.cached_user().unwrap().name, "Ada");
    }

    #[test]
    fn test_extract_token_spellings() {
        use serde_json::json;

        assert_eq!(extract_token(&json!({"token": "a"})), Some("a"));
        assert_eq!(extract_token(&json!({"access_token": "b"})), Some("b"));
        assert_eq!(extract_token(&json!({"data": {"token": "c"}})), Some("c"));
        assert_eq!(extract_token(&json!({"token": ""})), None);
        assert_eq!(extract_token(&json!({})), None);
    }

    #[test]
    fn test_embedded_user_requires_object() {
        use serde_json::json;

        assert!(embedded_user(&json!({"user": {"name": "Ada"}})).is_some());
        assert!(embedded_user(&json!({"data": {"user": {}}})).is_some());
        assert!(embedded_user(&json!({"user": "Ada"})).is_none());
        assert!(embedded_user(&json!({})).is_none());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("ada@acme.io", "hunter2");
        let debug_output = format!("{creds:?}");
        assert!(debug_output.contains("ada@acme.io"));
        assert!(!debug_output.contains("hunter2"));
    }
}
