//! HTTP plumbing for the back-office REST API.
//!
//! Two request channels exist:
//!
//! - **public** - no bearer header, no interception; sign-in, sign-up, and
//!   OAuth endpoints live here because they run before a session exists
//!   (and, for the OAuth continuation, to avoid the sign-in channel's
//!   response-shape assumptions).
//! - **tenant** - every request independently resolves the stored token
//!   and attaches `Authorization: Bearer {token}`; when no token resolves,
//!   no header is sent. Any 401 response triggers a hard navigation to the
//!   sign-in route (unless already there), whatever call it came from.
//!
//! Neither channel retries, times out, or backs off; that belongs to the
//! data-fetching layer wrapping this SDK. HTTP error statuses are returned
//! as values, not errors - callers branch on [`ApiResponse::status`].

use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::Value;
use url::Url;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::nav::Navigator;
use crate::storage::{self, KeyValueStore, StorageKeys};

/// Endpoint paths, relative to the API base. The exact paths are a
/// contract owned by the backend; they are collected here so a rename is a
/// one-line change.
pub mod paths {
    /// Credential sign-in (public).
    pub const SIGN_IN: &str = "sign-in";
    /// Account creation (public).
    pub const SIGN_UP: &str = "sign-up";
    /// Email verification (public).
    pub const VERIFY_EMAIL: &str = "verify-email";
    /// Google OAuth initialization (public).
    pub const GOOGLE_INIT: &str = "oauth/google/init";
    /// Google OAuth code exchange (public).
    pub const GOOGLE_CONTINUE: &str = "oauth/google/continue";
    /// Session validation (tenant-scoped).
    pub const CHECK_TOKEN: &str = "check-token";
    /// Category listing (tenant-scoped).
    pub const CATEGORIES: &str = "categories";
    /// Product listing (tenant-scoped).
    pub const PRODUCTS: &str = "products";
    /// Media upload (tenant-scoped).
    pub const MEDIA: &str = "media";

    /// Public tenant metadata by alias.
    #[must_use]
    pub fn company(alias: &str) -> String {
        format!("company/{alias}")
    }

    /// Company lookup by subdomain (public).
    #[must_use]
    pub fn companies(subdomain: &str) -> String {
        format!("companies/{subdomain}")
    }
}

/// A materialized API response: status plus leniently-decoded body.
///
/// The backend is not trusted to always return JSON; a non-JSON body is
/// kept as a string value and an empty body becomes `null`, so callers can
/// use optional access everywhere instead of handling decode errors.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Decoded body.
    pub body: Value,
}

impl ApiResponse {
    /// Drain a transport response into a materialized one.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Self { status, body }
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Optional access to a top-level body field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.body.get(name)
    }
}

/// HTTP client for the back-office API.
///
/// Cheap to clone; all state lives behind an `Arc`.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base: Url,
    store: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
    navigator: Arc<dyn Navigator>,
    sign_in_path: String,
}

impl ApiClient {
    /// Create a client for the configured tenant.
    #[must_use]
    pub fn new(
        config: &ClientConfig,
        store: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let keys = StorageKeys::new(
            backroom_core::Subdomain::from_host(&config.host),
            config.brand.as_str(),
            config.legacy_brand.as_str(),
        );

        let mut base = config.api_base.clone();
        // Url::join drops the last path segment unless the base ends in a
        // slash; normalize once so endpoint paths stay relative.
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }

        Self {
            inner: Arc::new(ApiClientInner {
                http: reqwest::Client::new(),
                base,
                store,
                keys,
                navigator,
                sign_in_path: config.sign_in_path.clone(),
            }),
        }
    }

    /// The storage key set for the resolved tenant.
    #[must_use]
    pub fn keys(&self) -> &StorageKeys {
        &self.inner.keys
    }

    /// The injected session store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.inner.store
    }

    /// The injected navigation sink.
    #[must_use]
    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.inner.navigator
    }

    /// The sign-in route used by auth redirects.
    #[must_use]
    pub fn sign_in_path(&self) -> &str {
        &self.inner.sign_in_path
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.inner.base.join(path)?)
    }

    // =========================================================================
    // Public channel
    // =========================================================================

    /// GET a public endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport failure or an unjoinable path.
    pub async fn public_get(&self, path: &str) -> Result<ApiResponse, ClientError> {
        self.public_get_with(path, &[]).await
    }

    /// GET a public endpoint with query parameters.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport failure or an unjoinable path.
    pub async fn public_get_with(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<ApiResponse, ClientError> {
        let url = self.endpoint(path)?;
        let response = self.inner.http.get(url).query(query).send().await?;
        Ok(ApiResponse::from_response(response).await)
    }

    /// POST a JSON body to a public endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport failure or an unjoinable path.
    pub async fn public_post(&self, path: &str, body: &Value) -> Result<ApiResponse, ClientError> {
        let url = self.endpoint(path)?;
        let response = self.inner.http.post(url).json(body).send().await?;
        Ok(ApiResponse::from_response(response).await)
    }

    // =========================================================================
    // Tenant channel
    // =========================================================================

    /// GET a tenant-scoped endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport failure or an unjoinable path.
    pub async fn tenant_get(&self, path: &str) -> Result<ApiResponse, ClientError> {
        self.tenant_get_with(path, &[]).await
    }

    /// GET a tenant-scoped endpoint with query parameters.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport failure or an unjoinable path.
    pub async fn tenant_get_with(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<ApiResponse, ClientError> {
        let url = self.endpoint(path)?;
        let request = self.inner.http.get(url).query(query);
        self.send_tenant(request).await
    }

    /// POST a JSON body to a tenant-scoped endpoint.
    ///
    /// The content type defaults to JSON here; use
    /// [`Self::tenant_post_multipart`] for uploads, which keeps the
    /// multipart content type reqwest computes.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport failure or an unjoinable path.
    pub async fn tenant_post(&self, path: &str, body: &Value) -> Result<ApiResponse, ClientError> {
        let url = self.endpoint(path)?;
        let request = self.inner.http.post(url).json(body);
        self.send_tenant(request).await
    }

    /// POST a multipart form to a tenant-scoped endpoint. The form's own
    /// content type is never overwritten.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport failure or an unjoinable path.
    pub async fn tenant_post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<ApiResponse, ClientError> {
        let url = self.endpoint(path)?;
        let request = self.inner.http.post(url).multipart(form);
        self.send_tenant(request).await
    }

    /// The token the tenant channel would attach right now, if any.
    #[must_use]
    pub fn resolve_token(&self) -> Option<String> {
        storage::retrieve_token(self.inner.store.as_ref(), &self.inner.keys)
    }

    async fn send_tenant(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<ApiResponse, ClientError> {
        // Each request resolves its own token; there is no persistent
        // header state to strip when the token disappears.
        let request = match self.resolve_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let response = ApiResponse::from_response(response).await;

        if response.status == StatusCode::UNAUTHORIZED {
            self.redirect_to_sign_in();
        }

        Ok(response)
    }

    /// Send the user to the sign-in route, unless already there.
    ///
    /// This fires on every 401 from the tenant channel, background calls
    /// included; the current-path check is the only loop prevention.
    pub fn redirect_to_sign_in(&self) {
        let navigator = &self.inner.navigator;
        if navigator.current_path() == self.inner.sign_in_path {
            return;
        }

        tracing::warn!(
            tenant = %self.inner.keys.subdomain(),
            "session rejected, redirecting to sign-in"
        );
        navigator.assign(&self.inner.sign_in_path);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::nav::RecordingNavigator;
    use crate::storage::MemoryStore;
    use serde_json::json;

    fn client_at(path: &str) -> (ApiClient, Arc<RecordingNavigator>) {
        let config = ClientConfig::new(
            Url::parse("https://api.backroom.app/v1").unwrap(),
            "acme.backroom.app",
        );
        let navigator = Arc::new(RecordingNavigator::at(path));
        let client = ApiClient::new(&config, Arc::new(MemoryStore::new()), navigator.clone());
        (client, navigator)
    }

    #[test]
    fn test_endpoint_joins_relative_to_base() {
        let (client, _) = client_at("/");
        let url = client.endpoint(paths::SIGN_IN).unwrap();
        assert_eq!(url.as_str(), "https://api.backroom.app/v1/sign-in");
    }

    #[test]
    fn test_endpoint_with_formatted_path() {
        let (client, _) = client_at("/");
        let url = client.endpoint(&paths::companies("acme")).unwrap();
        assert_eq!(url.as_str(), "https://api.backroom.app/v1/companies/acme");
    }

    #[test]
    fn test_redirect_to_sign_in() {
        let (client, navigator) = client_at("/products");
        client.redirect_to_sign_in();
        assert_eq!(navigator.assignments(), vec!["/sign-in".to_owned()]);
    }

    #[test]
    fn test_redirect_skipped_when_already_there() {
        let (client, navigator) = client_at("/sign-in");
        client.redirect_to_sign_in();
        assert!(navigator.assignments().is_empty());
    }

    #[test]
    fn test_resolve_token_reads_store() {
        let (client, _) = client_at("/");
        assert!(client.resolve_token().is_none());

        client.store().set("acme-backroom-authToken", "tok_123");
        assert_eq!(client.resolve_token().as_deref(), Some("tok_123"));
    }

    #[test]
    fn test_api_response_field_access() {
        let response = ApiResponse {
            status: StatusCode::OK,
            body: json!({"user": {"name": "Ada"}}),
        };
        assert!(response.is_success());
        assert_eq!(
            response.field("user").and_then(|u| u.get("name")),
            Some(&json!("Ada"))
        );
        assert!(response.field("company").is_none());
    }
}
