//! Media uploads.

use reqwest::multipart::{Form, Part};

use crate::api::{ApiClient, ApiResponse, paths};
use crate::error::ClientError;

/// Client for the tenant's media endpoint.
#[derive(Clone)]
pub struct MediaClient {
    api: ApiClient,
}

impl MediaClient {
    /// Create a media client over an existing API client.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Upload a file as multipart form data.
    ///
    /// The multipart content type reqwest computes is kept as-is; the
    /// tenant channel only defaults to JSON when nothing else set one.
    /// The response is returned for the caller to branch on.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport failure or an invalid mime type.
    pub async fn upload(
        &self,
        file_name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<ApiResponse, ClientError> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_owned())
            .mime_str(mime_type)?;

        let form = Form::new().part("file", part);
        self.api.tenant_post_multipart(paths::MEDIA, form).await
    }
}
