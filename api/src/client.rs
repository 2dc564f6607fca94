//! HTTP client shared by every service
//!
//! All verbs funnel through one `execute` path which applies the request
//! interceptor (bearer credential), the response interceptor (401 evicts the
//! session cookies) and error normalization.

use crate::error::{ApiError, GENERIC_SERVER_ERROR};
use crate::storage::{keys, CredentialStorage};
use reqwest::multipart::Form;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Request payload
enum Body {
    Empty,
    Json(serde_json::Value),
    Multipart(Form),
}

/// Shape of an error body; anything else is treated as message-less
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Gateway to the super-admin REST API
///
/// Cheap to clone; clones share the connection pool and credential storage.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    storage: Arc<dyn CredentialStorage>,
}

impl ApiClient {
    /// Create a client for `base_url` (e.g. `https://api.example.com/v1`)
    #[must_use]
    pub fn new(base_url: impl Into<String>, storage: Arc<dyn CredentialStorage>) -> Self {
        Self::with_http_client(Client::new(), base_url, storage)
    }

    /// Create a client over a preconfigured `reqwest` client
    #[must_use]
    pub fn with_http_client(
        client: Client,
        base_url: impl Into<String>,
        storage: Arc<dyn CredentialStorage>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            storage,
        }
    }

    /// Base URL requests are resolved against
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Credential storage the interceptors read and evict
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn CredentialStorage> {
        &self.storage
    }

    /// `GET` and decode the response body
    ///
    /// # Errors
    ///
    /// Returns a normalized [`ApiError`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(Method::GET, path, Body::Empty).await
    }

    /// `POST` without a body
    ///
    /// # Errors
    ///
    /// Returns a normalized [`ApiError`].
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(Method::POST, path, Body::Empty).await
    }

    /// `POST` a JSON body
    ///
    /// # Errors
    ///
    /// Returns a normalized [`ApiError`].
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(Method::POST, path, json(body)?).await
    }

    /// `PUT` a JSON body
    ///
    /// # Errors
    ///
    /// Returns a normalized [`ApiError`].
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(Method::PUT, path, json(body)?).await
    }

    /// `PATCH` a JSON body
    ///
    /// # Errors
    ///
    /// Returns a normalized [`ApiError`].
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(Method::PATCH, path, json(body)?).await
    }

    /// `PATCH` a `multipart/form-data` body
    ///
    /// # Errors
    ///
    /// Returns a normalized [`ApiError`].
    pub async fn patch_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        self.execute(Method::PATCH, path, Body::Multipart(form)).await
    }

    /// `DELETE`
    ///
    /// # Errors
    ///
    /// Returns a normalized [`ApiError`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(Method::DELETE, path, Body::Empty).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    #[tracing::instrument(skip(self, body), fields(url = %self.url(path)))]
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Body,
    ) -> Result<T, ApiError> {
        let mut builder = self.client.request(method, self.url(path));

        if let Some(token) = self.storage.get(keys::TOKEN) {
            builder = builder.bearer_auth(token);
        }

        builder = match body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(&value),
            Body::Multipart(form) => builder.multipart(form),
        };

        let request = builder.build().map_err(|e| {
            tracing::error!(error = %e, "Error setting up request");
            ApiError::RequestSetup {
                detail: e.to_string(),
            }
        })?;

        let response = self.client.execute(request).await.map_err(|e| {
            tracing::warn!(error = %e, "No response received");
            ApiError::NoResponse {
                detail: e.to_string(),
            }
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.evict_session();
        }

        let bytes = response.bytes().await.map_err(|e| {
            tracing::warn!(error = %e, %status, "Response body was cut off");
            ApiError::NoResponse {
                detail: e.to_string(),
            }
        })?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|body| body.message)
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| GENERIC_SERVER_ERROR.to_string());

            tracing::warn!(status = status.as_u16(), %message, "API error");
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        // An empty acknowledgement decodes like `null`
        let bytes: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
        serde_json::from_slice(bytes).map_err(|e| {
            tracing::warn!(error = %e, "Undecodable response body");
            ApiError::Decode(e.to_string())
        })
    }

    /// Drop the session cookies after the server rejected the credential
    fn evict_session(&self) {
        tracing::info!("Credential rejected, clearing session cookies");
        for key in [keys::TOKEN, keys::USER] {
            if let Err(error) = self.storage.remove(key) {
                tracing::warn!(key, %error, "Failed to clear cookie");
            }
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

fn json<B: Serialize + ?Sized>(body: &B) -> Result<Body, ApiError> {
    serde_json::to_value(body).map(Body::Json).map_err(|e| {
        tracing::error!(error = %e, "Unserializable request body");
        ApiError::RequestSetup {
            detail: e.to_string(),
        }
    })
}
