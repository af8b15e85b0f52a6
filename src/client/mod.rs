//! Backend API client
//!
//! [`BackendApi`] is the seam between the session logic and the web backend;
//! [`BackendClient`] implements it over HTTP with `reqwest`.
//!
//! Mutating requests carry the CSRF token in the `X-CSRFToken` header. The
//! token comes from the session cookie; generation falls back to the token of
//! the form's hidden field when no cookie is configured.

pub mod csrf;
pub mod http;

pub use csrf::token_from_cookie_header;
pub use http::build_http_client_from_config;

use std::fmt;

use async_trait::async_trait;
use reqwest::header::{COOKIE, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::defaults::csrf::HEADER_NAME;
use crate::error::{ClientError, Result};
use crate::types::{
    FavoriteToggleRequest, FavoriteToggleResponse, FreeApiReport, GenerationForm,
    GenerationModelConfig, GenerationResponse, HealthReport, ImageId, UpscaleRequest,
    UpscaleResponse,
};

/// Operations offered by the image-generation backend.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// Model configuration of every provider.
    async fn fetch_model_configs(&self) -> Result<GenerationModelConfig>;

    /// Generate one image (form-encoded submission).
    async fn generate(&self, form: &GenerationForm) -> Result<GenerationResponse>;

    /// Flip the favorite flag of a stored image.
    async fn toggle_favorite(&self, image_id: ImageId) -> Result<FavoriteToggleResponse>;

    /// Upscale a stored image. A response with `success: false` is an error.
    async fn upscale(&self, request: UpscaleRequest) -> Result<UpscaleResponse>;

    async fn health(&self) -> Result<HealthReport>;

    /// Probe the free provider APIs (diagnostic; may take ~30s).
    async fn test_free_apis(&self) -> Result<FreeApiReport>;
}

/// HTTP implementation of [`BackendApi`].
pub struct BackendClient {
    http_client: reqwest::Client,
    config: ClientConfig,
    csrf_token: Option<SecretString>,
}

impl fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.config.base_url)
            .field("has_cookie", &self.config.cookie.is_some())
            .field("has_csrf_token", &self.csrf_token.is_some())
            .finish()
    }
}

impl BackendClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http_client = build_http_client_from_config(&config.http_config)?;
        Ok(Self::with_http_client(config, http_client))
    }

    /// Use an existing `reqwest::Client` (configuration is not re-validated).
    pub fn with_http_client(config: ClientConfig, http_client: reqwest::Client) -> Self {
        let csrf_token = config
            .cookie_header()
            .and_then(|cookie| token_from_cookie_header(cookie, &config.csrf_cookie_name))
            .map(SecretString::from);
        Self {
            http_client,
            config,
            csrf_token,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Session cookie plus the CSRF header when a token is known.
    fn build_headers(&self, fallback_token: Option<&str>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        if let Some(cookie) = self.config.cookie_header() {
            headers.insert(
                COOKIE,
                HeaderValue::from_str(cookie).map_err(|e| {
                    ClientError::ConfigurationError(format!("Invalid cookie header: {e}"))
                })?,
            );
        }

        let token = self
            .csrf_token
            .as_ref()
            .map(|t| t.expose_secret())
            .or(fallback_token.filter(|t| !t.is_empty()));
        if let Some(token) = token {
            let name = HeaderName::from_bytes(HEADER_NAME.as_bytes()).map_err(|e| {
                ClientError::ConfigurationError(format!("Invalid CSRF header name: {e}"))
            })?;
            headers.insert(
                name,
                HeaderValue::from_str(token).map_err(|e| {
                    ClientError::ConfigurationError(format!("Invalid CSRF token: {e}"))
                })?,
            );
        }

        Ok(headers)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        operation: &'static str,
    ) -> Result<T> {
        let response = request.send().await.map_err(|e| {
            tracing::error!(operation, "request failed: {e}");
            ClientError::HttpError(e.to_string())
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ClientError::HttpError(format!("Failed to read {operation} response: {e}"))
        })?;

        if !status.is_success() {
            let err = error_from_body(status.as_u16(), &body);
            tracing::error!(operation, status = status.as_u16(), "backend error: {err}");
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(operation, "unexpected response body: {e}");
            ClientError::ParseError(format!("Failed to parse {operation} response: {e}"))
        })
    }
}

/// Error for a non-success response; the message is the body's `error` field.
fn error_from_body(status: u16, body: &str) -> ClientError {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(details) => ClientError::ApiError {
            code: status,
            message: details
                .get("error")
                .and_then(|e| e.as_str())
                .unwrap_or_default()
                .to_string(),
            details: Some(details),
        },
        Err(_) => ClientError::api_error(status, ""),
    }
}

#[async_trait]
impl BackendApi for BackendClient {
    async fn fetch_model_configs(&self) -> Result<GenerationModelConfig> {
        let url = self.config.url(&self.config.endpoints.model_configs);
        tracing::debug!(%url, "fetching model configuration");
        let request = self.http_client.get(&url).headers(self.build_headers(None)?);
        self.send(request, "model configuration").await
    }

    async fn generate(&self, form: &GenerationForm) -> Result<GenerationResponse> {
        let url = self.config.url(&self.config.endpoints.generate);
        tracing::debug!(%url, provider = %form.provider, "submitting generation");
        let headers = self.build_headers(form.csrf_token.as_deref())?;
        let request = self
            .http_client
            .post(&url)
            .headers(headers)
            .form(&form.form_fields());
        self.send(request, "generation").await
    }

    async fn toggle_favorite(&self, image_id: ImageId) -> Result<FavoriteToggleResponse> {
        let url = self.config.url(&self.config.endpoints.favorite_toggle);
        tracing::debug!(%url, image_id, "toggling favorite");
        let request = self
            .http_client
            .post(&url)
            .headers(self.build_headers(None)?)
            .json(&FavoriteToggleRequest { image_id });
        self.send(request, "favorite toggle").await
    }

    async fn upscale(&self, request: UpscaleRequest) -> Result<UpscaleResponse> {
        let url = self.config.url(&self.config.endpoints.upscale);
        tracing::debug!(%url, image_id = request.image_id, scale = request.scale, "upscaling");
        let builder = self
            .http_client
            .post(&url)
            .headers(self.build_headers(None)?)
            .json(&request);
        let response: UpscaleResponse = self.send(builder, "upscale").await?;
        if !response.success {
            return Err(ClientError::ApiError {
                code: 200,
                message: response.error.clone().unwrap_or_default(),
                details: serde_json::to_value(&response).ok(),
            });
        }
        Ok(response)
    }

    async fn health(&self) -> Result<HealthReport> {
        let url = self.config.url(&self.config.endpoints.health);
        tracing::debug!(%url, "checking provider health");
        let request = self.http_client.get(&url).headers(self.build_headers(None)?);
        self.send(request, "health check").await
    }

    async fn test_free_apis(&self) -> Result<FreeApiReport> {
        let url = self.config.url(&self.config.endpoints.test_free_apis);
        tracing::debug!(%url, "probing free APIs");
        let request = self.http_client.get(&url).headers(self.build_headers(None)?);
        self.send(request, "free API probe").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_message_is_extracted() {
        let err = error_from_body(400, r#"{"error": "Prompt is required"}"#);
        assert_eq!(err.status_code(), Some(400));
        assert_eq!(err.backend_message(), Some("Prompt is required"));

        let err = error_from_body(502, "<html>Bad Gateway</html>");
        assert_eq!(err.status_code(), Some(502));
        assert_eq!(err.backend_message(), None);
    }

    #[test]
    fn csrf_token_is_read_from_cookie() {
        let client = BackendClient::new(
            ClientConfig::default().with_cookie("csrftoken=abc%3D%3D; sessionid=s"),
        )
        .unwrap();
        let headers = client.build_headers(Some("form-token")).unwrap();
        assert_eq!(headers[HEADER_NAME], "abc==");
        assert_eq!(headers[COOKIE], "csrftoken=abc%3D%3D; sessionid=s");
    }

    #[test]
    fn form_token_is_the_fallback() {
        let client = BackendClient::new(ClientConfig::default()).unwrap();
        let headers = client.build_headers(Some("form-token")).unwrap();
        assert_eq!(headers[HEADER_NAME], "form-token");
        assert!(client.build_headers(None).unwrap().is_empty());
    }

    #[test]
    fn debug_does_not_leak_cookie() {
        let client =
            BackendClient::new(ClientConfig::default().with_cookie("csrftoken=secret")).unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("has_csrf_token: true"));
    }
}
