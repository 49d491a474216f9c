//! Usage: Typed HTTP client for the ScholarPath API (one function per backend operation).

mod auth;
mod catalog;
pub mod types;

use crate::infra::credentials::TokenStore;
use crate::infra::settings::ClientSettings;
use crate::shared::error::{AppError, AppResult};
use serde::de::DeserializeOwned;
use std::sync::Arc;

pub struct ApiClient {
    http: reqwest::Client,
    origin: String,
    credentials: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(origin: impl Into<String>, credentials: Arc<dyn TokenStore>) -> Self {
        let origin = origin.into().trim().trim_end_matches('/').to_string();
        Self {
            // No request timeout: a hanging transport hangs the caller.
            http: reqwest::Client::new(),
            origin,
            credentials,
        }
    }

    pub fn from_settings(settings: &ClientSettings, credentials: Arc<dyn TokenStore>) -> Self {
        Self::new(settings.api_origin.clone(), credentials)
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.origin)
    }

    /// Attach the bearer header when a token is currently stored. An absent
    /// token never short-circuits locally; the backend decides the outcome.
    pub(crate) fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.credentials.get_token() {
            Some(token) => builder.header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {token}"),
            ),
            None => builder,
        }
    }

    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        fallback: &str,
    ) -> AppResult<T> {
        let body = self.execute_raw(builder, fallback).await?;
        match serde_json::from_str::<T>(&body) {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::warn!("response body did not match the expected shape: {err}");
                Err(AppError::decode(fallback))
            }
        }
    }

    pub(crate) async fn execute_no_body(
        &self,
        builder: reqwest::RequestBuilder,
        fallback: &str,
    ) -> AppResult<()> {
        self.execute_raw(builder, fallback).await.map(|_| ())
    }

    async fn execute_raw(
        &self,
        builder: reqwest::RequestBuilder,
        fallback: &str,
    ) -> AppResult<String> {
        let response = builder
            .send()
            .await
            .map_err(|e| format!("SYSTEM_ERROR: request failed: {e}"))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("SYSTEM_ERROR: response read failed: {e}"))?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "api request failed");
            let message =
                extract_error_detail(&body).unwrap_or_else(|| fallback.to_string());
            return Err(AppError::api(message));
        }

        Ok(body)
    }
}

/// Best-effort `detail` extraction from an error payload. Anything that is not
/// a JSON object with a non-empty string `detail` yields `None`.
fn extract_error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::credentials::MemoryTokenStore;

    #[test]
    fn extract_error_detail_reads_detail_field() {
        assert_eq!(
            extract_error_detail(r#"{"detail": "Incorrect password"}"#).as_deref(),
            Some("Incorrect password")
        );
    }

    #[test]
    fn extract_error_detail_rejects_non_string_detail() {
        assert_eq!(extract_error_detail(r#"{"detail": 42}"#), None);
        assert_eq!(extract_error_detail(r#"{"detail": ""}"#), None);
    }

    #[test]
    fn extract_error_detail_rejects_non_json_bodies() {
        assert_eq!(extract_error_detail("<html>boom</html>"), None);
        assert_eq!(extract_error_detail(""), None);
    }

    #[test]
    fn url_joins_origin_and_path() {
        let client = ApiClient::new(
            "http://127.0.0.1:8000/",
            Arc::new(MemoryTokenStore::new()),
        );
        assert_eq!(client.origin(), "http://127.0.0.1:8000");
        assert_eq!(
            client.url("/api/v1/auth/me"),
            "http://127.0.0.1:8000/api/v1/auth/me"
        );
    }
}
