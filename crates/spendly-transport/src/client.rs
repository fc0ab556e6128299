//! HTTP transport client for the Spendly backend.

use crate::payload::{ChatResponse, FileUpload, MessagePayload, UploadResponse};
use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use spendly_core::config::ClientConfig;
use spendly_core::{Result, SpendlyError};
use std::time::Duration;

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);
const CHAT_TIMEOUT: Duration = Duration::from_secs(120);
const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

/// The boundary component performing network operations on behalf of the
/// conversation controller.
///
/// Both operations are fire-and-wait-once: no retry, no partial result.
/// Failures are reported to the caller, which converts them into the fixed
/// user-visible messages.
#[async_trait]
pub trait TransportClient: Send + Sync {
    /// Uploads a document and returns the server-assigned reference.
    ///
    /// # Errors
    ///
    /// Returns an error on connection failure or a non-success status.
    async fn upload_file(&self, file: &FileUpload) -> Result<UploadResponse>;

    /// Sends one conversational turn.
    ///
    /// Only the fields set on the payload are transmitted.
    ///
    /// # Errors
    ///
    /// Returns an error on connection failure or a non-success status.
    async fn send_message(&self, payload: &MessagePayload) -> Result<ChatResponse>;
}

/// reqwest-backed implementation of [`TransportClient`].
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

impl HttpTransport {
    /// Creates a transport pointed at the configured backend origin.
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_base_url(config.base_url.clone())
    }

    /// Creates a transport pointed at an explicit backend origin.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// The backend origin this transport talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Backend liveness probe (`GET /health`).
    ///
    /// Not used by the conversation controller; available to hosting shells.
    ///
    /// # Errors
    ///
    /// Returns an error on connection failure or a non-success status.
    pub async fn health(&self) -> Result<String> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map_err(|e| SpendlyError::Transport(format!("Health check failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SpendlyError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let health: HealthResponse = response
            .json()
            .await
            .map_err(|e| SpendlyError::Serialization(format!("Failed to parse health response: {}", e)))?;
        Ok(health.status)
    }
}

#[async_trait]
impl TransportClient for HttpTransport {
    async fn upload_file(&self, file: &FileUpload) -> Result<UploadResponse> {
        let url = format!("{}/upload", self.base_url);
        tracing::debug!(file = %file.file_name, bytes = file.contents.len(), "uploading document");

        let part = multipart::Part::bytes(file.contents.clone()).file_name(file.file_name.clone());
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .timeout(UPLOAD_TIMEOUT)
            .send()
            .await
            .map_err(|e| SpendlyError::Transport(format!("Upload request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SpendlyError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<UploadResponse>()
            .await
            .map_err(|e| SpendlyError::Serialization(format!("Failed to parse upload response: {}", e)))
    }

    async fn send_message(&self, payload: &MessagePayload) -> Result<ChatResponse> {
        let url = format!("{}/chat", self.base_url);
        tracing::debug!(intent = %payload.intent, has_file = payload.file_path.is_some(), "sending chat turn");

        let mut form = multipart::Form::new();
        for (name, value) in payload.form_fields() {
            form = form.text(name, value);
        }

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .timeout(CHAT_TIMEOUT)
            .send()
            .await
            .map_err(|e| SpendlyError::Transport(format!("Chat request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SpendlyError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| SpendlyError::Serialization(format!("Failed to parse chat response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let transport = HttpTransport::with_base_url("http://localhost:8000/");
        assert_eq!(transport.base_url(), "http://localhost:8000");
    }
}
