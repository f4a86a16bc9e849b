//! HTTP transport implementation using reqwest

use super::{map_http_error, ByteStream, RequestOptions, Transport, TransportError};
use crate::config::{ClientConfig, EndpointConfig};
use crate::protocol::ChatRequest;
use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::{Client, ClientBuilder, Response};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use url::Url;

/// Streaming transport for the chat endpoint
#[derive(Clone)]
pub struct HttpTransport {
    /// The underlying reqwest client
    client: Arc<Client>,

    chat_url: Url,
    health_url: Url,
}

impl HttpTransport {
    /// Create a transport for the given endpoint settings
    pub fn new(endpoint: &EndpointConfig) -> Result<Self, TransportError> {
        let mut builder = ClientBuilder::new()
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .connect_timeout(Duration::from_secs(endpoint.connect_timeout_secs))
            .user_agent(endpoint.user_agent.as_str())
            .gzip(true);

        if let Some(secs) = endpoint.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder.build().map_err(|e| TransportError::InvalidEndpoint {
            message: format!("Failed to create HTTP client: {}", e),
        })?;

        let base = Url::parse(&endpoint.base_url).map_err(|e| TransportError::InvalidEndpoint {
            message: format!("Invalid base URL '{}': {}", endpoint.base_url, e),
        })?;

        Ok(Self {
            client: Arc::new(client),
            chat_url: join(&base, &endpoint.chat_path)?,
            health_url: join(&base, &endpoint.health_path)?,
        })
    }

    /// Create a transport from a full client configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        Self::new(&config.endpoint)
    }

    /// URL the chat request is posted to
    pub fn chat_url(&self) -> &Url {
        &self.chat_url
    }

    /// Check that the backend reports itself healthy
    pub async fn health_check(&self) -> Result<(), TransportError> {
        let response = self.client.get(self.health_url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok();
            return Err(map_http_error(status, body, uuid::Uuid::nil()));
        }

        let body: Value = response.json().await?;
        match body.get("status").and_then(|s| s.as_str()) {
            Some("healthy") => Ok(()),
            _ => Err(TransportError::Unhealthy {
                message: body.to_string(),
            }),
        }
    }

    /// Log when the body does not look like a line-oriented stream
    fn check_content_type(response: &Response, options: &RequestOptions) {
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_lowercase();

        if !content_type.starts_with("text/event-stream") && !content_type.starts_with("text/plain") {
            warn!(
                "Unexpected content type '{}' for chat stream [request_id: {}]",
                content_type, options.request_id
            );
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn open_stream(
        &self,
        request: &ChatRequest,
        options: &RequestOptions,
    ) -> Result<ByteStream, TransportError> {
        let request_id = options.request_id;
        info!("Opening chat stream to {} [request_id: {}]", self.chat_url, request_id);

        let body = serde_json::to_value(request).map_err(|e| TransportError::Serialization {
            message: format!("{} [request_id: {}]", e, request_id),
        })?;

        let mut req_builder = self
            .client
            .post(self.chat_url.clone())
            .header("X-Request-ID", request_id.to_string())
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(&body);

        if let Some(timeout) = options.timeout {
            req_builder = req_builder.timeout(timeout);
        }

        let response = req_builder.send().await.map_err(|e| {
            error!("Chat request failed [request_id: {}]: {}", request_id, e);
            TransportError::from(e)
        })?;

        let status = response.status();
        debug!("Response status: {} [request_id: {}]", status, request_id);

        if !status.is_success() {
            let body = response.text().await.ok();
            warn!("Chat request failed with status {} [request_id: {}]", status, request_id);
            return Err(map_http_error(status, body, request_id));
        }

        Self::check_content_type(&response, options);

        Ok(Box::pin(response.bytes_stream().map_err(TransportError::from)))
    }
}

fn join(base: &Url, path: &str) -> Result<Url, TransportError> {
    base.join(path).map_err(|e| TransportError::InvalidEndpoint {
        message: format!("Cannot join '{}' onto '{}': {}", path, base, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_url_is_origin_relative() {
        let mut endpoint = EndpointConfig::new("http://localhost:8000/app/");
        endpoint.chat_path = "/chat".to_string();
        let transport = HttpTransport::new(&endpoint).unwrap();
        assert_eq!(transport.chat_url().as_str(), "http://localhost:8000/chat");
    }

    #[test]
    fn test_invalid_base_url() {
        let endpoint = EndpointConfig::new("not a url");
        assert!(matches!(
            HttpTransport::new(&endpoint),
            Err(TransportError::InvalidEndpoint { .. })
        ));
    }
}
