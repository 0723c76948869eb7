//! reqwest-backed implementation of the assistant transport.

use std::time::Duration;

use assistant_core::config::AssistantConfig;
use async_trait::async_trait;
use futures_util::StreamExt;
use log::{debug, info};
use reqwest::{Client, Response};

use crate::client_trait::{AssistantTransport, ChunkStream};
use crate::error::{Result, TransportError};
use crate::models::{AssistantReply, SendMessageRequest};

const STREAM_PATH: &str = "/assistant/send-message-stream";
const BLOCKING_PATH: &str = "/assistant/send-message";
const RESET_PATH: &str = "/assistant/reset-chat";

/// HTTP client for the assistant endpoints.
#[derive(Debug, Clone)]
pub struct HttpAssistantClient {
    client: Client,
    base_url: String,
    request_timeout: Duration,
}

impl HttpAssistantClient {
    pub fn new(config: &AssistantConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_timeout: config.request_timeout(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(TransportError::Status {
                code: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl AssistantTransport for HttpAssistantClient {
    async fn send_streaming(&self, request: &SendMessageRequest) -> Result<ChunkStream> {
        debug!(
            "opening assistant stream ({} history turns)",
            request.conversation_history.len()
        );
        let response = self
            .client
            .post(self.url(STREAM_PATH))
            .json(request)
            .send()
            .await?;
        let response = Self::ensure_success(response)?;

        let stream = response
            .bytes_stream()
            .map(|item| item.map_err(|e| TransportError::Stream(e.to_string())));
        Ok(Box::pin(stream))
    }

    async fn send_blocking(&self, request: &SendMessageRequest) -> Result<AssistantReply> {
        debug!(
            "sending blocking assistant request ({} history turns)",
            request.conversation_history.len()
        );
        let response = self
            .client
            .post(self.url(BLOCKING_PATH))
            .timeout(self.request_timeout)
            .json(request)
            .send()
            .await?;
        let response = Self::ensure_success(response)?;

        let body = response.text().await?;
        let reply: AssistantReply = serde_json::from_str(&body)?;
        Ok(reply)
    }

    async fn reset_session(&self) -> Result<()> {
        info!("resetting assistant session");
        let response = self
            .client
            .post(self.url(RESET_PATH))
            .timeout(self.request_timeout)
            .send()
            .await?;
        Self::ensure_success(response)?;
        Ok(())
    }
}
