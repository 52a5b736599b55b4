use crate::config::ServerConfig;
use crate::error::{ChatError, ChatResult};
use crate::message::{ChatRequest, ErrorBody, WireMessage, parse_message_list};
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// The two endpoints the widget talks to.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// `POST /chat`. Any 2xx counts as success; the body is ignored.
    async fn send_message(&self, message: &str) -> ChatResult<()>;

    /// `GET /messages`.
    async fn fetch_messages(&self) -> ChatResult<Vec<WireMessage>>;
}

/// [`ChatBackend`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: &ServerConfig) -> ChatResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;
        Self::with_client(&config.base_url, client)
    }

    pub fn with_client(base_url: &str, client: reqwest::Client) -> ChatResult<Self> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join drops the last path segment unless the base ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> ChatResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Turn a non-2xx response into [`ChatError::Status`], reading `detail`
    /// from the body when it is JSON.
    async fn status_error(response: reqwest::Response) -> ChatError {
        let status = response.status().as_u16();
        let detail = match response.bytes().await {
            Ok(body) => serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|body| body.detail_text()),
            Err(err) => {
                tracing::debug!(error = %err, "failed to read error body");
                None
            }
        };
        ChatError::Status { status, detail }
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send_message(&self, message: &str) -> ChatResult<()> {
        let url = self.endpoint("chat")?;
        tracing::debug!(%url, "posting message");

        let response = self
            .client
            .post(url)
            .json(&ChatRequest {
                message: message.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }
        Ok(())
    }

    async fn fetch_messages(&self) -> ChatResult<Vec<WireMessage>> {
        let url = self.endpoint("messages")?;
        tracing::debug!(%url, "fetching messages");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let body = response.bytes().await?;
        let messages = parse_message_list(&body)?;
        tracing::debug!(count = messages.len(), "fetched messages");
        Ok(messages)
    }
}
