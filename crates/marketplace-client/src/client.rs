//! Marketplace backend HTTP client.

use async_trait::async_trait;
use chat_core::{BackendError, ChatBackend, HistoryRecord, PurchaseRecord};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{ApiVersion, ClientConfig};
use crate::error::ClientError;
use crate::types::{
    ChatReply, LogoutRequest, StoredExchange, StoredMessage, V1MessageRequest, V2ChatRequest,
};

/// Client for the marketplace chat and sales API.
#[derive(Clone)]
pub struct MarketplaceClient {
    http: Client,
    config: ClientConfig,
}

impl MarketplaceClient {
    /// Create a client for the configured backend.
    ///
    /// No request is made; the backend is first contacted by the first call.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::Http)?;

        if config.api_version.is_deprecated() {
            warn!(
                "Using deprecated {} chat endpoints at {}",
                config.api_version, config.base_url
            );
        }
        info!(
            "Marketplace client ready for {} ({} endpoints)",
            config.base_url, config.api_version
        );

        Ok(Self { http, config })
    }

    /// Fetch the stored conversation for a user key.
    pub async fn fetch_history(&self, user_key: &str) -> Result<Vec<HistoryRecord>, ClientError> {
        let url = self.config.history_url(user_key);

        let records: Vec<HistoryRecord> = match self.config.api_version {
            ApiVersion::V1 => self
                .get_json::<Vec<StoredMessage>>(&url)
                .await?
                .into_iter()
                .map(HistoryRecord::from)
                .collect(),
            ApiVersion::V2 => self
                .get_json::<Vec<StoredExchange>>(&url)
                .await?
                .into_iter()
                .map(HistoryRecord::from)
                .collect(),
        };

        debug!("Fetched {} history records for {}", records.len(), user_key);
        Ok(records)
    }

    /// Send a message and return the assistant's reply.
    pub async fn send_message(&self, user_key: &str, content: &str) -> Result<String, ClientError> {
        let url = self.config.message_url();

        let reply: ChatReply = match self.config.api_version {
            ApiVersion::V1 => {
                let body = V1MessageRequest {
                    message: content.to_string(),
                    user_id: user_key.to_string(),
                };
                self.post_json(&url, &body).await?
            }
            ApiVersion::V2 => {
                let body = V2ChatRequest {
                    prompt: content.to_string(),
                    user_id: user_key.to_string(),
                };
                self.post_json(&url, &body).await?
            }
        };

        Ok(reply.response)
    }

    /// Tell the backend the user's chat session is over.
    pub async fn logout(&self, user_key: &str) -> Result<(), ClientError> {
        let url = self.config.logout_url();
        let body = LogoutRequest {
            user_id: user_key.to_string(),
        };

        // The response body is not part of the contract.
        self.post(&url, &body).await?;
        Ok(())
    }

    /// Fetch purchase history rows.
    pub async fn fetch_purchases(&self) -> Result<Vec<PurchaseRecord>, ClientError> {
        let url = self.config.purchases_url();
        self.get_json(&url).await
    }

    /// Get the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn get_json<R: DeserializeOwned>(&self, url: &str) -> Result<R, ClientError> {
        debug!("GET {}", url);

        let response = self.http.get(url).send().await.map_err(ClientError::Http)?;
        let response = check_status(response).await?;
        decode(response).await
    }

    async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<R, ClientError> {
        let response = self.post(url, body).await?;
        decode(response).await
    }

    async fn post<B: Serialize>(&self, url: &str, body: &B) -> Result<Response, ClientError> {
        debug!("POST {}", url);

        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(ClientError::Http)?;

        check_status(response).await
    }
}

async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn decode<R: DeserializeOwned>(response: Response) -> Result<R, ClientError> {
    let text = response.text().await.map_err(ClientError::Http)?;
    Ok(serde_json::from_str(&text)?)
}

#[async_trait]
impl ChatBackend for MarketplaceClient {
    async fn fetch_history(&self, user_key: &str) -> Result<Vec<HistoryRecord>, BackendError> {
        MarketplaceClient::fetch_history(self, user_key)
            .await
            .map_err(BackendError::from)
    }

    async fn send_message(&self, user_key: &str, content: &str) -> Result<String, BackendError> {
        MarketplaceClient::send_message(self, user_key, content)
            .await
            .map_err(BackendError::from)
    }

    async fn logout(&self, user_key: &str) -> Result<(), BackendError> {
        MarketplaceClient::logout(self, user_key)
            .await
            .map_err(BackendError::from)
    }

    async fn fetch_purchases(&self) -> Result<Vec<PurchaseRecord>, BackendError> {
        MarketplaceClient::fetch_purchases(self)
            .await
            .map_err(BackendError::from)
    }

    fn name(&self) -> &str {
        "MarketplaceClient"
    }
}

impl std::fmt::Debug for MarketplaceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketplaceClient")
            .field("config", &self.config)
            .finish()
    }
}
