//! Collection Gateway
//!
//! The request/response boundary to the software collection. Holds no state
//! beyond connection settings; every call is one HTTP request, never retried.
//!
//! | Operation | Request                     | Success            |
//! |-----------|-----------------------------|--------------------|
//! | list      | `GET {collection}`          | 2xx `{ data: [] }` |
//! | create    | `POST {collection}`         | 2xx created record |
//! | update    | `PUT {collection}/{id}`     | `204 No Content`   |
//! | delete    | `DELETE {collection}/{id}`  | 2xx                |

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};

use crate::console::config::Config;
use crate::console::error::GatewayError;
use crate::shared::{ErrorResponse, ListSoftwareResponse, Software, SoftwareFields};

/// Remote collection operations the synchronizer depends on
#[async_trait]
pub trait CollectionGateway: Send + Sync {
    async fn list(&self) -> Result<Vec<Software>, GatewayError>;

    /// Not idempotent: a retry after an ambiguous failure may create a duplicate
    async fn create(&self, fields: &SoftwareFields) -> Result<Software, GatewayError>;

    /// Acknowledgement only; the caller merges `fields` into its own copy
    async fn update(&self, id: &str, fields: &SoftwareFields) -> Result<(), GatewayError>;

    async fn delete(&self, id: &str) -> Result<(), GatewayError>;
}

/// HTTP implementation of [`CollectionGateway`]
#[derive(Debug, Clone)]
pub struct HttpGateway {
    config: Config,
    client: Client,
}

/// HTTP client honouring the configured request timeout.
///
/// `Client` is a handle to a connection pool; build one and clone it into
/// the auth calls and the gateway.
pub fn build_client(config: &Config) -> Result<Client, GatewayError> {
    Client::builder()
        .timeout(config.timeout())
        .build()
        .map_err(|e| GatewayError::transport(format!("Failed to build HTTP client: {}", e)))
}

impl HttpGateway {
    pub fn new(config: Config) -> Result<Self, GatewayError> {
        let client = build_client(&config)?;
        Ok(Self::with_client(config, client))
    }

    /// Reuse a client already used elsewhere, e.g. for login
    pub fn with_client(config: Config, client: Client) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    fn item_url(&self, id: &str) -> Result<Url, GatewayError> {
        let mut url = Url::parse(&self.config.collection_url())
            .map_err(|e| GatewayError::transport(format!("Invalid collection URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| GatewayError::transport("Collection URL cannot take an id segment"))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config.get_token() {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, GatewayError> {
        let response = self.authorize(request).send().await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_from_response(response).await)
        }
    }
}

#[async_trait]
impl CollectionGateway for HttpGateway {
    async fn list(&self) -> Result<Vec<Software>, GatewayError> {
        let url = self.config.collection_url();
        tracing::debug!("[GATEWAY] GET {}", url);

        let response = self.send(self.client.get(&url)).await?;
        let body = response.bytes().await?;
        let list: ListSoftwareResponse = serde_json::from_slice(&body)?;

        tracing::debug!("[GATEWAY] Listed {} records", list.data.len());
        Ok(list.data)
    }

    async fn create(&self, fields: &SoftwareFields) -> Result<Software, GatewayError> {
        let url = self.config.collection_url();
        tracing::debug!("[GATEWAY] POST {}", url);

        let response = self.send(self.client.post(&url).json(fields)).await?;
        let body = response.bytes().await?;
        let created: Software = serde_json::from_slice(&body)?;

        tracing::debug!("[GATEWAY] Created record {}", created.id);
        Ok(created)
    }

    async fn update(&self, id: &str, fields: &SoftwareFields) -> Result<(), GatewayError> {
        let url = self.item_url(id)?;
        tracing::debug!("[GATEWAY] PUT {}", url);

        let response = self.send(self.client.put(url).json(fields)).await?;
        if response.status() != StatusCode::NO_CONTENT {
            return Err(GatewayError::server(
                response.status().as_u16(),
                "Unexpected response from server",
            ));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), GatewayError> {
        let url = self.item_url(id)?;
        tracing::debug!("[GATEWAY] DELETE {}", url);

        self.send(self.client.delete(url)).await?;
        Ok(())
    }
}

/// Turn a non-2xx response into a `GatewayError::Server`, preferring the
/// API's `{ error }` body, then any short plain-text body, then the reason
/// phrase.
async fn error_from_response(response: Response) -> GatewayError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<ErrorResponse>(&text)
        .ok()
        .and_then(|body| body.best_message().map(str::to_string))
        .or_else(|| {
            let trimmed = text.trim();
            (!trimmed.is_empty() && !trimmed.starts_with('{')).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

    tracing::warn!("[GATEWAY] {} - {}", status, message);
    GatewayError::server(status.as_u16(), message)
}
