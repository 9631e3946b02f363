//! Thin reqwest wrapper over the stockpile REST surface.

use serde::Serialize;

use stockpile_core::{Item, ItemId};

/// Errors from the remote API.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Item not found")]
    NotFound,

    #[error("Request rejected ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

/// Body of a create request.
#[derive(Debug, Clone, Serialize)]
pub struct CreateItemRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
}

/// Body of an update request; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateItemRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

#[derive(Debug, Serialize)]
struct DeleteBatchRequest<'a> {
    ids: &'a [ItemId],
}

/// HTTP client for the item endpoints.
pub struct ItemsApi {
    client: reqwest::Client,
    base_url: String,
}

impl ItemsApi {
    /// `base_url` is the API root, e.g. `http://localhost:3007`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn get_all(&self) -> Result<Vec<Item>, ClientError> {
        let response = self
            .client
            .get(format!("{}/item", self.base_url))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn get_by_id(&self, id: ItemId) -> Result<Item, ClientError> {
        let response = self
            .client
            .get(format!("{}/item/{}", self.base_url, id))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn create(&self, request: &CreateItemRequest) -> Result<Item, ClientError> {
        let response = self
            .client
            .post(format!("{}/item", self.base_url))
            .json(request)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn update(
        &self,
        id: ItemId,
        request: &UpdateItemRequest,
    ) -> Result<Item, ClientError> {
        let response = self
            .client
            .put(format!("{}/item/{}", self.base_url, id))
            .json(request)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn delete(&self, id: ItemId) -> Result<(), ClientError> {
        let response = self
            .client
            .delete(format!("{}/item/{}", self.base_url, id))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    pub async fn delete_many(&self, ids: &[ItemId]) -> Result<(), ClientError> {
        let response = self
            .client
            .delete(format!("{}/item/batch", self.base_url))
            .json(&DeleteBatchRequest { ids })
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}

/// Map non-success statuses to [`ClientError`].
async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound);
    }
    let message = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}
