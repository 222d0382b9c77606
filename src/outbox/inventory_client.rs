use reqwest::{Client, Response, StatusCode, Url};
use std::time::Duration;
use thiserror::Error;

use crate::item::{ActionResponse, AddItemRequest, Item};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("Server rejected request ({status}): {message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Outbox I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP client for the item endpoints of the fridge server.
#[derive(Clone)]
pub struct InventoryClient {
    http: Client,
    base: Url,
}

impl InventoryClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self { http, base })
    }

    pub async fn list_items(&self) -> Result<Vec<Item>, ClientError> {
        let response = self.http.get(self.endpoint(&["getData"])).send().await?;
        let response = response.error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn add_item(&self, item: &AddItemRequest) -> Result<ActionResponse, ClientError> {
        let response = self.send_add(item).await?;
        Self::read_action(response).await
    }

    pub async fn delete_item(&self, name: &str) -> Result<ActionResponse, ClientError> {
        let response = self.send_delete(name).await?;
        Self::read_action(response).await
    }

    /// Raw `POST /add`; the caller interprets the status.
    pub async fn send_add(&self, item: &AddItemRequest) -> Result<Response, reqwest::Error> {
        self.http.post(self.endpoint(&["add"])).json(item).send().await
    }

    /// Raw `DELETE /delete/:name`; the caller interprets the status.
    pub async fn send_delete(&self, name: &str) -> Result<Response, reqwest::Error> {
        self.http.delete(self.endpoint(&["delete", name])).send().await
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn read_action(response: Response) -> Result<ActionResponse, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = match response.json::<ActionResponse>().await {
            Ok(body) => body.message,
            Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
        };
        Err(ClientError::Rejected { status, message })
    }
}
