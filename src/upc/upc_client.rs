use axum::body::Bytes;
use reqwest::Client;
use std::time::Duration;

use crate::error::Result;

/// Client for the external UPC product database.
#[derive(Clone)]
pub struct UpcClient {
    http: Client,
    base_url: String,
    token: String,
}

impl UpcClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let http = Client::builder().timeout(Duration::from_secs(15)).build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Fetch the raw product document for `code`. Any non-success status
    /// from upstream is an error.
    pub async fn lookup(&self, code: &str) -> Result<Bytes> {
        let url = format!("{}/product/{}", self.base_url, code);

        let body = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(body)
    }
}
