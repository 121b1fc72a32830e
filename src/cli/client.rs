use std::time::Duration;

use anyhow::{anyhow, Context};
use serde_json::Value;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Thin reqwest wrapper that unwraps the `{ success, data }` envelope
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            http,
        })
    }

    /// GET `path` and return the envelope's `data`
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> anyhow::Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.get(&url).query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.with_context(|| format!("request to {} failed", url))?;
        let status = response.status();
        let body: Value = response.json().await.with_context(|| format!("invalid JSON from {}", url))?;

        if !status.is_success() || body["success"] != Value::Bool(true) {
            let message = body["message"].as_str().unwrap_or("request failed");
            return Err(anyhow!("{} ({})", message, status));
        }
        Ok(body["data"].clone())
    }
}
