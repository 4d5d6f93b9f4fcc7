use crate::api::payload;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// The monitoring backend, seen as a set of JSON endpoints.
///
/// Paths are relative to the API base and may carry a query string
/// (`overview?hours=6`).
#[async_trait]
pub trait Backend: Send + Sync {
    async fn get(&self, path: &str) -> Result<Value>;
    async fn post(&self, path: &str, body: Option<Value>) -> Result<Value>;
    async fn delete(&self, path: &str) -> Result<Value>;
}

pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(api_base: &str, timeout: Duration, user_agent: &str) -> Result<Self> {
        let mut base = Url::parse(api_base)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client, base })
    }

    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = self.endpoint(path)?;
        log::debug!("{} {}", method, url);

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;
        Self::read_json(path, response).await
    }

    async fn read_json(path: &str, response: Response) -> Result<Value> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // Validation failures come back as 4xx with a `success: false` body.
            if let Some(message) = serde_json::from_str::<Value>(&text)
                .ok()
                .as_ref()
                .and_then(payload::rejection)
            {
                return Err(Error::Rejected(message));
            }
            return Err(Error::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn get(&self, path: &str) -> Result<Value> {
        self.send(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: Option<Value>) -> Result<Value> {
        self.send(Method::POST, path, body).await
    }

    async fn delete(&self, path: &str) -> Result<Value> {
        self.send(Method::DELETE, path, None).await
    }
}
