use crate::api::payload;
use crate::error::Result;
use crate::fetch::Fetchers;
use crate::notice::Notice;
use serde::Serialize;
use serde_json::Value;
use validator::Validate;

/// Form data for registering a URL. Both fields must be non-empty before a
/// request is sent.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewUrl {
    #[validate(length(min = 1))]
    pub url: String,
    #[validate(length(min = 1))]
    pub name: String,
}

impl NewUrl {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
        }
    }
}

/// User-initiated operations outside the refresh cadence.
#[derive(Clone)]
pub struct Actions {
    fetchers: Fetchers,
}

impl Actions {
    pub fn new(fetchers: Fetchers) -> Self {
        Self { fetchers }
    }

    pub async fn add_url(&self, new_url: NewUrl) -> Notice {
        if new_url.validate().is_err() {
            return Notice::error("Name and URL are required");
        }

        let body = match serde_json::to_value(&new_url) {
            Ok(body) => body,
            Err(e) => return Notice::error(format!("Failed to add URL: {}", e)),
        };
        let outcome = checked(self.fetchers.backend().post("urls", Some(body)).await);

        match outcome {
            Ok(_) => {
                log::info!("Added {} ({})", new_url.name, new_url.url);
                self.reload_urls().await;
                Notice::info(format!("Now monitoring {}", new_url.name))
            }
            Err(e) => {
                log::error!("Adding {} failed: {}", new_url.url, e);
                Notice::from_error("Failed to add URL", &e)
            }
        }
    }

    pub async fn delete_url(&self, url_id: u64) -> Notice {
        let path = format!("urls/{}", url_id);
        let outcome = checked(self.fetchers.backend().delete(&path).await);

        match outcome {
            Ok(message) => {
                log::info!("Removed URL {}", url_id);
                self.reload_urls().await;
                Notice::info(message.unwrap_or_else(|| "URL removed from monitoring".to_string()))
            }
            Err(e) => {
                log::error!("Removing URL {} failed: {}", url_id, e);
                Notice::from_error("Failed to remove URL", &e)
            }
        }
    }

    pub async fn open_history(&self, url_id: u64) {
        self.fetchers.fetch_url_history(url_id).await;
    }

    pub async fn open_results(&self, test_id: u64) {
        self.fetchers.fetch_test_results(test_id).await;
    }

    pub async fn open_steps(&self, test_id: u64, result_id: u64) {
        self.fetchers.fetch_result_steps(test_id, result_id).await;
    }

    async fn reload_urls(&self) {
        futures::join!(self.fetchers.fetch_urls(), self.fetchers.fetch_stats());
    }
}

fn checked(response: Result<Value>) -> Result<Option<String>> {
    response.and_then(payload::expect_success)
}
