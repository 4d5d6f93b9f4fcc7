#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uptime_dashboard::{Backend, Error, Result};

/// In-memory backend keyed by `"<METHOD> <path>"`. Unknown routes answer 500.
#[derive(Default)]
pub struct MockBackend {
    routes: Mutex<HashMap<String, Option<Value>>>,
    delays: Mutex<HashMap<String, Duration>>,
    calls: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, method: &str, path: &str, body: Value) {
        self.routes
            .lock()
            .unwrap()
            .insert(format!("{} {}", method, path), Some(body));
    }

    pub fn fail(&self, method: &str, path: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert(format!("{} {}", method, path), None);
    }

    /// Holds the answer to `method path` back for `delay` after the call.
    pub fn delay(&self, method: &str, path: &str, delay: Duration) {
        self.delays
            .lock()
            .unwrap()
            .insert(format!("{} {}", method, path), delay);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    async fn answer(&self, method: &str, path: &str) -> Result<Value> {
        let key = format!("{} {}", method, path);
        self.calls.lock().unwrap().push(key.clone());
        let delay = self.delays.lock().unwrap().get(&key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match self.routes.lock().unwrap().get(&key) {
            Some(Some(body)) => Ok(body.clone()),
            _ => Err(Error::Status {
                path: path.to_string(),
                status: 500,
            }),
        }
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn get(&self, path: &str) -> Result<Value> {
        self.answer("GET", path).await
    }

    async fn post(&self, path: &str, _body: Option<Value>) -> Result<Value> {
        self.answer("POST", path).await
    }

    async fn delete(&self, path: &str) -> Result<Value> {
        self.answer("DELETE", path).await
    }
}

pub fn url_json(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "url": format!("https://{}.example", name.to_lowercase()),
        "is_active": true,
        "latest_check": {
            "id": id * 10,
            "url_id": id,
            "status": "online",
            "response_time": 0.21,
            "status_code": 200,
            "checked_at": "2024-05-01T10:00:00"
        }
    })
}

pub fn test_json(id: u64) -> Value {
    json!({
        "id": id,
        "test_name": format!("Purchase flow {}", id),
        "site_url": "https://shop.example",
        "latest_status": "success",
        "latest_execution": "2024-05-01T09:00:00",
        "latest_duration": 42.0
    })
}

pub fn result_json(id: u64, test_id: u64) -> Value {
    json!({
        "id": id,
        "test_id": test_id,
        "executed_at": "2024-05-01T10:00:00",
        "status": "partial",
        "steps_completed": 4,
        "total_steps": 6,
        "duration_seconds": 37.5,
        "success_rate": 66.7
    })
}

pub fn overview_json() -> Value {
    json!({
        "success": true,
        "consolidated_data": [
            {
                "url_id": 1,
                "url_name": "Shop",
                "data_points": [
                    { "timestamp": "2024-05-01T10:00:00", "response_time": 100.0 },
                    { "timestamp": "2024-05-01T10:05:00", "response_time": 200.0 }
                ]
            },
            {
                "url_id": 2,
                "url_name": "Cart",
                "data_points": [
                    { "timestamp": "2024-05-01T10:00:00", "response_time": 150.0 }
                ]
            }
        ],
        "performance_summary": [
            {
                "url_id": 1,
                "url_name": "Shop",
                "total_checks": 2,
                "online_checks": 2,
                "uptime_percentage": 100.0,
                "avg_response_time": 0.15,
                "min_response_time": 0.1,
                "max_response_time": 0.2
            }
        ]
    })
}

/// A backend answering every periodic endpoint with plausible data.
pub fn healthy_backend(hours: u32) -> Arc<MockBackend> {
    let backend = MockBackend::new();
    backend.respond("GET", "urls", json!({ "success": true, "urls": [url_json(1, "Shop"), url_json(2, "Cart")] }));
    backend.respond(
        "GET",
        "stats",
        json!({ "success": true, "stats": { "total_urls": 2, "online_urls": 2, "offline_urls": 0, "checks_last_24h": 48 } }),
    );
    backend.respond("GET", &format!("overview?hours={}", hours), overview_json());
    backend.respond("GET", "synthetic-tests", json!([test_json(1)]));
    backend.respond(
        "GET",
        "synthetic-stats",
        json!({ "active_tests": 1, "success_rate": 50.0, "total_executions": 4, "avg_duration": 40.0 }),
    );
    backend
}
