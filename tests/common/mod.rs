#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;

use leads_api::auth::generate_jwt;
use leads_api::config::AppConfig;
use leads_api::store::MemoryLeadStore;
use leads_api::{router, AppState};

/// A server bound to a free port, backed by its own in-memory store
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub token: String,
    client: reqwest::Client,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let config = AppConfig::development();
        let token = generate_jwt(&config.security, "integration-tests", None)?;
        let app = router(AppState::new(Arc::new(MemoryLeadStore::new()), config));

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test port")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let server = Self { port, base_url, token, client: reqwest::Client::new() };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// GET with the test bearer token
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path)).bearer_auth(&self.token)
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path)).bearer_auth(&self.token)
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.client.put(self.url(path)).bearer_auth(&self.token)
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.client.delete(self.url(path)).bearer_auth(&self.token)
    }

    /// Add a lead and return the created record
    pub async fn add_lead(&self, lead: Value) -> Result<Value> {
        let res = self.post("/leads/addlead").json(&lead).send().await?;
        let status = res.status();
        let body = res.json::<Value>().await?;
        anyhow::ensure!(status == StatusCode::CREATED, "add failed ({}): {}", status, body);
        Ok(body["lead"].clone())
    }
}

/// A valid lead body with a unique email
pub fn lead_json(email: &str) -> Value {
    serde_json::json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": email,
        "phone": "555-0100"
    })
}

/// Merge extra fields into a lead body
pub fn with_fields(mut lead: Value, extra: Value) -> Value {
    if let (Some(obj), Some(extra)) = (lead.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            obj.insert(k.clone(), v.clone());
        }
    }
    lead
}

/// Emails of the leads in a response array, in order
pub fn emails(leads: &Value) -> Vec<String> {
    leads
        .as_array()
        .map(|arr| arr.iter().filter_map(|l| l["email"].as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}
