use std::sync::Arc;

use prassign_server::{ServerConfig, run_server_with_handle, state::AppState};
use prassign_storage::MemoryStorage;
use serde_json::Value;

pub struct TestServer {
    http_url: String,
    client: reqwest::Client,
    handle: actix_web::dev::ServerHandle,
}

impl TestServer {
    /// # Errors
    ///
    /// Returns an error if the server fails to start or no ports are available
    pub async fn start() -> anyhow::Result<Self> {
        let config = ServerConfig::new("127.0.0.1".to_string(), 0);
        let state = AppState::from_storage(Arc::new(MemoryStorage::new()));

        let response = run_server_with_handle(&config, state)?;
        let port = response
            .addrs
            .first()
            .expect("Expected at least one address")
            .port();
        let http_url = format!("http://127.0.0.1:{port}");

        wait_for_server_ready(&http_url).await?;

        Ok(Self {
            http_url,
            client: reqwest::Client::new(),
            handle: response.handle,
        })
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.http_url)
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not JSON
    pub async fn get(&self, path: &str) -> anyhow::Result<(u16, Value)> {
        let response = self.client.get(self.url(path)).send().await?;
        let status = response.status().as_u16();
        Ok((status, response.json().await?))
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not JSON
    pub async fn post(&self, path: &str, body: &Value) -> anyhow::Result<(u16, Value)> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        let status = response.status().as_u16();
        Ok((status, response.json().await?))
    }

    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not JSON
    pub async fn post_raw(&self, path: &str, body: &'static str) -> anyhow::Result<(u16, Value)> {
        let response = self
            .client
            .post(self.url(path))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await?;
        let status = response.status().as_u16();
        Ok((status, response.json().await?))
    }

    /// Team "backend": `u1` (author), `u2` and `u3` active, `u4` inactive.
    ///
    /// # Errors
    ///
    /// Returns an error if the team could not be created
    pub async fn seed_backend(&self) -> anyhow::Result<()> {
        let (status, _) = self
            .post(
                "/team/add",
                &serde_json::json!({
                    "team_name": "backend",
                    "members": [
                        {"user_id": "u1", "username": "Alice", "is_active": true},
                        {"user_id": "u2", "username": "Bob", "is_active": true},
                        {"user_id": "u3", "username": "Carol", "is_active": true},
                        {"user_id": "u4", "username": "Dave", "is_active": false}
                    ]
                }),
            )
            .await?;
        anyhow::ensure!(status == 201, "seeding team returned {status}");
        Ok(())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let handle = self.handle.clone();
        tokio::spawn(async move {
            handle.stop(true).await;
        });
    }
}

async fn wait_for_server_ready(url: &str) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let health_url = format!("{url}/health");

    for _ in 0..30 {
        if let Ok(response) = client.get(&health_url).send().await
            && response.status().is_success()
        {
            return Ok(());
        }
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    }

    anyhow::bail!("Server failed to start within timeout")
}
