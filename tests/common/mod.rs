#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use remax_directory::config::{AppConfig, StorageBackend};
use remax_directory::database::models::{AccountDraft, Role};
use remax_directory::database::{AccountRepository, MemoryAccountRepository};
use remax_directory::handlers;
use remax_directory::state::AppState;

pub const PASSWORD: &str = "password123";

/// The router served in-process over a fresh in-memory store.
pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    pub state: AppState,
    pub upload_dir: PathBuf,
}

pub async fn spawn_app() -> Result<TestApp> {
    let upload_dir = std::env::temp_dir().join(format!("remax-it-{}", uuid::Uuid::new_v4()));

    let mut config = AppConfig::development();
    config.storage.backend = StorageBackend::Memory;
    config.api.enable_request_logging = false;
    config.security.jwt_secret = "integration-test-secret".to_string();
    config.security.bcrypt_cost = 4;
    config.uploads.dir = upload_dir.clone();

    let repo: Arc<dyn AccountRepository> = Arc::new(MemoryAccountRepository::new());
    let state = AppState::new(config, repo)?;

    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    let app = handlers::app(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(TestApp {
        base_url: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
        state,
        upload_dir,
    })
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Register a plain user and return `(token, user)`.
    pub async fn register(&self, email: &str) -> Result<(String, Value)> {
        let res = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&json!({
                "firstName": "Test",
                "lastName": "User",
                "email": email,
                "password": PASSWORD
            }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());
        let body: Value = res.json().await?;
        let token = body["token"].as_str().context("token missing")?.to_string();
        Ok((token, body["data"]["user"].clone()))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?)
    }

    /// Admins can only be created out of band, so go through the store directly.
    pub async fn admin_token(&self) -> Result<String> {
        let email = format!("admin-{}@example.com", uuid::Uuid::new_v4());
        self.state
            .profiles()
            .create(AccountDraft {
                first_name: "Admin".to_string(),
                last_name: "User".to_string(),
                email: email.clone(),
                password: PASSWORD.to_string(),
                role: Role::Admin,
                is_verified: true,
                ..Default::default()
            })
            .await?;
        let body: Value = self.login(&email, PASSWORD).await?.json().await?;
        Ok(body["token"].as_str().context("token missing")?.to_string())
    }

    pub async fn get(&self, path: &str, token: &str) -> Result<(StatusCode, Value)> {
        let res = self.client.get(self.url(path)).bearer_auth(token).send().await?;
        Ok((res.status(), res.json().await?))
    }

    pub async fn post(&self, path: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        let res = self.client.post(self.url(path)).bearer_auth(token).json(&body).send().await?;
        Ok((res.status(), res.json().await?))
    }

    pub async fn put(&self, path: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        let res = self.client.put(self.url(path)).bearer_auth(token).json(&body).send().await?;
        Ok((res.status(), res.json().await?))
    }

    pub async fn delete(&self, path: &str, token: &str) -> Result<(StatusCode, Value)> {
        let res = self.client.delete(self.url(path)).bearer_auth(token).send().await?;
        Ok((res.status(), res.json().await?))
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

/// The real server binary, started with the in-memory backend.
pub struct TestServer {
    pub base_url: String,
    child: Child,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let child = Command::new(env!("CARGO_BIN_EXE_remax-directory"))
            .env("HOST", "127.0.0.1")
            .env("PORT", port.to_string())
            .env("STORAGE_BACKEND", "memory")
            .env("JWT_SECRET", "integration-test-secret")
            .env("BCRYPT_COST", "4")
            .env("UPLOAD_DIR", std::env::temp_dir().join("remax-it-bin"))
            .env("RUST_LOG", "warn")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        let server = Self { base_url, child };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = client.get(format!("{}/api/health", self.base_url)).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
