#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use agency_collab_api::auth::{encode_token, Claims};
use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

pub const TEST_SECRET: &str = "integration-test-secret";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/agency-collab-api");
        cmd.env("API_PORT", port.to_string())
            .env("APP_ENV", "development")
            .env("AUTH_JWT_SECRET", TEST_SECRET)
            .env("AUTH_JWT_AUDIENCE", "")
            .env("API_ENABLE_REQUEST_LOGGING", "false")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // DATABASE_URL is inherited (or read from .env by the server)
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    /// Waits for /health; returns true when the database answered too
    async fn wait_ready(&self, timeout: Duration) -> Result<bool> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                match resp.status() {
                    StatusCode::OK => return Ok(true),
                    StatusCode::SERVICE_UNAVAILABLE => return Ok(false),
                    _ => {}
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// A user signed in to a freshly seeded organization
pub struct TestUser {
    pub user_id: Uuid,
    pub profile_id: Uuid,
    pub token: String,
}

/// One isolated organization with an admin, a brand and an influencer
pub struct TestOrg {
    pub server: &'static TestServer,
    pub organization_id: Uuid,
    pub admin: TestUser,
    pub brand: TestUser,
    pub influencer: TestUser,
    client: reqwest::Client,
}

/// Seeds a new organization, or returns None when no database is configured
pub async fn seeded_org() -> Result<Option<TestOrg>> {
    let _ = dotenvy::dotenv();
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping database-backed test");
        return Ok(None);
    };

    let server = ensure_server().await?;
    if !server.wait_ready(Duration::from_secs(10)).await? {
        eprintln!("database unavailable; skipping database-backed test");
        return Ok(None);
    }

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .context("failed to connect to test database")?;

    let organization_id: Uuid = sqlx::query_scalar("INSERT INTO organizations (name) VALUES ($1) RETURNING id")
        .bind(format!("Test agency {}", Uuid::new_v4().simple()))
        .fetch_one(&pool)
        .await?;

    let mut users = Vec::new();
    for (role, name) in [("agency_admin", "Ada Admin"), ("brand", "Bert Brand"), ("influencer", "Ines Influencer")] {
        let user_id = Uuid::new_v4();
        let profile_id: Uuid = sqlx::query_scalar(
            "INSERT INTO user_profiles (user_id, organization_id, role, full_name) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(user_id)
        .bind(organization_id)
        .bind(role)
        .bind(name)
        .fetch_one(&pool)
        .await?;

        users.push(TestUser {
            user_id,
            profile_id,
            token: token_for(user_id)?,
        });
    }
    pool.close().await;

    let mut users = users.into_iter();
    let (Some(admin), Some(brand), Some(influencer)) = (users.next(), users.next(), users.next()) else {
        anyhow::bail!("failed to seed users");
    };

    Ok(Some(TestOrg {
        server,
        organization_id,
        admin,
        brand,
        influencer,
        client: reqwest::Client::new(),
    }))
}

pub fn token_for(user_id: Uuid) -> Result<String> {
    let mut claims = Claims::new(user_id, 1)?;
    claims.aud = None;
    Ok(encode_token(&claims, TEST_SECRET)?)
}

impl TestOrg {
    pub async fn get(&self, user: &TestUser, path: &str) -> Result<(StatusCode, Value)> {
        let res = self
            .client
            .get(self.server.url(path))
            .bearer_auth(&user.token)
            .send()
            .await?;
        Ok((res.status(), res.json().await?))
    }

    pub async fn send(&self, user: &TestUser, method: reqwest::Method, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        let res = self
            .client
            .request(method, self.server.url(path))
            .bearer_auth(&user.token)
            .json(&body)
            .send()
            .await?;
        Ok((res.status(), res.json().await?))
    }

    pub async fn post(&self, user: &TestUser, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(user, reqwest::Method::POST, path, body).await
    }

    pub async fn put(&self, user: &TestUser, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(user, reqwest::Method::PUT, path, body).await
    }

    pub async fn patch(&self, user: &TestUser, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(user, reqwest::Method::PATCH, path, body).await
    }

    pub async fn delete(&self, user: &TestUser, path: &str) -> Result<(StatusCode, Value)> {
        let res = self
            .client
            .delete(self.server.url(path))
            .bearer_auth(&user.token)
            .send()
            .await?;
        Ok((res.status(), res.json().await?))
    }

    /// Creates a company as the admin and returns its id
    pub async fn company(&self, name: &str) -> Result<String> {
        let (status, body) = self
            .post(&self.admin, "/api/companies", serde_json::json!({ "name": name }))
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "company create failed: {} {}", status, body);
        Ok(body["data"]["id"].as_str().context("company id")?.to_string())
    }
}
