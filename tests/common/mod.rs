use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        let mut cmd = Command::new("target/debug/codedrill-api");
        cmd.env("CODEDRILL_API_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server sees DATABASE_URL and JWT_SECRET
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                // Ready on any health answer, even a degraded one
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// True when the spawned server can reach its database. Storage-backed
/// scenarios skip themselves when this is false so the suite still passes
/// on machines without Postgres.
#[allow(dead_code)]
pub async fn db_available(server: &TestServer) -> Result<bool> {
    let client = reqwest::Client::new();
    let res = client.get(format!("{}/health", server.base_url)).send().await?;
    Ok(res.status() == StatusCode::OK)
}

/// Unique suffix for usernames/emails so repeated runs never collide.
#[allow(dead_code)]
pub fn unique(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{}{}", prefix, nanos)
}

/// Register a fresh user and return (user id, bearer token).
#[allow(dead_code)]
pub async fn register_user(
    client: &reqwest::Client,
    base_url: &str,
    role: &str,
) -> Result<(i64, String)> {
    let name = unique("u");
    let res = client
        .post(format!("{}/api/auth/register", base_url))
        .json(&json!({
            "username": name,
            "email": format!("{}@example.com", name),
            "password": "secret123",
            "role": role,
        }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "registration failed: {}",
        res.status()
    );

    let body: Value = res.json().await?;
    let id = body["user"]["id"].as_i64().context("missing user id")?;
    let token = body["token"].as_str().context("missing token")?.to_string();
    Ok((id, token))
}
