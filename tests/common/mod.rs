#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

/// A server process on its own port, killed when dropped
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
    child: Child,
}

impl TestServer {
    /// Spawn the server binary against `DATABASE_URL`. Returns `None` when no
    /// database is configured so the calling test can skip.
    pub async fn start() -> Result<Option<Self>> {
        let _ = dotenvy::dotenv();
        if std::env::var("DATABASE_URL").is_err() {
            eprintln!("DATABASE_URL not set; skipping integration test");
            return Ok(None);
        }

        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let child = Command::new(env!("CARGO_BIN_EXE_case-records-api"))
            .env("CASES_API_PORT", port.to_string())
            .env("HOST", "127.0.0.1")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        let server = Self {
            base_url: format!("http://127.0.0.1:{}", port),
            client: Client::new(),
            child,
        };
        server.wait_ready(Duration::from_secs(15)).await?;
        Ok(Some(server))
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> Result<(StatusCode, Value)> {
        let resp = self.client.get(self.url(path)).send().await?;
        Ok((resp.status(), resp.json().await?))
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        let resp = self.client.post(self.url(path)).json(&body).send().await?;
        Ok((resp.status(), resp.json().await?))
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        let resp = self.client.put(self.url(path)).json(&body).send().await?;
        Ok((resp.status(), resp.json().await?))
    }

    pub async fn delete(&self, path: &str) -> Result<(StatusCode, Value)> {
        let resp = self.client.delete(self.url(path)).send().await?;
        Ok((resp.status(), resp.json().await?))
    }

    /// Create a department under a code no other test uses
    pub async fn create_department(&self) -> Result<i64> {
        let code = unique_code();
        let (status, body) = self
            .post(
                "/departments",
                json!({ "id": code, "name_en": format!("Department {}", code), "name_hi": "विभाग" }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "department create failed: {}", body);
        Ok(code)
    }

    pub async fn create_sub_department(&self, department: i64, name_en: &str) -> Result<String> {
        let (status, body) = self
            .post(
                "/sub-departments",
                json!({ "departmentId": department, "name_en": name_en, "name_hi": "उप विभाग" }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "sub-department create failed: {}", body);
        Ok(body["data"]["id"].as_str().context("sub-department id")?.to_string())
    }

    pub async fn create_case(&self, fields: Value) -> Result<Value> {
        let mut body = json!({
            "caseNumber": format!("WP-{}", Uuid::new_v4().simple()),
            "name": "State v. Records",
            "filingDate": "2024-01-15",
            "department": 0
        });
        if let (Some(target), Some(extra)) = (body.as_object_mut(), fields.as_object()) {
            for (k, v) in extra {
                target.insert(k.clone(), v.clone());
            }
        }
        let (status, body) = self.post("/cases", body).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "case create failed: {}", body);
        Ok(body["data"].clone())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Department codes are externally assigned integers; tests pick random ones
/// far from the seeded range.
pub fn unique_code() -> i64 {
    1_000 + (Uuid::new_v4().as_u128() % 1_000_000_000) as i64
}
