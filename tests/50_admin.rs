mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::TestServer;

/// First configured seed account, as the server will see it
fn seed_account() -> (String, String) {
    std::env::var("ADMIN_SEED_ACCOUNTS")
        .ok()
        .and_then(|raw| {
            let first = raw.split(',').next()?.trim().to_string();
            let (email, password) = first.split_once(':')?;
            Some((email.to_string(), password.to_string()))
        })
        .unwrap_or_else(|| ("admin@cases.local".to_string(), "admin@123".to_string()))
}

#[tokio::test]
async fn login_does_not_reveal_which_part_was_wrong() -> Result<()> {
    let Some(server) = TestServer::start().await? else { return Ok(()) };

    let (status, _) = server.post("/admin/seed", json!({})).await?;
    assert_eq!(status, StatusCode::OK);

    // seeding again creates nothing
    let (_, body) = server.post("/admin/seed", json!({})).await?;
    assert_eq!(body["data"]["created"].as_array().unwrap().len(), 0);

    let (email, password) = seed_account();

    let (status, body) = server.post("/admin/login", json!({ "email": email, "password": password })).await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["email"], email.to_lowercase());

    let (wrong_status, wrong_body) = server
        .post("/admin/login", json!({ "email": email, "password": "not-the-password" }))
        .await?;
    let (unknown_status, unknown_body) = server
        .post("/admin/login", json!({ "email": "nobody@cases.local", "password": password }))
        .await?;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
    Ok(())
}

#[tokio::test]
async fn uuid_shaped_email_is_just_an_unknown_email() -> Result<()> {
    let Some(server) = TestServer::start().await? else { return Ok(()) };

    let (status, body) = server
        .post(
            "/admin/login",
            json!({ "email": "123e4567-e89b-12d3-a456-426614174000", "password": "x" }),
        )
        .await?;
    let (_, unknown_body) = server
        .post("/admin/login", json!({ "email": "nobody@cases.local", "password": "x" }))
        .await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", body);
    assert_eq!(body, unknown_body);
    Ok(())
}
