mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::TestServer;

#[tokio::test]
async fn duplicate_code_is_rejected() -> Result<()> {
    let Some(server) = TestServer::start().await? else { return Ok(()) };

    let code = server.create_department().await?;
    let (status, body) = server
        .post("/departments", json!({ "id": code, "name_en": "Again", "name_hi": "फिर" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Department with this ID already exists");

    let (status, body) = server.get(&format!("/departments/{}", code)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name_en"], format!("Department {}", code));
    Ok(())
}

#[tokio::test]
async fn seed_is_idempotent_and_list_is_sorted() -> Result<()> {
    let Some(server) = TestServer::start().await? else { return Ok(()) };

    server.post("/seed-data", json!({})).await?;
    let (status, body) = server.post("/seed-data", json!({})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["inserted"], 0);
    assert_eq!(body["data"]["existing"], 2);

    let (_, body) = server.get("/departments").await?;
    let ids: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_i64().unwrap())
        .collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
    assert!(ids.contains(&1) && ids.contains(&2));
    Ok(())
}

#[tokio::test]
async fn unknown_code_is_404() -> Result<()> {
    let Some(server) = TestServer::start().await? else { return Ok(()) };

    let (status, body) = server.get(&format!("/departments/{}", common::unique_code())).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    Ok(())
}
