mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::TestServer;

#[tokio::test]
async fn case_lifecycle_with_populated_sub_department() -> Result<()> {
    let Some(server) = TestServer::start().await? else { return Ok(()) };

    let department = server.create_department().await?;
    let sub_department = server.create_sub_department(department, "Land Records").await?;

    let case = server
        .create_case(json!({ "department": department, "subDepartment": sub_department, "writType": "Mandamus" }))
        .await?;
    let id = case["id"].as_str().unwrap().to_string();
    assert_eq!(case["status"], "Pending");
    assert_eq!(case["reminderCount"], 0);
    assert_eq!(case["subDepartment"]["id"], sub_department.as_str());
    assert_eq!(case["subDepartment"]["name_en"], "Land Records");

    let (status, body) = server.put(&format!("/cases/{}", id), json!({ "status": "Resolved", "writType": null })).await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["status"], "Resolved");
    assert!(body["data"]["writType"].is_null());
    assert_eq!(body["data"]["caseNumber"], case["caseNumber"]);

    let (status, _) = server.delete(&format!("/cases/{}", id)).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = server.get(&format!("/cases/{}", id)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    Ok(())
}

#[tokio::test]
async fn create_rejects_unknown_sub_department() -> Result<()> {
    let Some(server) = TestServer::start().await? else { return Ok(()) };

    let (status, body) = server
        .post(
            "/cases",
            json!({
                "caseNumber": "WP-1",
                "name": "Orphan",
                "filingDate": "2024-01-15",
                "department": 1,
                "subDepartment": uuid::Uuid::new_v4()
            }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Sub-department not found");
    Ok(())
}

#[tokio::test]
async fn sub_department_filter_accepts_id_or_department_code() -> Result<()> {
    let Some(server) = TestServer::start().await? else { return Ok(()) };

    let department = server.create_department().await?;
    let other_department = server.create_department().await?;
    let first = server.create_sub_department(department, "Appeals").await?;
    let second = server.create_sub_department(department, "Writs").await?;
    let elsewhere = server.create_sub_department(other_department, "Elsewhere").await?;

    server.create_case(json!({ "department": department, "subDepartment": first })).await?;
    server.create_case(json!({ "department": department, "subDepartment": second })).await?;
    server.create_case(json!({ "department": other_department, "subDepartment": elsewhere })).await?;

    // By department code: every case under any of its sub-departments
    let (status, body) = server.get(&format!("/cases?subDepartment={}", department)).await?;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let cases = body["data"]["cases"].as_array().unwrap();
    assert_eq!(cases.len(), 2);
    assert!(cases.iter().all(|c| c["subDepartment"]["departmentId"] == department));

    // By identity: exactly that sub-department
    let (_, body) = server.get(&format!("/cases?subDepartment={}", second)).await?;
    let cases = body["data"]["cases"].as_array().unwrap();
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0]["subDepartmentId"], second.as_str());

    // A department without sub-departments matches nothing
    let empty = server.create_department().await?;
    let (status, body) = server.get(&format!("/cases?subDepartment={}", empty)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["cases"].as_array().unwrap().len(), 0);
    Ok(())
}

#[tokio::test]
async fn search_is_case_insensitive_across_fields() -> Result<()> {
    let Some(server) = TestServer::start().await? else { return Ok(()) };

    let department = server.create_department().await?;
    let marker = format!("zq{}", common::unique_code());
    server
        .create_case(json!({ "department": department, "name": format!("Kumar {} Trust", marker.to_uppercase()) }))
        .await?;
    server
        .create_case(json!({ "department": department, "petitionNumber": format!("pet-{}", marker) }))
        .await?;
    server.create_case(json!({ "department": department })).await?;

    let (status, body) = server.get(&format!("/cases?department={}&search={}", department, marker)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["cases"].as_array().unwrap().len(), 2);
    assert!(body["data"]["pagination"].is_null());
    Ok(())
}

#[tokio::test]
async fn search_matches_case_number_ignoring_case() -> Result<()> {
    let Some(server) = TestServer::start().await? else { return Ok(()) };

    let department = server.create_department().await?;
    server
        .create_case(json!({ "department": department, "caseNumber": "WP-2024-001" }))
        .await?;
    server
        .create_case(json!({ "department": department, "caseNumber": "CWJC-17-2023" }))
        .await?;

    let (status, body) = server.get(&format!("/cases?department={}&search=wp-2024", department)).await?;
    assert_eq!(status, StatusCode::OK);
    let cases = body["data"]["cases"].as_array().unwrap();
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0]["caseNumber"], "WP-2024-001");
    Ok(())
}

#[tokio::test]
async fn pagination_windows_newest_first() -> Result<()> {
    let Some(server) = TestServer::start().await? else { return Ok(()) };

    let department = server.create_department().await?;
    let mut created = Vec::new();
    for _ in 0..7 {
        let case = server.create_case(json!({ "department": department })).await?;
        created.push(case["id"].as_str().unwrap().to_string());
    }

    let (status, body) = server.get(&format!("/cases?department={}&page=1&limit=3", department)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"], json!({ "total": 7, "page": 1, "limit": 3, "pages": 3 }));
    let first_page = body["data"]["cases"].as_array().unwrap();
    assert_eq!(first_page.len(), 3);
    assert_eq!(first_page[0]["id"], created[6].as_str());

    for (page, expected) in [(2, 3), (3, 1), (4, 0)] {
        let (_, body) = server
            .get(&format!("/cases?department={}&page={}&limit=3", department, page))
            .await?;
        assert_eq!(body["data"]["cases"].as_array().unwrap().len(), expected, "page {}", page);
    }
    Ok(())
}
