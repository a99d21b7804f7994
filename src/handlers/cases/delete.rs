// handlers/cases/delete.rs - DELETE /cases/:id handler

use axum::extract::Path;
use serde_json::{json, Value};

use crate::handlers::utils::parse_uuid;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::case_service::CaseService;

pub async fn case_delete(Path(id): Path<String>) -> ApiResult<Value> {
    let id = parse_uuid("id", &id)?;
    CaseService::new()?.delete(id).await?;
    Ok(ApiResponse::success(json!({ "id": id, "message": "Case deleted successfully" })))
}
