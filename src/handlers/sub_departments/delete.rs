// handlers/sub_departments/delete.rs - DELETE /sub-departments/:id handler

use axum::extract::Path;
use serde_json::{json, Value};

use crate::handlers::utils::parse_uuid;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::sub_department_service::SubDepartmentService;

/// DELETE /sub-departments/:id - refused with 400 while any case links to it
pub async fn sub_department_delete(Path(id): Path<String>) -> ApiResult<Value> {
    let id = parse_uuid("id", &id)?;
    SubDepartmentService::new()?.delete(id).await?;
    Ok(ApiResponse::success(json!({ "id": id, "message": "Sub-department deleted successfully" })))
}
