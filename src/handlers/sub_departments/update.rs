// handlers/sub_departments/update.rs - PUT /sub-departments/:id handler

use axum::extract::Path;

use crate::database::models::{SubDepartment, UpdateSubDepartment};
use crate::handlers::utils::parse_uuid;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::services::sub_department_service::SubDepartmentService;

pub async fn sub_department_update(
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<UpdateSubDepartment>,
) -> ApiResult<SubDepartment> {
    let id = parse_uuid("id", &id)?;
    let sub_department = SubDepartmentService::new()?.update(id, patch).await?;
    Ok(ApiResponse::success(sub_department))
}
