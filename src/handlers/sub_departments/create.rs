// handlers/sub_departments/create.rs - POST /sub-departments handler

use crate::database::models::{CreateSubDepartment, SubDepartment};
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::services::sub_department_service::SubDepartmentService;

/// POST /sub-departments - requires departmentId, name_en and name_hi; the
/// department must exist
pub async fn sub_department_create(JsonBody(input): JsonBody<CreateSubDepartment>) -> ApiResult<SubDepartment> {
    let sub_department = SubDepartmentService::new()?.create(input).await?;
    Ok(ApiResponse::created(sub_department))
}
