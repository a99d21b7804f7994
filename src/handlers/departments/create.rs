// handlers/departments/create.rs - POST /departments handler

use crate::database::models::{CreateDepartment, Department};
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::services::department_service::DepartmentService;

/// POST /departments - `{ id, name_en, name_hi }`; a taken id is a 400
pub async fn department_create(JsonBody(input): JsonBody<CreateDepartment>) -> ApiResult<Department> {
    let department = DepartmentService::new()?.create(input).await?;
    Ok(ApiResponse::created(department))
}
