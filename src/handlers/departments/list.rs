// handlers/departments/list.rs - GET /departments handler

use crate::database::models::Department;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::department_service::DepartmentService;

pub async fn department_list() -> ApiResult<Vec<Department>> {
    let departments = DepartmentService::new()?.list().await?;
    Ok(ApiResponse::success(departments))
}
