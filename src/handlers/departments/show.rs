// handlers/departments/show.rs - GET /departments/:id handler

use axum::extract::Path;

use crate::database::models::Department;
use crate::handlers::utils::parse_code;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::department_service::DepartmentService;

pub async fn department_show(Path(id): Path<String>) -> ApiResult<Department> {
    let code = parse_code("id", &id)?;
    let department = DepartmentService::new()?.get(code).await?;
    Ok(ApiResponse::success(department))
}
