// handlers/sub_departments/show.rs - GET /sub-departments/:id handler

use axum::extract::Path;

use crate::database::models::SubDepartment;
use crate::handlers::utils::parse_uuid;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::sub_department_service::SubDepartmentService;

pub async fn sub_department_show(Path(id): Path<String>) -> ApiResult<SubDepartment> {
    let id = parse_uuid("id", &id)?;
    let sub_department = SubDepartmentService::new()?.get(id).await?;
    Ok(ApiResponse::success(sub_department))
}
