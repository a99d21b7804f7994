// handlers/departments/seed.rs - POST /seed-data handler

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::department_service::{DepartmentService, SeedReport};

/// POST /seed-data - install the reference departments; repeatable
pub async fn department_seed() -> ApiResult<SeedReport> {
    let report = DepartmentService::new()?.seed().await?;
    Ok(ApiResponse::success(report))
}
