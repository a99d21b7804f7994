// handlers/admin/seed.rs - POST /admin/seed handler

use crate::config::config;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::admin_service::{AdminSeedReport, AdminService};

/// POST /admin/seed - create the configured admin accounts that are missing
pub async fn admin_seed() -> ApiResult<AdminSeedReport> {
    let report = AdminService::new()?.seed(&config().seed.admins).await?;
    Ok(ApiResponse::success(report))
}
