// handlers/admin/login.rs - POST /admin/login handler

use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::services::admin_service::{AdminService, LoginRequest, LoginResult};

/// POST /admin/login - `{ email, password }`; 401 "Invalid credentials" for
/// an unknown email and a wrong password alike
pub async fn admin_login(JsonBody(request): JsonBody<LoginRequest>) -> ApiResult<LoginResult> {
    let result = AdminService::new()?.login(request).await?;
    Ok(ApiResponse::success(result))
}
