// handlers/root.rs - GET / and GET /health

use serde_json::{json, Value};

use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

pub async fn root() -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Case records management API",
        "endpoints": {
            "cases": "/cases",
            "departments": "/departments",
            "subDepartments": "/sub-departments",
            "emailReminders": "/email-reminders",
            "statistics": "/statistics",
            "seed": "/seed-data",
            "admin": "/admin/login",
            "sendEmail": "/send-email",
            "health": "/health"
        }
    }))
}

/// 200 when the store answers, 503 otherwise
pub async fn health() -> ApiResult<Value> {
    match DatabaseManager::health_check().await {
        Ok(()) => Ok(ApiResponse::success(json!({ "status": "ok", "database": "connected" }))),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            Err(ApiError::service_unavailable("Database unavailable"))
        }
    }
}
