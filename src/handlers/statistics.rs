// handlers/statistics.rs - GET /statistics handler

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::statistics_service::{Statistics, StatisticsService};

pub async fn statistics() -> ApiResult<Statistics> {
    let stats = StatisticsService::new()?.collect().await?;
    Ok(ApiResponse::success(stats))
}
