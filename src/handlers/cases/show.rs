// handlers/cases/show.rs - GET /cases/:id handler

use axum::extract::Path;

use crate::database::models::CaseView;
use crate::handlers::utils::parse_uuid;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::case_service::CaseService;

pub async fn case_show(Path(id): Path<String>) -> ApiResult<CaseView> {
    let id = parse_uuid("id", &id)?;
    let case = CaseService::new()?.get(id).await?;
    Ok(ApiResponse::success(case))
}
