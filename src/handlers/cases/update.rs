// handlers/cases/update.rs - PUT /cases/:id handler

use axum::extract::Path;

use crate::database::models::{CaseView, UpdateCase};
use crate::handlers::utils::parse_uuid;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::services::case_service::CaseService;

/// PUT /cases/:id - partial update; absent fields are kept, `null` clears
pub async fn case_update(Path(id): Path<String>, JsonBody(patch): JsonBody<UpdateCase>) -> ApiResult<CaseView> {
    let id = parse_uuid("id", &id)?;
    let case = CaseService::new()?.update(id, patch).await?;
    Ok(ApiResponse::success(case))
}
