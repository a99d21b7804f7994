// handlers/cases/create.rs - POST /cases handler

use crate::database::models::{CaseView, CreateCase};
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::services::case_service::CaseService;

/**
 * POST /cases - Create a case
 *
 * Required: caseNumber, name, filingDate, department.
 * A non-blank subDepartment must name an existing sub-department.
 * status defaults to Pending.
 */
pub async fn case_create(JsonBody(input): JsonBody<CreateCase>) -> ApiResult<CaseView> {
    let case = CaseService::new()?.create(input).await?;
    Ok(ApiResponse::created(case))
}
