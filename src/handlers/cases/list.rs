// handlers/cases/list.rs - GET /cases handler

use crate::middleware::{ApiResponse, ApiResult, QueryParams};
use crate::services::case_query::{CaseListParams, CaseQuery};
use crate::services::case_service::{CaseList, CaseService};

/// GET /cases - filter by department, subDepartment (id or department
/// code), status and search; paginated when both page and limit are given.
pub async fn case_list(QueryParams(params): QueryParams<CaseListParams>) -> ApiResult<CaseList> {
    let query = CaseQuery::try_from(params)?;
    let list = CaseService::new()?.list(&query).await?;
    Ok(ApiResponse::success(list))
}
