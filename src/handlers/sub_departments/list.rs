// handlers/sub_departments/list.rs - GET /sub-departments handler

use serde::Deserialize;

use crate::database::models::SubDepartment;
use crate::handlers::utils::parse_code;
use crate::middleware::{ApiResponse, ApiResult, QueryParams};
use crate::services::sub_department_service::SubDepartmentService;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "departmentId")]
    pub department_id: Option<String>,
}

pub async fn sub_department_list(QueryParams(query): QueryParams<ListQuery>) -> ApiResult<Vec<SubDepartment>> {
    let department_id = query
        .department_id
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_code("departmentId", raw))
        .transpose()?;

    let sub_departments = SubDepartmentService::new()?.list(department_id).await?;
    Ok(ApiResponse::success(sub_departments))
}
