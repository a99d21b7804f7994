// handlers/email_reminders/list.rs - GET /email-reminders/case/:caseId handler

use axum::extract::Path;

use crate::database::models::EmailReminder;
use crate::handlers::utils::parse_uuid;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::reminder_service::ReminderService;

pub async fn reminder_list(Path(case_id): Path<String>) -> ApiResult<Vec<EmailReminder>> {
    let case_id = parse_uuid("caseId", &case_id)?;
    let reminders = ReminderService::new()?.list_for_case(case_id).await?;
    Ok(ApiResponse::success(reminders))
}
