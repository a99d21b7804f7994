// handlers/email_reminders/create.rs - POST /email-reminders handler

use crate::database::models::{CreateEmailReminder, EmailReminder};
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::services::reminder_service::ReminderService;

/// POST /email-reminders - `{ caseId, recipientEmail, status? }`
pub async fn reminder_create(JsonBody(input): JsonBody<CreateEmailReminder>) -> ApiResult<EmailReminder> {
    let reminder = ReminderService::new()?.record(input).await?;
    Ok(ApiResponse::created(reminder))
}
