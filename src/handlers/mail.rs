// handlers/mail.rs - POST /send-email handler

use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::services::mail_service::{self, OutgoingEmail};

/// POST /send-email - `{ to, subject, html }`. Not tied to any case.
pub async fn send_email(JsonBody(email): JsonBody<OutgoingEmail>) -> ApiResult<Value> {
    let mailer = mail_service::mailer()?;
    let to = email.to.clone();
    mail_service::send_email(mailer.as_ref(), email).await?;
    Ok(ApiResponse::success(json!({ "message": "Email sent successfully", "to": to })))
}
