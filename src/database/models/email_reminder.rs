use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    #[default]
    Sent,
    Failed,
}

impl ReminderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderStatus::Sent => "sent",
            ReminderStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown reminder status '{0}'")]
pub struct UnknownReminderStatus(pub String);

impl FromStr for ReminderStatus {
    type Err = UnknownReminderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sent" => Ok(ReminderStatus::Sent),
            "failed" => Ok(ReminderStatus::Failed),
            other => Err(UnknownReminderStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for ReminderStatus {
    type Error = UnknownReminderStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Row in `email_reminders`
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EmailReminder {
    pub id: Uuid,
    pub case_id: Uuid,
    pub recipient_email: String,
    pub sent_at: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub status: ReminderStatus,
}

/// Body of `POST /email-reminders`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmailReminder {
    pub case_id: Option<String>,
    pub recipient_email: Option<String>,
    #[serde(default)]
    pub status: ReminderStatus,
}
