use serde_json::json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::database::models::{CreateEmailReminder, EmailReminder};
use crate::database::{tables, DatabaseError, DatabaseManager, Repository};
use crate::error::ApiError;
use crate::filter::{self, FilterData};

pub struct ReminderService {
    pool: PgPool,
    reminders: Repository<EmailReminder>,
}

impl ReminderService {
    pub fn new() -> Result<Self, DatabaseError> {
        let pool = DatabaseManager::pool()?;
        Ok(Self {
            reminders: Repository::new(tables::EMAIL_REMINDERS, pool.clone()),
            pool,
        })
    }

    /// Store the reminder and bump the case's reminder counters together.
    /// The counter is incremented in SQL, so concurrent reminders for the
    /// same case are all counted.
    pub async fn record(&self, input: CreateEmailReminder) -> Result<EmailReminder, ApiError> {
        let (case_id, recipient_email) = validate_reminder(&input)?;

        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;

        let touched: Option<(Uuid,)> = sqlx::query_as(
            r#"
            UPDATE cases
            SET reminder_count = reminder_count + 1,
                reminder_sent = TRUE,
                last_reminder_sent = now()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(case_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(DatabaseError::from)?;

        if touched.is_none() {
            return Err(ApiError::not_found("Case not found"));
        }

        let reminder: EmailReminder = sqlx::query_as(
            r#"
            INSERT INTO email_reminders (id, case_id, recipient_email, status)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(case_id)
        .bind(recipient_email)
        .bind(input.status.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(DatabaseError::from)?;

        tx.commit().await.map_err(DatabaseError::from)?;

        info!("Recorded {} reminder for case {}", reminder.status.as_str(), case_id);
        Ok(reminder)
    }

    /// Newest first
    pub async fn list_for_case(&self, case_id: Uuid) -> Result<Vec<EmailReminder>, DatabaseError> {
        self.reminders
            .select_any(FilterData {
                where_clause: Some(json!({ "case_id": filter::uuid_operand(case_id) })),
                order: Some(json!("sent_at desc")),
                ..Default::default()
            })
            .await
    }
}

fn validate_reminder(input: &CreateEmailReminder) -> Result<(Uuid, String), ApiError> {
    let case_id = match input.case_id.as_deref().map(str::trim) {
        None | Some("") => return Err(ApiError::missing_field("caseId")),
        Some(raw) => Uuid::parse_str(raw).map_err(|_| ApiError::invalid_field("caseId", "Expected a case id"))?,
    };

    let recipient_email = match input.recipient_email.as_deref().map(str::trim) {
        None | Some("") => return Err(ApiError::missing_field("recipientEmail")),
        Some(email) if !looks_like_email(email) => {
            return Err(ApiError::invalid_field("recipientEmail", "Invalid email address"))
        }
        Some(email) => email.to_string(),
    };

    Ok((case_id, recipient_email))
}

/// `local@domain` with both parts non-empty
pub fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::ReminderStatus;

    fn input(case_id: Option<&str>, email: Option<&str>) -> CreateEmailReminder {
        CreateEmailReminder {
            case_id: case_id.map(str::to_string),
            recipient_email: email.map(str::to_string),
            status: ReminderStatus::default(),
        }
    }

    #[test]
    fn status_defaults_to_sent() {
        let parsed: CreateEmailReminder = serde_json::from_value(json!({
            "caseId": Uuid::new_v4(),
            "recipientEmail": "clerk@court.example"
        }))
        .unwrap();
        assert_eq!(parsed.status, ReminderStatus::Sent);
    }

    #[test]
    fn requires_case_and_recipient() {
        assert!(validate_reminder(&input(None, Some("a@b.org"))).is_err());
        assert!(validate_reminder(&input(Some(&Uuid::new_v4().to_string()), None)).is_err());
        assert!(validate_reminder(&input(Some("42"), Some("a@b.org"))).is_err());
    }

    #[test]
    fn accepts_well_formed_input() {
        let id = Uuid::new_v4();
        let (case_id, email) = validate_reminder(&input(Some(&id.to_string()), Some(" a@b.org "))).unwrap();
        assert_eq!(case_id, id);
        assert_eq!(email, "a@b.org");
    }

    #[test]
    fn email_shape() {
        assert!(looks_like_email("officer@dept.gov.in"));
        assert!(!looks_like_email("officer"));
        assert!(!looks_like_email("@dept.gov.in"));
        assert!(!looks_like_email("officer@"));
        assert!(!looks_like_email("a@b@c"));
    }
}
