use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::{nullable, SubDepartment, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseStatus {
    Pending,
    Resolved,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Pending => "Pending",
            CaseStatus::Resolved => "Resolved",
        }
    }
}

impl Default for CaseStatus {
    fn default() -> Self {
        CaseStatus::Pending
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown case status '{0}', expected Pending or Resolved")]
pub struct UnknownCaseStatus(pub String);

impl FromStr for CaseStatus {
    type Err = UnknownCaseStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(CaseStatus::Pending),
            "Resolved" => Ok(CaseStatus::Resolved),
            other => Err(UnknownCaseStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for CaseStatus {
    type Error = UnknownCaseStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Row in `cases`
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub id: Uuid,
    pub case_number: String,
    pub name: String,
    pub filing_date: DateTime<Utc>,
    pub petition_number: Option<String>,
    pub notice_number: Option<String>,
    pub writ_type: Option<String>,
    pub department: i32,
    pub sub_department_id: Option<Uuid>,
    #[sqlx(try_from = "String")]
    pub status: CaseStatus,
    pub hearing_date: Option<DateTime<Utc>>,
    pub affidavit_due_date: Option<DateTime<Utc>>,
    pub affidavit_filing_date: Option<DateTime<Utc>>,
    pub reminder_count: i32,
    pub reminder_sent: bool,
    pub last_reminder_sent: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A case with its sub-department joined in, as returned by the API
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseView {
    #[serde(flatten)]
    pub case: Case,
    pub sub_department: Option<SubDepartment>,
}

/// Body of `POST /cases`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCase {
    pub case_number: String,
    pub name: String,
    pub filing_date: Timestamp,
    #[serde(default)]
    pub petition_number: Option<String>,
    #[serde(default)]
    pub notice_number: Option<String>,
    #[serde(default)]
    pub writ_type: Option<String>,
    pub department: i32,
    /// Raw reference; blank means "none"
    #[serde(default)]
    pub sub_department: Option<String>,
    #[serde(default)]
    pub status: Option<CaseStatus>,
    #[serde(default)]
    pub hearing_date: Option<Timestamp>,
    #[serde(default)]
    pub affidavit_due_date: Option<Timestamp>,
    #[serde(default)]
    pub affidavit_filing_date: Option<Timestamp>,
}

/// Body of `PUT /cases/:id`. Absent fields are left untouched; explicit
/// `null` clears the optional ones.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCase {
    pub case_number: Option<String>,
    pub name: Option<String>,
    pub filing_date: Option<Timestamp>,
    #[serde(default, deserialize_with = "nullable")]
    pub petition_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub notice_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub writ_type: Option<Option<String>>,
    pub department: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub sub_department: Option<Option<String>>,
    pub status: Option<CaseStatus>,
    #[serde(default, deserialize_with = "nullable")]
    pub hearing_date: Option<Option<Timestamp>>,
    #[serde(default, deserialize_with = "nullable")]
    pub affidavit_due_date: Option<Option<Timestamp>>,
    #[serde(default, deserialize_with = "nullable")]
    pub affidavit_filing_date: Option<Option<Timestamp>>,
}

impl UpdateCase {
    /// Merge everything except the sub-department reference, which needs a
    /// store lookup and is resolved by the caller.
    pub fn apply(self, case: &mut Case) {
        if let Some(v) = self.case_number { case.case_number = v; }
        if let Some(v) = self.name { case.name = v; }
        if let Some(v) = self.filing_date { case.filing_date = v.into(); }
        if let Some(v) = self.petition_number { case.petition_number = v; }
        if let Some(v) = self.notice_number { case.notice_number = v; }
        if let Some(v) = self.writ_type { case.writ_type = v; }
        if let Some(v) = self.department { case.department = v; }
        if let Some(v) = self.status { case.status = v; }
        if let Some(v) = self.hearing_date { case.hearing_date = v.map(Into::into); }
        if let Some(v) = self.affidavit_due_date { case.affidavit_due_date = v.map(Into::into); }
        if let Some(v) = self.affidavit_filing_date { case.affidavit_filing_date = v.map(Into::into); }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_case() -> Case {
        let now = Utc::now();
        Case {
            id: Uuid::new_v4(),
            case_number: "WP-2024-001".to_string(),
            name: "Sharma v. State".to_string(),
            filing_date: now,
            petition_number: Some("P-17".to_string()),
            notice_number: None,
            writ_type: Some("Mandamus".to_string()),
            department: 1,
            sub_department_id: None,
            status: CaseStatus::Pending,
            hearing_date: Some(now),
            affidavit_due_date: None,
            affidavit_filing_date: None,
            reminder_count: 0,
            reminder_sent: false,
            last_reminder_sent: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn status_round_trips_through_text() {
        assert_eq!(CaseStatus::try_from("Resolved".to_string()).unwrap(), CaseStatus::Resolved);
        assert!("resolved".parse::<CaseStatus>().is_err());
    }

    #[test]
    fn update_distinguishes_null_from_absent() {
        let patch: UpdateCase = serde_json::from_value(json!({
            "status": "Resolved",
            "hearingDate": null
        }))
        .unwrap();

        let mut case = sample_case();
        patch.apply(&mut case);

        assert_eq!(case.status, CaseStatus::Resolved);
        assert!(case.hearing_date.is_none());
        // untouched
        assert_eq!(case.petition_number.as_deref(), Some("P-17"));
        assert_eq!(case.writ_type.as_deref(), Some("Mandamus"));
    }

    #[test]
    fn update_rejects_unknown_status() {
        let result = serde_json::from_value::<UpdateCase>(json!({ "status": "Closed" }));
        assert!(result.is_err());
    }

    #[test]
    fn view_serializes_camel_case_with_joined_sub_department() {
        let view = CaseView { case: sample_case(), sub_department: None };
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["caseNumber"], "WP-2024-001");
        assert_eq!(value["status"], "Pending");
        assert!(value["subDepartment"].is_null());
        assert!(value.get("subDepartmentId").is_some());
    }
}
