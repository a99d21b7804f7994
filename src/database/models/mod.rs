pub mod admin;
pub mod case;
pub mod department;
pub mod email_reminder;
pub mod sub_department;

pub use admin::Admin;
pub use case::{Case, CaseStatus, CaseView, CreateCase, UpdateCase};
pub use department::{CreateDepartment, Department};
pub use email_reminder::{CreateEmailReminder, EmailReminder, ReminderStatus};
pub use sub_department::{CreateSubDepartment, SubDepartment, UpdateSubDepartment};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

/// Request-side timestamp. Accepts RFC 3339 or a bare `YYYY-MM-DD`
/// (interpreted as midnight UTC), which is what date pickers send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(Timestamp(dt.with_timezone(&Utc)));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Timestamp(naive.and_utc()))
            .ok_or_else(|| format!("invalid timestamp: {}", raw))
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw).map_err(serde::de::Error::custom)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`) in partial updates. Use with `#[serde(default)]`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
