use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Row in `sub_departments`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubDepartment {
    pub id: Uuid,
    #[serde(rename = "departmentId")]
    pub department_id: i32,
    pub name_en: String,
    pub name_hi: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /sub-departments`. Fields are optional here so a missing
/// one is reported per field instead of as a parse failure.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubDepartment {
    #[serde(rename = "departmentId")]
    pub department_id: Option<i32>,
    pub name_en: Option<String>,
    pub name_hi: Option<String>,
}

/// Body of `PUT /sub-departments/:id`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSubDepartment {
    #[serde(rename = "departmentId")]
    pub department_id: Option<i32>,
    pub name_en: Option<String>,
    pub name_hi: Option<String>,
}

impl UpdateSubDepartment {
    pub fn apply(self, sub_department: &mut SubDepartment) {
        if let Some(v) = self.department_id { sub_department.department_id = v; }
        if let Some(v) = self.name_en { sub_department.name_en = v; }
        if let Some(v) = self.name_hi { sub_department.name_hi = v; }
    }
}
