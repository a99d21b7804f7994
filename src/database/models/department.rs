use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row in `departments`. `id` is the externally assigned department code.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Department {
    pub id: i32,
    pub name_en: String,
    pub name_hi: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /departments`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDepartment {
    pub id: i32,
    pub name_en: String,
    pub name_hi: String,
}
