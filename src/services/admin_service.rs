use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth;
use crate::config::SeedAdmin;
use crate::database::models::Admin;
use crate::database::{tables, DatabaseError, DatabaseManager, Repository};
use crate::error::ApiError;
use crate::filter::FilterData;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResult {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct AdminSeedReport {
    pub created: Vec<String>,
    pub existing: Vec<String>,
}

pub struct AdminService {
    pool: PgPool,
    admins: Repository<Admin>,
}

impl AdminService {
    pub fn new() -> Result<Self, DatabaseError> {
        let pool = DatabaseManager::pool()?;
        Ok(Self {
            admins: Repository::new(tables::ADMINS, pool.clone()),
            pool,
        })
    }

    /// Unknown email and wrong password fail identically, and both cost one
    /// hash verification.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResult, ApiError> {
        let email = normalize_email(request.email.as_deref().unwrap_or_default());
        let password = request.password.unwrap_or_default();
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::validation_error("Email and password are required", None));
        }

        let admin = self
            .admins
            .select_one(FilterData {
                where_clause: Some(json!({ "email": email })),
                limit: Some(1),
                ..Default::default()
            })
            .await?;

        let Some(admin) = admin else {
            auth::verify_dummy(&password);
            warn!("Login failed: unknown admin");
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        };

        if !auth::verify_password(&password, &admin.password_hash)? {
            warn!("Login failed for admin {}", admin.id);
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }

        info!("Admin {} logged in", admin.id);
        Ok(LoginResult { email: admin.email })
    }

    /// Create the configured accounts that do not exist yet. Existing
    /// accounts keep their current password.
    pub async fn seed(&self, accounts: &[SeedAdmin]) -> Result<AdminSeedReport, ApiError> {
        let mut report = AdminSeedReport { created: vec![], existing: vec![] };

        for account in accounts {
            let email = normalize_email(&account.email);
            let password_hash = auth::hash_password(&account.password)?;

            let created: Option<(Uuid,)> = sqlx::query_as(
                r#"
                INSERT INTO admins (id, email, password_hash)
                VALUES ($1, $2, $3)
                ON CONFLICT (email) DO NOTHING
                RETURNING id
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(&email)
            .bind(&password_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from)?;

            match created {
                Some(_) => report.created.push(email),
                None => report.existing.push(email),
            }
        }

        info!(
            "Seeded admins: {} created, {} already present",
            report.created.len(),
            report.existing.len()
        );
        Ok(report)
    }
}

fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_compare_case_insensitively() {
        assert_eq!(normalize_email("  Admin@Cases.Local "), "admin@cases.local");
    }

    #[test]
    fn login_request_tolerates_missing_fields() {
        let request: LoginRequest = serde_json::from_value(json!({ "email": "a@b.org" })).unwrap();
        assert!(request.password.is_none());
    }
}
