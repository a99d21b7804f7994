use serde_json::json;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{info, warn};
use uuid::Uuid;

use crate::database::models::{CreateSubDepartment, SubDepartment, UpdateSubDepartment};
use crate::database::repository::by_uuid;
use crate::database::{sqlstate, tables, violates, DatabaseError, DatabaseManager, Repository};
use crate::error::ApiError;
use crate::filter::FilterData;
use crate::services::department_service::DepartmentService;

const DEPARTMENT_NOT_FOUND: &str = "Department not found";

pub struct SubDepartmentService {
    pool: PgPool,
    sub_departments: Repository<SubDepartment>,
}

impl SubDepartmentService {
    pub fn new() -> Result<Self, DatabaseError> {
        let pool = DatabaseManager::pool()?;
        Ok(Self {
            sub_departments: Repository::new(tables::SUB_DEPARTMENTS, pool.clone()),
            pool,
        })
    }

    pub async fn create(&self, input: CreateSubDepartment) -> Result<SubDepartment, ApiError> {
        let (department_id, name_en, name_hi) = validate_create(input)?;

        if !DepartmentService::new()?.exists(department_id).await? {
            return Err(ApiError::validation_error(DEPARTMENT_NOT_FOUND, None));
        }

        let created: SubDepartment = sqlx::query_as(
            r#"
            INSERT INTO sub_departments (id, department_id, name_en, name_hi)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(department_id)
        .bind(name_en)
        .bind(name_hi)
        .fetch_one(&self.pool)
        .await
        .map_err(department_violation)?;

        info!("Created sub-department {} under department {}", created.id, department_id);
        Ok(created)
    }

    /// Ordered by department, then English name
    pub async fn list(&self, department_id: Option<i32>) -> Result<Vec<SubDepartment>, DatabaseError> {
        self.sub_departments
            .select_any(FilterData {
                where_clause: department_id.map(|id| json!({ "department_id": id })),
                order: Some(json!("department_id asc, name_en asc")),
                ..Default::default()
            })
            .await
    }

    pub async fn get(&self, id: Uuid) -> Result<SubDepartment, DatabaseError> {
        self.sub_departments.select_404(by_uuid(id), "Sub-department not found").await
    }

    pub async fn update(&self, id: Uuid, patch: UpdateSubDepartment) -> Result<SubDepartment, ApiError> {
        let mut sub_department = self.get(id).await?;

        if let Some(department_id) = patch.department_id {
            if department_id != sub_department.department_id
                && !DepartmentService::new()?.exists(department_id).await?
            {
                return Err(ApiError::validation_error(DEPARTMENT_NOT_FOUND, None));
            }
        }

        patch.apply(&mut sub_department);
        if sub_department.name_en.trim().is_empty() {
            return Err(ApiError::missing_field("name_en"));
        }
        if sub_department.name_hi.trim().is_empty() {
            return Err(ApiError::missing_field("name_hi"));
        }

        let updated: Option<SubDepartment> = sqlx::query_as(
            r#"
            UPDATE sub_departments
            SET department_id = $2, name_en = $3, name_hi = $4, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(sub_department.department_id)
        .bind(sub_department.name_en.trim())
        .bind(sub_department.name_hi.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(department_violation)?;

        updated.ok_or_else(|| ApiError::not_found("Sub-department not found"))
    }

    /// Refuses while any case still references the sub-department. The
    /// reference check and the delete are one statement, and the foreign key
    /// catches a case inserted concurrently.
    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let deleted = sqlx::query(
            r#"
            DELETE FROM sub_departments
            WHERE id = $1
              AND NOT EXISTS (SELECT 1 FROM cases WHERE sub_department_id = $1)
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await;

        match deleted {
            Ok(result) if result.rows_affected() > 0 => {
                info!("Deleted sub-department {}", id);
                Ok(())
            }
            Ok(_) => {
                // Either missing or still referenced
                self.get(id).await?;
                let linked = self.linked_case_count(id).await?;
                warn!("Refusing to delete sub-department {}: {} linked cases", id, linked);
                Err(in_use(linked))
            }
            Err(err) if violates(&err, sqlstate::FOREIGN_KEY_VIOLATION) => {
                let linked = self.linked_case_count(id).await?;
                warn!("Refusing to delete sub-department {}: {} linked cases", id, linked);
                Err(in_use(linked.max(1)))
            }
            Err(err) => Err(DatabaseError::from(err).into()),
        }
    }

    async fn linked_case_count(&self, id: Uuid) -> Result<i64, DatabaseError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cases WHERE sub_department_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn in_use(linked: i64) -> ApiError {
    ApiError::validation_error(
        format!("Cannot delete sub-department. It is being used by {} case(s).", linked),
        None,
    )
}

// The department can vanish between the existence check and the write
fn department_violation(err: sqlx::Error) -> ApiError {
    if violates(&err, sqlstate::FOREIGN_KEY_VIOLATION) {
        ApiError::validation_error(DEPARTMENT_NOT_FOUND, None)
    } else {
        DatabaseError::from(err).into()
    }
}

/// Collect every missing field so the client sees them all at once.
fn validate_create(input: CreateSubDepartment) -> Result<(i32, String, String), ApiError> {
    let name_en = input.name_en.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    let name_hi = input.name_hi.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

    match (input.department_id, name_en, name_hi) {
        (Some(department_id), Some(name_en), Some(name_hi)) => Ok((department_id, name_en, name_hi)),
        (department_id, name_en, name_hi) => {
            let mut field_errors = HashMap::new();
            for (field, present) in [
                ("departmentId", department_id.is_some()),
                ("name_en", name_en.is_some()),
                ("name_hi", name_hi.is_some()),
            ] {
                if !present {
                    field_errors.insert(field.to_string(), "This field is required".to_string());
                }
            }
            Err(ApiError::validation_error("Missing required fields", Some(field_errors)))
        }
    }
}
