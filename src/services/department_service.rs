use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;
use tracing::info;

use crate::database::models::{CreateDepartment, Department};
use crate::database::repository::by_id;
use crate::database::{tables, DatabaseError, DatabaseManager, Repository};
use crate::error::ApiError;
use crate::filter::FilterData;

/// Fixed reference departments installed by `POST /departments/seed`
const SEED_DEPARTMENTS: &[(i32, &str, &str)] = &[
    (1, "Revenue Department", "राजस्व विभाग"),
    (2, "Home Department", "गृह विभाग"),
];

#[derive(Debug, Serialize)]
pub struct SeedReport {
    pub inserted: usize,
    pub existing: usize,
    pub departments: Vec<Department>,
}

pub struct DepartmentService {
    pool: PgPool,
    departments: Repository<Department>,
}

impl DepartmentService {
    pub fn new() -> Result<Self, DatabaseError> {
        let pool = DatabaseManager::pool()?;
        Ok(Self {
            departments: Repository::new(tables::DEPARTMENTS, pool.clone()),
            pool,
        })
    }

    /// Ascending by code
    pub async fn list(&self) -> Result<Vec<Department>, DatabaseError> {
        self.departments
            .select_any(FilterData {
                order: Some(json!("id asc")),
                ..Default::default()
            })
            .await
    }

    pub async fn get(&self, code: i32) -> Result<Department, DatabaseError> {
        self.departments.select_404(by_id(code), "Department not found").await
    }

    pub async fn exists(&self, code: i32) -> Result<bool, DatabaseError> {
        Ok(self.departments.count(by_id(code)).await? > 0)
    }

    /// Codes are unique; the insert itself decides, so two concurrent
    /// creates with the same code cannot both succeed.
    pub async fn create(&self, input: CreateDepartment) -> Result<Department, ApiError> {
        if input.name_en.trim().is_empty() {
            return Err(ApiError::missing_field("name_en"));
        }
        if input.name_hi.trim().is_empty() {
            return Err(ApiError::missing_field("name_hi"));
        }

        let created: Option<Department> = sqlx::query_as(
            r#"
            INSERT INTO departments (id, name_en, name_hi)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(input.id)
        .bind(input.name_en.trim())
        .bind(input.name_hi.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        match created {
            Some(department) => {
                info!("Created department {}", department.id);
                Ok(department)
            }
            None => Err(ApiError::validation_error("Department with this ID already exists", None)),
        }
    }

    /// Install the reference departments. Existing codes are left as they
    /// are, so repeating the seed changes nothing.
    pub async fn seed(&self) -> Result<SeedReport, DatabaseError> {
        let mut inserted = 0;
        for (id, name_en, name_hi) in SEED_DEPARTMENTS {
            let created: Option<(i32,)> = sqlx::query_as(
                r#"
                INSERT INTO departments (id, name_en, name_hi)
                VALUES ($1, $2, $3)
                ON CONFLICT (id) DO NOTHING
                RETURNING id
                "#,
            )
            .bind(*id)
            .bind(*name_en)
            .bind(*name_hi)
            .fetch_optional(&self.pool)
            .await?;
            if created.is_some() {
                inserted += 1;
            }
        }

        let codes: Vec<i32> = SEED_DEPARTMENTS.iter().map(|(id, _, _)| *id).collect();
        let departments = self
            .departments
            .select_any(FilterData {
                where_clause: Some(json!({ "id": { "$in": codes } })),
                order: Some(json!("id asc")),
                ..Default::default()
            })
            .await?;

        info!("Seeded departments: {} inserted, {} already present", inserted, SEED_DEPARTMENTS.len() - inserted);
        Ok(SeedReport {
            inserted,
            existing: SEED_DEPARTMENTS.len() - inserted,
            departments,
        })
    }
}
