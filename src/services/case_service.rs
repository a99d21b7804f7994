use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::models::{Case, CaseView, CreateCase, SubDepartment, UpdateCase};
use crate::database::repository::by_uuid;
use crate::database::{sqlstate, tables, violates, DatabaseError, DatabaseManager, Repository};
use crate::error::ApiError;
use crate::filter::FilterData;
use crate::services::case_query::{CaseQuery, Pagination, SubDepartmentScope, SubDepartmentSelector};

const SUB_DEPARTMENT_NOT_FOUND: &str = "Sub-department not found";

/// One page (or all) of cases plus the pagination block when one was asked for
#[derive(Debug, Serialize)]
pub struct CaseList {
    pub cases: Vec<CaseView>,
    pub pagination: Option<Pagination>,
}

pub struct CaseService {
    pool: PgPool,
    cases: Repository<Case>,
    sub_departments: Repository<SubDepartment>,
}

impl CaseService {
    pub fn new() -> Result<Self, DatabaseError> {
        Ok(Self::with_pool(DatabaseManager::pool()?))
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self {
            cases: Repository::new(tables::CASES, pool.clone()),
            sub_departments: Repository::new(tables::SUB_DEPARTMENTS, pool.clone()),
            pool,
        }
    }

    pub async fn list(&self, query: &CaseQuery) -> Result<CaseList, ApiError> {
        let scope = match &query.sub_department {
            Some(SubDepartmentSelector::Id(id)) => Some(SubDepartmentScope::Exact(*id)),
            Some(SubDepartmentSelector::Department(code)) => {
                let ids = self.sub_department_ids_for(*code).await?;
                debug!("Department {} resolves to {} sub-departments", code, ids.len());
                Some(SubDepartmentScope::AnyOf(ids))
            }
            None => None,
        };

        let cases = self.cases.select_any(query.filter_data(scope.as_ref())?).await?;

        let pagination = match query.page {
            Some(page) => {
                let total = self.cases.count(query.count_data(scope.as_ref())).await?;
                Some(Pagination::new(total, page))
            }
            None => None,
        };

        Ok(CaseList {
            cases: self.populate(cases).await?,
            pagination,
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<CaseView, ApiError> {
        let case = self.cases.select_404(by_uuid(id), "Case not found").await?;
        Ok(self.populate_one(case).await?)
    }

    pub async fn create(&self, input: CreateCase) -> Result<CaseView, ApiError> {
        require_text("caseNumber", &input.case_number)?;
        require_text("name", &input.name)?;

        let sub_department_id = self.resolve_sub_department(input.sub_department.as_deref()).await?;

        let case: Case = sqlx::query_as(
            r#"
            INSERT INTO cases (
                id, case_number, name, filing_date, petition_number, notice_number, writ_type,
                department, sub_department_id, status, hearing_date, affidavit_due_date, affidavit_filing_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.case_number.trim())
        .bind(input.name.trim())
        .bind(input.filing_date.0)
        .bind(input.petition_number)
        .bind(input.notice_number)
        .bind(input.writ_type)
        .bind(input.department)
        .bind(sub_department_id)
        .bind(input.status.unwrap_or_default().as_str())
        .bind(input.hearing_date.map(|t| t.0))
        .bind(input.affidavit_due_date.map(|t| t.0))
        .bind(input.affidavit_filing_date.map(|t| t.0))
        .fetch_one(&self.pool)
        .await
        .map_err(sub_department_violation)?;

        info!("Created case {} ({})", case.id, case.case_number);
        Ok(self.populate_one(case).await?)
    }

    /// Merge `patch` into the stored case under a row lock so concurrent
    /// updates serialize instead of overwriting each other's fields.
    pub async fn update(&self, id: Uuid, patch: UpdateCase) -> Result<CaseView, ApiError> {
        let sub_department = match patch.sub_department.clone() {
            Some(raw) => Some(self.resolve_sub_department(raw.as_deref()).await?),
            None => None,
        };

        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;

        let mut case: Case = sqlx::query_as("SELECT * FROM cases WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(DatabaseError::from)?
            .ok_or_else(|| ApiError::not_found("Case not found"))?;

        patch.apply(&mut case);
        if let Some(sub_department_id) = sub_department {
            case.sub_department_id = sub_department_id;
        }
        require_text("caseNumber", &case.case_number)?;
        require_text("name", &case.name)?;

        let updated: Case = sqlx::query_as(
            r#"
            UPDATE cases SET
                case_number = $2, name = $3, filing_date = $4, petition_number = $5,
                notice_number = $6, writ_type = $7, department = $8, sub_department_id = $9,
                status = $10, hearing_date = $11, affidavit_due_date = $12,
                affidavit_filing_date = $13, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(case.id)
        .bind(case.case_number.trim())
        .bind(case.name.trim())
        .bind(case.filing_date)
        .bind(&case.petition_number)
        .bind(&case.notice_number)
        .bind(&case.writ_type)
        .bind(case.department)
        .bind(case.sub_department_id)
        .bind(case.status.as_str())
        .bind(case.hearing_date)
        .bind(case.affidavit_due_date)
        .bind(case.affidavit_filing_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(sub_department_violation)?;

        tx.commit().await.map_err(DatabaseError::from)?;

        debug!("Updated case {}", updated.id);
        Ok(self.populate_one(updated).await?)
    }

    /// Reminders belonging to the case go with it.
    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM cases WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Case not found"));
        }
        info!("Deleted case {}", id);
        Ok(())
    }

    /// Attach each case's sub-department, fetched in a single query.
    pub async fn populate(&self, cases: Vec<Case>) -> Result<Vec<CaseView>, DatabaseError> {
        let mut ids: Vec<Uuid> = cases.iter().filter_map(|c| c.sub_department_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let lookup: HashMap<Uuid, SubDepartment> = self
            .sub_departments
            .select_ids(ids)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        Ok(cases
            .into_iter()
            .map(|case| {
                let sub_department = case.sub_department_id.and_then(|id| lookup.get(&id).cloned());
                CaseView { case, sub_department }
            })
            .collect())
    }

    async fn populate_one(&self, case: Case) -> Result<CaseView, DatabaseError> {
        let sub_department = match case.sub_department_id {
            Some(id) => self.sub_departments.select_one(by_uuid(id)).await?,
            None => None,
        };
        Ok(CaseView { case, sub_department })
    }

    async fn sub_department_ids_for(&self, department: i32) -> Result<Vec<Uuid>, DatabaseError> {
        let filter = FilterData {
            select: Some(vec!["id".to_string()]),
            where_clause: Some(json!({ "department_id": department })),
            ..Default::default()
        };
        let rows = Repository::<(Uuid,)>::new(tables::SUB_DEPARTMENTS, self.pool.clone())
            .select_any(filter)
            .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Blank or absent means no sub-department; otherwise it must exist.
    async fn resolve_sub_department(&self, raw: Option<&str>) -> Result<Option<Uuid>, ApiError> {
        let raw = match raw.map(str::trim) {
            None | Some("") => return Ok(None),
            Some(raw) => raw,
        };
        let id = Uuid::parse_str(raw)
            .map_err(|_| ApiError::invalid_field("subDepartment", "Expected a sub-department id"))?;

        match self.sub_departments.select_one(by_uuid(id)).await? {
            Some(_) => Ok(Some(id)),
            None => Err(ApiError::validation_error(SUB_DEPARTMENT_NOT_FOUND, None)),
        }
    }
}

fn require_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::missing_field(field));
    }
    Ok(())
}

// The sub-department can vanish between the lookup and the write
fn sub_department_violation(err: sqlx::Error) -> ApiError {
    if violates(&err, sqlstate::FOREIGN_KEY_VIOLATION) {
        ApiError::validation_error(SUB_DEPARTMENT_NOT_FOUND, None)
    } else {
        DatabaseError::from(err).into()
    }
}
