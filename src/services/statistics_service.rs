use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;

use crate::database::models::{Case, CaseStatus, CaseView, Department, SubDepartment};
use crate::database::{tables, DatabaseError, DatabaseManager, Repository};
use crate::filter::FilterData;
use crate::services::case_service::CaseService;

const RECENT_CASES: i32 = 5;

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct DepartmentCount {
    pub department: i32,
    pub count: i64,
}

/// Dashboard summary. The figures come from independent reads and are
/// not a single consistent snapshot.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_cases: i64,
    pub pending_cases: i64,
    pub resolved_cases: i64,
    pub total_departments: i64,
    pub total_sub_departments: i64,
    pub cases_by_department: Vec<DepartmentCount>,
    pub recent_cases: Vec<CaseView>,
}

pub struct StatisticsService {
    pool: PgPool,
}

impl StatisticsService {
    pub fn new() -> Result<Self, DatabaseError> {
        Ok(Self { pool: DatabaseManager::pool()? })
    }

    pub async fn collect(&self) -> Result<Statistics, DatabaseError> {
        let cases = Repository::<Case>::new(tables::CASES, self.pool.clone());

        let total_cases = cases.count(FilterData::default()).await?;
        let pending_cases = cases.count(status_filter(CaseStatus::Pending)).await?;
        let resolved_cases = cases.count(status_filter(CaseStatus::Resolved)).await?;

        let total_departments = Repository::<Department>::new(tables::DEPARTMENTS, self.pool.clone())
            .count(FilterData::default())
            .await?;
        let total_sub_departments = Repository::<SubDepartment>::new(tables::SUB_DEPARTMENTS, self.pool.clone())
            .count(FilterData::default())
            .await?;

        let cases_by_department: Vec<DepartmentCount> = sqlx::query_as(
            "SELECT department, COUNT(*) AS count FROM cases GROUP BY department ORDER BY department",
        )
        .fetch_all(&self.pool)
        .await?;

        let recent = cases
            .select_any(FilterData {
                order: Some(json!("created_at desc")),
                limit: Some(RECENT_CASES),
                ..Default::default()
            })
            .await?;
        let recent_cases = CaseService::with_pool(self.pool.clone()).populate(recent).await?;

        Ok(Statistics {
            total_cases,
            pending_cases,
            resolved_cases,
            total_departments,
            total_sub_departments,
            cases_by_department,
            recent_cases,
        })
    }
}

fn status_filter(status: CaseStatus) -> FilterData {
    FilterData {
        where_clause: Some(json!({ "status": status.as_str() })),
        ..Default::default()
    }
}
