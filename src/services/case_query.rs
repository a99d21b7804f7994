//! Translation of `GET /cases` query parameters into a filter over `cases`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::CaseStatus;
use crate::error::ApiError;
use crate::filter::{self, escape_like, Filter, FilterData};

/// Raw query string. Everything arrives as text so parse failures can be
/// reported per field; blank values count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseListParams {
    pub department: Option<String>,
    pub sub_department: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// How the `subDepartment` parameter selects cases.
#[derive(Debug, Clone, PartialEq)]
pub enum SubDepartmentSelector {
    /// A specific sub-department by identity
    Id(Uuid),
    /// Any sub-department belonging to this department code
    Department(i32),
}

impl SubDepartmentSelector {
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        let raw = raw.trim();
        if let Ok(id) = Uuid::parse_str(raw) {
            return Ok(SubDepartmentSelector::Id(id));
        }
        raw.parse::<i32>()
            .map(SubDepartmentSelector::Department)
            .map_err(|_| {
                ApiError::invalid_field(
                    "subDepartment",
                    "Expected a sub-department id or a department code",
                )
            })
    }
}

/// Sub-department restriction after the selector has been resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum SubDepartmentScope {
    Exact(Uuid),
    AnyOf(Vec<Uuid>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRequest {
    /// 1-indexed
    pub page: i32,
    pub limit: i32,
}

impl PageRequest {
    pub fn offset(&self) -> Result<i32, ApiError> {
        (self.page - 1)
            .checked_mul(self.limit)
            .ok_or_else(|| ApiError::invalid_field("page", "Page is out of range"))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Pagination {
    pub total: i64,
    pub page: i32,
    pub limit: i32,
    pub pages: i64,
}

impl Pagination {
    pub fn new(total: i64, request: PageRequest) -> Self {
        let limit = i64::from(request.limit);
        Self {
            total,
            page: request.page,
            limit: request.limit,
            pages: (total + limit - 1) / limit,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseQuery {
    pub department: Option<i32>,
    pub sub_department: Option<SubDepartmentSelector>,
    pub status: Option<CaseStatus>,
    pub search: Option<String>,
    /// Only set when both page and limit were supplied
    pub page: Option<PageRequest>,
}

impl TryFrom<CaseListParams> for CaseQuery {
    type Error = ApiError;

    fn try_from(params: CaseListParams) -> Result<Self, Self::Error> {
        let department = non_blank(params.department)
            .map(|raw| parse_int("department", &raw))
            .transpose()?;

        let sub_department = non_blank(params.sub_department)
            .map(|raw| SubDepartmentSelector::parse(&raw))
            .transpose()?;

        let status = non_blank(params.status)
            .map(|raw| {
                raw.parse::<CaseStatus>()
                    .map_err(|e| ApiError::invalid_field("status", e.to_string()))
            })
            .transpose()?;

        let page = match (non_blank(params.page), non_blank(params.limit)) {
            (Some(page), Some(limit)) => {
                let page = parse_int("page", &page)?;
                let limit = parse_int("limit", &limit)?;
                if page < 1 {
                    return Err(ApiError::invalid_field("page", "Must be at least 1"));
                }
                if limit < 1 {
                    return Err(ApiError::invalid_field("limit", "Must be at least 1"));
                }
                Some(PageRequest { page, limit: Filter::capped_limit(limit) })
            }
            _ => None,
        };

        Ok(CaseQuery {
            department,
            sub_department,
            status,
            search: non_blank(params.search),
            page,
        })
    }
}

impl CaseQuery {
    /// Conditions that apply to both the page query and the total count.
    pub fn where_clause(&self, scope: Option<&SubDepartmentScope>) -> Option<Value> {
        let mut conditions = Vec::new();

        if let Some(department) = self.department {
            conditions.push(json!({ "department": department }));
        }
        match scope {
            Some(SubDepartmentScope::Exact(id)) => {
                conditions.push(json!({ "sub_department_id": filter::uuid_operand(*id) }))
            }
            Some(SubDepartmentScope::AnyOf(ids)) => {
                let ids: Vec<Value> = ids.iter().copied().map(filter::uuid_operand).collect();
                conditions.push(json!({ "sub_department_id": { "$in": ids } }))
            }
            None => {}
        }
        if let Some(status) = self.status {
            conditions.push(json!({ "status": status.as_str() }));
        }
        if let Some(search) = &self.search {
            let pattern = format!("%{}%", escape_like(search));
            conditions.push(json!({
                "$or": [
                    { "case_number": { "$ilike": pattern } },
                    { "name": { "$ilike": pattern } },
                    { "petition_number": { "$ilike": pattern } }
                ]
            }));
        }

        if conditions.is_empty() {
            None
        } else {
            Some(json!({ "$and": conditions }))
        }
    }

    /// Newest first, windowed when a page was requested.
    pub fn filter_data(&self, scope: Option<&SubDepartmentScope>) -> Result<FilterData, ApiError> {
        let (limit, offset) = match self.page {
            Some(page) => (Some(page.limit), Some(page.offset()?)),
            None => (None, None),
        };

        Ok(FilterData {
            where_clause: self.where_clause(scope),
            order: Some(json!("created_at desc")),
            limit,
            offset,
            ..Default::default()
        })
    }

    pub fn count_data(&self, scope: Option<&SubDepartmentScope>) -> FilterData {
        FilterData {
            where_clause: self.where_clause(scope),
            ..Default::default()
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_int(field: &str, raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>()
        .map_err(|_| ApiError::invalid_field(field, format!("Expected an integer, got '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> CaseListParams {
        let mut p = CaseListParams::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "department" => p.department = value,
                "subDepartment" => p.sub_department = value,
                "status" => p.status = value,
                "search" => p.search = value,
                "page" => p.page = value,
                "limit" => p.limit = value,
                other => panic!("unknown param {}", other),
            }
        }
        p
    }

    fn compile(query: &CaseQuery, scope: Option<&SubDepartmentScope>) -> (String, Vec<Value>) {
        let mut filter = Filter::new("cases").unwrap();
        filter.assign(query.filter_data(scope).unwrap()).unwrap();
        let sql = filter.to_sql().unwrap();
        (sql.query, sql.params)
    }

    #[test]
    fn selector_distinguishes_identity_from_department_code() {
        let id = Uuid::new_v4();
        assert_eq!(SubDepartmentSelector::parse(&id.to_string()).unwrap(), SubDepartmentSelector::Id(id));
        assert_eq!(SubDepartmentSelector::parse("12").unwrap(), SubDepartmentSelector::Department(12));
        assert!(SubDepartmentSelector::parse("legal-cell").is_err());
    }

    #[test]
    fn no_params_lists_everything_newest_first() {
        let query = CaseQuery::try_from(CaseListParams::default()).unwrap();
        assert_eq!(query, CaseQuery::default());

        let (sql, params) = compile(&query, None);
        assert_eq!(sql, "SELECT * FROM \"cases\" WHERE 1=1 ORDER BY \"created_at\" DESC");
        assert!(params.is_empty());
    }

    #[test]
    fn blank_values_are_ignored() {
        let query = CaseQuery::try_from(params(&[("status", ""), ("search", "  "), ("department", "")])).unwrap();
        assert_eq!(query, CaseQuery::default());
    }

    #[test]
    fn pagination_needs_both_page_and_limit() {
        let only_page = CaseQuery::try_from(params(&[("page", "2")])).unwrap();
        assert!(only_page.page.is_none());

        let only_limit = CaseQuery::try_from(params(&[("limit", "10")])).unwrap();
        assert!(only_limit.page.is_none());

        let both = CaseQuery::try_from(params(&[("page", "3"), ("limit", "10")])).unwrap();
        assert_eq!(both.page, Some(PageRequest { page: 3, limit: 10 }));
        let (sql, _) = compile(&both, None);
        assert!(sql.ends_with("ORDER BY \"created_at\" DESC LIMIT 10 OFFSET 20"), "{}", sql);
    }

    #[test]
    fn rejects_malformed_numbers_and_status() {
        for bad in [
            params(&[("department", "two")]),
            params(&[("page", "0"), ("limit", "10")]),
            params(&[("page", "1"), ("limit", "-3")]),
            params(&[("page", "x"), ("limit", "10")]),
            params(&[("status", "Closed")]),
        ] {
            let err = CaseQuery::try_from(bad).unwrap_err();
            assert_eq!(err.status_code(), 400);
        }
    }

    #[test]
    fn filters_combine_with_and_and_search_with_or() {
        let query = CaseQuery::try_from(params(&[
            ("department", "4"),
            ("status", "Pending"),
            ("search", "wp-2024"),
        ]))
        .unwrap();

        let (sql, params) = compile(&query, None);
        assert_eq!(
            sql,
            "SELECT * FROM \"cases\" WHERE ((\"department\" = $1) AND (\"status\" = $2) AND \
             (((\"case_number\" ILIKE $3) OR (\"name\" ILIKE $4) OR (\"petition_number\" ILIKE $5)))) \
             ORDER BY \"created_at\" DESC"
        );
        assert_eq!(params[0], json!(4));
        assert_eq!(params[1], json!("Pending"));
        assert_eq!(params[2], json!("%wp-2024%"));
    }

    #[test]
    fn search_wildcards_are_literal() {
        let query = CaseQuery { search: Some("100%_done".to_string()), ..Default::default() };
        let (_, params) = compile(&query, None);
        assert_eq!(params[0], json!("%100\\%\\_done%"));
    }

    #[test]
    fn department_scope_with_no_sub_departments_matches_nothing() {
        let query = CaseQuery {
            sub_department: Some(SubDepartmentSelector::Department(9)),
            ..Default::default()
        };
        let (sql, params) = compile(&query, Some(&SubDepartmentScope::AnyOf(vec![])));
        assert!(sql.contains("WHERE ((1=0))"), "{}", sql);
        assert!(params.is_empty());
    }

    #[test]
    fn department_scope_uses_membership() {
        let ids = vec![Uuid::new_v4(), Uuid::new_v4()];
        let query = CaseQuery::default();
        let (sql, params) = compile(&query, Some(&SubDepartmentScope::AnyOf(ids.clone())));
        assert!(sql.contains("\"sub_department_id\" IN ($1::uuid, $2::uuid)"), "{}", sql);
        assert_eq!(params, vec![json!(ids[0]), json!(ids[1])]);
    }

    #[test]
    fn exact_scope_uses_equality() {
        let id = Uuid::new_v4();
        let (sql, params) = compile(&CaseQuery::default(), Some(&SubDepartmentScope::Exact(id)));
        assert!(sql.contains("\"sub_department_id\" = $1::uuid"), "{}", sql);
        assert_eq!(params, vec![json!(id)]);
    }

    #[test]
    fn page_count_rounds_up() {
        let page = PageRequest { page: 1, limit: 10 };
        assert_eq!(Pagination::new(0, page).pages, 0);
        assert_eq!(Pagination::new(10, page).pages, 1);
        assert_eq!(Pagination::new(11, page).pages, 2);
        assert_eq!(Pagination::new(25, PageRequest { page: 3, limit: 5 }).pages, 5);
    }

    #[test]
    fn offset_is_zero_based_window_start() {
        assert_eq!(PageRequest { page: 1, limit: 25 }.offset().unwrap(), 0);
        assert_eq!(PageRequest { page: 4, limit: 25 }.offset().unwrap(), 75);
        assert!(PageRequest { page: i32::MAX, limit: 1000 }.offset().is_err());
    }
}
