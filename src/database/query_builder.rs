use serde_json::Value;
use sqlx::{self, postgres::PgArguments, FromRow, PgPool, Row};

use crate::database::manager::DatabaseError;
use crate::filter::types::SqlResult;
use crate::filter::{Filter, FilterData};

pub struct QueryBuilder<T> {
    table_name: String,
    filter: Option<Filter>,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> QueryBuilder<T>
where
    T: for<'r> FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
{
    pub fn new(table_name: impl Into<String>) -> Result<Self, DatabaseError> {
        let name = table_name.into();
        // Reuse Filter table name validation
        Filter::new(&name).map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        Ok(Self {
            table_name: name,
            filter: None,
            _phantom: std::marker::PhantomData,
        })
    }

    pub fn filter(mut self, filter_data: FilterData) -> Result<Self, DatabaseError> {
        let mut filter = Filter::new(&self.table_name).map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        filter
            .assign(filter_data)
            .map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        self.filter = Some(filter);
        Ok(self)
    }

    pub async fn select_all(self, pool: &PgPool) -> Result<Vec<T>, DatabaseError> {
        let sql_result = self.sql_result()?;
        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p)?;
        }
        let rows = q.fetch_all(pool).await?;
        Ok(rows)
    }

    pub async fn select_optional(self, pool: &PgPool) -> Result<Option<T>, DatabaseError> {
        let sql_result = self.sql_result()?;
        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p)?;
        }
        let row = q.fetch_optional(pool).await?;
        Ok(row)
    }

    pub async fn count(self, pool: &PgPool) -> Result<i64, DatabaseError> {
        let sql_result = if let Some(filter) = self.filter {
            filter.to_count_sql().map_err(|e| DatabaseError::QueryError(e.to_string()))?
        } else {
            SqlResult { query: format!("SELECT COUNT(*) as count FROM \"{}\"", self.table_name), params: vec![] }
        };

        let mut q = sqlx::query(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query(q, p)?;
        }
        let row = q.fetch_one(pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(count)
    }

    fn sql_result(&self) -> Result<SqlResult, DatabaseError> {
        if let Some(filter) = &self.filter {
            filter
                .to_sql()
                .map_err(|e| DatabaseError::QueryError(e.to_string()))
        } else {
            Ok(SqlResult { query: format!("SELECT * FROM \"{}\"", self.table_name), params: vec![] })
        }
    }
}

/// Typed form of a filter parameter. The filter only emits scalars; uuid
/// comparisons carry a `::uuid` cast in the SQL and bind as text.
#[derive(Debug, PartialEq)]
enum Bind<'a> {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(&'a str),
}

impl<'a> Bind<'a> {
    fn from_value(v: &'a Value) -> Result<Self, DatabaseError> {
        Ok(match v {
            Value::Bool(b) => Bind::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Bind::Int(i),
                // Postgres doesn't have u64; anything past i64 goes through float
                None => Bind::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => Bind::Text(s),
            other => return Err(DatabaseError::QueryError(format!("Unbindable filter parameter: {}", other))),
        })
    }
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> Result<sqlx::query::Query<'q, sqlx::Postgres, PgArguments>, DatabaseError> {
    Ok(match Bind::from_value(v)? {
        Bind::Bool(b) => q.bind(b),
        Bind::Int(i) => q.bind(i),
        Bind::Float(f) => q.bind(f),
        Bind::Text(s) => q.bind(s),
    })
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q Value,
) -> Result<sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>, DatabaseError>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    Ok(match Bind::from_value(v)? {
        Bind::Bool(b) => q.bind(b),
        Bind::Int(i) => q.bind(i),
        Bind::Float(f) => q.bind(f),
        Bind::Text(s) => q.bind(s),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn uuid_shaped_strings_bind_as_text() {
        let value = json!("123e4567-e89b-12d3-a456-426614174000");
        assert_eq!(Bind::from_value(&value).unwrap(), Bind::Text("123e4567-e89b-12d3-a456-426614174000"));
        let value = json!("%wp-2024%");
        assert_eq!(Bind::from_value(&value).unwrap(), Bind::Text("%wp-2024%"));
    }

    #[test]
    fn numbers_bind_as_integers() {
        assert_eq!(Bind::from_value(&json!(42)).unwrap(), Bind::Int(42));
        assert_eq!(Bind::from_value(&json!(1.5)).unwrap(), Bind::Float(1.5));
    }

    #[test]
    fn non_scalars_are_refused() {
        assert!(Bind::from_value(&json!(null)).is_err());
        assert!(Bind::from_value(&json!({ "$uuid": "x" })).is_err());
    }
}
