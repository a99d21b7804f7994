use serde_json::Value;
use uuid::Uuid;

use super::error::FilterError;
use super::types::{is_valid_identifier, FilterOp, FilterWhereInfo, UUID_OPERAND};

/// Compiles a JSON where-document into a parameterized SQL predicate.
///
/// Top-level keys combine with AND. `$and`/`$or` take arrays of sub-documents,
/// `$not` takes a single sub-document. Field values are either a literal
/// (implicit `$eq`) or an object of operator → operand. Operands are scalars;
/// `{ "$uuid": "<id>" }` marks one that compares against a uuid column.
pub struct FilterWhere {
    param_values: Vec<Value>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    pub fn generate(where_data: &Value, starting_param_index: usize) -> Result<(String, Vec<Value>), FilterError> {
        let mut filter_where = Self::new(starting_param_index);
        let sql = filter_where.build(where_data)?;
        Ok((sql, filter_where.param_values))
    }

    pub fn validate(where_data: &Value) -> Result<(), FilterError> {
        match where_data {
            Value::Null | Value::Object(_) => Ok(()),
            _ => Err(FilterError::InvalidWhereClause("WHERE must be an object".to_string())),
        }
    }

    fn build(&mut self, where_data: &Value) -> Result<String, FilterError> {
        let conditions = self.parse_where_data(where_data)?;

        let mut sql_conditions = vec![];
        for condition in &conditions {
            sql_conditions.push(self.build_sql_condition(condition)?);
        }

        Ok(if sql_conditions.is_empty() { "1=1".to_string() } else { sql_conditions.join(" AND ") })
    }

    fn parse_where_data(&mut self, where_data: &Value) -> Result<Vec<FilterWhereInfo>, FilterError> {
        match where_data {
            Value::Null => Ok(vec![]),
            Value::Object(obj) => {
                let mut conditions = vec![];
                for (key, value) in obj {
                    if key.starts_with('$') {
                        conditions.push(self.parse_logical_operator(key, value)?);
                    } else {
                        conditions.extend(Self::parse_field_condition(key, value)?);
                    }
                }
                Ok(conditions)
            }
            _ => Err(FilterError::InvalidWhereClause("Unsupported WHERE format".to_string())),
        }
    }

    fn parse_logical_operator(&mut self, op: &str, value: &Value) -> Result<FilterWhereInfo, FilterError> {
        let sql = match op {
            "$and" | "$or" => {
                let arr = value
                    .as_array()
                    .ok_or_else(|| FilterError::InvalidOperatorData(format!("{} requires array", op)))?;
                if arr.is_empty() {
                    // Empty conjunction is true, empty disjunction is false
                    if op == "$and" { "1=1".to_string() } else { "1=0".to_string() }
                } else {
                    let mut sql_parts = Vec::with_capacity(arr.len());
                    for v in arr {
                        sql_parts.push(format!("({})", self.build(v)?));
                    }
                    let joiner = if op == "$and" { " AND " } else { " OR " };
                    format!("({})", sql_parts.join(joiner))
                }
            }
            "$not" => format!("NOT ({})", self.build(value)?),
            _ => return Err(FilterError::UnsupportedOperator(op.to_string())),
        };

        Ok(FilterWhereInfo { column: sql, operator: FilterOp::Raw, data: Value::Null })
    }

    fn parse_field_condition(field: &str, value: &Value) -> Result<Vec<FilterWhereInfo>, FilterError> {
        if !is_valid_identifier(field) {
            return Err(FilterError::InvalidColumn(field.to_string()));
        }

        match value {
            Value::Object(obj)
                if !obj.is_empty() && obj.keys().all(|k| k.starts_with('$')) && !Self::is_uuid_operand(value) =>
            {
                obj.iter()
                    .map(|(op_key, op_val)| {
                        Ok(FilterWhereInfo {
                            column: field.to_string(),
                            operator: Self::map_operator(op_key)?,
                            data: op_val.clone(),
                        })
                    })
                    .collect()
            }
            // Implicit equality: { field: value }
            _ => Ok(vec![FilterWhereInfo { column: field.to_string(), operator: FilterOp::Eq, data: value.clone() }]),
        }
    }

    fn map_operator(op_key: &str) -> Result<FilterOp, FilterError> {
        Ok(match op_key {
            "$eq" => FilterOp::Eq,
            "$ne" | "$neq" => FilterOp::Ne,
            "$gt" => FilterOp::Gt,
            "$gte" => FilterOp::Gte,
            "$lt" => FilterOp::Lt,
            "$lte" => FilterOp::Lte,
            "$like" => FilterOp::Like,
            "$ilike" => FilterOp::ILike,
            "$in" => FilterOp::In,
            "$nin" => FilterOp::NIn,
            "$null" => FilterOp::Null,
            other => return Err(FilterError::UnsupportedOperator(other.to_string())),
        })
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> Result<String, FilterError> {
        if condition.operator == FilterOp::Raw {
            return Ok(condition.column.clone());
        }

        let quoted_column = format!("\"{}\"", condition.column);
        let data = &condition.data;
        Ok(match condition.operator {
            FilterOp::Eq if data.is_null() => format!("{} IS NULL", quoted_column),
            FilterOp::Eq => format!("{} = {}", quoted_column, self.param(data)?),
            FilterOp::Ne if data.is_null() => format!("{} IS NOT NULL", quoted_column),
            FilterOp::Ne => format!("{} <> {}", quoted_column, self.param(data)?),
            FilterOp::Gt => format!("{} > {}", quoted_column, self.param(data)?),
            FilterOp::Gte => format!("{} >= {}", quoted_column, self.param(data)?),
            FilterOp::Lt => format!("{} < {}", quoted_column, self.param(data)?),
            FilterOp::Lte => format!("{} <= {}", quoted_column, self.param(data)?),
            FilterOp::Like => format!("{} LIKE {}", quoted_column, self.param(Self::expect_string(data)?)?),
            FilterOp::ILike => format!("{} ILIKE {}", quoted_column, self.param(Self::expect_string(data)?)?),
            FilterOp::In | FilterOp::NIn => {
                let values = data
                    .as_array()
                    .ok_or_else(|| FilterError::InvalidOperatorData("$in/$nin requires array".to_string()))?;
                let negated = condition.operator == FilterOp::NIn;
                if values.is_empty() {
                    // Nothing is a member of the empty set
                    return Ok(if negated { "1=1".to_string() } else { "1=0".to_string() });
                }
                let params = values.iter().map(|v| self.param(v)).collect::<Result<Vec<_>, _>>()?;
                let keyword = if negated { "NOT IN" } else { "IN" };
                format!("{} {} ({})", quoted_column, keyword, params.join(", "))
            }
            FilterOp::Null => match data.as_bool() {
                Some(true) => format!("{} IS NULL", quoted_column),
                Some(false) => format!("{} IS NOT NULL", quoted_column),
                None => return Err(FilterError::InvalidOperatorData("$null requires boolean".to_string())),
            },
            FilterOp::Raw => unreachable!("raw conditions are returned above"),
        })
    }

    fn expect_string(data: &Value) -> Result<&Value, FilterError> {
        match data {
            Value::String(_) => Ok(data),
            _ => Err(FilterError::InvalidOperatorData("pattern operators require a string".to_string())),
        }
    }

    fn is_uuid_operand(value: &Value) -> bool {
        matches!(value, Value::Object(obj) if obj.len() == 1 && obj.contains_key(UUID_OPERAND))
    }

    /// Push one operand and return its placeholder. The uuid operand is
    /// checked here and cast in SQL, so the binder only ever sees scalars.
    fn param(&mut self, value: &Value) -> Result<String, FilterError> {
        let (value, cast) = match value {
            Value::Bool(_) | Value::Number(_) | Value::String(_) => (value.clone(), ""),
            _ if Self::is_uuid_operand(value) => {
                let raw = value[UUID_OPERAND].as_str().unwrap_or_default();
                let id = Uuid::parse_str(raw)
                    .map_err(|_| FilterError::InvalidOperatorData(format!("$uuid requires a uuid, got '{}'", raw)))?;
                (Value::String(id.to_string()), "::uuid")
            }
            other => {
                return Err(FilterError::InvalidOperatorData(format!("operand must be a scalar, got {}", other)));
            }
        };
        self.param_values.push(value);
        self.param_index += 1;
        Ok(format!("${}{}", self.param_index, cast))
    }
}
