use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::error::FilterError;
use super::types::{FieldPath, FilterOp, FilterWhereInfo, SqlParam, WhereNode};

pub struct FilterWhere {
    param_values: Vec<SqlParam>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Parse a Mongo-style condition object into a tree.
    pub fn parse(where_data: &Value) -> Result<WhereNode, FilterError> {
        match where_data {
            Value::Null => Ok(WhereNode::And(vec![])),
            Value::Object(obj) => {
                let mut nodes = Vec::new();
                for (key, value) in obj {
                    if key.starts_with('$') {
                        nodes.push(Self::parse_logical_operator(key, value)?);
                    } else {
                        nodes.extend(Self::parse_field_condition(key, value)?);
                    }
                }
                Ok(WhereNode::And(nodes))
            }
            _ => Err(FilterError::InvalidWhereClause("WHERE must be an object".to_string())),
        }
    }

    pub fn generate(node: &WhereNode, starting_param_index: usize) -> Result<(String, Vec<SqlParam>), FilterError> {
        let mut filter_where = Self::new(starting_param_index);
        let sql = filter_where.build(node)?;
        Ok((sql, filter_where.param_values))
    }

    fn parse_logical_operator(op: &str, value: &Value) -> Result<WhereNode, FilterError> {
        match op {
            "$and" | "$or" => {
                let arr = value.as_array().ok_or_else(|| FilterError::InvalidOperatorData(format!("{} requires array", op)))?;
                let children = arr.iter().map(Self::parse).collect::<Result<Vec<_>, _>>()?;
                Ok(if op == "$and" { WhereNode::And(children) } else { WhereNode::Or(children) })
            }
            "$not" => Ok(WhereNode::Not(Box::new(Self::parse(value)?))),
            _ => Err(FilterError::UnsupportedOperator(op.to_string())),
        }
    }

    fn parse_field_condition(field: &str, value: &Value) -> Result<Vec<WhereNode>, FilterError> {
        let path = FieldPath::parse(field)?;
        match value {
            Value::Object(obj) if obj.keys().all(|k| k.starts_with('$')) && !obj.is_empty() => {
                let mut nodes = Vec::new();
                for (op_key, op_val) in obj {
                    let operator = FilterOp::from_key(op_key)?;
                    Self::check_operator_data(operator, op_val)?;
                    nodes.push(WhereNode::Field(FilterWhereInfo { path: path.clone(), operator, data: op_val.clone() }));
                }
                Ok(nodes)
            }
            // Implicit equality: { field: value }
            _ => Ok(vec![WhereNode::Field(FilterWhereInfo { path, operator: FilterOp::Eq, data: value.clone() })]),
        }
    }

    fn check_operator_data(operator: FilterOp, data: &Value) -> Result<(), FilterError> {
        match operator {
            FilterOp::Between => match data.as_array() {
                Some(values) if values.len() == 2 => Ok(()),
                _ => Err(FilterError::InvalidOperatorData("$between requires array with 2 values".to_string())),
            },
            FilterOp::Find | FilterOp::AnyFind if !data.is_string() => {
                Err(FilterError::InvalidOperatorData("$find requires a string".to_string()))
            }
            _ => Ok(()),
        }
    }

    fn build(&mut self, node: &WhereNode) -> Result<String, FilterError> {
        match node {
            WhereNode::Field(info) => self.build_sql_condition(info),
            WhereNode::And(children) => self.build_group(children, " AND ", "TRUE"),
            WhereNode::Or(children) => self.build_group(children, " OR ", "FALSE"),
            WhereNode::Not(child) => Ok(format!("NOT ({})", self.build(child)?)),
        }
    }

    fn build_group(&mut self, children: &[WhereNode], joiner: &str, empty: &str) -> Result<String, FilterError> {
        match children.len() {
            0 => Ok(empty.to_string()),
            1 => self.build(&children[0]),
            _ => {
                let mut parts = Vec::with_capacity(children.len());
                for child in children {
                    parts.push(format!("({})", self.build(child)?));
                }
                Ok(parts.join(joiner))
            }
        }
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> Result<String, FilterError> {
        let column = condition.path.to_json_sql();
        let data = &condition.data;
        match condition.operator {
            FilterOp::Eq => {
                if data.is_null() { Ok(format!("({} IS NULL OR {} = 'null'::jsonb)", column, column)) }
                else { Ok(format!("{} = {}", column, self.json_param(data.clone()))) }
            }
            FilterOp::Ne => {
                if data.is_null() { Ok(format!("({} IS NOT NULL AND {} <> 'null'::jsonb)", column, column)) }
                else { Ok(format!("{} IS DISTINCT FROM {}", column, self.json_param(data.clone()))) }
            }
            FilterOp::Gt => Ok(format!("{} > {}", column, self.json_param(data.clone()))),
            FilterOp::Gte => Ok(format!("{} >= {}", column, self.json_param(data.clone()))),
            FilterOp::Lt => Ok(format!("{} < {}", column, self.json_param(data.clone()))),
            FilterOp::Lte => Ok(format!("{} <= {}", column, self.json_param(data.clone()))),
            FilterOp::In => {
                let values = match data {
                    Value::Array(values) => values.clone(),
                    other => vec![other.clone()],
                };
                if values.is_empty() { return Ok("FALSE".to_string()); }
                let params: Vec<String> = values.into_iter().map(|v| self.json_param(v)).collect();
                Ok(format!("{} IN ({})", column, params.join(", ")))
            }
            FilterOp::Between => {
                let values = data.as_array().ok_or_else(|| FilterError::InvalidOperatorData("$between requires array with 2 values".to_string()))?;
                if values.len() != 2 { return Err(FilterError::InvalidOperatorData("$between requires exactly 2 values".to_string())); }
                Ok(format!("{} BETWEEN {} AND {}", column, self.json_param(values[0].clone()), self.json_param(values[1].clone())))
            }
            FilterOp::Any => {
                let values = match data {
                    Value::Array(values) => values.clone(),
                    other => vec![other.clone()],
                };
                if values.is_empty() { return Ok("FALSE".to_string()); }
                let parts: Vec<String> = values
                    .into_iter()
                    .map(|v| format!("{} @> {}", column, self.json_param(Value::Array(vec![v]))))
                    .collect();
                Ok(if parts.len() == 1 { parts.join("") } else { format!("({})", parts.join(" OR ")) })
            }
            FilterOp::Find => {
                let needle = data.as_str().unwrap_or_default();
                Ok(format!("{} ILIKE {}", condition.path.to_text_sql(), self.text_param(contains_pattern(needle))))
            }
            FilterOp::AnyFind => {
                let needle = data.as_str().unwrap_or_default();
                Ok(format!(
                    "EXISTS (SELECT 1 FROM jsonb_array_elements_text(CASE WHEN jsonb_typeof({col}) = 'array' THEN {col} ELSE '[]'::jsonb END) AS elem(value) WHERE elem.value ILIKE {param})",
                    col = column,
                    param = self.text_param(contains_pattern(needle)),
                ))
            }
        }
    }

    fn json_param(&mut self, value: Value) -> String {
        self.param(SqlParam::Json(value), "jsonb")
    }

    fn text_param(&mut self, value: String) -> String {
        self.param(SqlParam::Text(value), "text")
    }

    fn param(&mut self, value: SqlParam, cast: &str) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}::{}", self.param_index, cast)
    }

    /// Evaluate a parsed tree against a serialized document.
    pub fn matches(node: &WhereNode, document: &Value) -> bool {
        match node {
            WhereNode::Field(info) => Self::matches_condition(info, document),
            WhereNode::And(children) => children.iter().all(|c| Self::matches(c, document)),
            WhereNode::Or(children) => children.iter().any(|c| Self::matches(c, document)),
            WhereNode::Not(child) => !Self::matches(child, document),
        }
    }

    fn matches_condition(condition: &FilterWhereInfo, document: &Value) -> bool {
        let field = condition.path.lookup(document).unwrap_or(&Value::Null);
        let data = &condition.data;
        match condition.operator {
            FilterOp::Eq => json_eq(field, data),
            FilterOp::Ne => !json_eq(field, data),
            FilterOp::Gt => compare_values(field, data) == Some(Ordering::Greater),
            FilterOp::Gte => matches!(compare_values(field, data), Some(Ordering::Greater | Ordering::Equal)),
            FilterOp::Lt => compare_values(field, data) == Some(Ordering::Less),
            FilterOp::Lte => matches!(compare_values(field, data), Some(Ordering::Less | Ordering::Equal)),
            FilterOp::In => match data {
                Value::Array(values) => values.iter().any(|v| json_eq(field, v)),
                other => json_eq(field, other),
            },
            FilterOp::Between => match data.as_array().map(|v| v.as_slice()) {
                Some([low, high]) => {
                    matches!(compare_values(field, low), Some(Ordering::Greater | Ordering::Equal))
                        && matches!(compare_values(field, high), Some(Ordering::Less | Ordering::Equal))
                }
                _ => false,
            },
            FilterOp::Any => {
                let Some(elements) = field.as_array() else { return false };
                match data {
                    Value::Array(values) => values.iter().any(|v| elements.iter().any(|e| json_eq(e, v))),
                    other => elements.iter().any(|e| json_eq(e, other)),
                }
            }
            FilterOp::Find => match (field.as_str(), data.as_str()) {
                (Some(haystack), Some(needle)) => contains_ignore_case(haystack, needle),
                _ => false,
            },
            FilterOp::AnyFind => match (field.as_array(), data.as_str()) {
                (Some(elements), Some(needle)) => elements
                    .iter()
                    .filter_map(Value::as_str)
                    .any(|e| contains_ignore_case(e, needle)),
                _ => false,
            },
        }
    }
}

/// `%needle%` with LIKE metacharacters escaped, so user text matches literally.
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Ordering between two JSON scalars of the same kind. RFC 3339 strings compare as instants.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => {
            match (x.parse::<DateTime<Utc>>(), y.parse::<DateTime<Utc>>()) {
                (Ok(x), Ok(y)) => Some(x.cmp(&y)),
                _ => Some(x.cmp(y)),
            }
        }
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
