use std::cmp::Ordering;

use serde_json::Value;

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{FilterData, FilterOrderInfo, SqlResult, WhereNode, DOCUMENT_COLUMN};

/// A compiled document query: conditions, ordering and a page window.
///
/// The same filter drives both storage backends. `to_sql` and friends produce
/// parameterized PostgreSQL over the JSONB `document` column; `matches` and
/// `compare` evaluate it directly against serialized documents.
#[derive(Debug, Clone)]
pub struct Filter {
    table_name: String,
    where_node: Option<WhereNode>,
    order_data: Vec<FilterOrderInfo>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl Filter {
    pub fn new(table_name: impl Into<String>) -> Result<Self, FilterError> {
        let table_name = table_name.into();
        Self::validate_table_name(&table_name)?;
        Ok(Self {
            table_name,
            where_node: None,
            order_data: vec![],
            limit: None,
            offset: None,
        })
    }

    pub fn assign(&mut self, data: FilterData) -> Result<&mut Self, FilterError> {
        if let Some(where_clause) = data.where_clause { self.where_clause(where_clause)?; }
        if let Some(order) = data.order { self.order(order)?; }
        if let Some(limit) = data.limit { self.limit(limit, data.offset)?; }
        Ok(self)
    }

    pub fn where_clause(&mut self, conditions: Value) -> Result<&mut Self, FilterError> {
        self.where_node = Some(FilterWhere::parse(&conditions)?);
        Ok(self)
    }

    pub fn order(&mut self, order_spec: Value) -> Result<&mut Self, FilterError> {
        self.order_data = FilterOrder::validate_and_parse(&order_spec)?;
        Ok(self)
    }

    pub fn limit(&mut self, limit: i64, offset: Option<i64>) -> Result<&mut Self, FilterError> {
        if limit < 0 { return Err(FilterError::InvalidLimit("Limit must be non-negative".to_string())); }
        if let Some(off) = offset { if off < 0 { return Err(FilterError::InvalidOffset("Offset must be non-negative".to_string())); } }
        self.limit = Some(limit);
        self.offset = offset;
        Ok(self)
    }

    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let where_result = self.to_where_sql()?;
        let order_clause = FilterOrder::generate(&self.order_data);
        let limit_clause = self.build_limit_clause();

        let query = [
            format!("SELECT \"{}\"", DOCUMENT_COLUMN),
            format!("FROM \"{}\"", self.table_name),
            format!("WHERE {}", where_result.query),
            order_clause,
            limit_clause,
        ].into_iter().filter(|s| !s.is_empty()).collect::<Vec<_>>().join(" ");

        Ok(SqlResult { query, params: where_result.params })
    }

    pub fn to_where_sql(&self) -> Result<SqlResult, FilterError> {
        let (query, params) = match self.where_node {
            Some(ref node) => FilterWhere::generate(node, 0)?,
            None => ("TRUE".to_string(), vec![]),
        };
        Ok(SqlResult { query, params })
    }

    pub fn to_count_sql(&self) -> Result<SqlResult, FilterError> {
        let where_result = self.to_where_sql()?;
        let query = format!("SELECT COUNT(*) AS count FROM \"{}\" WHERE {}", self.table_name, where_result.query);
        Ok(SqlResult { query, params: where_result.params })
    }

    pub fn matches(&self, document: &Value) -> bool {
        match self.where_node {
            Some(ref node) => FilterWhere::matches(node, document),
            None => true,
        }
    }

    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        FilterOrder::compare(&self.order_data, a, b)
    }

    /// `(offset, limit)` of the requested page window.
    pub fn window(&self) -> (usize, Option<usize>) {
        let offset = self.offset.unwrap_or(0).max(0) as usize;
        (offset, self.limit.map(|l| l.max(0) as usize))
    }

    fn validate_table_name(name: &str) -> Result<(), FilterError> {
        let mut chars = name.chars();
        match chars.next() {
            None => Err(FilterError::InvalidTableName("Table name cannot be empty".to_string())),
            Some(first) if (first.is_ascii_alphabetic() || first == '_') && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') => Ok(()),
            Some(_) => Err(FilterError::InvalidTableName(format!("Invalid table name format: {}", name))),
        }
    }

    fn build_limit_clause(&self) -> String {
        match (self.limit, self.offset) {
            (Some(l), Some(o)) => format!("LIMIT {} OFFSET {}", l, o),
            (Some(l), None) => format!("LIMIT {}", l),
            (None, Some(o)) => format!("OFFSET {}", o),
            (None, None) => String::new(),
        }
    }
}
