use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::FilterError;

/// Column holding the serialized account document.
pub const DOCUMENT_COLUMN: &str = "document";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Between,
    /// Array field contains the value (or any of the values) exactly.
    Any,
    /// Case-insensitive literal substring on a string field.
    Find,
    /// Case-insensitive literal substring against any element of an array field.
    AnyFind,
}

impl FilterOp {
    pub fn from_key(key: &str) -> Result<Self, FilterError> {
        Ok(match key {
            "$eq" => FilterOp::Eq,
            "$ne" | "$neq" => FilterOp::Ne,
            "$gt" => FilterOp::Gt,
            "$gte" => FilterOp::Gte,
            "$lt" => FilterOp::Lt,
            "$lte" => FilterOp::Lte,
            "$in" => FilterOp::In,
            "$between" => FilterOp::Between,
            "$any" => FilterOp::Any,
            "$find" => FilterOp::Find,
            "$anyfind" => FilterOp::AnyFind,
            other => return Err(FilterError::UnsupportedOperator(other.to_string())),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterData {
    #[serde(rename = "where")]
    pub where_clause: Option<Value>,
    pub order: Option<Value>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Dotted path into the account document, e.g. `agentProfile.office.address.city`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    pub fn parse(path: &str) -> Result<Self, FilterError> {
        if path.is_empty() {
            return Err(FilterError::InvalidField("Field path cannot be empty".to_string()));
        }
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        for segment in &segments {
            if segment.is_empty() || !segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(FilterError::InvalidField(format!("Invalid field path format: {}", path)));
            }
        }
        Ok(Self { segments })
    }

    pub fn as_dotted(&self) -> String {
        self.segments.join(".")
    }

    /// `document #> '{a,b}'` (jsonb). Segments are restricted to `[A-Za-z0-9_]`, so inlining is safe.
    pub fn to_json_sql(&self) -> String {
        format!("{} #> '{{{}}}'", DOCUMENT_COLUMN, self.segments.join(","))
    }

    /// `document #>> '{a,b}'` (text).
    pub fn to_text_sql(&self) -> String {
        format!("{} #>> '{{{}}}'", DOCUMENT_COLUMN, self.segments.join(","))
    }

    /// Sort expression. Store-maintained fields sort on their typed columns.
    pub fn to_order_sql(&self) -> String {
        match self.as_dotted().as_str() {
            "id" => "\"id\"".to_string(),
            "createdAt" => "\"created_at\"".to_string(),
            "updatedAt" => "\"updated_at\"".to_string(),
            _ => self.to_json_sql(),
        }
    }

    pub fn lookup<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(document, |node, segment| node.get(segment.as_str()))
    }
}

#[derive(Debug, Clone)]
pub struct FilterWhereInfo {
    pub path: FieldPath,
    pub operator: FilterOp,
    pub data: Value,
}

/// Parsed WHERE tree shared by SQL generation and in-memory evaluation.
#[derive(Debug, Clone)]
pub enum WhereNode {
    Field(FilterWhereInfo),
    And(Vec<WhereNode>),
    Or(Vec<WhereNode>),
    Not(Box<WhereNode>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterOrderInfo {
    pub path: FieldPath,
    pub sort: SortDirection,
}

/// Positional parameter; the storage layer binds each variant with its own SQL type.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Json(Value),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}
