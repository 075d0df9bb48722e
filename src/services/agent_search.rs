//! Agent directory search: flat optional query parameters to a document filter.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::warn;

use crate::database::models::{AgentSummary, Role};
use crate::database::models::vocab::STATUS_ACTIVE;
use crate::database::{AccountRepository, ACCOUNTS_TABLE};
use crate::filter::{Filter, FilterData};
use crate::services::profile_service::ProfileError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// Directory ordering: best rated first, then newest, then id for a stable tiebreak.
pub const DIRECTORY_ORDER: [&str; 3] = ["agentProfile.rating.average desc", "createdAt desc", "id asc"];

/// Raw query-string parameters. Everything stays a string so malformed
/// numbers fall back to defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentSearchParams {
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub name: Option<String>,
    pub language: Option<String>,
    pub specialty: Option<String>,
    pub experience: Option<String>,
    pub license_state: Option<String>,
    pub expertise: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPage {
    pub agents: Vec<AgentSummary>,
    pub total_pages: i64,
    pub current_page: i64,
    pub total: i64,
}

/// Blank or whitespace-only parameters count as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn positive_or(value: &Option<String>, default: i64) -> i64 {
    present(value)
        .and_then(|v| v.parse::<i64>().ok())
        .filter(|v| *v >= 1)
        .unwrap_or(default)
}

/// `"low-high"` with exactly two integer parts; anything else is ignored.
fn experience_range(value: &str) -> Option<(i64, i64)> {
    let parts: Vec<&str> = value.split('-').collect();
    match parts.as_slice() {
        [low, high] => Some((low.trim().parse().ok()?, high.trim().parse().ok()?)),
        _ => None,
    }
}

impl AgentSearchParams {
    pub fn page(&self) -> i64 {
        positive_or(&self.page, DEFAULT_PAGE)
    }

    /// Requested page size, capped at `max_limit` when one is configured.
    pub fn limit(&self, max_limit: Option<i64>) -> i64 {
        let limit = positive_or(&self.limit, DEFAULT_LIMIT);
        match max_limit {
            Some(max) if limit > max => {
                warn!("Limit {} exceeds max {}, capping to max", limit, max);
                max
            }
            _ => limit,
        }
    }

    /// Conditions in the Mongo-style shape the filter module compiles.
    pub fn to_where(&self) -> Value {
        let mut conditions = Map::new();
        conditions.insert("role".to_string(), json!(Role::Agent.as_str()));
        conditions.insert("agentProfile.status".to_string(), json!(STATUS_ACTIVE));

        if let Some(city) = present(&self.city) {
            conditions.insert("agentProfile.office.address.city".to_string(), json!({ "$find": city }));
        }
        if let Some(state) = present(&self.state) {
            conditions.insert("agentProfile.office.address.state".to_string(), json!({ "$find": state }));
        }
        if let Some(zip) = present(&self.zip) {
            conditions.insert("agentProfile.office.address.zipCode".to_string(), json!({ "$find": zip }));
        }
        if let Some(name) = present(&self.name) {
            conditions.insert(
                "$or".to_string(),
                json!([
                    { "firstName": { "$find": name } },
                    { "lastName": { "$find": name } },
                    { "agentProfile.office.name": { "$find": name } }
                ]),
            );
        }
        if let Some(language) = present(&self.language) {
            conditions.insert("agentProfile.languages".to_string(), json!({ "$anyfind": language }));
        }
        if let Some(specialty) = present(&self.specialty) {
            conditions.insert("agentProfile.specialties".to_string(), json!({ "$any": specialty }));
        }
        if let Some((low, high)) = present(&self.experience).and_then(experience_range) {
            conditions.insert("agentProfile.yearsOfExperience".to_string(), json!({ "$between": [low, high] }));
        }
        if let Some(license_state) = present(&self.license_state) {
            conditions.insert("agentProfile.licenseStates".to_string(), json!({ "$any": license_state }));
        }
        if let Some(expertise) = present(&self.expertise) {
            conditions.insert("agentProfile.expertise".to_string(), json!(expertise));
        }

        Value::Object(conditions)
    }

    /// Full filter: conditions, directory ordering and the page window.
    pub fn to_filter(&self, max_limit: Option<i64>) -> Result<Filter, ProfileError> {
        let limit = self.limit(max_limit);
        let offset = (self.page() - 1).saturating_mul(limit);
        let mut filter = Filter::new(ACCOUNTS_TABLE)?;
        filter.assign(FilterData {
            where_clause: Some(self.to_where()),
            order: Some(json!(DIRECTORY_ORDER)),
            limit: Some(limit),
            offset: Some(offset),
        })?;
        Ok(filter)
    }
}

/// Ceiling of `total / limit` without the `total + limit - 1` overflow on huge limits.
fn page_count(total: i64, limit: i64) -> i64 {
    if total == 0 {
        0
    } else {
        (total - 1) / limit + 1
    }
}

pub async fn search_agents(
    repo: &dyn AccountRepository,
    params: &AgentSearchParams,
    max_limit: Option<i64>,
) -> Result<AgentPage, ProfileError> {
    let filter = params.to_filter(max_limit)?;
    let limit = params.limit(max_limit);

    let agents = repo.select(&filter).await?;
    let total = repo.count(&filter).await?;

    Ok(AgentPage {
        agents: agents.into_iter().map(AgentSummary::from).collect(),
        total_pages: page_count(total, limit),
        current_page: params.page(),
        total,
    })
}
