// handlers/public/agents.rs - GET /api/agents, GET /api/agents/:id

use axum::extract::{Path, State};
use serde::Serialize;

use crate::database::models::{Account, Role};
use crate::handlers::parse_id;
use crate::middleware::{ApiQuery, ApiResponse, ApiResult};
use crate::services::{search_agents, AgentPage, AgentSearchParams, ProfileError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AgentData {
    pub agent: Account,
}

/// GET /api/agents - paginated directory of active agents
pub async fn agents_list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<AgentSearchParams>,
) -> ApiResult<AgentPage> {
    let max_limit = state.config().filter.max_limit;
    let page = search_agents(state.repository().as_ref(), &params, max_limit).await?;
    Ok(ApiResponse::success(page))
}

/// GET /api/agents/:id - one agent, whatever its status
pub async fn agent_show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<AgentData> {
    let id = parse_id(&id, "Agent")?;
    let agent = state
        .profiles()
        .find_by_id_with_role(id, Role::Agent)
        .await?
        .ok_or(ProfileError::NotFound("Agent"))?;
    Ok(ApiResponse::success(AgentData { agent }))
}
