// handlers/protected/goals.rs - GET/PUT /api/goals

use axum::{extract::State, Extension};
use serde::Serialize;

use crate::database::models::{Goals, GoalsPatch};
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GoalsData {
    pub goals: Goals,
}

pub async fn goals_get(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<GoalsData> {
    let goals = state.profiles().get_goals(user.id).await?;
    Ok(ApiResponse::success(GoalsData { goals }))
}

/// Sections left out of the body keep their stored values.
pub async fn goals_put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(patch): ApiJson<GoalsPatch>,
) -> ApiResult<GoalsData> {
    let goals = state.profiles().update_goals(user.id, patch).await?;
    Ok(ApiResponse::success(GoalsData { goals }))
}
