// handlers/elevated/admin.rs - GET /api/admin/dashboard, GET /api/admin/users

use axum::extract::State;
use serde::Serialize;

use crate::database::models::Account;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::Dashboard;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UsersData {
    pub users: Vec<Account>,
}

/// GET /api/admin/dashboard - account count and the five newest signups
pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Dashboard> {
    let dashboard = state.profiles().dashboard().await?;
    Ok(ApiResponse::success(dashboard))
}

/// GET /api/admin/users - every account, newest first
pub async fn users_list(State(state): State<AppState>) -> ApiResult<UsersData> {
    let users = state.profiles().list_accounts().await?;
    Ok(ApiResponse::success(UsersData { users }))
}
