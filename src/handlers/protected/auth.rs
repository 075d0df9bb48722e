// handlers/protected/auth.rs - GET /api/auth/me, PUT /api/auth/update-password

use axum::{
    extract::State,
    http::StatusCode,
    response::Response,
    Extension,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::handlers::public::auth::{send_token, UserData};
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// GET /api/auth/me - the caller's own account
pub async fn me(Extension(user): Extension<AuthUser>) -> ApiResult<UserData> {
    Ok(ApiResponse::success(UserData { user: user.account }))
}

/// PUT /api/auth/update-password - verify the current password, store the new one, re-issue the token
pub async fn update_password(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(body): ApiJson<UpdatePasswordRequest>,
) -> Result<Response, ApiError> {
    let account = state
        .profiles()
        .change_password(user.id, &body.current_password, &body.new_password)
        .await?;
    send_token(&state, account, StatusCode::OK)
}
