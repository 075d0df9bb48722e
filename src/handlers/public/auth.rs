// handlers/public/auth.rs - POST /api/auth/register, POST /api/auth/login

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;
use crate::database::models::{Account, AccountDraft, Role};
use crate::error::ApiError;
use crate::middleware::auth::TOKEN_COOKIE;
use crate::middleware::{ApiJson, ApiResponse};
use crate::services::ProfileError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserData {
    pub user: Account,
}

/// POST /api/auth/register - self-service signup, always as a plain user
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<Response, ApiError> {
    let draft = AccountDraft {
        first_name: body.first_name,
        last_name: body.last_name,
        email: body.email,
        password: body.password,
        role: Role::User,
        ..Default::default()
    };
    let account = state.profiles().create(draft).await?;
    tracing::info!(id = %account.id, "Registered account");
    send_token(&state, account, StatusCode::CREATED)
}

/// POST /api/auth/login - exchange email and password for a session token
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Response, ApiError> {
    let email = body.email.filter(|e| !e.trim().is_empty());
    let password = body.password.filter(|p| !p.is_empty());
    let (Some(email), Some(password)) = (email, password) else {
        return Err(ApiError::bad_request("Please provide email and password"));
    };

    let account = state
        .profiles()
        .verify_credential(&email, &password)
        .await?
        .ok_or(ProfileError::InvalidCredentials)?;
    send_token(&state, account, StatusCode::OK)
}

/// Issue a token for `account`, set it as the `jwt` cookie and echo it in the body.
pub(crate) fn send_token(state: &AppState, account: Account, status: StatusCode) -> Result<Response, ApiError> {
    let token = state.jwt().issue(account.id, account.role)?;
    let cookie = session_cookie(&token, &state.config().security);
    let body = ApiResponse::with_status(UserData { user: account }, status).with_token(token);
    Ok(([(header::SET_COOKIE, cookie)], body).into_response())
}

fn session_cookie(token: &str, security: &SecurityConfig) -> String {
    let expires = Utc::now() + Duration::days(security.jwt_cookie_expiry_days as i64);
    let mut cookie = format!(
        "{}={}; Path=/; Expires={}; HttpOnly",
        TOKEN_COOKIE,
        token,
        expires.format("%a, %d %b %Y %H:%M:%S GMT")
    );
    if security.secure_cookies {
        cookie.push_str("; Secure");
    }
    cookie
}
