use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
    Extension,
};
use uuid::Uuid;

use crate::database::models::{Account, Role};
use crate::error::ApiError;
use crate::state::AppState;

pub const TOKEN_COOKIE: &str = "jwt";

/// Authenticated caller, injected into request extensions by [`protect`]
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
    pub account: Account,
}

/// Requires a valid token for an account that still exists.
pub async fn protect(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_or_cookie_token(request.headers())
        .ok_or_else(|| ApiError::unauthorized("You are not logged in! Please log in to get access."))?;

    let claims = state.jwt().verify(&token).map_err(|e| {
        tracing::warn!("Rejected token: {}", e);
        ApiError::unauthorized("Invalid token. Please log in again")
    })?;

    let account = state
        .profiles()
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized("The user belonging to this token no longer exists."))?;

    request.extensions_mut().insert(AuthUser {
        id: account.id,
        role: account.role,
        account,
    });

    Ok(next.run(request).await)
}

/// Must be layered inside [`protect`].
pub async fn require_admin(
    Extension(user): Extension<AuthUser>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if user.role != Role::Admin {
        tracing::warn!(id = %user.id, role = %user.role, "Admin route refused");
        return Err(ApiError::forbidden("You do not have permission to perform this action"));
    }
    Ok(next.run(request).await)
}

/// `Authorization: Bearer <token>` first, then the `jwt` cookie.
pub fn bearer_or_cookie_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == TOKEN_COOKIE && !value.is_empty() && *value != "loggedout")
        .map(|(_, value)| value.to_string())
}
