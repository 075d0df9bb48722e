// handlers/protected/users.rs - /api/users/* (own profile, addresses, phones, notifications)

use axum::{
    extract::{Path, State},
    Extension,
};
use serde::Deserialize;

use crate::database::models::{Address, AddressInput, NotificationsPatch, Phone, PhoneInput};
use crate::handlers::parse_id;
use crate::handlers::public::auth::UserData;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::types::SubdocumentOp;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// GET /api/users/profile
pub async fn profile_get(Extension(user): Extension<AuthUser>) -> ApiResult<UserData> {
    Ok(ApiResponse::success(UserData { user: user.account }))
}

/// PUT /api/users/profile - names only
pub async fn profile_put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(body): ApiJson<ProfileRequest>,
) -> ApiResult<UserData> {
    let account = state
        .profiles()
        .update_profile_names(user.id, body.first_name, body.last_name)
        .await?;
    Ok(ApiResponse::success(UserData { user: account }))
}

/// POST /api/users/addresses
pub async fn address_add(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(input): ApiJson<AddressInput>,
) -> ApiResult<UserData> {
    let account = state
        .profiles()
        .mutate_subdocument::<Address>(user.id, SubdocumentOp::Append(input))
        .await?;
    Ok(ApiResponse::success(UserData { user: account }))
}

/// PUT /api/users/addresses/:address_id
pub async fn address_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(address_id): Path<String>,
    ApiJson(input): ApiJson<AddressInput>,
) -> ApiResult<UserData> {
    let address_id = parse_id(&address_id, "Address")?;
    let account = state
        .profiles()
        .mutate_subdocument::<Address>(user.id, SubdocumentOp::Replace(address_id, input))
        .await?;
    Ok(ApiResponse::success(UserData { user: account }))
}

/// DELETE /api/users/addresses/:address_id
pub async fn address_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(address_id): Path<String>,
) -> ApiResult<UserData> {
    let address_id = parse_id(&address_id, "Address")?;
    let account = state
        .profiles()
        .mutate_subdocument::<Address>(user.id, SubdocumentOp::Remove(address_id))
        .await?;
    Ok(ApiResponse::success(UserData { user: account }))
}

/// POST /api/users/phones
pub async fn phone_add(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(input): ApiJson<PhoneInput>,
) -> ApiResult<UserData> {
    let account = state
        .profiles()
        .mutate_subdocument::<Phone>(user.id, SubdocumentOp::Append(input))
        .await?;
    Ok(ApiResponse::success(UserData { user: account }))
}

/// PUT /api/users/phones/:phone_id
pub async fn phone_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(phone_id): Path<String>,
    ApiJson(input): ApiJson<PhoneInput>,
) -> ApiResult<UserData> {
    let phone_id = parse_id(&phone_id, "Phone number")?;
    let account = state
        .profiles()
        .mutate_subdocument::<Phone>(user.id, SubdocumentOp::Replace(phone_id, input))
        .await?;
    Ok(ApiResponse::success(UserData { user: account }))
}

/// DELETE /api/users/phones/:phone_id
pub async fn phone_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(phone_id): Path<String>,
) -> ApiResult<UserData> {
    let phone_id = parse_id(&phone_id, "Phone number")?;
    let account = state
        .profiles()
        .mutate_subdocument::<Phone>(user.id, SubdocumentOp::Remove(phone_id))
        .await?;
    Ok(ApiResponse::success(UserData { user: account }))
}

/// PUT /api/users/notifications - only the flags present in the body change
pub async fn notifications_put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(patch): ApiJson<NotificationsPatch>,
) -> ApiResult<UserData> {
    let account = state.profiles().update_notifications(user.id, patch).await?;
    Ok(ApiResponse::success(UserData { user: account }))
}
