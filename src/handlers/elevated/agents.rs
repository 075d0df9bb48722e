// handlers/elevated/agents.rs - POST /api/agents, PUT/DELETE /api/agents/:id, POST /api/agents/:id/upload

use axum::extract::{Multipart, Path, State};
use serde::Deserialize;

use crate::database::models::vocab::STATUS_ACTIVE;
use crate::database::models::{AccountDraft, AccountPatch, AgentProfilePatch, Role};
use crate::handlers::parse_id;
use crate::handlers::public::agents::AgentData;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::services::{ProfileError, UploadError};
use crate::state::AppState;

pub const IMAGE_FIELD: &str = "profileImage";

/// Identity fields plus the agent profile fields, all at the top level of the body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateAgentRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(flatten)]
    pub profile: AgentProfilePatch,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateAgentRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(flatten)]
    pub profile: AgentProfilePatch,
}

impl From<UpdateAgentRequest> for AccountPatch {
    fn from(body: UpdateAgentRequest) -> Self {
        AccountPatch {
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            agent_profile: if body.profile.is_empty() { None } else { Some(body.profile) },
        }
    }
}

/// POST /api/agents - admin-created agents start active and verified
pub async fn agent_create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateAgentRequest>,
) -> ApiResult<AgentData> {
    let mut profile = body.profile.into_profile();
    profile.status = STATUS_ACTIVE.to_string();
    profile.verified = true;

    let draft = AccountDraft {
        first_name: body.first_name,
        last_name: body.last_name,
        email: body.email,
        password: body.password,
        role: Role::Agent,
        agent_profile: Some(profile),
        ..Default::default()
    };
    let agent = state.profiles().create(draft).await?;
    Ok(ApiResponse::created(AgentData { agent }))
}

/// PUT /api/agents/:id - sparse update; profile fields merge into the stored profile
pub async fn agent_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateAgentRequest>,
) -> ApiResult<AgentData> {
    let id = parse_id(&id, "Agent")?;
    let agent = state.profiles().update(id, Some(Role::Agent), body.into()).await?;
    Ok(ApiResponse::success(AgentData { agent }))
}

/// DELETE /api/agents/:id
pub async fn agent_delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let id = parse_id(&id, "Agent")?;
    state.profiles().delete(id, Some(Role::Agent)).await?;
    Ok(ApiResponse::message("Agent deleted successfully"))
}

/// POST /api/agents/:id/upload - multipart image in the `profileImage` field
pub async fn agent_upload(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> ApiResult<AgentData> {
    let id = parse_id(&id, "Agent")?;
    if state.profiles().find_by_id_with_role(id, Role::Agent).await?.is_none() {
        return Err(ProfileError::NotFound("Agent").into());
    }

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Malformed(e.body_text()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| UploadError::Malformed(e.body_text()))?;

        let path = state
            .uploads()
            .save_agent_image(&file_name, content_type.as_deref(), &bytes)
            .await?;
        let agent = state.profiles().set_agent_image(id, path).await?;
        return Ok(ApiResponse::success(AgentData { agent }));
    }

    Err(UploadError::MissingFile.into())
}
