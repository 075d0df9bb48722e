use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;
use validator::{Validate, ValidateEmail};

use crate::auth::{self, AuthError};
use crate::database::models::{
    normalize_email, Account, AccountDraft, AccountPatch, AgentProfile, Goals, GoalsPatch,
    Notifications, NotificationsPatch, Role, UserSummary,
};
use crate::database::{AccountRepository, DatabaseError, ACCOUNTS_TABLE};
use crate::filter::{Filter, FilterError};
use crate::services::validation::FieldErrors;
use crate::types::{apply_subdocument_op, Subdocument, SubdocumentOp};

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("User already exists with this email")]
    DuplicateEmail,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0} not found")]
    SubdocumentNotFound(&'static str),

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Your current password is wrong")]
    WrongPassword,

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error(transparent)]
    Database(DatabaseError),
}

impl From<DatabaseError> for ProfileError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::DuplicateKey(_) => ProfileError::DuplicateEmail,
            other => ProfileError::Database(other),
        }
    }
}

impl From<FilterError> for ProfileError {
    fn from(err: FilterError) -> Self {
        ProfileError::Database(DatabaseError::Filter(err))
    }
}

impl From<AuthError> for ProfileError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::PasswordHash(msg) => ProfileError::PasswordHash(msg),
            other => ProfileError::Token(other.to_string()),
        }
    }
}

/// Label used in not-found messages for a role-filtered lookup.
fn subject(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::Agent) => "Agent",
        Some(Role::Admin) => "Admin",
        _ => "User",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_properties: i64,
    pub total_revenue: i64,
    pub page_views: i64,
    pub active_listings: i64,
    pub conversions: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub recent_users: Vec<UserSummary>,
}

/// The profile store: validation rules and every read/write on account documents.
#[derive(Clone)]
pub struct ProfileService {
    repo: Arc<dyn AccountRepository>,
    bcrypt_cost: u32,
}

impl ProfileService {
    pub fn new(repo: Arc<dyn AccountRepository>, bcrypt_cost: u32) -> Self {
        Self { repo, bcrypt_cost }
    }

    pub fn repository(&self) -> &Arc<dyn AccountRepository> {
        &self.repo
    }

    pub async fn create(&self, mut draft: AccountDraft) -> Result<Account, ProfileError> {
        draft.normalize();
        draft.validate().map_err(|e| ProfileError::Validation(FieldErrors::from(e)))?;

        if self.repo.find_by_email(&draft.email).await?.is_some() {
            return Err(ProfileError::DuplicateEmail);
        }

        let password_hash = auth::hash_password(&draft.password, self.bcrypt_cost).await?;
        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            first_name: draft.first_name,
            last_name: draft.last_name,
            email: draft.email,
            role: draft.role,
            addresses: vec![],
            phone_numbers: vec![],
            goals: None,
            notifications: Notifications::default(),
            agent_profile: draft.agent_profile,
            profile_image: None,
            is_verified: draft.is_verified,
            created_at: now,
            updated_at: now,
        };

        self.repo.insert(&account, &password_hash).await?;
        info!(id = %account.id, role = %account.role, "Created account");
        Ok(account)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, ProfileError> {
        Ok(self.repo.find_by_id(id).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>, ProfileError> {
        Ok(self.repo.find_by_email(&normalize_email(email)).await?)
    }

    pub async fn find_by_id_with_role(&self, id: Uuid, role: Role) -> Result<Option<Account>, ProfileError> {
        Ok(self.repo.find_by_id(id).await?.filter(|a| a.role == role))
    }

    async fn load(&self, id: Uuid, role: Option<Role>) -> Result<Account, ProfileError> {
        self.repo
            .find_by_id(id)
            .await?
            .filter(|a| role.map_or(true, |r| a.role == r))
            .ok_or(ProfileError::NotFound(subject(role)))
    }

    /// Persist a modified aggregate, stamping `updatedAt`.
    async fn save(&self, mut account: Account, role: Option<Role>) -> Result<Account, ProfileError> {
        account.updated_at = Utc::now();
        if !self.repo.replace(&account).await? {
            return Err(ProfileError::NotFound(subject(role)));
        }
        Ok(account)
    }

    /// Sparse patch merge, re-validated as a whole before it is stored.
    pub async fn update(&self, id: Uuid, role: Option<Role>, patch: AccountPatch) -> Result<Account, ProfileError> {
        let mut account = self.load(id, role).await?;
        let previous_email = account.email.clone();
        patch.apply(&mut account);
        validate_account(&account).map_err(ProfileError::Validation)?;

        if account.email != previous_email {
            if let Some(existing) = self.repo.find_by_email(&account.email).await? {
                if existing.id != account.id {
                    return Err(ProfileError::DuplicateEmail);
                }
            }
        }
        self.save(account, role).await
    }

    pub async fn delete(&self, id: Uuid, role: Option<Role>) -> Result<(), ProfileError> {
        self.load(id, role).await?;
        if !self.repo.delete(id).await? {
            return Err(ProfileError::NotFound(subject(role)));
        }
        info!(id = %id, "Deleted account");
        Ok(())
    }

    /// Append, replace or remove one address/phone entry. Returns the updated account.
    pub async fn mutate_subdocument<S: Subdocument>(
        &self,
        account_id: Uuid,
        op: SubdocumentOp<S::Input>,
    ) -> Result<Account, ProfileError> {
        let mut account = self.load(account_id, None).await?;
        if !apply_subdocument_op(S::collection(&mut account), op) {
            return Err(ProfileError::SubdocumentNotFound(S::LABEL));
        }
        self.save(account, None).await
    }

    /// `Some(account)` when the candidate password matches. The hash never leaves this call.
    pub async fn verify_credential(&self, email: &str, candidate: &str) -> Result<Option<Account>, ProfileError> {
        let Some((account, hash)) = self.repo.find_credentials(&normalize_email(email)).await? else {
            return Ok(None);
        };
        if auth::verify_password(candidate, &hash).await? {
            Ok(Some(account))
        } else {
            warn!(id = %account.id, "Password mismatch");
            Ok(None)
        }
    }

    pub async fn update_profile_names(
        &self,
        id: Uuid,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Result<Account, ProfileError> {
        let patch = AccountPatch { first_name, last_name, ..Default::default() };
        self.update(id, None, patch).await
    }

    /// Stored goals, or the defaults when none were ever written.
    pub async fn get_goals(&self, id: Uuid) -> Result<Goals, ProfileError> {
        let account = self.load(id, None).await?;
        Ok(account.goals.unwrap_or_default())
    }

    pub async fn update_goals(&self, id: Uuid, patch: GoalsPatch) -> Result<Goals, ProfileError> {
        let mut account = self.load(id, None).await?;
        let now = Utc::now();
        let mut goals = account.goals.take().unwrap_or_default();
        goals.apply(patch, now);
        account.goals = Some(goals.clone());
        self.save(account, None).await?;
        Ok(goals)
    }

    pub async fn update_notifications(&self, id: Uuid, patch: NotificationsPatch) -> Result<Account, ProfileError> {
        let mut account = self.load(id, None).await?;
        account.notifications.apply(patch);
        self.save(account, None).await
    }

    pub async fn change_password(&self, id: Uuid, current: &str, new_password: &str) -> Result<Account, ProfileError> {
        if new_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ProfileError::Validation(FieldErrors::single(
                "newPassword",
                "Password must be at least 6 characters",
            )));
        }
        let account = self.load(id, None).await?;
        let hash = self
            .repo
            .find_password_hash(id)
            .await?
            .ok_or(ProfileError::NotFound("User"))?;
        if !auth::verify_password(current, &hash).await? {
            warn!(id = %id, "Password change rejected");
            return Err(ProfileError::WrongPassword);
        }

        let new_hash = auth::hash_password(new_password, self.bcrypt_cost).await?;
        if !self.repo.update_password_hash(id, &new_hash).await? {
            return Err(ProfileError::NotFound("User"));
        }
        info!(id = %id, "Password changed");
        Ok(account)
    }

    /// Point the agent's profile image at an uploaded file.
    pub async fn set_agent_image(&self, id: Uuid, path: String) -> Result<Account, ProfileError> {
        let mut account = self.load(id, Some(Role::Agent)).await?;
        account
            .agent_profile
            .get_or_insert_with(AgentProfile::default)
            .profile_image = Some(path);
        self.save(account, Some(Role::Agent)).await
    }

    pub async fn dashboard(&self) -> Result<Dashboard, ProfileError> {
        let all = Filter::new(ACCOUNTS_TABLE)?;
        let total_users = self.repo.count(&all).await?;

        let mut recent = Filter::new(ACCOUNTS_TABLE)?;
        recent.order(json!(["createdAt desc", "id asc"]))?.limit(5, None)?;
        let recent_users = self.repo.select(&recent).await?.into_iter().map(UserSummary::from).collect();

        Ok(Dashboard {
            stats: DashboardStats { total_users, ..Default::default() },
            recent_users,
        })
    }

    /// Every account, newest first.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, ProfileError> {
        let mut filter = Filter::new(ACCOUNTS_TABLE)?;
        filter.order(json!(["createdAt desc", "id asc"]))?;
        Ok(self.repo.select(&filter).await?)
    }
}

/// Whole-aggregate checks run after a patch has been merged.
fn validate_account(account: &Account) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if account.first_name.is_empty() {
        errors.insert("firstName", "First name is required");
    }
    if account.last_name.is_empty() {
        errors.insert("lastName", "Last name is required");
    }
    if !account.email.validate_email() {
        errors.insert("email", "Please provide a valid email");
    }
    if let Some(profile) = &account.agent_profile {
        if let Err(e) = profile.validate() {
            errors.extend_prefixed("agentProfile", FieldErrors::from(e));
        }
    }
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::goals::{BuyingGoal, BuyingGoals, BuyingTimeline, SellingGoal};
    use crate::database::models::{Address, AddressInput, AgentProfilePatch, Phone, PhoneInput};
    use crate::testing::{agent_draft, memory_service, user_draft};

    #[tokio::test]
    async fn create_then_find_returns_aggregate_without_password() {
        let service = memory_service();
        let created = service.create(user_draft("ana@example.com")).await.unwrap();

        let found = service.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(found.role, Role::User);
        assert!(found.notifications.newsletter);

        let document = serde_json::to_value(&found).unwrap();
        assert!(document.get("password").is_none());
        assert!(document.get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn email_uniqueness_is_case_insensitive() {
        let service = memory_service();
        service.create(user_draft("Case@Example.com")).await.unwrap();
        let err = service.create(user_draft("case@example.COM")).await.unwrap_err();
        assert!(matches!(err, ProfileError::DuplicateEmail));
    }

    #[tokio::test]
    async fn create_collects_every_violation() {
        let service = memory_service();
        let mut profile = AgentProfile::default();
        profile.license_states = vec!["TX".to_string(), "XX".to_string()];
        profile.years_of_experience = Some(60);
        let mut draft = agent_draft("bad@example.com", profile);
        draft.first_name = "   ".to_string();

        match service.create(draft).await.unwrap_err() {
            ProfileError::Validation(errors) => {
                assert!(errors.contains("firstName"));
                assert!(errors.contains("agentProfile.licenseStates"));
                assert!(errors.contains("agentProfile.yearsOfExperience"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn rating_bounds_on_create() {
        let service = memory_service();
        for (i, average) in [0.0, 5.0].into_iter().enumerate() {
            let mut profile = AgentProfile::default();
            profile.rating.average = average;
            assert!(service.create(agent_draft(&format!("ok{}@example.com", i), profile)).await.is_ok());
        }
        for (i, average) in [-0.5, 5.5].into_iter().enumerate() {
            let mut profile = AgentProfile::default();
            profile.rating.average = average;
            let err = service.create(agent_draft(&format!("bad{}@example.com", i), profile)).await.unwrap_err();
            assert!(matches!(err, ProfileError::Validation(ref e) if e.contains("agentProfile.rating.average")));
        }
    }

    #[tokio::test]
    async fn partial_agent_update_preserves_other_fields() {
        let service = memory_service();
        let mut profile = AgentProfile::default();
        profile.license_states = vec!["CA".to_string()];
        profile.specialties = vec!["Luxury Homes".to_string()];
        profile.years_of_experience = Some(3);
        let agent = service.create(agent_draft("agent@example.com", profile)).await.unwrap();

        let patch = AccountPatch {
            agent_profile: Some(AgentProfilePatch { bio: Some("Bay Area".to_string()), ..Default::default() }),
            ..Default::default()
        };
        let updated = service.update(agent.id, Some(Role::Agent), patch).await.unwrap();

        let profile = updated.agent_profile.unwrap();
        assert_eq!(profile.bio.as_deref(), Some("Bay Area"));
        assert_eq!(profile.license_states, vec!["CA"]);
        assert_eq!(profile.specialties, vec!["Luxury Homes"]);
        assert_eq!(profile.years_of_experience, Some(3));
        assert!(updated.updated_at >= agent.updated_at);
    }

    #[tokio::test]
    async fn update_respects_role_filter_and_revalidates() {
        let service = memory_service();
        let user = service.create(user_draft("plain@example.com")).await.unwrap();

        let err = service.update(user.id, Some(Role::Agent), AccountPatch::default()).await.unwrap_err();
        assert!(matches!(err, ProfileError::NotFound("Agent")));

        let patch = AccountPatch {
            agent_profile: Some(AgentProfilePatch { expertise: Some("Industrial".to_string()), ..Default::default() }),
            ..Default::default()
        };
        let err = service.update(user.id, None, patch).await.unwrap_err();
        assert!(matches!(err, ProfileError::Validation(ref e) if e.contains("agentProfile.expertise")));

        let patch = AccountPatch {
            agent_profile: Some(AgentProfilePatch {
                license_states: Some(vec!["TX".to_string(), "ZZ".to_string()]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = service.update(user.id, None, patch).await.unwrap_err();
        assert!(matches!(err, ProfileError::Validation(ref e) if e.contains("agentProfile.licenseStates")));
        assert!(service.find_by_id(user.id).await.unwrap().unwrap().agent_profile.is_none());
    }

    #[tokio::test]
    async fn update_rejects_taken_email() {
        let service = memory_service();
        service.create(user_draft("taken@example.com")).await.unwrap();
        let other = service.create(user_draft("other@example.com")).await.unwrap();

        let patch = AccountPatch { email: Some("TAKEN@example.com".to_string()), ..Default::default() };
        assert!(matches!(service.update(other.id, None, patch).await, Err(ProfileError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn delete_checks_role() {
        let service = memory_service();
        let user = service.create(user_draft("keepme@example.com")).await.unwrap();
        assert!(matches!(service.delete(user.id, Some(Role::Agent)).await, Err(ProfileError::NotFound(_))));
        assert!(service.find_by_id(user.id).await.unwrap().is_some());

        service.delete(user.id, None).await.unwrap();
        assert!(service.find_by_id(user.id).await.unwrap().is_none());
        assert!(matches!(service.delete(user.id, None).await, Err(ProfileError::NotFound(_))));
    }

    #[tokio::test]
    async fn phone_append_then_remove() {
        let service = memory_service();
        let user = service.create(user_draft("phone@example.com")).await.unwrap();

        let with_phone = service
            .mutate_subdocument::<Phone>(
                user.id,
                SubdocumentOp::Append(PhoneInput { number: Some("555-0101".to_string()), ..Default::default() }),
            )
            .await
            .unwrap();
        assert_eq!(with_phone.phone_numbers.len(), 1);
        let phone_id = with_phone.phone_numbers[0].id;

        let emptied = service.mutate_subdocument::<Phone>(user.id, SubdocumentOp::Remove(phone_id)).await.unwrap();
        assert!(emptied.phone_numbers.is_empty());

        let err = service.mutate_subdocument::<Phone>(user.id, SubdocumentOp::Remove(phone_id)).await.unwrap_err();
        assert!(matches!(err, ProfileError::SubdocumentNotFound("Phone number")));
    }

    #[tokio::test]
    async fn address_replace_is_scoped_to_owner() {
        let service = memory_service();
        let owner = service.create(user_draft("owner@example.com")).await.unwrap();
        let stranger = service.create(user_draft("stranger@example.com")).await.unwrap();

        let owner = service
            .mutate_subdocument::<Address>(owner.id, SubdocumentOp::Append(AddressInput::default()))
            .await
            .unwrap();
        let address_id = owner.addresses[0].id;

        let err = service
            .mutate_subdocument::<Address>(stranger.id, SubdocumentOp::Replace(address_id, AddressInput::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, ProfileError::SubdocumentNotFound("Address")));
    }

    #[tokio::test]
    async fn verify_credential_matches_only_correct_password() {
        let service = memory_service();
        let user = service.create(user_draft("login@example.com")).await.unwrap();

        let found = service.verify_credential(" LOGIN@example.com ", "password123").await.unwrap();
        assert_eq!(found.map(|a| a.id), Some(user.id));
        assert!(service.verify_credential("login@example.com", "nope").await.unwrap().is_none());
        assert!(service.verify_credential("ghost@example.com", "password123").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn change_password_requires_current() {
        let service = memory_service();
        let user = service.create(user_draft("rotate@example.com")).await.unwrap();

        assert!(matches!(
            service.change_password(user.id, "wrong", "newpass1").await,
            Err(ProfileError::WrongPassword)
        ));
        assert!(matches!(
            service.change_password(user.id, "password123", "short").await,
            Err(ProfileError::Validation(_))
        ));

        service.change_password(user.id, "password123", "newpass1").await.unwrap();
        assert!(service.verify_credential("rotate@example.com", "newpass1").await.unwrap().is_some());
        assert!(service.verify_credential("rotate@example.com", "password123").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn goals_default_then_update_stamps_last_updated() {
        let service = memory_service();
        let user = service.create(user_draft("goals@example.com")).await.unwrap();

        let defaults = service.get_goals(user.id).await.unwrap();
        assert_eq!(defaults.buying.goal, BuyingGoal::None);

        let patch = GoalsPatch {
            buying: Some(BuyingGoals { goal: BuyingGoal::FirstHome, timeline: BuyingTimeline::ThreeMonths }),
            ..Default::default()
        };
        let first = service.update_goals(user.id, patch).await.unwrap();
        assert_eq!(first.buying.goal, BuyingGoal::FirstHome);
        assert_eq!(first.selling.goal, SellingGoal::None);

        let second = service.update_goals(user.id, GoalsPatch::default()).await.unwrap();
        assert_eq!(second.buying.goal, BuyingGoal::FirstHome);
        assert!(second.last_updated >= first.last_updated);

        // Non-goal writes leave the stamp alone
        service.update_profile_names(user.id, Some("Renamed".to_string()), None).await.unwrap();
        assert_eq!(service.get_goals(user.id).await.unwrap().last_updated, second.last_updated);
    }

    #[tokio::test]
    async fn set_agent_image_requires_agent() {
        let service = memory_service();
        let user = service.create(user_draft("noimg@example.com")).await.unwrap();
        assert!(service.set_agent_image(user.id, "/uploads/agents/x.png".to_string()).await.is_err());

        let agent = service.create(agent_draft("img@example.com", AgentProfile::default())).await.unwrap();
        let updated = service.set_agent_image(agent.id, "/uploads/agents/x.png".to_string()).await.unwrap();
        assert_eq!(updated.agent_profile.unwrap().profile_image.as_deref(), Some("/uploads/agents/x.png"));
    }

    #[tokio::test]
    async fn dashboard_counts_and_lists_recent() {
        let service = memory_service();
        for i in 0..7 {
            service.create(user_draft(&format!("u{}@example.com", i))).await.unwrap();
        }
        let dashboard = service.dashboard().await.unwrap();
        assert_eq!(dashboard.stats.total_users, 7);
        assert_eq!(dashboard.stats.total_properties, 0);
        assert_eq!(dashboard.recent_users.len(), 5);
        assert!(dashboard.recent_users[0].created_at >= dashboard.recent_users[4].created_at);

        assert_eq!(service.list_accounts().await.unwrap().len(), 7);
    }
}
