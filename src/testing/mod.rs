//! Fixtures shared by unit tests.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::database::models::{Account, AccountDraft, AgentProfile, Notifications, Role};
use crate::database::MemoryAccountRepository;
use crate::services::ProfileService;

/// Lowest cost bcrypt accepts; keeps hashing fast in tests.
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn sample_account(email: &str) -> Account {
    let now = Utc::now();
    Account {
        id: Uuid::new_v4(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        email: email.to_string(),
        role: Role::User,
        addresses: vec![],
        phone_numbers: vec![],
        goals: None,
        notifications: Notifications::default(),
        agent_profile: None,
        profile_image: None,
        is_verified: false,
        created_at: now,
        updated_at: now,
    }
}

pub fn user_draft(email: &str) -> AccountDraft {
    AccountDraft {
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        email: email.to_string(),
        password: "password123".to_string(),
        ..Default::default()
    }
}

pub fn agent_draft(email: &str, profile: AgentProfile) -> AccountDraft {
    AccountDraft {
        role: Role::Agent,
        agent_profile: Some(profile),
        ..user_draft(email)
    }
}

pub fn memory_service() -> ProfileService {
    ProfileService::new(Arc::new(MemoryAccountRepository::new()), TEST_BCRYPT_COST)
}
