use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::agent::AgentProfile;
use super::goals::Goals;

pub const DEFAULT_COUNTRY: &str = "United States";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Agent,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Agent => "agent",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "agent" => Ok(Role::Agent),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role `{}`", other)),
        }
    }
}

/// Primary/secondary marker shared by addresses and phone numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    #[default]
    Primary,
    Secondary,
}

/// The stored account document. The password hash lives outside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub phone_numbers: Vec<Phone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<Goals>,
    #[serde(default)]
    pub notifications: Notifications,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_profile: Option<AgentProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: Uuid,
    #[serde(rename = "type", default)]
    pub kind: ContactKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phone {
    pub id: Uuid,
    #[serde(rename = "type", default)]
    pub kind: ContactKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Notifications {
    pub listing_alerts: bool,
    pub favorites: bool,
    pub newsletter: bool,
}

impl Default for Notifications {
    fn default() -> Self {
        Self {
            listing_alerts: true,
            favorites: true,
            newsletter: true,
        }
    }
}

/// Request shape for appending or replacing an address. Absent `type` and
/// `country` fall back to their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressInput {
    #[serde(rename = "type")]
    pub kind: Option<ContactKind>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

impl AddressInput {
    pub fn into_address(self, id: Uuid) -> Address {
        Address {
            id,
            kind: self.kind.unwrap_or_default(),
            street: self.street,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            country: self.country.unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PhoneInput {
    #[serde(rename = "type")]
    pub kind: Option<ContactKind>,
    pub number: Option<String>,
}

impl PhoneInput {
    pub fn into_phone(self, id: Uuid) -> Phone {
        Phone {
            id,
            kind: self.kind.unwrap_or_default(),
            number: self.number,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationsPatch {
    pub listing_alerts: Option<bool>,
    pub favorites: Option<bool>,
    pub newsletter: Option<bool>,
}

impl Notifications {
    pub fn apply(&mut self, patch: NotificationsPatch) {
        if let Some(v) = patch.listing_alerts { self.listing_alerts = v; }
        if let Some(v) = patch.favorites { self.favorites = v; }
        if let Some(v) = patch.newsletter { self.newsletter = v; }
    }
}

/// Everything needed to create an account.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountDraft {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub role: Role,
    #[validate(nested)]
    pub agent_profile: Option<AgentProfile>,
    pub is_verified: bool,
}

impl AccountDraft {
    pub fn normalize(&mut self) {
        self.first_name = self.first_name.trim().to_string();
        self.last_name = self.last_name.trim().to_string();
        self.email = normalize_email(&self.email);
        if let Some(profile) = self.agent_profile.as_mut() {
            profile.normalize();
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Public projection of an agent in directory listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_numbers: Vec<Phone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_profile: Option<AgentProfile>,
}

impl From<Account> for AgentSummary {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email,
            phone_numbers: account.phone_numbers,
            agent_profile: account.agent_profile,
        }
    }
}

/// Projection used by the admin dashboard's recent-users list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for UserSummary {
    fn from(account: Account) -> Self {
        Self {
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email,
            role: account.role,
            created_at: account.created_at,
        }
    }
}
