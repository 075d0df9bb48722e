use serde::{Deserialize, Serialize};
use validator::Validate;

use super::vocab::{
    validate_agent_status, validate_expertise, validate_license_states, validate_specialties,
    DEFAULT_EXPERTISE, STATUS_ACTIVE,
};

/// Agent sub-profile, embedded in an account whose role is `agent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[validate(custom(function = "validate_license_states"))]
    pub license_states: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, max = 50, message = "Years of experience must be between 0 and 50"))]
    pub years_of_experience: Option<i64>,
    #[validate(custom(function = "validate_specialties"))]
    pub specialties: Vec<String>,
    pub languages: Vec<String>,
    #[validate(custom(function = "validate_expertise"))]
    pub expertise: String,
    pub office: Office,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000, message = "Bio cannot exceed 2000 characters"))]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub social_media: SocialMedia,
    pub contact: Contact,
    pub achievements: Vec<Achievement>,
    #[validate(custom(function = "validate_agent_status"))]
    pub status: String,
    pub verified: bool,
    pub property_count: i64,
    #[validate(nested)]
    pub rating: Rating,
}

impl Default for AgentProfile {
    fn default() -> Self {
        Self {
            license_number: None,
            license_states: Vec::new(),
            years_of_experience: None,
            specialties: Vec::new(),
            languages: Vec::new(),
            expertise: DEFAULT_EXPERTISE.to_string(),
            office: Office::default(),
            bio: None,
            profile_image: None,
            cover_image: None,
            social_media: SocialMedia::default(),
            contact: Contact::default(),
            achievements: Vec::new(),
            status: STATUS_ACTIVE.to_string(),
            verified: false,
            property_count: 0,
            rating: Rating::default(),
        }
    }
}

impl AgentProfile {
    /// Trim free-text identifiers the way they are stored.
    pub fn normalize(&mut self) {
        if let Some(license) = self.license_number.as_mut() {
            *license = license.trim().to_string();
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Office {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub address: OfficeAddress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OfficeAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialMedia {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Achievement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct Rating {
    #[validate(range(min = 0.0, max = 5.0, message = "Rating average must be between 0 and 5"))]
    pub average: f64,
    #[validate(range(min = 0, message = "Total reviews cannot be negative"))]
    pub total_reviews: i64,
}
