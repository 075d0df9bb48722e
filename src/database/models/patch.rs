//! Sparse patches: every field optional, only supplied fields are merged.

use serde::Deserialize;

use super::account::{normalize_email, Account};
use super::agent::{Achievement, AgentProfile, Contact, Office, Rating, SocialMedia};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentProfilePatch {
    pub license_number: Option<String>,
    pub license_states: Option<Vec<String>>,
    pub years_of_experience: Option<i64>,
    pub specialties: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
    pub expertise: Option<String>,
    pub office: Option<Office>,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
    pub cover_image: Option<String>,
    pub social_media: Option<SocialMedia>,
    pub contact: Option<Contact>,
    pub achievements: Option<Vec<Achievement>>,
    pub status: Option<String>,
    pub verified: Option<bool>,
    pub property_count: Option<i64>,
    pub rating: Option<Rating>,
}

impl AgentProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.license_number.is_none()
            && self.license_states.is_none()
            && self.years_of_experience.is_none()
            && self.specialties.is_none()
            && self.languages.is_none()
            && self.expertise.is_none()
            && self.office.is_none()
            && self.bio.is_none()
            && self.profile_image.is_none()
            && self.cover_image.is_none()
            && self.social_media.is_none()
            && self.contact.is_none()
            && self.achievements.is_none()
            && self.status.is_none()
            && self.verified.is_none()
            && self.property_count.is_none()
            && self.rating.is_none()
    }

    pub fn merge_into(self, profile: &mut AgentProfile) {
        if let Some(v) = self.license_number { profile.license_number = Some(v); }
        if let Some(v) = self.license_states { profile.license_states = v; }
        if let Some(v) = self.years_of_experience { profile.years_of_experience = Some(v); }
        if let Some(v) = self.specialties { profile.specialties = v; }
        if let Some(v) = self.languages { profile.languages = v; }
        if let Some(v) = self.expertise { profile.expertise = v; }
        if let Some(v) = self.office { profile.office = v; }
        if let Some(v) = self.bio { profile.bio = Some(v); }
        if let Some(v) = self.profile_image { profile.profile_image = Some(v); }
        if let Some(v) = self.cover_image { profile.cover_image = Some(v); }
        if let Some(v) = self.social_media { profile.social_media = v; }
        if let Some(v) = self.contact { profile.contact = v; }
        if let Some(v) = self.achievements { profile.achievements = v; }
        if let Some(v) = self.status { profile.status = v; }
        if let Some(v) = self.verified { profile.verified = v; }
        if let Some(v) = self.property_count { profile.property_count = v; }
        if let Some(v) = self.rating { profile.rating = v; }
        profile.normalize();
    }

    /// Build a full profile from defaults plus whatever the patch supplies.
    pub fn into_profile(self) -> AgentProfile {
        let mut profile = AgentProfile::default();
        self.merge_into(&mut profile);
        profile
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub agent_profile: Option<AgentProfilePatch>,
}

impl AccountPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none() && self.agent_profile.is_none()
    }

    /// Merge into `account`, creating a default agent profile when one is patched in.
    pub fn apply(self, account: &mut Account) {
        if let Some(v) = self.first_name { account.first_name = v.trim().to_string(); }
        if let Some(v) = self.last_name { account.last_name = v.trim().to_string(); }
        if let Some(v) = self.email { account.email = normalize_email(&v); }
        if let Some(patch) = self.agent_profile {
            patch.merge_into(account.agent_profile.get_or_insert_with(AgentProfile::default));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::agent::OfficeAddress;
    use crate::testing::sample_account;

    #[test]
    fn partial_profile_update_keeps_untouched_fields() {
        let mut account = sample_account("keep@example.com");
        let mut profile = AgentProfile::default();
        profile.license_states = vec!["TX".to_string()];
        profile.years_of_experience = Some(8);
        profile.bio = Some("Dallas specialist".to_string());
        account.agent_profile = Some(profile);

        AccountPatch {
            agent_profile: Some(AgentProfilePatch { years_of_experience: Some(9), ..Default::default() }),
            ..Default::default()
        }
        .apply(&mut account);

        let profile = account.agent_profile.unwrap();
        assert_eq!(profile.years_of_experience, Some(9));
        assert_eq!(profile.license_states, vec!["TX"]);
        assert_eq!(profile.bio.as_deref(), Some("Dallas specialist"));
        assert_eq!(profile.status, "active");
    }

    #[test]
    fn profile_is_created_on_first_patch() {
        let mut account = sample_account("new@example.com");
        assert!(account.agent_profile.is_none());

        AccountPatch {
            agent_profile: Some(AgentProfilePatch { languages: Some(vec!["French".to_string()]), ..Default::default() }),
            ..Default::default()
        }
        .apply(&mut account);

        let profile = account.agent_profile.unwrap();
        assert_eq!(profile.languages, vec!["French"]);
        assert_eq!(profile.expertise, "Residential");
    }

    #[test]
    fn identity_fields_are_normalized() {
        let mut account = sample_account("old@example.com");
        AccountPatch {
            first_name: Some("  Maria ".to_string()),
            email: Some(" Maria@Example.com".to_string()),
            ..Default::default()
        }
        .apply(&mut account);
        assert_eq!(account.first_name, "Maria");
        assert_eq!(account.email, "maria@example.com");
    }

    #[test]
    fn office_is_replaced_whole() {
        let mut profile = AgentProfile::default();
        profile.office.name = Some("Old Office".to_string());
        profile.office.address.city = Some("Austin".to_string());

        AgentProfilePatch {
            office: Some(Office {
                address: OfficeAddress { city: Some("Houston".to_string()), ..Default::default() },
                ..Default::default()
            }),
            ..Default::default()
        }
        .merge_into(&mut profile);

        assert_eq!(profile.office.address.city.as_deref(), Some("Houston"));
        assert!(profile.office.name.is_none());
    }

    #[test]
    fn empty_patch_detected() {
        assert!(AccountPatch::default().is_empty());
        assert!(!AccountPatch { last_name: Some("X".to_string()), ..Default::default() }.is_empty());
        assert!(AgentProfilePatch::default().is_empty());
        assert!(!AgentProfilePatch { verified: Some(false), ..Default::default() }.is_empty());
    }
}
