use serde::Serialize;
use serde_json::json;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::database::models::vocab::{EXPERTISE, LICENSE_STATES, SPECIALTIES};
use crate::database::models::{AccountDraft, AgentProfile, Contact, Office, Role};
use crate::services::{FieldErrors, ProfileError, ProfileService};

#[derive(Debug, Serialize)]
pub struct Diagnosis {
    pub case: &'static str,
    pub created: bool,
    #[serde(skip_serializing_if = "FieldErrors::is_empty")]
    pub errors: FieldErrors,
}

fn draft(first_name: &str, last_name: &str, email: &str, profile: AgentProfile) -> AccountDraft {
    AccountDraft {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
        password: "password123".to_string(),
        role: Role::Agent,
        agent_profile: Some(profile),
        ..Default::default()
    }
}

/// Minimal profile, blank form values, and out-of-vocabulary values.
pub fn cases() -> Vec<(&'static str, AccountDraft)> {
    let minimal = AgentProfile { verified: true, ..Default::default() };

    let blank = AgentProfile {
        license_number: Some(String::new()),
        office: Office {
            name: Some(String::new()),
            phone: Some(String::new()),
            ..Default::default()
        },
        bio: Some(String::new()),
        contact: Contact {
            office_phone: Some(String::new()),
            mobile_phone: Some(String::new()),
            website: Some(String::new()),
        },
        verified: true,
        ..Default::default()
    };

    let invalid = AgentProfile {
        license_states: vec!["INVALID_STATE".to_string()],
        specialties: vec!["Invalid Specialty".to_string()],
        expertise: "Invalid Expertise".to_string(),
        verified: true,
        ..Default::default()
    };

    vec![
        ("minimal", draft("John", "Doe", "john.doe.test@example.com", minimal)),
        ("empty values", draft("Jane", "Smith", "jane.smith.test@example.com", blank)),
        ("invalid enums", draft("Bob", "Wilson", "bob.wilson.test@example.com", invalid)),
    ]
}

/// Attempt every case against the store, removing whatever got created.
pub async fn diagnose(profiles: &ProfileService) -> anyhow::Result<Vec<Diagnosis>> {
    let mut results = Vec::new();
    for (case, draft) in cases() {
        if let Some(existing) = profiles.find_by_email(&draft.email).await? {
            profiles.delete(existing.id, None).await?;
        }
        match profiles.create(draft).await {
            Ok(account) => {
                profiles.delete(account.id, None).await?;
                results.push(Diagnosis { case, created: true, errors: FieldErrors::new() });
            }
            Err(ProfileError::Validation(errors)) => {
                results.push(Diagnosis { case, created: false, errors });
            }
            Err(other) => return Err(other.into()),
        }
    }
    Ok(results)
}

pub async fn handle(profiles: &ProfileService, output_format: OutputFormat) -> anyhow::Result<()> {
    let results = diagnose(profiles).await?;

    if let OutputFormat::Text = output_format {
        for result in &results {
            if result.created {
                output_success(output_format, &format!("{}: agent created", result.case), None)?;
            } else {
                output_error(
                    output_format,
                    &format!("{}: agent rejected", result.case),
                    Some(serde_json::to_value(&result.errors)?),
                )?;
            }
        }
        println!();
        println!("License states: {}", LICENSE_STATES.join(", "));
        println!("Specialties: {}", SPECIALTIES.join(", "));
        println!("Expertise: {}", EXPERTISE.join(", "));
        return Ok(());
    }

    output_success(
        output_format,
        "Agent creation diagnosis complete",
        Some(json!({
            "results": results,
            "vocabularies": {
                "licenseStates": &LICENSE_STATES[..],
                "specialties": &SPECIALTIES[..],
                "expertise": &EXPERTISE[..],
            }
        })),
    )
}
