use std::path::PathBuf;

use anyhow::Context;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::models::AccountDraft;
use crate::services::ProfileService;

const BUNDLED_AGENTS: &str = include_str!("../../../fixtures/agents.yaml");

#[derive(Debug, Default)]
pub struct SeedReport {
    pub created: Vec<String>,
    pub skipped: Vec<String>,
}

pub fn parse_agents(yaml: &str) -> anyhow::Result<Vec<AccountDraft>> {
    serde_yaml::from_str(yaml).context("invalid agent fixture")
}

/// Create each draft whose email is not taken yet.
pub async fn seed(profiles: &ProfileService, drafts: Vec<AccountDraft>) -> anyhow::Result<SeedReport> {
    let mut report = SeedReport::default();
    for draft in drafts {
        let label = format!("{} {}", draft.first_name, draft.last_name);
        if profiles.find_by_email(&draft.email).await?.is_some() {
            tracing::info!("Agent {} already exists, skipping", label);
            report.skipped.push(draft.email);
            continue;
        }
        let email = draft.email.clone();
        profiles
            .create(draft)
            .await
            .with_context(|| format!("failed to create agent {}", label))?;
        tracing::info!("Created agent: {}", label);
        report.created.push(email);
    }
    Ok(report)
}

pub async fn handle(profiles: &ProfileService, file: Option<PathBuf>, output_format: OutputFormat) -> anyhow::Result<()> {
    let yaml = match &file {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?,
        None => BUNDLED_AGENTS.to_string(),
    };
    let report = seed(profiles, parse_agents(&yaml)?).await?;

    output_success(
        output_format,
        &format!("Seeded {} agents ({} already present)", report.created.len(), report.skipped.len()),
        Some(json!({ "created": report.created, "skipped": report.skipped })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Role;
    use crate::testing::memory_service;
    use validator::Validate;

    #[test]
    fn bundled_fixture_is_valid() {
        let drafts = parse_agents(BUNDLED_AGENTS).unwrap();
        assert_eq!(drafts.len(), 5);
        for draft in &drafts {
            assert_eq!(draft.role, Role::Agent);
            draft.validate().unwrap();
        }
        let sarah = drafts[0].agent_profile.as_ref().unwrap();
        assert_eq!(sarah.office.address.zip_code.as_deref(), Some("75201"));
    }

    #[tokio::test]
    async fn reseeding_skips_existing_emails() {
        let profiles = memory_service();
        let first = seed(&profiles, parse_agents(BUNDLED_AGENTS).unwrap()).await.unwrap();
        assert_eq!(first.created.len(), 5);

        let second = seed(&profiles, parse_agents(BUNDLED_AGENTS).unwrap()).await.unwrap();
        assert!(second.created.is_empty());
        assert_eq!(second.skipped.len(), 5);
    }
}
