use clap::Args;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::models::{AccountDraft, Role};
use crate::services::ProfileService;

#[derive(Args, Debug)]
pub struct CreateAdminArgs {
    #[arg(long, default_value = "admin@example.com")]
    pub email: String,
    #[arg(long, default_value = "admin123!", help = "Initial password; change it after first login")]
    pub password: String,
    #[arg(long, default_value = "Admin")]
    pub first_name: String,
    #[arg(long, default_value = "User")]
    pub last_name: String,
}

pub async fn handle(profiles: &ProfileService, args: CreateAdminArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    if profiles.find_by_email(&args.email).await?.is_some() {
        anyhow::bail!("User with this email already exists: {}", args.email);
    }

    let draft = AccountDraft {
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        password: args.password,
        role: Role::Admin,
        is_verified: true,
        ..Default::default()
    };
    let admin = profiles.create(draft).await?;

    output_success(
        output_format,
        &format!("Admin user created successfully: {}", admin.email),
        Some(json!({ "id": admin.id, "email": admin.email })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::memory_service;

    fn args(email: &str) -> CreateAdminArgs {
        CreateAdminArgs {
            email: email.to_string(),
            password: "admin123!".to_string(),
            first_name: "Admin".to_string(),
            last_name: "User".to_string(),
        }
    }

    #[tokio::test]
    async fn creates_verified_admin_once() {
        let profiles = memory_service();
        handle(&profiles, args("root@example.com"), OutputFormat::Json).await.unwrap();

        let admin = profiles.find_by_email("root@example.com").await.unwrap().unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(admin.is_verified);

        let again = handle(&profiles, args("ROOT@example.com"), OutputFormat::Json).await;
        assert!(again.is_err());
    }
}
