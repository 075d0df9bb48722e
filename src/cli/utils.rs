use std::sync::Arc;

use anyhow::Context;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::config;
use crate::database::{open_repository, AccountRepository};
use crate::services::ProfileService;

/// Open the configured store the same way the server does.
pub async fn open_store() -> anyhow::Result<(ProfileService, Arc<dyn AccountRepository>)> {
    let config = config::config();
    let repo = open_repository(&config.storage, config.filter.debug_logging)
        .await
        .context("failed to open account store")?;
    let profiles = ProfileService::new(repo.clone(), config.security.bcrypt_cost);
    Ok((profiles, repo))
}

/// Output a success message in the appropriate format
pub fn output_success(output_format: OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });
            if let Some(data) = data {
                response["data"] = data;
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a failure in the appropriate format; per-field details go under `errors`
pub fn output_error(output_format: OutputFormat, message: &str, errors: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "message": message
            });
            if let Some(errors) = errors {
                response["errors"] = errors;
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
            if let Some(Value::Object(fields)) = errors {
                for (field, detail) in fields {
                    eprintln!("   - {}: {}", field, detail.as_str().unwrap_or_default());
                }
            }
        }
    }
    Ok(())
}
