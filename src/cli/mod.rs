pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "remax")]
#[command(about = "Operator tooling for the agent directory store")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create an administrator account")]
    CreateAdmin(commands::admin::CreateAdminArgs),

    #[command(about = "Insert the fixture agents, skipping emails that already exist")]
    SeedAgents {
        #[arg(long, help = "YAML file with agent drafts (defaults to the bundled fixture)")]
        file: Option<std::path::PathBuf>,
    },

    #[command(about = "Try representative agent drafts and report validation results")]
    DiagnoseAgents,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let (profiles, repo) = utils::open_store().await?;

    let result = match cli.command {
        Commands::CreateAdmin(args) => commands::admin::handle(&profiles, args, output_format).await,
        Commands::SeedAgents { file } => commands::seed::handle(&profiles, file, output_format).await,
        Commands::DiagnoseAgents => commands::diagnose::handle(&profiles, output_format).await,
    };

    repo.close().await;
    result
}
