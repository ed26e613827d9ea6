pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "intern")]
#[command(about = "Intern CLI - fill in and manage internship applications from the terminal")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Authentication and token management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Fill in the application form step by step")]
    Apply {
        #[arg(long, help = "Load an existing application for editing")]
        edit: Option<uuid::Uuid>,

        #[arg(long, help = "Discard any saved wizard session and start fresh")]
        fresh: bool,
    },

    #[command(about = "List, inspect, and delete saved applications")]
    Applications {
        #[command(subcommand)]
        cmd: commands::applications::ApplicationCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
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

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format).await,
        Commands::Apply { edit, fresh } => commands::apply::handle(edit, fresh).await,
        Commands::Applications { cmd } => commands::applications::handle(cmd, output_format).await,
    }
}
