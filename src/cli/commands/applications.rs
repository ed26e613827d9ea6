use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::cli::config::load_session_config;
use crate::cli::utils::{confirm, output_success};
use crate::cli::OutputFormat;
use crate::database::models::application::Application;
use crate::wizard::HttpGateway;

#[derive(Subcommand)]
pub enum ApplicationCommands {
    #[command(about = "List your saved applications")]
    List,

    #[command(about = "Show one application in full")]
    Show {
        #[arg(help = "Application identifier")]
        id: Uuid,
    },

    #[command(about = "Delete an application permanently")]
    Delete {
        #[arg(help = "Application identifier")]
        id: Uuid,
        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

pub async fn handle(cmd: ApplicationCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = load_session_config()?;
    let token = config
        .token
        .clone()
        .ok_or_else(|| anyhow::anyhow!("Not signed in. Run `intern auth login <email>` first."))?;
    let gateway = HttpGateway::new(config.base_url.clone(), token);

    match cmd {
        ApplicationCommands::List => {
            let applications = gateway.list().await?;
            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&applications)?);
                }
                OutputFormat::Text => {
                    if applications.is_empty() {
                        println!("No applications yet. Start one with `intern apply`.");
                    } else {
                        for application in &applications {
                            println!(
                                "{}  {}  (updated {})",
                                application.id,
                                if application.name.is_empty() {
                                    "(unnamed)"
                                } else {
                                    &application.name
                                },
                                application.updated_at.format("%Y-%m-%d %H:%M")
                            );
                        }
                    }
                }
            }
            Ok(())
        }
        ApplicationCommands::Show { id } => {
            let application = gateway.fetch(id).await?;
            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&application)?);
                }
                OutputFormat::Text => print_application(&application),
            }
            Ok(())
        }
        ApplicationCommands::Delete { id, yes } => {
            if !yes
                && !confirm(&format!(
                    "Delete application {}? This cannot be undone.",
                    id
                ))?
            {
                println!("Aborted.");
                return Ok(());
            }

            gateway.delete(id).await?;
            output_success(
                &output_format,
                &format!("Application {} deleted", id),
                Some(json!({ "id": id })),
            )
        }
    }
}

fn print_application(application: &Application) {
    println!("Application {}", application.id);
    println!("  Name:    {}", application.name);
    println!("  Email:   {}", application.email);
    let address2 = application
        .address_line2
        .as_deref()
        .map(|l| format!(", {}", l))
        .unwrap_or_default();
    println!(
        "  Address: {}{}, {}, {} - {}",
        application.address_line1, address2, application.city, application.state,
        application.zipcode
    );
    match (application.is_studying, application.studying_at.as_deref()) {
        (true, Some(institution)) => println!("  Studying at: {}", institution),
        (true, None) => println!("  Currently studying"),
        (false, _) => println!("  Not currently studying"),
    }
    if application.projects.0.is_empty() {
        println!("  Projects: none");
    } else {
        println!("  Projects:");
        for project in application.projects.0.iter() {
            println!("    - {}: {}", project.name, project.description);
        }
    }
    println!("  Created: {}", application.created_at.format("%Y-%m-%d %H:%M"));
    println!("  Updated: {}", application.updated_at.format("%Y-%m-%d %H:%M"));
}
