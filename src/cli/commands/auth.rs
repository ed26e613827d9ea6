use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::config::{load_session_config, save_session_config};
use crate::cli::utils::{output_error, output_success, prompt};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Register a new account")]
    Register {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Sign in and store the bearer token")]
    Login {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Sign out and discard the stored token")]
    Logout,

    #[command(about = "Show the signed-in user")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Register { email, password } => {
            let password = resolve_password(password)?;
            authenticate("register", &email, &password, &output_format).await
        }
        AuthCommands::Login { email, password } => {
            let password = resolve_password(password)?;
            authenticate("login", &email, &password, &output_format).await
        }
        AuthCommands::Logout => logout(&output_format).await,
        AuthCommands::Whoami => whoami(&output_format).await,
    }
}

fn resolve_password(password: Option<String>) -> anyhow::Result<String> {
    match password {
        Some(p) => Ok(p),
        None => prompt("Password", ""),
    }
}

/// Register and login share a wire shape: POST credentials, store the
/// returned token for subsequent commands
async fn authenticate(
    endpoint: &str,
    email: &str,
    password: &str,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    let mut config = load_session_config()?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/{}", config.base_url, endpoint))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;

    let status = res.status();
    let body: Value = res.json().await?;

    if !status.is_success() {
        return output_error(
            output_format,
            body.get("message")
                .and_then(|v| v.as_str())
                .unwrap_or("authentication failed"),
            body.get("code").and_then(|v| v.as_str()),
        );
    }

    let token = body["data"]["token"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("server response did not include a token"))?;

    config.token = Some(token.to_string());
    config.email = Some(email.to_string());
    save_session_config(&config)?;

    output_success(
        output_format,
        &format!("Signed in as {}", email),
        Some(json!({ "user": body["data"]["user"] })),
    )
}

async fn logout(output_format: &OutputFormat) -> anyhow::Result<()> {
    let mut config = load_session_config()?;

    if let Some(token) = config.token.as_deref() {
        // Best effort: the token is stateless, discarding it locally is
        // what actually ends the session
        let client = reqwest::Client::new();
        let _ = client
            .post(format!("{}/logout", config.base_url))
            .bearer_auth(token)
            .send()
            .await;
    }

    config.token = None;
    config.email = None;
    save_session_config(&config)?;

    output_success(output_format, "Logged out", None)
}

async fn whoami(output_format: &OutputFormat) -> anyhow::Result<()> {
    let config = load_session_config()?;
    let Some(token) = config.token.as_deref() else {
        return output_error(output_format, "Not signed in", None);
    };

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/profile", config.base_url))
        .bearer_auth(token)
        .send()
        .await?;

    let status = res.status();
    let body: Value = res.json().await?;

    if !status.is_success() {
        return output_error(
            output_format,
            body.get("message")
                .and_then(|v| v.as_str())
                .unwrap_or("could not fetch profile"),
            body.get("code").and_then(|v| v.as_str()),
        );
    }

    let email = body["data"]["user"]["email"].as_str().unwrap_or("unknown");
    output_success(
        output_format,
        &format!("Signed in as {}", email),
        Some(json!({ "user": body["data"]["user"] })),
    )
}
