//! Auth subcommands: login, register, logout, status.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};

use dialoguer::{Input, Password};

use snaplink_client::ApiClient;
use snaplink_client::types::{AuthResponse, LoginRequest, RegisterRequest};

use crate::config::{AuthSession, CliConfig};

/// Auth subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum AuthAction {
    /// Log in to the backend.
    Login {
        /// Account email (prompted when omitted).
        #[arg(short, long)]
        email: Option<String>,
        /// Password (prompted when omitted).
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Create a new account.
    Register {
        #[arg(short, long)]
        email: Option<String>,
        /// Display name.
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Log out and forget the stored session.
    Logout,
    /// Show current auth status.
    Status,
}

/// Execute an auth subcommand.
pub async fn run(client: &ApiClient, action: AuthAction) -> anyhow::Result<()> {
    match action {
        AuthAction::Login { email, password } => login(client, email, password).await,
        AuthAction::Register {
            email,
            name,
            password,
        } => register(client, email, name, password).await,
        AuthAction::Logout => logout(),
        AuthAction::Status => {
            status();
            Ok(())
        }
    }
}

async fn login(
    client: &ApiClient,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let email = prompt_if_missing(email, "Email")?;
    let password = prompt_password_if_missing(password)?;

    let resp = client.login(&LoginRequest { email, password }).await?;
    persist_session(&resp)?;

    let mut out = io::stdout();
    writeln!(
        out,
        "Logged in as {} ({} plan)",
        resp.user.email, resp.user.plan
    )?;
    Ok(())
}

async fn register(
    client: &ApiClient,
    email: Option<String>,
    name: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let email = prompt_if_missing(email, "Email")?;
    let name = prompt_if_missing(name, "Name")?;
    let password = prompt_password_if_missing(password)?;

    let resp = client
        .register(&RegisterRequest {
            email,
            password,
            name,
        })
        .await?;
    persist_session(&resp)?;

    let mut out = io::stdout();
    writeln!(out, "Welcome, {}! You're on the {} plan.", resp.user.name, resp.user.plan)?;
    Ok(())
}

fn logout() -> anyhow::Result<()> {
    let mut cfg = CliConfig::load();
    cfg.clear_auth();
    cfg.save()?;
    let mut out = io::stdout();
    writeln!(out, "Logged out")?;
    Ok(())
}

fn status() {
    let cfg = CliConfig::load();
    let mut out = io::stdout();
    match &cfg.auth {
        Some(auth) => {
            let _ = writeln!(out, "Logged in as: {}", auth.email);
            let _ = writeln!(out, "User ID: {}", auth.user_id);
            if let Some(url) = &cfg.api_url {
                let _ = writeln!(out, "Backend: {url}");
            }
        }
        None => {
            let _ = writeln!(out, "Not logged in");
        }
    }
}

/// Store the full session. The client already wrote the token via the
/// token store; this fills in the account identity alongside it.
fn persist_session(resp: &AuthResponse) -> anyhow::Result<()> {
    let mut cfg = CliConfig::load();
    cfg.auth = Some(AuthSession {
        user_id: resp.user.id.clone(),
        email: resp.user.email.clone(),
        name: resp.user.name.clone(),
        token: resp.token.clone(),
    });
    cfg.save()
}

fn prompt_if_missing(value: Option<String>, prompt: &str) -> anyhow::Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::new().with_prompt(prompt).interact_text()?),
    }
}

fn prompt_password_if_missing(value: Option<String>) -> anyhow::Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Password::new().with_prompt("Password").interact()?),
    }
}
