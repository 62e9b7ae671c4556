//! SnapLink CLI
//!
//! Command-line client for the SnapLink QR code service: generate and
//! manage tracked QR codes, export images, and view scan analytics.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use snaplink_cli::auth_cmd::AuthAction;
use snaplink_cli::config::{CliConfig, ConfigTokenStore};
use snaplink_cli::download_cmd::DownloadArgs;
use snaplink_cli::generate_cmd::GenerateArgs;
use snaplink_cli::{
    account_cmd, analytics_cmd, auth_cmd, billing_cmd, download_cmd, generate_cmd, qr_cmd,
};
use snaplink_client::ApiClient;
use snaplink_client::client::DEFAULT_BASE_URL;
use snaplink_core::entitlements::Entitlements;
use snaplink_core::tracing_init::init_tracing;

#[derive(Parser, Debug)]
#[command(name = "snaplink")]
#[command(version, about = "QR code generation and scan tracking CLI", long_about = None)]
struct Cli {
    /// Backend API base URL.
    #[arg(long, env = "SNAPLINK_API_URL")]
    api_url: Option<String>,

    /// Emit JSON log lines.
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a new QR code.
    Generate(GenerateArgs),
    /// List your QR codes.
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Show one QR code.
    Show { id: String },
    /// Edit a QR code's title, description, or active state.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Toggle whether the short link redirects.
        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete a QR code.
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Download a QR code image.
    Download(DownloadArgs),
    /// Scan analytics: account overview, or one QR code.
    Analytics { id: Option<String> },
    /// Show available subscription plans.
    Plans,
    /// Start a plan upgrade checkout.
    Upgrade { plan: String },
    /// Manage the login session.
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Show profile, plan, and usage.
    Account,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing("snaplink=warn", cli.log_json);
    info!(version = env!("CARGO_PKG_VERSION"), "starting snaplink CLI");

    let config = CliConfig::load();
    let base_url = cli
        .api_url
        .clone()
        .or_else(|| config.api_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let client = ApiClient::new(&base_url, Arc::new(ConfigTokenStore))?;
    let logged_in = config.is_logged_in();

    match cli.command {
        Command::Generate(args) => {
            let ents = current_entitlements(&client, logged_in).await;
            generate_cmd::run(&client, &ents, args).await
        }
        Command::List { page, limit } => qr_cmd::list(&client, page, limit).await,
        Command::Show { id } => qr_cmd::show(&client, &id).await,
        Command::Update {
            id,
            title,
            description,
            active,
        } => qr_cmd::update(&client, &id, title, description, active).await,
        Command::Delete { id, yes } => qr_cmd::delete(&client, &id, yes).await,
        Command::Download(args) => {
            let ents = current_entitlements(&client, logged_in).await;
            download_cmd::run(&client, &ents, args).await
        }
        Command::Analytics { id } => {
            let ents = current_entitlements(&client, logged_in).await;
            analytics_cmd::run(&client, &ents, id).await
        }
        Command::Plans => billing_cmd::plans(&client).await,
        Command::Upgrade { plan } => billing_cmd::upgrade(&client, &plan).await,
        Command::Auth { action } => auth_cmd::run(&client, action).await,
        Command::Account => account_cmd::run(&client).await,
    }
}

/// Entitlements for the current session: the fetched profile when a
/// token is stored, optimistic anonymous defaults otherwise. A failed
/// profile fetch degrades to anonymous; the backend still enforces its
/// own limits on every call.
async fn current_entitlements(client: &ApiClient, logged_in: bool) -> Entitlements {
    if !logged_in {
        return Entitlements::anonymous();
    }
    match client.me().await {
        Ok(account) => Entitlements::for_account(&account),
        Err(err) => {
            warn!(%err, "could not fetch profile, using anonymous entitlements");
            Entitlements::anonymous()
        }
    }
}
