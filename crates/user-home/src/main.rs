//! Terminal UserHome view for the marketplace.
//!
//! Shows the signed-in user's profile and purchase history and lets them
//! chat with the marketplace assistant.

mod commands;
mod config;
mod render;
mod view;

use std::path::PathBuf;
use std::sync::Arc;

use chat_core::User;
use clap::{Parser, Subcommand};
use home_session::{ChatSession, FileIdentityStore};
use marketplace_client::MarketplaceClient;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Log filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "user_home=info,home_session=info,marketplace_client=info";

#[derive(Debug, Parser)]
#[command(name = "user-home")]
#[command(about = "Marketplace UserHome: profile, assistant chat and purchase history")]
struct Args {
    /// Backend base URL. Falls back to MARKETPLACE_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Endpoint generation, v1 or v2. Falls back to MARKETPLACE_API_VERSION.
    #[arg(long, global = true)]
    api_version: Option<String>,

    /// Directory of the identity record. Falls back to USER_HOME_STATE_DIR.
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the UserHome view and chat (default)
    Home,

    /// Store a signed-in user
    Login {
        /// Backend user id (may be empty when an email is given)
        #[arg(long, default_value = "")]
        id: String,

        #[arg(long)]
        nombre: String,

        #[arg(long)]
        correo: String,

        /// Mobile phone number
        #[arg(long)]
        celular: Option<String>,

        #[arg(long)]
        ciudad: Option<String>,
    },

    /// Log out and forget the stored user
    Logout,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Logs go to stderr so they do not interleave with the view
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::from_env()?.with_overrides(args.api_url, args.api_version.as_deref(), args.state_dir)?;
    info!(
        api_url = %config.api_url,
        api_version = %config.api_version,
        state_dir = %config.state_dir.display(),
        "Starting user-home"
    );

    let store = FileIdentityStore::in_dir(&config.state_dir);

    match args.command.unwrap_or(Command::Home) {
        Command::Login {
            id,
            nombre,
            correo,
            celular,
            ciudad,
        } => {
            let user = User {
                numero_celular: celular,
                ciudad,
                ..User::new(id, nombre, correo)
            };
            commands::login(&store, user)?;
        }
        Command::Logout => {
            let client = MarketplaceClient::new(config.client_config())?;
            commands::logout(&store, Arc::new(client)).await?;
        }
        Command::Home => {
            let client = MarketplaceClient::new(config.client_config())?;
            match ChatSession::activate(&store, Arc::new(client)) {
                Ok(session) => view::run_home(session, &store).await?,
                Err(redirect) => println!("{}", render::render_redirect(&redirect)),
            }
        }
    }

    Ok(())
}
