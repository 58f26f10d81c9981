//! Konnect - Kitchen Konnect Session CLI
//! Mission: Drive the session pipeline from the command line

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use konnect_client::config::ClientConfig;
use konnect_client::session::{
    Authenticator, FileTokenStorage, RegisterOutcome, RegisterRequest, SessionStore,
    SessionValidator,
};

#[derive(Parser)]
#[command(name = "konnect", about = "Kitchen Konnect session client")]
struct Cli {
    /// Identity service base URL (overrides KONNECT_API_BASE)
    #[arg(long)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and establish a session
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Register an account, auto-logging in when possible
    Register {
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        desired_role: Option<String>,
    },
    /// Restore the stored session and print the current profile
    Whoami,
    /// Exchange the renewal credential for a fresh primary one
    Refresh,
    /// Tear down the session
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env();
    if let Some(base) = cli.api_base {
        config.base_url = base.trim_end_matches('/').to_string();
    }

    let store = Arc::new(SessionStore::new(Box::new(FileTokenStorage::new(
        &config.token_path,
    ))));
    let auth = Arc::new(Authenticator::new(config.base_url.clone(), store.clone()));
    let validator = SessionValidator::new(auth.clone(), store.clone());

    match cli.command {
        Command::Login { username, password } => {
            let profile = auth.login(&username, &password).await?;
            println!(
                "logged in as {} ({}, admin_level {})",
                profile.username,
                profile.role.as_str(),
                profile.admin_level
            );
        }
        Command::Register {
            username,
            email,
            password,
            desired_role,
        } => {
            let outcome = auth
                .register_and_login(&RegisterRequest {
                    username: &username,
                    email: &email,
                    password: &password,
                    desired_role: desired_role.as_deref(),
                })
                .await?;
            match outcome {
                RegisterOutcome::LoggedIn(profile) => {
                    println!("registered and logged in as {}", profile.username);
                }
                RegisterOutcome::Registered => {
                    println!("registered, not logged in; run `konnect login`");
                }
            }
        }
        Command::Whoami => {
            let state = validator.restore().await;
            match store.profile() {
                Some(profile) => println!(
                    "{} <{}> role={} admin_level={}",
                    profile.username,
                    profile.email,
                    profile.role.as_str(),
                    profile.admin_level
                ),
                None => println!("signed out (state: {})", state),
            }
        }
        Command::Refresh => {
            auth.refresh().await?;
            println!("credential refreshed");
        }
        Command::Logout => {
            auth.logout().await;
            println!("signed out");
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "konnect_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
