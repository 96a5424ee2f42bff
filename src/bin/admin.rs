//! CLI administration tool for linkpaste.
//!
//! Works directly against the datastore through the same repositories and
//! services as the server, without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Register a hostname
//! cargo run --bin linkpaste-admin -- domain add s.example.com
//!
//! # List hostnames / remove one
//! cargo run --bin linkpaste-admin -- domain list
//! cargo run --bin linkpaste-admin -- domain remove old.example.com
//!
//! # List links
//! cargo run --bin linkpaste-admin -- link list
//!
//! # Delete every expired paste
//! cargo run --bin linkpaste-admin -- paste purge-expired
//!
//! # Counts, connectivity, password hashes
//! cargo run --bin linkpaste-admin -- stats
//! cargo run --bin linkpaste-admin -- db check
//! cargo run --bin linkpaste-admin -- hash-password
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or `DB_*` components): PostgreSQL connection string
//! - `APP_HOSTNAME` (optional): canonical hostname

use linkpaste::config::{self, mask_connection_string};
use linkpaste::state::{Repositories, Services};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Password};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;

/// CLI tool for managing linkpaste.
#[derive(Parser)]
#[command(name = "linkpaste-admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage registered hostnames
    Domain {
        #[command(subcommand)]
        action: DomainAction,
    },

    /// Inspect short links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Maintain pastes
    Paste {
        #[command(subcommand)]
        action: PasteAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Print an Argon2id hash of a password
    HashPassword {
        /// Password to hash (prompted for when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
}

#[derive(Subcommand)]
enum DomainAction {
    /// Register a hostname
    Add { hostname: String },

    /// List hostnames, oldest first
    List,

    /// Remove a hostname (the last one cannot be removed)
    Remove {
        hostname: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum LinkAction {
    /// List links, newest first
    List,
}

#[derive(Subcommand)]
enum PasteAction {
    /// Delete every paste whose expiry has passed
    PurgeExpired,
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Commands::HashPassword { password } = cli.command {
        return hash_password(password);
    }

    let config = config::load_from_env()?;
    let database_url = config
        .database_url
        .clone()
        .context("DATABASE_URL (or DB_HOST/DB_USER/DB_NAME) must be set")?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(&database_url)
            )
        })?;

    let services = Services::new(
        Repositories::postgres(Arc::new(pool.clone())),
        config.app_hostname.clone(),
    );

    match cli.command {
        Commands::Domain { action } => handle_domain_action(action, &services).await?,
        Commands::Link { action } => handle_link_action(action, &services).await?,
        Commands::Paste { action } => handle_paste_action(action, &services).await?,
        Commands::Stats => handle_stats(&services).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
        Commands::HashPassword { .. } => {}
    }

    Ok(())
}

async fn handle_domain_action(action: DomainAction, services: &Services) -> Result<()> {
    match action {
        DomainAction::Add { hostname } => {
            let domain = services.domains.add(&hostname).await?;
            println!(
                "{} {}",
                "Domain added:".green().bold(),
                domain.hostname.cyan()
            );
        }
        DomainAction::List => {
            let domains = services.domains.list().await?;

            println!("{}", "Registered domains".bright_blue().bold());
            println!();

            if domains.is_empty() {
                println!("{}", "  No domains registered yet".yellow());
                println!();
                return Ok(());
            }

            for (i, domain) in domains.iter().enumerate() {
                let marker = if i == 0 { "primary".green() } else { "".normal() };
                println!(
                    "  {:<40} {:<20} {}",
                    domain.hostname.cyan(),
                    domain
                        .added_at
                        .format("%Y-%m-%d %H:%M")
                        .to_string()
                        .bright_black(),
                    marker
                );
            }

            println!();
            println!(
                "  Total: {}",
                domains.len().to_string().bright_white().bold()
            );
            println!();
        }
        DomainAction::Remove { hostname, yes } => {
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Remove domain {hostname}?"))
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "Cancelled".red());
                    return Ok(());
                }
            }

            services.domains.remove(&hostname).await?;
            println!("{}", "Domain removed".green().bold());
        }
    }

    Ok(())
}

async fn handle_link_action(action: LinkAction, services: &Services) -> Result<()> {
    match action {
        LinkAction::List => {
            let links = services.links.list_links().await?;

            println!("{}", "Short links".bright_blue().bold());
            println!();

            for link in &links {
                let lock = if link.is_protected() {
                    "locked".yellow()
                } else {
                    "".normal()
                };
                println!(
                    "  {:<45} {:>6} clicks  {} {}",
                    link.short_url().cyan(),
                    link.click_count,
                    link.url.bright_black(),
                    lock
                );
            }

            println!();
            println!("  Total: {}", links.len().to_string().bright_white().bold());
            println!();
        }
    }

    Ok(())
}

async fn handle_paste_action(action: PasteAction, services: &Services) -> Result<()> {
    match action {
        PasteAction::PurgeExpired => {
            let removed = services.pastes.purge_expired().await?;
            println!(
                "{} {}",
                "Expired pastes deleted:".green().bold(),
                removed.to_string().bright_white().bold()
            );
        }
    }

    Ok(())
}

/// Displays link, paste, click and domain counts.
async fn handle_stats(services: &Services) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let links = services.links.count_links().await?;
    let pastes = services.pastes.count_pastes().await?;
    let clicks = services.clicks.count_clicks().await?;
    let domains = services.domains.list().await?.len();

    println!("  Domains: {}", domains.to_string().bright_green().bold());
    println!("  Links:   {}", links.to_string().bright_green().bold());
    println!("  Pastes:  {}", pastes.to_string().bright_green().bold());
    println!("  Clicks:  {}", clicks.to_string().bright_green().bold());
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "Database Information".bright_blue().bold());
            println!();
            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}

fn hash_password(password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Repeat password", "Passwords do not match")
            .interact()?,
    };

    anyhow::ensure!(!password.is_empty(), "Password must not be empty");

    let hash = linkpaste::application::services::auth_service::hash_password(&password)?;
    println!("{hash}");

    Ok(())
}
