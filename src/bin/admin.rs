//! CLI administration tool for shortlink.
//!
//! Provides commands for creating accounts, inspecting links, viewing
//! statistics, and checking the database without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create an account (prompts for the password)
//! cargo run --bin admin -- user create --username alice
//!
//! # List the newest links, optionally for one owner
//! cargo run --bin admin -- links list --owner alice --limit 20
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `BASE_URL` (optional): used to print full short URLs

use shortlink::application::services::link_service::clamp_limit;
use shortlink::domain::auth::PasswordHasher;
use shortlink::domain::entities::NewUser;
use shortlink::domain::repositories::{LinkRepository, UserRepository};
use shortlink::error::AppError;
use shortlink::infrastructure::persistence::{PgLinkRepository, PgUserRepository};
use shortlink::infrastructure::security::Argon2PasswordHasher;
use shortlink::utils::validation::{validate_password, validate_username};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shortlink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Inspect links
    Links {
        #[command(subcommand)]
        action: LinksAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new account
    Create {
        /// Username (prompted if omitted)
        #[arg(short, long)]
        username: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum LinksAction {
    /// List links, newest first
    List {
        /// Only links owned by this username
        #[arg(short, long)]
        owner: Option<String>,

        /// Maximum rows (capped at 100)
        #[arg(short, long)]
        limit: Option<i64>,

        #[arg(long, default_value_t = 0)]
        offset: i64,
    },
}

/// Database operation subcommands.
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

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Links { action } => handle_links_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn app_err(e: AppError) -> anyhow::Error {
    anyhow::anyhow!("{}", e)
}

async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo = PgUserRepository::new(Arc::new(pool.clone()));

    match action {
        UserAction::Create { username, yes } => create_user(&repo, username, yes).await,
    }
}

/// Creates an account with an interactively entered password.
///
/// # Flow
///
/// 1. Prompt for username (or use provided), validate
/// 2. Prompt for password twice, validate
/// 3. Confirm (unless `--yes`)
/// 4. Hash with Argon2id and store
async fn create_user(
    repo: &PgUserRepository,
    username: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "👤 Create User".bright_blue().bold());
    println!();

    let username = match username {
        Some(u) => u,
        None => Input::new().with_prompt("Username").interact_text()?,
    };
    let username = validate_username(&username)?.to_string();

    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()?;
    validate_password(&password)?;

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Create user '{}'?", username))
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let password_hash = Argon2PasswordHasher::new().hash(&password)?;

    let user = repo
        .create(NewUser {
            username,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            AppError::Conflict { .. } => anyhow::anyhow!("Username is already taken"),
            other => app_err(other),
        })?;

    println!();
    println!("{}", "✅ User created successfully!".green().bold());
    println!("  ID:       {}", user.id.to_string().bright_black());
    println!("  Username: {}", user.username.cyan());
    println!();
    println!(
        "  Log in with: {}",
        "POST /auth/login {\"username\": ..., \"password\": ...}".bright_cyan()
    );
    println!();

    Ok(())
}

async fn handle_links_action(action: LinksAction, pool: &PgPool) -> Result<()> {
    match action {
        LinksAction::List {
            owner,
            limit,
            offset,
        } => list_links(pool, owner, limit, offset).await,
    }
}

/// Lists links with click counts.
///
/// # Output Format
///
/// ```text
/// 🔗 Links
///
///   Alias            Clicks   Owner  Created           URL
///   ───────────────────────────────────────────────────────────────────
///   sale             42       1      2026-01-15 10:30  https://shop.example.com
/// ```
async fn list_links(
    pool: &PgPool,
    owner: Option<String>,
    limit: Option<i64>,
    offset: i64,
) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let links_repo = PgLinkRepository::new(pool.clone());
    let limit = clamp_limit(limit);

    let links = match owner {
        Some(username) => {
            let users_repo = PgUserRepository::new(pool);
            let user = users_repo
                .find_by_username(username.trim())
                .await
                .map_err(app_err)?
                .with_context(|| format!("User '{}' not found", username))?;

            links_repo
                .list_by_owner(user.id, limit, offset)
                .await
                .map_err(app_err)?
        }
        None => links_repo.list(limit, offset).await.map_err(app_err)?,
    };

    println!("{}", "🔗 Links".bright_blue().bold());
    println!();

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    let base_url = std::env::var("BASE_URL").ok();

    println!(
        "  {:<16} {:<8} {:<6} {:<17} {}",
        "Alias".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Owner".bright_white().bold(),
        "Created".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        let alias = match &base_url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), link.alias),
            None => link.alias.clone(),
        };

        println!(
            "  {:<16} {:<8} {:<6} {:<17} {}",
            alias.cyan(),
            link.click_count.to_string().bright_green(),
            link.owner_id.to_string().bright_black(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.original_url
        );
    }

    println!();
    println!("  Shown: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Displays system statistics.
///
/// Shows:
/// - Number of users
/// - Number of links
/// - Sum of all click counters
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let users_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await?;

    let clicks_count: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(click_count), 0)::BIGINT FROM links")
            .fetch_one(pool)
            .await?;

    println!(
        "  Users:  {}",
        users_count.to_string().bright_green().bold()
    );
    println!(
        "  Links:  {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks: {}",
        clicks_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migrations: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success")
                    .fetch_one(pool)
                    .await
                    .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Applied migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
