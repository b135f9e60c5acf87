//! CLI administration tool for the hotel booking service.
//!
//! Provides commands for managing accounts, viewing statistics,
//! and performing database operations without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # Create an administrator (prompts for missing values)
//! cargo run --bin admin -- user create --admin
//!
//! # List accounts
//! cargo run --bin admin -- user list
//!
//! # Grant administrator rights
//! cargo run --bin admin -- user promote owner@example.com
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
//! - `DATABASE_URL` or `DB_*` components (required)
//! - `TOKEN_SIGNING_SECRET` (required by the shared configuration loader)

use hotel_booking::application::services::{UserInput, UserService};
use hotel_booking::config;
use hotel_booking::infrastructure::persistence::PgUserRepository;
use hotel_booking::server::connect_database;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing the hotel booking service.
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

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Account management subcommands.
#[derive(Subcommand)]
enum UserAction {
    /// Create an account
    Create {
        #[arg(short, long)]
        email: Option<String>,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        /// Password (generated if omitted)
        #[arg(short, long)]
        password: Option<String>,

        /// Grant administrator rights
        #[arg(long)]
        admin: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all accounts
    List,

    /// Grant administrator rights to an existing account
    Promote {
        /// Email of the account
        email: String,
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

type CliUserService = UserService<PgUserRepository>;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let pool = connect_database(&config).await?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches account management commands.
async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let service = UserService::new(Arc::new(PgUserRepository::new(Arc::new(pool.clone()))));

    match action {
        UserAction::Create {
            email,
            first_name,
            last_name,
            password,
            admin,
            yes,
        } => {
            let input = prompt_user_input(email, first_name, last_name, password)?;
            create_user(&service, input, admin, yes).await?;
        }
        UserAction::List => list_users(&service).await?,
        UserAction::Promote { email } => promote_user(&service, &email).await?,
    }

    Ok(())
}

fn prompt_user_input(
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    password: Option<String>,
) -> Result<UserInput> {
    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let first_name = match first_name {
        Some(n) => n,
        None => Input::new().with_prompt("First name").interact_text()?,
    };
    let last_name = match last_name {
        Some(n) => n,
        None => Input::new().with_prompt("Last name").interact_text()?,
    };

    let password = match password {
        Some(p) => p,
        None => {
            let typed: String = Password::new()
                .with_prompt("Password (leave empty to generate)")
                .allow_empty_password(true)
                .interact()?;
            if typed.is_empty() {
                let generated = generate_password();
                println!("{}", "✨ Generated password".green());
                println!("  {}", generated.bright_yellow().bold());
                println!(
                    "{}",
                    "⚠️  Save this password now, it is not shown again."
                        .red()
                        .bold()
                );
                generated
            } else {
                typed
            }
        }
    };

    Ok(UserInput {
        email,
        password,
        first_name,
        last_name,
        country: None,
        city: None,
        phone: None,
        image_url: None,
    })
}

/// Creates an account after confirmation (unless `--yes`).
async fn create_user(
    service: &CliUserService,
    input: UserInput,
    is_admin: bool,
    skip_confirm: bool,
) -> Result<()> {
    println!();
    println!("{}", "👤 Create Account".bright_blue().bold());
    println!("  Email: {}", input.email.cyan());
    println!("  Name:  {} {}", input.first_name, input.last_name);
    println!(
        "  Role:  {}",
        if is_admin {
            "ADMIN".bright_magenta()
        } else {
            "USER".normal()
        }
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this account?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let user = service
        .create(input, is_admin)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create account: {}", e))?;

    println!(
        "{} (id {})",
        "✅ Account created".green().bold(),
        user.id.to_string().bright_black()
    );

    Ok(())
}

/// Lists all accounts.
///
/// # Output Format
///
/// ```text
/// 📋 Accounts
///
///   ID    Email                          Name                      Role
///   ──────────────────────────────────────────────────────────────────────
///   1     owner@example.com              Ada Lovelace              ADMIN
/// ```
async fn list_users(service: &CliUserService) -> Result<()> {
    println!("{}", "📋 Accounts".bright_blue().bold());
    println!();

    let users = service
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list accounts: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No accounts found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create --admin",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<5} {:<30} {:<25} {:<6}",
        "ID".bright_white().bold(),
        "Email".bright_white().bold(),
        "Name".bright_white().bold(),
        "Role".bright_white().bold()
    );
    println!("  {}", "─".repeat(70).bright_black());

    for user in &users {
        let role = if user.is_admin {
            "ADMIN".bright_magenta()
        } else {
            "USER".normal()
        };

        println!(
            "  {:<5} {:<30} {:<25} {}",
            user.id.to_string().bright_black(),
            user.email.cyan(),
            user.full_name(),
            role
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn promote_user(service: &CliUserService, email: &str) -> Result<()> {
    let user = service
        .promote(email)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to promote {}: {}", email, e))?;

    println!(
        "{} {} is now an administrator",
        "✅".green(),
        user.email.cyan()
    );
    Ok(())
}

/// Displays system statistics.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let count = |table: &'static str| async move {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
    };

    let users = count("users").await?;
    let hotels = count("hotels").await?;
    let rooms = count("rooms").await?;
    let bookings = count("bookings").await?;

    let revenue: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(total_cost_cents), 0)::BIGINT FROM bookings")
            .fetch_one(pool)
            .await?;

    println!("  Users:     {}", users.to_string().bright_green().bold());
    println!("  Hotels:    {}", hotels.to_string().bright_green().bold());
    println!("  Rooms:     {}", rooms.to_string().bright_green().bold());
    println!("  Bookings:  {}", bookings.to_string().bright_green().bold());
    println!(
        "  Revenue:   {}",
        format!("{}.{:02}", revenue / 100, revenue % 100)
            .bright_green()
            .bold()
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

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}

/// Generates a random 16-character alphanumeric password.
fn generate_password() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789";
    const PASSWORD_LEN: usize = 16;

    let mut rng = rand::rng();

    (0..PASSWORD_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
