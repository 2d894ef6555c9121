//! CLI administration tool for linkforge.
//!
//! Inspects links and click analytics straight from the PostgreSQL store,
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Most recent links
//! cargo run --bin admin -- links recent --limit 10
//!
//! # Search by code or by original URL
//! cargo run --bin admin -- links search --code promo
//! cargo run --bin admin -- links search --url example.com
//!
//! # Click analytics for the last month
//! cargo run --bin admin -- stats abc123
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or `DB_*` parts): PostgreSQL connection

use linkforge::application::services::StatsService;
use linkforge::config::mask_connection_string;
use linkforge::domain::entities::Link;
use linkforge::domain::repositories::{Counts, LinkStore};
use linkforge::infrastructure::persistence::{PgClickStore, PgLinkStore};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for inspecting linkforge data.
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
    /// Browse links
    Links {
        #[command(subcommand)]
        action: LinksAction,
    },

    /// Show click analytics for a short code (last month)
    Stats {
        /// Short code
        code: String,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum LinksAction {
    /// List the most recently created links
    Recent {
        #[arg(short, long, default_value_t = 20)]
        limit: i64,
    },

    /// Case-insensitive substring search
    Search(SearchArgs),
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct SearchArgs {
    /// Match against short codes
    #[arg(long)]
    code: Option<String>,

    /// Match against original URLs
    #[arg(long)]
    url: Option<String>,

    #[arg(short, long, default_value_t = 20)]
    limit: i64,
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection and show totals
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = database_url()?;
    let pool = PgPool::connect(&database_url)
        .await
        .with_context(|| format!("Failed to connect to {}", mask_connection_string(&database_url)))?;
    let pool = Arc::new(pool);

    match cli.command {
        Commands::Links { action } => handle_links_action(action, pool).await?,
        Commands::Stats { code } => handle_stats(&code, pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// `DATABASE_URL`, or one built from the `DB_*` parts.
fn database_url() -> Result<String> {
    if let Ok(url) = std::env::var("DATABASE_URL") {
        return Ok(url);
    }

    let part = |key: &str| std::env::var(key).with_context(|| format!("{key} must be set"));
    let host = std::env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string());
    let port = std::env::var("DB_PORT").unwrap_or_else(|_| "5432".to_string());

    Ok(format!(
        "postgres://{}:{}@{}:{}/{}",
        part("DB_USER")?,
        part("DB_PASSWORD")?,
        host,
        port,
        part("DB_NAME")?
    ))
}

async fn handle_links_action(action: LinksAction, pool: Arc<PgPool>) -> Result<()> {
    let store = PgLinkStore::new(pool);

    let (title, links) = match action {
        LinksAction::Recent { limit } => ("Recent links".to_string(), store.list_recent(limit).await?),
        LinksAction::Search(args) => match (args.code, args.url) {
            (Some(code), _) => (
                format!("Links with code matching '{}'", code),
                store.search_by_code(&code, args.limit).await?,
            ),
            (None, Some(url)) => (
                format!("Links with URL matching '{}'", url),
                store.search_by_original_url(&url, args.limit).await?,
            ),
            (None, None) => anyhow::bail!("Either --code or --url is required"),
        },
    };

    println!("{}", title.bright_blue().bold());
    println!();

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    for link in &links {
        print_link(link);
    }
    println!();
    println!("  {} link(s)", links.len().to_string().bright_green().bold());

    Ok(())
}

fn print_link(link: &Link) {
    let marker = if link.is_custom { "*" } else { " " };
    println!(
        "  {}{:<12} {:>6} clicks  {}  {}",
        marker,
        link.code.bright_white().bold(),
        link.click_count,
        link.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
        link.original_url
    );
}

async fn handle_stats(code: &str, pool: Arc<PgPool>) -> Result<()> {
    let service = StatsService::new(
        Arc::new(PgLinkStore::new(pool.clone())),
        Arc::new(PgClickStore::new(pool)),
    );

    let report = service.get_analytics(code, None, None).await?;

    println!("{}", format!("Analytics for {}", code).bright_blue().bold());
    println!();
    println!("  URL:       {}", report.link.original_url.bright_white());
    println!(
        "  Created:   {}",
        report.link.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "  Clicks:    {} recorded, counter {}",
        report.clicks.len().to_string().bright_green().bold(),
        report.link.click_count
    );
    println!(
        "  Window:    {} .. {}",
        report.from.format("%Y-%m-%d"),
        report.to.format("%Y-%m-%d")
    );

    print_counts("By day", &report.by_day);
    print_counts("By month", &report.by_month);
    print_counts("By user agent", &report.by_user_agent);
    println!();

    Ok(())
}

fn print_counts(title: &str, counts: &Counts) {
    println!();
    println!("  {}", title.bold());
    if counts.is_empty() {
        println!("    {}", "(none)".dimmed());
        return;
    }
    for (key, count) in counts {
        let key = if key.is_empty() { "(unknown)" } else { key };
        println!("    {:<40} {}", key, count.to_string().bright_green());
    }
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
                .fetch_one(pool)
                .await
                .context("links table missing; start the server once to run migrations")?;
            let clicks_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM link_clicks")
                .fetch_one(pool)
                .await?;

            println!("{}", "Database connection OK".green().bold());
            println!();
            println!("  PostgreSQL: {}", version.bright_white());
            println!(
                "  Links:      {}",
                links_count.to_string().bright_green().bold()
            );
            println!(
                "  Clicks:     {}",
                clicks_count.to_string().bright_green().bold()
            );
            println!();
        }
    }

    Ok(())
}
