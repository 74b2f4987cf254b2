//! CLI administration tool for linkdump.
//!
//! Works directly on the configured storage, without going through the HTTP
//! API. Uses the same wiring as the server, so links added here are scraped,
//! summarized and announced exactly as they would be through `POST /api/links`.
//!
//! # Usage
//!
//! ```bash
//! # Add a link and wait for it to be processed
//! cargo run --bin admin -- add https://example.com/post -t rust -t async
//!
//! # List failed links
//! cargo run --bin admin -- list --status failed
//!
//! # Process every pending link
//! cargo run --bin admin -- process
//!
//! # Retry a failed link
//! cargo run --bin admin -- reprocess <id>
//!
//! # Scrape and summarize a URL without storing it
//! cargo run --bin admin -- preview https://example.com/post
//!
//! # Delete a link
//! cargo run --bin admin -- delete <id>
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see [`linkdump::config`].

use linkdump::application::services::BatchSummary;
use linkdump::config;
use linkdump::domain::entities::{Link, LinkStatus};
use linkdump::server::build_state;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use tracing_subscriber::EnvFilter;

/// CLI tool for managing linkdump.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a link and wait until it has been processed
    Add {
        url: String,

        /// Tag to attach (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },

    /// List links
    List {
        /// Only show links in this status (pending, processing, completed, failed)
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Process every pending link
    Process,

    /// Process a link again, resetting it first if it failed
    Reprocess { id: String },

    /// Scrape and summarize a URL without storing it
    Preview { url: String },

    /// Add tags to a link
    Tag {
        id: String,

        #[arg(required = true)]
        tags: Vec<String>,
    },

    /// Delete a link
    Delete {
        id: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show statistics
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;
    let state = build_state(&config).await?;
    let service = state.link_service;

    match cli.command {
        Commands::Add { url, tags } => {
            let link = service.add_link(&url, tags).await?;
            println!("{} {}", "➕ Added".bright_blue().bold(), link.id().bright_black());
            println!("{}", "⏳ Processing...".bright_black());

            service.wait_for_idle().await;

            let link = service.get_link(link.id()).await?;
            print_link_details(&link);
        }
        Commands::List { status } => {
            let status = status
                .as_deref()
                .map(str::parse::<LinkStatus>)
                .transpose()?;
            let links = service.list_links(status).await?;
            print_link_table(&links);
        }
        Commands::Process => {
            println!("{}", "⚙️  Processing pending links".bright_blue().bold());
            let summary = service.process_all_links().await?;
            service.wait_for_idle().await;
            print_batch_summary(&summary);
        }
        Commands::Reprocess { id } => {
            let outcome = service.reprocess_link(&id).await;
            service.wait_for_idle().await;

            match outcome {
                Ok(link) => print_link_details(&link),
                Err(e) => {
                    println!("{} {}", "❌ Reprocessing failed:".red().bold(), e);
                    if let Ok(link) = service.get_link(&id).await {
                        print_link_details(&link);
                    }
                }
            }
        }
        Commands::Preview { url } => {
            let preview = service.preview(&url).await?;
            println!();
            println!("  URL:         {}", preview.url.cyan());
            println!("  Title:       {}", preview.title.bright_white().bold());
            println!("  Description: {}", preview.description);
            println!("  Summary:     {}", preview.summary);
            println!();
        }
        Commands::Tag { id, tags } => {
            let link = service.add_tags(&id, tags).await?;
            println!(
                "{} {}",
                "🏷️  Tags:".bright_blue().bold(),
                link.tags().join(", ").cyan()
            );
        }
        Commands::Delete { id, yes } => delete_link(&service, &id, yes).await?,
        Commands::Stats => {
            let stats = service.statistics().await?;

            println!("{}", "📊 Statistics".bright_blue().bold());
            println!();
            println!("  Total:       {}", stats.total.to_string().bright_green().bold());
            for (status, count) in &stats.by_status {
                println!("  {:<12} {}", format!("{status}:"), count.to_string().bright_white());
            }

            if !stats.by_tag.is_empty() {
                println!();
                println!("  {}", "Tags".bright_white().bold());
                for (tag, count) in &stats.by_tag {
                    println!("  {:<20} {}", tag.cyan(), count);
                }
            }
            println!();
        }
    }

    Ok(())
}

async fn delete_link(
    service: &linkdump::application::services::LinkManagementService,
    id: &str,
    skip_confirm: bool,
) -> Result<()> {
    let link = service.get_link(id).await?;

    println!("  Link: {}", link.url().cyan());
    println!("  ID:   {}", link.id().bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service.delete_link(id).await?;
    println!("{}", "✅ Link deleted".green().bold());

    Ok(())
}

fn colored_status(status: LinkStatus) -> ColoredString {
    match status {
        LinkStatus::Pending => status.as_str().yellow(),
        LinkStatus::Processing => status.as_str().bright_blue(),
        LinkStatus::Completed => status.as_str().green(),
        LinkStatus::Failed => status.as_str().red(),
    }
}

/// Prints links as a table.
///
/// # Output Format
///
/// ```text
///   ID                     Status      Created           URL
///   ──────────────────────────────────────────────────────────────────────
///   lq2k3j4h5abcdefghij    completed   2024-01-15 10:30  https://example.com
/// ```
fn print_link_table(links: &[Link]) {
    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return;
    }

    println!(
        "  {:<22} {:<11} {:<17} {}",
        "ID".bright_white().bold(),
        "Status".bright_white().bold(),
        "Created".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in links {
        println!(
            "  {:<22} {:<11} {:<17} {}",
            link.id().bright_black(),
            colored_status(link.status()),
            link.created_at().format("%Y-%m-%d %H:%M").to_string().bright_black(),
            link.url().cyan()
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());
}

fn print_link_details(link: &Link) {
    println!();
    println!("  ID:      {}", link.id().bright_black());
    println!("  URL:     {}", link.url().cyan());
    println!("  Status:  {}", colored_status(link.status()));
    if !link.tags().is_empty() {
        println!("  Tags:    {}", link.tags().join(", "));
    }
    if let Some(title) = link.title() {
        println!("  Title:   {}", title.bright_white().bold());
    }
    if let Some(summary) = link.summary() {
        println!("  Summary: {}", summary);
    }
    if let Some(error) = link.error() {
        println!("  Error:   {}", error.red());
    }
    println!();
}

fn print_batch_summary(summary: &BatchSummary) {
    for result in &summary.results {
        let url = result.link.as_ref().map(|l| l.url()).unwrap_or("?");
        if result.success {
            println!("  {} {}", "✅".green(), url);
        } else {
            let reason = result.error.as_ref().map(|e| e.message.as_str()).unwrap_or("");
            println!("  {} {} {}", "❌".red(), url, reason.bright_black());
        }
    }

    println!();
    println!(
        "  Processed: {}  Successful: {}  Failed: {}",
        summary.processed.to_string().bright_white().bold(),
        summary.successful.to_string().green().bold(),
        summary.failed.to_string().red().bold()
    );
    println!();
}
