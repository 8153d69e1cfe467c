use anyhow::Result;
use appetit_core::config::ClientConfig;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "appetit")]
#[command(about = "Appetit - campus dining menus and meal photo scans", long_about = None)]
struct Cli {
    /// Override the API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List dining locations and the menu types they serve
    Locations,
    /// Show the daily menu for a location
    Menu {
        /// Location slug (e.g. dewick-dining)
        location: String,
        /// Menu type slug (e.g. breakfast)
        menu_type: String,
        /// Date to show, defaults to today (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show which days of a month have menus
    Month {
        /// Location slug
        location: String,
        /// Menu type slug
        menu_type: String,
        year: i32,
        month: u32,
    },
    /// Log in with an emailed one-time code
    Login {
        /// School email address
        email: String,
    },
    /// Scan a meal photo and stream the nutritional breakdown
    Scan {
        /// Path to the photo to analyze
        image: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url);
    }

    match cli.command {
        Commands::Locations => commands::menu::locations(&config).await?,
        Commands::Menu {
            location,
            menu_type,
            date,
        } => commands::menu::daily(&config, &location, &menu_type, date).await?,
        Commands::Month {
            location,
            menu_type,
            year,
            month,
        } => commands::menu::month(&config, &location, &menu_type, year, month).await?,
        Commands::Login { email } => commands::login::run(&config, &email).await?,
        Commands::Scan { image } => commands::scan::run(&config, &image).await?,
    }

    Ok(())
}
