//! Koli CLI - warehouse back-office client
//!
//! A command-line front end for browsing accounts and inventory, managing
//! shipment packages (koli) and converting order receipts.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser)]
#[command(name = "koli")]
#[command(author, version, about = "Warehouse back-office CLI", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: table (default) or json
    #[arg(long, global = true, default_value = "table")]
    format: output::OutputFormat,

    /// Suppress progress messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Log remote calls and storage access to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Override database path (or set KOLI_DB_PATH env var)
    #[arg(long, env = "KOLI_DB_PATH", global = true)]
    db: Option<String>,

    /// Where to keep the session token
    #[arg(long, value_enum, env = "KOLI_TOKEN_STORE", global = true, default_value_t)]
    token_store: commands::TokenStore,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage API URL and company credentials
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },

    /// Log in to the back-office
    Login {
        /// User code
        #[arg(short, long)]
        user: String,

        /// Password (or set KOLI_PASSWORD env var)
        #[arg(short, long, env = "KOLI_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// End the current session
    Logout,

    /// Show session and connection status
    Status,

    /// List current accounts
    Accounts {
        /// Filter by account code or name
        #[arg(short, long)]
        search: Option<String>,
    },

    /// List inventory
    Inventory {
        /// Filter by inventory name or code
        #[arg(short, long)]
        search: Option<String>,

        /// Show the first N pages of 20 rows
        #[arg(short, long, default_value = "1")]
        page: usize,
    },

    /// Shipment packages: list, inspect, scan, add items, close into receipts
    Koli {
        #[command(subcommand)]
        action: commands::koli::KoliAction,
    },

    /// Order receipts
    Orders {
        #[command(subcommand)]
        action: commands::orders::OrdersAction,
    },
}

fn init_logging(verbose: bool) {
    // --verbose > RUST_LOG env > default "warn"
    let filter = if verbose {
        EnvFilter::new("debug,hyper=warn,hyper_util=warn,reqwest=warn,sqlx=warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        output::print_error(&format!("Error: {:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Set up database path if provided
    if let Some(db_path) = &cli.db {
        std::env::set_var("KOLI_DB_PATH", db_path);
    }

    // Initialize database
    let db = koli_core::Database::new().await?;

    // Create context for commands
    let out = output::Output::new(cli.format, cli.quiet);
    let ctx = commands::Context::new(db, out, cli.token_store).await?;

    // Execute command
    match cli.command {
        Commands::Config { action } => commands::config::execute(&ctx, action).await,
        Commands::Login { user, password } => commands::auth::login(&ctx, user, password).await,
        Commands::Logout => commands::auth::logout(&ctx).await,
        Commands::Status => commands::auth::status(&ctx).await,
        Commands::Accounts { search } => commands::accounts::list(&ctx, search).await,
        Commands::Inventory { search, page } => {
            commands::inventory::list(&ctx, search, page).await
        }
        Commands::Koli { action } => commands::koli::execute(&ctx, action).await,
        Commands::Orders { action } => commands::orders::execute(&ctx, action).await,
    }
}
