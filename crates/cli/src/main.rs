//! SoleMate CLI - Dashboard metrics and inventory/sales management.
//!
//! # Usage
//!
//! ```bash
//! # Dashboard cards, spent over the last month, profit over the last year
//! sm-cli dashboard --spent-period last-month --profit-period last-year
//!
//! # Sales for October 2024
//! sm-cli sales list --month 2024-10
//!
//! # Record a sale of one unit of item 12 for £140
//! sm-cli sales record -i 12 -p 140
//!
//! # Add two pairs bought at £80 each
//! sm-cli inventory add -n "Air Max 90" -b Nike -s 9.5 -q 2 -p 80
//! ```
//!
//! # Commands
//!
//! - `dashboard` - Revenue, spent and profit cards
//! - `sales` - List, record and delete sales
//! - `inventory` - List, add, update and delete stock
//! - `brands` - Units in stock per brand
//! - `profit-chart` - Profit per month

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use solemate_cli::commands::{self, OutputFormat};
use solemate_cli::config::LogFormat;
use solemate_cli::{CliConfig, CliError, RecordSource};

#[derive(Parser)]
#[command(name = "sm-cli")]
#[command(author, version, about = "SoleMate sneaker resale tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the dashboard cards
    Dashboard(commands::dashboard::DashboardArgs),
    /// Manage sales
    Sales {
        #[command(subcommand)]
        action: commands::sales::SalesCommand,
    },
    /// Manage inventory
    Inventory {
        #[command(subcommand)]
        action: commands::inventory::InventoryCommand,
    },
    /// Show units in stock per brand
    Brands {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Show profit per month
    ProfitChart {
        /// Number of trailing months, including the current one
        #[arg(short, long, default_value_t = 6)]
        months: u32,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = CliConfig::from_env();

    init_tracing(config.as_ref().map_or(LogFormat::Text, |c| c.log_format));

    let result = match config {
        Ok(config) => run(cli, &config).await,
        Err(e) => Err(CliError::from(e)),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Log to stderr so reports on stdout stay machine-readable.
fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "solemate_cli=info,solemate_core=warn".into());

    let is_json = format == LogFormat::Json;
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(cli: Cli, config: &CliConfig) -> Result<(), CliError> {
    let source = RecordSource::from_config(&config.source)?;
    tracing::debug!(source = %source.describe(), "Using record source");

    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Dashboard(args) => {
            commands::dashboard::show(&source, config, &args, &mut out).await?;
        }
        Commands::Sales { action } => {
            commands::sales::run(&source, config, action, &mut out).await?;
        }
        Commands::Inventory { action } => {
            commands::inventory::run(&source, config, action, &mut out).await?;
        }
        Commands::Brands { format } => {
            commands::breakdown::brands(&source, format, &mut out).await?;
        }
        Commands::ProfitChart { months, format } => {
            commands::breakdown::profit_chart(&source, config, months, format, &mut out).await?;
        }
    }
    Ok(())
}
