//! Quotebox CLI
//!
//! Command-line interface for Quotebox - a random quote keeper with
//! categories, import/export and server sync.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use quotebox_core::{Config, FileStorage, MemoryStorage, QuoteStore, Selector};

mod commands;
mod output;
mod session;

use output::{Output, OutputFormat};

/// Log filter used when RUST_LOG is not set
const DEFAULT_LOG_FILTER: &str = "quotebox_core=warn,quotebox_cli=warn";

#[derive(Parser)]
#[command(name = "quotebox")]
#[command(about = "Quotebox - Random quotes with categories, import/export and server sync")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a random quote (default)
    Show,
    /// Add a quote
    Add {
        /// Quote text
        text: String,
        /// Quote category
        category: String,
    },
    /// List quotes
    #[command(alias = "ls")]
    List {
        /// Only quotes in this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List categories
    Categories,
    /// Show or set the category filter ("all" clears it)
    Filter {
        /// Category to filter by
        category: Option<String>,
    },
    /// Export all quotes to a JSON file
    Export {
        /// Directory to write the export file to
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Import quotes from a JSON file
    Import {
        /// Export file to read
        file: PathBuf,
    },
    /// Fetch quotes from the sync server once
    Sync,
    /// Show status (counts, filter, sync, storage)
    Status,
    /// Start an interactive session with background sync
    Run,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, sync_url, sync_enabled,
        /// sync_interval_secs, notice_secs, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands work on the file itself, not the store
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), config_path, &output);
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    init_logging(&config);

    let mut store = QuoteStore::open(Box::new(FileStorage::new(&config.data_dir)));
    let mut selector = Selector::new(
        Box::new(FileStorage::new(&config.data_dir)),
        Box::new(MemoryStorage::new()),
    );

    match cli.command.unwrap_or(Commands::Show) {
        Commands::Show => commands::quote::show(&store, &mut selector, &output),
        Commands::Add { text, category } => {
            commands::quote::add(&mut store, text, category, &output)
        }
        Commands::List { category } => commands::quote::list(&store, category, &output),
        Commands::Categories => commands::quote::categories(&store, &selector, &output),
        Commands::Filter { category } => {
            commands::quote::filter(&store, &mut selector, category, &output)
        }
        Commands::Export { dir } => commands::transfer::export(&store, dir, &output),
        Commands::Import { file } => commands::transfer::import(&mut store, file, &output),
        Commands::Sync => commands::sync::sync(store, &config, &output).await,
        Commands::Status => commands::status::show(&store, &selector, &config, &output),
        Commands::Run => session::run(store, selector, &config, &output).await,
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize logging
///
/// Filter comes from RUST_LOG. Logs go to `config.log_file` when set,
/// stderr otherwise.
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let writer = match &config.log_file {
        Some(path) => match File::create(path) {
            Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
            Err(e) => {
                eprintln!("Warning: Could not create log file {:?}: {}", path, e);
                BoxMakeWriter::new(std::io::stderr)
            }
        },
        None => BoxMakeWriter::new(std::io::stderr),
    };

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(config.log_file.is_none())
        .with_writer(writer)
        .try_init();

    info!("Logging initialized");
}
