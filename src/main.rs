//! Binary entry point for muslim-api.
//!
//! Serves the HTTP API and offers a few maintenance commands over the same
//! database.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow option_if_let_else for environment variable fallback chains
#![allow(clippy::option_if_let_else)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use muslim_api::config::ApiConfig;
use muslim_api::observability::{self, InitOptions};
use muslim_api::server::{self, AppState};
use muslim_api::services::ServiceContainer;
use muslim_api::storage::MigrationRunner;
use std::net::IpAddr;
use std::path::PathBuf;
use std::process::ExitCode;

/// Muslim API - Quran, hadith and Islamic reference data over HTTP.
#[derive(Parser)]
#[command(name = "muslim-api")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the SQLite database (overrides configuration).
    #[arg(short, long, global = true, env = "MUSLIM_API_DB_PATH")]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server.
    Serve {
        /// Address to bind.
        #[arg(long)]
        host: Option<IpAddr>,

        /// Port to listen on.
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the integrity chain as JSON.
    Chain {
        /// Print only the root hash.
        #[arg(long)]
        root_only: bool,
    },

    /// Check data integrity.
    Verify {
        /// Surah number of a single verse to verify.
        #[arg(long, requires = "ayah")]
        surah: Option<String>,

        /// Verse number within the surah.
        #[arg(long, requires = "surah")]
        ayah: Option<String>,
    },

    /// Create or upgrade the database schema.
    InitDb,
}

/// Main entry point.
#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };
    let config = match cli.database.clone() {
        Some(path) => config.with_database_path(path),
        None => config,
    };

    let observability = match observability::init_from_config(
        &config.observability,
        InitOptions {
            verbose: cli.verbose,
        },
    ) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Failed to initialize observability: {e}");
            return ExitCode::FAILURE;
        },
    };

    let result = match cli.command {
        Commands::Serve { host, port } => cmd_serve(config, host, port, observability).await,
        Commands::Chain { root_only } => cmd_chain(&config, root_only).await,
        Commands::Verify { surah, ayah } => cmd_verify(&config, surah, ayah).await,
        Commands::InitDb => cmd_init_db(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Loads configuration: `--config`, then `MUSLIM_API_CONFIG_PATH`, then the
/// default location, with environment overrides applied last.
fn load_config(path: Option<&str>) -> Result<ApiConfig, Box<dyn std::error::Error>> {
    if let Some(config_path) = path {
        return Ok(ApiConfig::load_from_file(std::path::Path::new(config_path))?
            .with_env_overrides());
    }

    if let Ok(config_path) = std::env::var("MUSLIM_API_CONFIG_PATH") {
        if !config_path.trim().is_empty() {
            return Ok(ApiConfig::load_from_file(std::path::Path::new(&config_path))?
                .with_env_overrides());
        }
    }

    Ok(ApiConfig::load_default().with_env_overrides())
}

async fn cmd_serve(
    mut config: ApiConfig,
    host: Option<IpAddr>,
    port: Option<u16>,
    observability: observability::ObservabilityHandle,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let services = ServiceContainer::from_config(&config)?;
    let state = AppState::new(&config, services, observability.metrics());
    server::serve(&config, state).await?;
    Ok(())
}

async fn cmd_chain(config: &ApiConfig, root_only: bool) -> Result<(), Box<dyn std::error::Error>> {
    let services = ServiceContainer::from_config(config)?;
    let chain = services.integrity().chain().await?;

    if root_only {
        println!("{}", chain.root_hash);
    } else {
        println!("{}", serde_json::to_string_pretty(&chain)?);
    }
    Ok(())
}

async fn cmd_verify(
    config: &ApiConfig,
    surah: Option<String>,
    ayah: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let services = ServiceContainer::from_config(config)?;

    if let (Some(surah), Some(ayah)) = (surah, ayah) {
        let report = services.integrity().verify_ayah(&surah, &ayah).await?;
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let report = services.integrity().quick_verify().await;
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

fn cmd_init_db(config: &ApiConfig) -> Result<(), Box<dyn std::error::Error>> {
    let runner = MigrationRunner::new(&config.database.path);
    let applied = runner.run()?;
    println!(
        "Database {} at schema version {} ({applied} migration(s) applied)",
        config.database.path.display(),
        runner.current_version()?
    );
    Ok(())
}
