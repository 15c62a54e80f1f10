//! participant-sync - reconcile past-meeting participants from the command line
//!
//! Each invocation runs one reconciler operation against the proxied meeting
//! system and prints the merged participant as JSON.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use convene_participants::ParticipantReconciler;
use convene_proxy::ProxyClient;
use tracing::{info, warn, Instrument};

mod commands;
mod config;
mod error;
mod logging;

use config::AppConfig;
use error::CliResult;

/// participant-sync - Past-meeting participant reconciliation
#[derive(Parser, Debug)]
#[command(name = "participant-sync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log filter directive (overridden by RUST_LOG)
    #[arg(long, global = true, env = "LOG_FILTER", default_value = "info")]
    log_filter: String,

    /// Human-readable logs instead of JSON
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a participant on one or both sides
    Create(commands::CreateArgs),

    /// Reconcile an existing participant toward the requested state
    Update(commands::UpdateArgs),

    /// Remove every sub-resource of a participant
    Delete(commands::ParticipantArgs),

    /// Show the merged participant
    Get(commands::ParticipantArgs),
}

#[tokio::main]
async fn main() {
    // Load .env before clap reads env-backed arguments
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    logging::init_logging(&cli.log_filter, cli.pretty);

    match config.validate_security_config() {
        Ok(warnings) => {
            for warning in &warnings {
                warn!(target: "security", environment = %config.app_env, "{warning}");
            }
        }
        Err(errors) => {
            for error in &errors {
                tracing::error!(target: "security", environment = %config.app_env, "{error}");
            }
            eprintln!(
                "Error: insecure configuration in {} ({} issue(s))",
                config.app_env,
                errors.len()
            );
            std::process::exit(1);
        }
    }

    let operation_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("operation", %operation_id);

    match run(cli.command, config).instrument(span).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(command: Commands, config: AppConfig) -> CliResult<()> {
    let mapper = convene_idmap::build_mapper(&config.idmap, config.app_env).await?;
    info!(
        environment = %config.app_env,
        mapper = mapper.name(),
        proxy = %config.proxy.base_url,
        "Reconciler ready"
    );

    let proxy = Arc::new(ProxyClient::new(config.proxy)?);
    let reconciler = ParticipantReconciler::new(proxy.clone(), proxy, mapper);

    match command {
        Commands::Create(args) => commands::create(&reconciler, args).await,
        Commands::Update(args) => commands::update(&reconciler, args).await,
        Commands::Delete(args) => commands::delete(&reconciler, args).await,
        Commands::Get(args) => commands::get(&reconciler, args).await,
    }
}
