//! Employee registry CLI server
//!
//! ```sh
//! # Run with default config (~/.config/employee-service/config.toml)
//! employee-service
//!
//! # Custom config path
//! employee-service --config /etc/employee-service/config.toml
//!
//! # Override the API port and keep the reports quiet
//! employee-service --api-port 9090 --no-reports
//!
//! # Validate config without starting
//! employee-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use employee_registry::config::AppConfig;
use employee_registry::server::{init_tracing, ServerHandle, ServerOptions};

/// Employee registry: REST API for employees, phone numbers and voter records.
#[derive(Parser, Debug)]
#[command(
    name = "employee-service",
    version,
    about = "Employee registry REST server",
    long_about = "REST API server for employee records, with periodic taxable salary \
                  and missing voter ID reports.\n\n\
                  Default config: ~/.config/employee-service/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "EMPLOYEE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Do not start the periodic reports.
    #[arg(long)]
    no_reports: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .unwrap_or_else(employee_registry::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(mut cfg) => {
            if let Some(ref level) = cli.log_level {
                cfg.logging.level = level.clone();
            }
            // Init tracing first so subsequent logs are formatted properly
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) if cli.check => {
            eprintln!("Configuration is invalid");
            eprintln!("   Config file : {}", config_path.display());
            eprintln!("   Error       : {}", e);
            return Err(e.into());
        }
        Err(e) => {
            // Fallback tracing init
            let level = cli.log_level.as_deref().unwrap_or("info");
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new(level))
                .init();
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
            let mut cfg = AppConfig::default();
            cfg.logging.level = level.to_string();
            cfg
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.api_port {
        info!("CLI override: api_port = {}", port);
        config.server.api_port = port;
    }
    if let Some(ref level) = cli.log_level {
        info!("CLI override: log_level = {}", level);
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.api_address());
        println!("   Database    : {}", config.database.connection_url());
        println!("   Log level   : {}", config.logging.level);
        println!(
            "   Reports     : {} (taxable every {}s, missing voter ID every {}s)",
            if config.reports.enabled && !cli.no_reports { "on" } else { "off" },
            config.reports.taxable_interval_secs,
            config.reports.missing_voter_interval_secs,
        );
        return Ok(());
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        run_reports: !cli.no_reports,
    })
    .await?;

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("Press Ctrl+C to shutdown gracefully.");

    handle.wait().await;

    Ok(())
}
