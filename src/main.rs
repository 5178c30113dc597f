//! Transaction Statistics CLI
//!
//! Serves sliding-window transaction statistics over HTTP.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use transaction_statistics::{
    config::Config,
    logging::init_tracing,
    server::{self, ServerConfig},
    spawn_eviction_ticker, StatisticsEngine, VERSION,
};

#[derive(Parser)]
#[command(name = "txstats")]
#[command(version = VERSION)]
#[command(about = "Sliding-window transaction statistics server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server and the eviction ticker
    Serve {
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind to
        #[arg(long)]
        bind: Option<String>,

        /// Length of the validity window in seconds
        #[arg(long)]
        window_seconds: Option<u64>,

        /// Eviction ticker period in milliseconds
        #[arg(long)]
        tick_interval_ms: Option<u64>,

        /// Delay before the first eviction tick in milliseconds
        #[arg(long)]
        tick_initial_delay_ms: Option<u64>,

        /// Configuration file (defaults to the user config directory)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Emit logs as JSON
        #[arg(long)]
        log_json: bool,
    },

    /// Show the effective configuration
    Config {
        /// Configuration file (defaults to the user config directory)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write the default configuration file
    InitConfig {
        /// Where to write it (defaults to the user config directory)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            bind,
            window_seconds,
            tick_interval_ms,
            tick_initial_delay_ms,
            config,
            log_json,
        } => {
            init_tracing(log_json);

            let mut cfg = load_config(config.as_deref())?;
            if let Some(port) = port {
                cfg.server.port = port;
            }
            if let Some(bind) = bind {
                cfg.server.bind = bind;
            }
            if let Some(secs) = window_seconds {
                cfg.window.window_seconds = secs;
            }
            if let Some(ms) = tick_interval_ms {
                cfg.window.tick_interval_ms = ms;
            }
            if let Some(ms) = tick_initial_delay_ms {
                cfg.window.tick_initial_delay_ms = ms;
            }
            cfg.validate()?;

            cmd_serve(cfg).await
        }
        Commands::Config { config } => cmd_config(config.as_deref()),
        Commands::InitConfig { config } => cmd_init_config(config),
    }
}

async fn cmd_serve(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        version = VERSION,
        window_seconds = config.window.window_seconds,
        tick_interval_ms = config.window.tick_interval_ms,
        tick_initial_delay_ms = config.window.tick_initial_delay_ms,
        "Starting transaction statistics"
    );

    let engine = Arc::new(StatisticsEngine::new(&config.window));
    let ticker = spawn_eviction_ticker(engine.clone(), &config.window)
        .context("failed to start eviction ticker")?;

    let server_config = ServerConfig::from_settings(&config.server)?;
    let (addr, shutdown_tx) = server::run(server_config, engine)
        .await
        .context("failed to start HTTP server")?;

    println!("Listening on http://{addr}");
    println!("Press Ctrl+C to stop");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;

    tracing::info!("Shutting down");
    let _ = shutdown_tx.send(());
    ticker.abort();

    Ok(())
}

fn cmd_config(path: Option<&std::path::Path>) -> anyhow::Result<()> {
    let config = load_config(path)?;
    let path = path.map(PathBuf::from).unwrap_or_else(Config::config_path);

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {path:?}");
    println!();
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn cmd_init_config(path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(Config::config_path);
    Config::default().save_to(&path)?;
    println!("Wrote default configuration to {path:?}");
    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;
    Ok(config)
}
