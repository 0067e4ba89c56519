use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ohara::config::OharaConfig;
use ohara::store::Store;
use ohara::{cli, server};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ohara", version, about = "Track professional achievements and touchpoints")]
struct Cli {
    /// Config file (default: ~/.ohara/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct DataDirArg {
    /// Path to the data directory
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server
    Serve {
        #[command(flatten)]
        data: DataDirArg,
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print all touchpoints, metadata and report names as JSON
    Export {
        #[command(flatten)]
        data: DataDirArg,
    },
    /// Show touchpoint statistics
    Stats {
        #[command(flatten)]
        data: DataDirArg,
    },
}

fn resolve_data_dir(config: &OharaConfig, arg: DataDirArg) -> PathBuf {
    arg.data_dir.unwrap_or_else(|| config.resolved_data_dir())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => OharaConfig::load_from(path)?,
        None => OharaConfig::load()?,
    };
    if cli.debug {
        config.server.log_level = "debug".into();
    }

    // Log to stderr so `export` output on stdout stays clean JSON.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { data, port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            let data_dir = resolve_data_dir(&config, data);
            let store = Store::open(&data_dir)
                .with_context(|| format!("failed to initialize store at {}", data_dir.display()))?;
            tracing::info!(
                port = config.server.port,
                data = %data_dir.display(),
                "starting ohara"
            );
            server::serve(Arc::new(store), &config.bind_addr()).await?;
        }
        Command::Export { data } => {
            cli::export(&resolve_data_dir(&config, data))?;
        }
        Command::Stats { data } => {
            cli::stats(&resolve_data_dir(&config, data))?;
        }
    }

    Ok(())
}
