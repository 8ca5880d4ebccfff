use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use athena_control_plane::{probe_core, ControlPlane};
use common::models::ModelRef;
use core_client::GrpcCoreClient;
use settings::ConfigManager;
use storage_adapter::StorageManager;

/// Athena control plane
#[derive(Parser, Debug)]
#[command(name = "athena-control-plane", version, about)]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, short, global = true, env = "ATHENA_CONFIG_FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API (default)
    Serve(ServeArgs),
    /// Apply database migrations and exit
    Migrate,
    /// Load a model, query its status and run one inference against the core
    Probe(ProbeArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Socket address to listen on, overrides server.bind_address
    #[arg(long)]
    bind: Option<String>,
}

#[derive(Args, Debug)]
struct ProbeArgs {
    /// Model name
    #[arg(long, default_value = "default")]
    model: String,

    /// Model version
    #[arg(long = "version", default_value = "v1")]
    model_version: String,

    /// Comma separated input vector
    #[arg(long, value_delimiter = ',', default_value = "1.0,2.0,3.0")]
    inputs: Vec<f32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let manager = ConfigManager::load(cli.config.as_deref()).context("failed to load configuration")?;
    logging::init_logging(&manager.config().logging).context("failed to initialize logging")?;

    match cli.command.unwrap_or(Command::Serve(ServeArgs::default())) {
        Command::Serve(args) => serve(manager, args).await,
        Command::Migrate => migrate(manager).await,
        Command::Probe(args) => probe(manager, args).await,
    }
}

async fn serve(manager: ConfigManager, args: ServeArgs) -> Result<()> {
    let manager = match args.bind {
        Some(bind) => {
            let mut config = manager.config().clone();
            config.server.bind_address = bind;
            ConfigManager::from_config(config).context("invalid --bind address")?
        }
        None => manager,
    };

    let control_plane = ControlPlane::new(manager).await?;
    control_plane.serve(shutdown_signal()).await?;

    info!("Control plane stopped");
    Ok(())
}

async fn migrate(manager: ConfigManager) -> Result<()> {
    StorageManager::migrate(&manager.config().database)
        .await
        .context("failed to apply migrations")?;

    info!("Migrations applied");
    Ok(())
}

async fn probe(manager: ConfigManager, args: ProbeArgs) -> Result<()> {
    let core_config = &manager.config().core;
    let core = GrpcCoreClient::new(core_config).context("failed to create the core client")?;
    let model = ModelRef::new(args.model, args.model_version)?;
    let request_id = uuid::Uuid::new_v4().to_string();

    println!("Probing core at {} with {}", core_config.target(), model);
    let report = probe_core(&core, &model, request_id, args.inputs).await;

    println!("load: ok={} message={}", report.load.ok, report.load.message);
    match &report.status {
        Ok(status) => println!(
            "status: {}:{} {}",
            status.model_name, status.version, status.status
        ),
        Err(e) => println!("status: error: {}", e),
    }
    match &report.inference {
        Ok(result) => println!(
            "inference: id={} status={} latency={:.2}ms outputs={}",
            result.request_id,
            result.status,
            result.latency_ms,
            serde_json::to_string(&result.outputs)?
        ),
        Err(e) => println!("inference: error: {}", e),
    }

    if !report.is_healthy() {
        bail!("core probe failed");
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_flag_falls_back_to_environment() {
        std::env::set_var("ATHENA_CONFIG_FILE", "/etc/athena/from-env.toml");

        let cli = Cli::try_parse_from(["athena-control-plane", "migrate"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/etc/athena/from-env.toml")));
        assert!(matches!(cli.command, Some(Command::Migrate)));

        let cli = Cli::try_parse_from(["athena-control-plane", "--config", "local.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("local.toml")));
        assert!(cli.command.is_none());

        std::env::remove_var("ATHENA_CONFIG_FILE");
    }

    #[test]
    fn test_probe_parses_comma_separated_inputs() {
        let cli = Cli::try_parse_from([
            "athena-control-plane",
            "probe",
            "--model",
            "fraud-detector",
            "--version",
            "v0.1",
            "--inputs",
            "0.5,1.5",
        ])
        .unwrap();

        match cli.command {
            Some(Command::Probe(args)) => {
                assert_eq!(args.model, "fraud-detector");
                assert_eq!(args.model_version, "v0.1");
                assert_eq!(args.inputs, vec![0.5, 1.5]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
