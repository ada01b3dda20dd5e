use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use conciliador::config::Config;
use conciliador::duration::format_duration;
use conciliador::models::ExpedienteRequest;
use conciliador::portal::Reconciler;

#[derive(Parser)]
#[command(name = "conciliador")]
#[command(about = "Reconciles expediente costs against the provider portal")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "conciliador.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reconcile a records file (one "id,expected_cost" line per record)
    Run {
        /// Records file
        records: PathBuf,
    },
    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load_or_default(&cli.config)?;

    match cli.command {
        Command::Config => {
            println!("Config file: {}", cli.config.display());
            println!("Portal: {}", config.portal.base_url);
            println!("Pending view: {}", config.portal.pending_url());
            println!(
                "Timeouts: navigation {}, actions {}",
                format_duration(config.portal.navigation_timeout),
                format_duration(config.portal.action_timeout),
            );
            println!(
                "Retries: {} attempts, {} apart",
                config.portal.max_attempts,
                format_duration(config.portal.retry_delay),
            );
            Ok(())
        }
        Command::Run { records } => run(config, &records).await,
    }
}

async fn run(config: Config, records: &Path) -> Result<()> {
    anyhow::ensure!(
        !config.portal.base_url.is_empty(),
        "portal.base_url is not configured"
    );

    let source = config
        .credentials
        .as_ref()
        .context("no [credentials] section in config")?
        .build();
    let credentials = source
        .credentials()
        .await?
        .context("credential source returned no login")?;

    let content = std::fs::read_to_string(records)
        .with_context(|| format!("Failed to read records file: {}", records.display()))?;
    let requests = parse_records(&content)?;
    tracing::info!(count = requests.len(), "loaded records");

    let mut reconciler = Reconciler::new(config.portal.clone());
    reconciler.initialize(&credentials).await?;

    for request in &requests {
        let outcome = reconciler
            .search_expediente(&request.id, request.expected_cost)
            .await?;
        println!("{}", serde_json::to_string(&outcome)?);
    }

    let stats = reconciler.stats();
    tracing::info!(
        revisados = stats.total_revisados,
        con_costo = stats.total_con_costo,
        aceptados = stats.total_aceptados,
        "batch finished"
    );

    reconciler.close().await;
    Ok(())
}

/// Parse "id,expected_cost" lines. Blank lines and `#` comments are skipped.
fn parse_records(content: &str) -> Result<Vec<ExpedienteRequest>> {
    let mut requests = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (id, cost) = line
            .split_once(',')
            .with_context(|| format!("line {}: expected \"id,expected_cost\"", lineno + 1))?;
        let cost = Decimal::from_str(cost.trim())
            .with_context(|| format!("line {}: invalid cost {:?}", lineno + 1, cost.trim()))?;
        let request = ExpedienteRequest::new(id.trim(), cost)
            .map_err(|err| anyhow::anyhow!("line {}: {err}", lineno + 1))?;
        requests.push(request);
    }
    Ok(requests)
}
