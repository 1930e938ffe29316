// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pdns_webhook::{
    constants::{DEFAULT_LOG_FILTER, LOG_FORMAT_ENV},
    credentials::StaticCredentialStore,
    solver::{is_retryable, ChallengeRequest, PowerDnsSolver},
};
use tracing::{debug, error, info};

/// Present or clean up a DNS-01 challenge record on PowerDNS.
#[derive(Debug, Parser)]
#[command(name = "pdns-webhook", version, about)]
struct Cli {
    /// API group the solver is registered under
    #[arg(long, env = "GROUP_NAME")]
    group_name: String,

    /// Use this API key instead of reading the referenced Kubernetes Secret
    #[arg(long, env = "PDNS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Publish the challenge TXT record
    Present(ChallengeArgs),
    /// Remove the challenge TXT record
    Cleanup(ChallengeArgs),
}

#[derive(Debug, Args)]
struct ChallengeArgs {
    /// JSON file holding the solver config block
    #[arg(long)]
    config: PathBuf,

    /// Record name, e.g. `_acme-challenge.example.com.`
    #[arg(long)]
    fqdn: String,

    /// Zone holding the record, e.g. `example.com.`
    #[arg(long)]
    zone: String,

    /// Challenge value to publish
    #[arg(long)]
    key: String,

    /// Namespace of the API key Secret
    #[arg(long, default_value = "default")]
    namespace: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("pdns-webhook")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> Result<()> {
    // Respects RUST_LOG for filtering and RUST_LOG_FORMAT=json|text for output
    init_logging();

    let mut solver = PowerDnsSolver::new(cli.group_name.clone());
    if let Some(api_key) = cli.api_key.clone() {
        debug!("Using API key from command line or environment");
        solver = solver.with_credentials(Arc::new(StaticCredentialStore::with_fallback(api_key)));
    }
    solver.initialize().await?;

    let (operation, args) = match &cli.command {
        Command::Present(args) => ("present", args),
        Command::Cleanup(args) => ("cleanup", args),
    };
    let challenge = challenge_from_args(args).await?;

    let result = match cli.command {
        Command::Present(_) => solver.present(&challenge).await,
        Command::Cleanup(_) => solver.cleanup(&challenge).await,
    };

    match result {
        Ok(()) => {
            info!(operation, fqdn = %challenge.resolved_fqdn, "Challenge operation completed");
            Ok(())
        }
        Err(e) => {
            error!(
                operation,
                retryable = is_retryable(&e),
                "Challenge operation failed: {e:#}"
            );
            Err(e)
        }
    }
}

fn init_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));

    let log_format = std::env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

async fn challenge_from_args(args: &ChallengeArgs) -> Result<ChallengeRequest> {
    let config = load_config(&args.config).await?;

    Ok(ChallengeRequest {
        dns_name: args.fqdn.trim_end_matches('.').to_string(),
        resolved_fqdn: args.fqdn.clone(),
        resolved_zone: args.zone.clone(),
        key: args.key.clone(),
        resource_namespace: args.namespace.clone(),
        config: Some(config),
        ..ChallengeRequest::default()
    })
}

async fn load_config(path: &Path) -> Result<serde_json::Value> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read solver config {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse solver config {}", path.display()))
}
