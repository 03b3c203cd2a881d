//! `detectify-scan` - scan one domain and print its latest full report.
//!
//! Credentials come from `DETECTIFY_TOKEN` and `DETECTIFY_SECRET_TOKEN`.
//! The report is written to stdout as pretty-printed JSON; logs and errors
//! go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use detectify_client::DetectifyClient;
use detectify_core::{AppConfig, Credentials};
use detectify_scanner::ScanOrchestrator;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "detectify-scan",
    version,
    about = "Scan a domain with Detectify and print the latest full report"
)]
struct Cli {
    /// Domain to scan, e.g. www.example.com
    domain: String,

    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log signed messages, outgoing requests and raw responses
    #[arg(long)]
    debug: bool,

    /// API root, e.g. https://api.detectify.com/rest/v2
    #[arg(long)]
    base_url: Option<String>,

    /// Polls per phase before giving up on verification or completion
    #[arg(long)]
    poll_attempts: Option<u32>,

    /// Milliseconds between polls
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Fail instead of continuing when a polling phase runs out of attempts
    #[arg(long)]
    fail_on_poll_timeout: bool,
}

impl Cli {
    /// Defaults, then config file, then environment, then flags.
    fn load_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => AppConfig::load().context("failed to load config")?,
        };
        config
            .apply_env_overrides()
            .context("invalid environment override")?;

        if self.debug {
            config.api.debug = true;
        }
        if let Some(base_url) = &self.base_url {
            config.api.base_url.clone_from(base_url);
        }
        if let Some(attempts) = self.poll_attempts {
            config.polling.max_attempts = attempts;
        }
        if let Some(interval) = self.poll_interval_ms {
            config.polling.interval_ms = interval;
        }
        if self.fail_on_poll_timeout {
            config.polling.fail_on_timeout = true;
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

/// Initialize tracing subscriber for logging
fn init_tracing(debug: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if debug {
        EnvFilter::new("warn,detectify=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,detectify=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn run(domain: &str, config: AppConfig) -> Result<String> {
    let credentials = Credentials::from_env().context("missing Detectify credentials")?;
    let client =
        DetectifyClient::new(&config.api, &credentials).context("failed to set up API client")?;

    let orchestrator = ScanOrchestrator::new(client, config.polling);
    let report = orchestrator
        .scan_domain(domain)
        .await
        .with_context(|| format!("scan of {domain} failed"))?;

    Ok(serde_json::to_string_pretty(&report)?)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(config.api.debug);
    tracing::info!("Starting detectify-scan v{}", env!("CARGO_PKG_VERSION"));

    match run(&cli.domain, config).await {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
