//! IssueLens - extract structured records from open GitHub issues.

use clap::Parser;
use issuelens_cli::{App, AppConfig, Cli};
use issuelens_extractor::Extractor;
use issuelens_github::GitHubIssueSource;
use issuelens_llm::OpenAiProvider;
use issuelens_telemetry::{DryRunReporter, HoneycombSink};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr so stdout carries only the report and summary.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> issuelens_cli::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env(&cli)?;

    let mut provider = OpenAiProvider::with_timeout(
        &config.openai_api_key,
        &config.extractor.model,
        config.extractor.extraction_timeout(),
    )?;
    if let Some(base_url) = &config.openai_base_url {
        provider = provider.with_base_url(base_url);
    }

    let source = GitHubIssueSource::new(config.github_token.clone())?;
    let extractor = Extractor::new(provider, config.extractor.clone());
    let app = App::new(source, extractor, true);

    let cancel = app.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing issues already in flight");
            cancel.cancel();
        }
    });

    info!(
        "Processing open issues of {}/{} with model {}",
        cli.owner, cli.repo, config.extractor.model
    );

    let summary = match &config.honeycomb {
        None => {
            let mut reporter = DryRunReporter::stdout();
            app.run_dry(&cli.owner, &cli.repo, &mut reporter).await?
        }
        Some(honeycomb) => {
            let sink = HoneycombSink::new(honeycomb.clone())?;
            app.run_with_sink(&cli.owner, &cli.repo, &sink).await?
        }
    };

    println!("{}", summary);
    Ok(())
}
