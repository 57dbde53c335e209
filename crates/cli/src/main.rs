use {
    clap::Parser,
    std::sync::Arc,
    tracing::{error, info},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use pagecheck_browser::{Reporter, SessionConfig, run_diagnostic};

/// The page checked by a diagnostic run.
const TARGET_URL: &str = "https://upptime.bandlab.com/history/bandlab";

#[derive(Parser)]
#[command(name = "pagecheck", about = "Headless diagnostics for one page")]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

/// Initialise tracing on stderr; stdout belongs to the diagnostic report.
fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_telemetry(&cli);

    let config = SessionConfig::default();
    let reporter = Arc::new(Reporter::stdout());

    info!(url = TARGET_URL, "starting page diagnostic");

    // A fault has already produced the `ERROR:` report line; the exit status
    // stays zero either way, so the report text is the outcome signal.
    if let Err(e) = run_diagnostic(&config, TARGET_URL, reporter).await {
        error!(error = %e, "diagnostic run faulted");
    }

    Ok(())
}
