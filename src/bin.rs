//! Binary entry point for `triage-actions`.
//!
//! This module provides the command-line interface for invoking a single triage
//! action with options for configuration file paths and logging verbosity. The event
//! is read as JSON, the result is written as JSON to stdout, and logs go to stderr.

use clap::Parser;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, WithExportConfig};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};
use triage_actions::{
    action::Action,
    base::{config::Config, types::Void},
};

/// Triage-actions – action handlers for an automated bug-triage agent.
///
/// Configuration can come from `config.toml` or environment variables
/// (prefixed with `TRIAGE_ACTIONS_`). The event is a JSON object of the
/// form `{ "payload": { ... } }`.
#[derive(Parser, Debug)]
#[command(version, author, about, long_about = None)]
struct Args {
    /// The action to run: `get-user-details`, `search-codebase`, or `create-jira-ticket`.
    action: Action,
    /// Read the event from this file instead of stdin.
    #[arg(short, long)]
    event: Option<std::path::PathBuf>,
    /// Override the config file path (optional).
    ///
    /// By default, the actions will look for a config file at `.hidden/config.toml`
    /// in the current directory.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
    /// Increase log verbosity (-v, -vv, etc.).
    ///
    /// Use multiple times to increase verbosity:
    /// - No flag: INFO level
    /// - -v: DEBUG level
    /// - -vv or more: TRACE level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Export spans over OTLP/HTTP (configured via the standard `OTEL_*` variables).
    #[arg(long)]
    otlp: bool,
}

/// Main entry point for the triage-actions binary.
///
/// Sets up logging based on verbosity, loads configuration, and runs the action.
#[tokio::main]
async fn main() -> Void {
    let args = Args::parse();

    // Construct the level filter.

    let level = match args.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let level_filter = tracing_subscriber::filter::LevelFilter::from_level(level);

    // Prepare the log layer.

    let stderr = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_ansi(true)
        .with_level(true)
        .with_file(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);

    // Prepare the otlp layer.

    let provider = if args.otlp {
        let exporter = opentelemetry_otlp::SpanExporter::builder().with_http().with_protocol(Protocol::HttpBinary).build()?;
        Some(SdkTracerProvider::builder().with_simple_exporter(exporter).build())
    } else {
        None
    };
    let otel = provider.as_ref().map(|p| tracing_opentelemetry::layer().with_tracer(p.tracer("triage-actions")));

    tracing_subscriber::registry().with(otel).with(level_filter).with(stderr).init();

    let config = Config::load(args.config.as_deref())?;

    let result = match &args.event {
        Some(path) => triage_actions::start(config, args.action, tokio::fs::File::open(path).await?).await,
        None => triage_actions::start(config, args.action, tokio::io::stdin()).await,
    };

    if let Some(provider) = &provider {
        shutdown_tracer(provider);
    }

    result
}

/// Flush and stop the OTLP tracer, reporting whether it shut down cleanly.
fn shutdown_tracer(provider: &SdkTracerProvider) -> bool {
    match provider.shutdown() {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!("Failed to flush OTLP spans: {err}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_tracer_reports_failure() {
        let provider = SdkTracerProvider::builder().build();

        assert!(shutdown_tracer(&provider));
        assert!(!shutdown_tracer(&provider));
    }
}
