mod cli;
mod logging;
mod prompt;
mod render;

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use danglr_core::{
    load_config, validate_config, Config, EventSink, JsonlEventSink, NoopEventSink, Reporter,
    SanitizedConfig, Session,
};

use cli::Cli;
use prompt::StdinConfirmer;
use render::{PlainReporter, RichReporter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    let config_path = &cli.config;
    let config = load_config(config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    validate_config(&config).context("Configuration validation failed")?;

    if cli.print_config {
        let sanitized = SanitizedConfig::from(&config);
        println!("{}", serde_json::to_string_pretty(&sanitized)?);
        return Ok(0);
    }

    let rich = config.scan_options.show_progress && console::Term::stderr().is_term();
    logging::init_logging(&config.scan_options, if rich { "warn" } else { "info" });
    info!("Configuration loaded from {:?}", config_path);

    let sink = open_event_sink(&config);
    let reporter: Arc<dyn Reporter> = if rich {
        Arc::new(RichReporter::new())
    } else {
        Arc::new(PlainReporter)
    };

    let session = Session::new(
        config,
        cli.mode(),
        cli.yes,
        sink,
        reporter,
        Arc::new(StdinConfirmer),
    );
    let report = session.run().await;

    Ok(report.exit_code())
}

/// JSONL event log under `log_dir`, or a no-op sink when disabled or unusable.
fn open_event_sink(config: &Config) -> Arc<dyn EventSink> {
    if !config.scan_options.json_logging {
        return Arc::new(NoopEventSink);
    }

    match JsonlEventSink::in_dir(&config.log_dir) {
        Ok(sink) => {
            info!("Event log: {}", sink.path().display());
            Arc::new(sink)
        }
        Err(e) => {
            warn!("Event log disabled: {}", e);
            Arc::new(NoopEventSink)
        }
    }
}
