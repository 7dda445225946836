//! presence-watch: terminal consumer of the presence synchronizer.
//!
//! Subscribes to one Discord account and prints a line every time its
//! presence changes, until Ctrl-C. `--once` does a single fetch instead.

mod cli;
mod render;

use std::process::ExitCode;

use presence_common::{PresenceError, Result};
use presence_config::validation::validate_subject_id;
use presence_config::PresenceConfig;
use presence_sync::snapshot::now_millis;
use presence_sync::PresenceSynchronizer;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

use crate::cli::Args;
use crate::render::{render_snapshot, render_state, Format};

const DEFAULT_LOG_DIRECTIVE: &str = "presence=info";

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    // Config errors are reported before logging exists, so the level in
    // the file can drive the subscriber.
    let config = match presence_config::load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("presence-watch: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&args, &config);

    match run(args, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "presence-watch failed");
            eprintln!("presence-watch: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(args: &Args, config: &PresenceConfig) {
    let directive = args
        .log_level
        .as_deref()
        .unwrap_or_else(|| config.logging.level.directive());
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                directive
                    .parse::<Directive>()
                    .or_else(|_| DEFAULT_LOG_DIRECTIVE.parse())
                    .unwrap_or_else(|_| LevelFilter::INFO.into()),
            ),
        )
        .init();
}

/// The `--subject` override wins over the config; either way the id must
/// be a valid snowflake before any request goes out.
fn resolve_subject(args: &Args, config: &PresenceConfig) -> Result<String> {
    let subject_id = args.subject.as_deref().unwrap_or(&config.subject.id);
    if subject_id.is_empty() {
        return Err(PresenceError::Other(
            "no subject id: pass --subject or set subject.id in the config".into(),
        ));
    }
    validate_subject_id(subject_id)?;
    Ok(subject_id.to_string())
}

async fn run(args: Args, config: PresenceConfig) -> Result<()> {
    let subject_id = resolve_subject(&args, &config)?;

    let format = if args.json { Format::Json } else { Format::Summary };
    let display_name = config.subject.display_name.clone();
    let synchronizer = PresenceSynchronizer::new(config.to_sync_config())
        .map_err(|e| PresenceError::Sync(e.to_string()))?;

    if args.once {
        let snapshot = synchronizer
            .fetch_once(&subject_id)
            .await
            .map_err(|e| PresenceError::Sync(e.to_string()))?;
        println!("{}", render_snapshot(&snapshot, &display_name, format, now_millis()));
        return Ok(());
    }

    watch(&synchronizer, &subject_id, &display_name, format).await
}

/// Print a line per distinct rendered state until Ctrl-C.
async fn watch(
    synchronizer: &PresenceSynchronizer,
    subject_id: &str,
    display_name: &str,
    format: Format,
) -> Result<()> {
    tracing::info!(subject = %subject_id, "Watching presence");
    let subscription = synchronizer.subscribe(subject_id);
    let mut updates = subscription.watch();
    let mut last_line: Option<String> = None;

    loop {
        let state = updates.borrow_and_update().clone();
        if let Some(line) = render_state(&state, display_name, format, now_millis()) {
            if last_line.as_deref() != Some(line.as_str()) {
                println!("{line}");
                last_line = Some(line);
            }
        }

        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal?;
                tracing::info!("Interrupted, shutting down");
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    subscription.deactivate().await;
    Ok(())
}
