//! docvox CLI entry point.

use anyhow::Result;
use clap::Parser;
use docvox::cli::commands::{self, ProcessOptions};
use docvox::cli::{Cli, Commands};
use docvox::config::Settings;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.as_deref().map(Settings::expand_path);
    let settings = Settings::load_from(config_path.as_ref())?;

    // Held until exit so buffered file logs are flushed.
    let _guard = init_logging(cli.verbose, &settings);

    match cli.command {
        Commands::Doctor => {
            commands::run_doctor(&settings, config_path).await?;
        }

        Commands::Models => {
            commands::run_models(settings).await?;
        }

        Commands::Kbs { kb } => {
            commands::run_kbs(kb.as_deref(), settings).await?;
        }

        Commands::CreateKb { name, description } => {
            commands::run_create_kb(&name, &description, settings).await?;
        }

        Commands::Upload { files, kb, purpose } => {
            commands::run_upload(&files, kb.as_deref(), &purpose, settings).await?;
        }

        Commands::FindFile { name } => {
            commands::run_find_file(&name, settings).await?;
        }

        Commands::Process {
            kb,
            files,
            all,
            targets,
            system,
            user,
            instructions,
            model,
            temperature,
            narrate,
            narration,
        } => {
            let opts = ProcessOptions {
                kb,
                files,
                all,
                targets,
                system,
                user,
                instructions,
                model,
                temperature,
                narrate,
                narration,
            };
            commands::run_process(opts, settings).await?;
        }

        Commands::Narrate {
            input,
            name,
            narration,
        } => {
            commands::run_narrate(&input, name.as_deref(), &narration, settings).await?;
        }

        Commands::Voices { action } => {
            commands::run_voices(action, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, settings, config_path)?;
        }
    }

    Ok(())
}

/// Console logging follows `-v`; `RUST_LOG` overrides it. When
/// `general.log_dir` is set, a daily rolling file log is added at
/// `general.log_level`.
fn init_logging(verbose: u8, settings: &Settings) -> Option<WorkerGuard> {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let console_filter = EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("docvox={}", log_level)),
    );
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let (file_layer, guard) = match settings.log_dir() {
        Some(dir) => match file_writer(&dir) {
            Some((writer, guard)) => {
                let layer = tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_filter(EnvFilter::new(format!(
                        "docvox={}",
                        settings.general.log_level
                    )));
                (Some(layer), Some(guard))
            }
            None => (None, None),
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

fn file_writer(
    log_dir: &Path,
) -> Option<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    if let Err(err) = std::fs::create_dir_all(log_dir) {
        eprintln!("failed to create log dir `{}`: {err}", log_dir.display());
        return None;
    }
    let file_appender = tracing_appender::rolling::daily(log_dir, "docvox.log");
    Some(tracing_appender::non_blocking(file_appender))
}
