//! Clip-Booth: record, trim and submit audio clips from the terminal.

mod app;
mod app_command;
mod cli;
mod config;
mod console_handler;
mod error;
mod status_indicator;
mod status_line;
mod submitter;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    cli::Cli,
    console_handler::{ConsoleHandler, HELP},
    error::{AppError, Result as AppResult},
    status_indicator::StatusIndicator,
    status_line::StatusLine,
    submitter::Submitter,
};

use crate::config::Config;

use std::{sync::Arc, time::Duration};

use clap::Parser;
use clip_booth_core::{CaptureController, CpalDevice};
use tokio::sync::{Mutex, mpsc, watch};
use tracing::error;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "clip_booth=info,clip_booth_core=info";

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };
    if let Some(base_url) = cli.base_url.clone() {
        config.submission.base_url = base_url;
    }

    let form = cli.submission_form(&config.submitter);

    let submitter = match Submitter::new(&config.submission) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to create Submitter: {:?}", e);
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    rt.block_on(async {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let console_handler = ConsoleHandler::new(command_tx);

        let app = App {
            controller: Arc::new(Mutex::new(CaptureController::new(CpalDevice::new()))),
            submitter,
            status: Arc::new(StatusLine::new()),
            config: Arc::new(config),
            form,
            command_rx,
            shutdown_tx,
            tasks: Vec::new(),
        };

        tokio::join!(
            async {
                if let Err(e) = console_handler.run(shutdown_rx).await {
                    error!(error = ?e, "Console handler error");
                }
            },
            async {
                if let Err(e) = app.run().await {
                    error!(error = ?e, "App error");
                }
            }
        );
    });

    // The stdin reader may still be blocked in read.
    rt.shutdown_timeout(Duration::from_millis(100));
}
