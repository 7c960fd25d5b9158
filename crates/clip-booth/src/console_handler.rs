//! Line-oriented console control.
//!
//! Reads commands from stdin on a blocking task and forwards them to the
//! main application over an async channel.

use crate::{AppCommand, AppError, AppResult, app_command::FormField};

use std::{
    io::BufRead,
    panic::Location,
    path::PathBuf,
    time::Duration,
};

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Command reference printed for `help` and unrecognised input.
pub const HELP: &str = "\
Commands:
  start                 begin recording
  pause                 pause recording
  resume                resume recording
  stop                  stop and keep the recording
  rerecord              discard the recording
  trim <start%> <end%>  keep part of the recording, e.g. trim 10 90
  name <text>           set your full name
  email [text]          set or clear your contact email
  title <text>          set the clip title
  category <text>       set the library category
  describe [text]       set or clear the clip description
  submit                send the trimmed recording
  upload <path>         send an existing audio file
  status                show state, timer and trim
  help                  show this list
  quit                  exit";

/// Parse one console line. `None` for blank or unrecognised input.
pub fn parse_command(line: &str) -> Option<AppCommand> {
    let mut words = line.split_whitespace();
    let verb = words.next()?.to_ascii_lowercase();

    let command = match verb.as_str() {
        "start" | "record" => AppCommand::Start,
        "pause" => AppCommand::Pause,
        "resume" => AppCommand::Resume,
        "stop" => AppCommand::Stop,
        "rerecord" | "re-record" => AppCommand::ReRecord,
        "trim" => {
            let start_percent = parse_percent(words.next()?)?;
            let end_percent = parse_percent(words.next()?)?;
            AppCommand::Trim {
                start_percent,
                end_percent,
            }
        }
        "submit" => AppCommand::Submit,
        "upload" => {
            let rest = rest_of_line(line, &verb);
            if rest.is_empty() {
                return None;
            }
            return Some(AppCommand::Upload {
                path: PathBuf::from(rest),
            });
        }
        "name" | "title" | "category" | "email" | "describe" | "description" => {
            let field = match verb.as_str() {
                "name" => FormField::Name,
                "title" => FormField::Title,
                "category" => FormField::Category,
                "email" => FormField::Email,
                _ => FormField::Description,
            };
            let rest = rest_of_line(line, &verb);
            let required = matches!(
                field,
                FormField::Name | FormField::Title | FormField::Category
            );
            if required && rest.is_empty() {
                return None;
            }
            return Some(AppCommand::SetField {
                field,
                value: rest.to_string(),
            });
        }
        "status" => AppCommand::Status,
        "help" | "?" => AppCommand::Help,
        "quit" | "exit" => AppCommand::Shutdown,
        _ => return None,
    };

    if words.next().is_some() {
        return None;
    }
    Some(command)
}

/// Everything after the verb, trimmed. `verb` is the lowercased first word.
fn rest_of_line<'a>(line: &'a str, verb: &str) -> &'a str {
    line.trim_start()
        .get(verb.len()..)
        .map(str::trim)
        .unwrap_or_default()
}

fn parse_percent(word: &str) -> Option<u8> {
    word.trim_end_matches('%').parse().ok()
}

/// Console command handler.
pub struct ConsoleHandler {
    command_tx: mpsc::Sender<AppCommand>,
}

impl ConsoleHandler {
    /// Handler forwarding parsed commands to `command_tx`.
    pub fn new(command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self { command_tx }
    }

    /// Run the console event loop until `quit`, end of input, or shutdown.
    #[instrument(skip_all)]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let (line_tx, mut line_rx) = mpsc::channel::<String>(32);

        // Blocking stdin reader. Ends when stdin closes or line_rx is dropped.
        let handle = tokio::task::spawn_blocking(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if line_tx.blocking_send(line).is_err() {
                    break;
                }
            }
        });

        println!("{}", HELP);

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Console handler shutting down");
                    break;
                }
                line = line_rx.recv() => {
                    let Some(line) = line else {
                        info!("Console input closed");
                        self.forward(AppCommand::Shutdown).await?;
                        break;
                    };
                    if self.handle_line(&line).await? {
                        break;
                    }
                }
            }
        }

        drop(line_rx);

        // The reader may stay blocked in read until the next line arrives.
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Console reader stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Console reader task panicked"),
            Err(_) => debug!(
                "Console reader did not stop within timeout, \
                   will be cleaned up on exit"
            ),
        }

        Ok(())
    }

    /// Handle one input line. Returns `true` once shutdown was requested.
    #[instrument(skip(self))]
    pub async fn handle_line(&self, line: &str) -> AppResult<bool> {
        if line.trim().is_empty() {
            return Ok(false);
        }

        let Some(command) = parse_command(line) else {
            println!("Unrecognised command: {}\n{}", line.trim(), HELP);
            return Ok(false);
        };

        let shutdown = command == AppCommand::Shutdown;
        self.forward(command).await?;
        Ok(shutdown)
    }

    async fn forward(&self, command: AppCommand) -> AppResult<()> {
        let location = Location::caller();
        debug!(command = ?command, "Forwarding console command");
        self.command_tx
            .send(command)
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send {:?}: {}", e.0, e),
                location: ErrorLocation::from(location),
            })
    }
}
