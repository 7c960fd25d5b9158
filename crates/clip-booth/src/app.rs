use crate::{
    AppCommand, AppError, AppResult, HELP, StatusIndicator, StatusLine, Submitter,
    app_command::{FormField, clear_clip_details}, config::Config, status_line::render_line,
    submitter::check_upload_size,
};

use std::{
    panic::Location,
    path::{Path, PathBuf},
    sync::Arc,
};

use clip_booth_core::{
    BoothError, CaptureController, CpalDevice, EncodedBlob, LevelMeter, SessionState, SignalTap,
    SubmissionForm, SubmissionSource, TrimEncodeEngine, TrimSelection, WAV_MIME_TYPE,
    format_clock,
};
use error_location::ErrorLocation;
use tokio::{
    sync::{Mutex, mpsc, watch},
    task::JoinHandle,
};
use tracing::{debug, error, info, instrument, warn};

/// Main application state.
///
/// Owns the capture controller and runs one command at a time. Timer and
/// meter refresh run as background tasks for the lifetime of a capture.
pub struct App {
    pub(crate) controller: Arc<Mutex<CaptureController<CpalDevice>>>,
    pub(crate) submitter: Submitter,
    pub(crate) status: Arc<StatusLine>,
    pub(crate) config: Arc<Config>,
    pub(crate) form: SubmissionForm,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    pub(crate) tasks: Vec<JoinHandle<()>>,
}

impl App {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!(endpoint = %self.submitter.endpoint(), "Clip-Booth starting");

        while let Some(command) = self.command_rx.recv().await {
            if command == AppCommand::Shutdown {
                info!("Shutdown requested");
                break;
            }

            if let Err(e) = self.handle_command(command.clone()).await {
                self.status.finish_line();
                error!(command = ?command, error = %e, "Command failed");
            }
        }

        self.abort_background();

        {
            let controller = self.controller.lock().await;
            if matches!(
                controller.state(),
                SessionState::Recording | SessionState::Paused
            ) {
                warn!(
                    session_id = %controller.session().id(),
                    "Discarding unfinished recording"
                );
            }
        }

        self.status.finish_line();
        let _ = self.shutdown_tx.send(true);
        info!("Clip-Booth shut down successfully");

        Ok(())
    }

    #[instrument(skip(self))]
    async fn handle_command(&mut self, command: AppCommand) -> AppResult<()> {
        match command {
            AppCommand::Start => self.start_recording().await,
            AppCommand::Pause => {
                self.controller.lock().await.pause()?;
                self.status.update_state(StatusIndicator::Paused);
                Ok(())
            }
            AppCommand::Resume => {
                self.controller.lock().await.resume()?;
                self.status.update_state(StatusIndicator::Recording);
                Ok(())
            }
            AppCommand::Stop => self.stop_recording().await,
            AppCommand::ReRecord => {
                self.controller.lock().await.re_record()?;
                self.status.reset();
                self.status.finish_line();
                println!("Recording discarded. Type `start` to record again.");
                Ok(())
            }
            AppCommand::Trim {
                start_percent,
                end_percent,
            } => {
                let selection = TrimSelection::from_percent(start_percent, end_percent)?;
                self.controller.lock().await.set_trim(selection)?;
                println!(
                    "Keeping {}% to {}% of the recording.",
                    start_percent, end_percent
                );
                Ok(())
            }
            AppCommand::SetField { field, value } => {
                field.apply(&mut self.form, &value);
                self.status.finish_line();
                match self.form_value(field) {
                    Some(v) => println!("{} set to \"{}\".", field.label(), v),
                    None => println!("{} cleared.", field.label()),
                }
                Ok(())
            }
            AppCommand::Submit => self.submit_recording().await,
            AppCommand::Upload { path } => self.upload_file(path).await,
            AppCommand::Status => {
                self.print_status().await;
                Ok(())
            }
            AppCommand::Help => {
                println!("{}", HELP);
                Ok(())
            }
            AppCommand::Shutdown => Ok(()),
        }
    }

    /// Start a recording and its timer and meter tasks.
    #[instrument(skip(self))]
    async fn start_recording(&mut self) -> AppResult<()> {
        let tap = {
            let mut controller = self.controller.lock().await;
            controller.start()?;
            info!(session_id = %controller.session().id(), "Recording session opened");
            controller.signal_tap()
        };

        self.status.reset();
        self.status.update_state(StatusIndicator::Recording);
        self.spawn_background(tap);

        Ok(())
    }

    /// Stop the recording and report what was captured.
    #[instrument(skip(self))]
    async fn stop_recording(&mut self) -> AppResult<()> {
        let (recording, reading) = {
            let mut controller = self.controller.lock().await;
            let recording = controller.stop()?.clone();
            (recording, controller.last_reading().cloned())
        };

        if let Some(reading) = reading {
            self.status.update_clock(&reading);
        }
        self.status.update_state(StatusIndicator::Stopped);
        self.status.finish_line();

        println!(
            "Recorded {} ({} chunks, {} bytes). Use `trim <start%> <end%>` then `submit`.",
            format_clock(recording.recorded_duration_ms),
            recording.chunk_count,
            recording.blob.len()
        );

        Ok(())
    }

    /// Render the trimmed recording, submit it, and reset for a new session.
    #[instrument(skip(self))]
    async fn submit_recording(&mut self) -> AppResult<()> {
        let (blob, trim) = {
            let controller = self.controller.lock().await;
            let recording = controller.finalized().ok_or_else(|| BoothError::NoRecording {
                location: ErrorLocation::from(Location::caller()),
            })?;
            (recording.blob.clone(), controller.trim())
        };

        self.status.update_state(StatusIndicator::Submitting);

        let id = match self
            .render_and_send(blob, trim, SubmissionSource::Record)
            .await
        {
            Ok(id) => id,
            Err(e) => {
                self.status.update_state(StatusIndicator::Stopped);
                match &e {
                    AppError::Core {
                        source: BoothError::DecodeError { .. },
                        ..
                    } => {
                        self.status.finish_line();
                        println!(
                            "The recording could not be decoded. Type `rerecord` to try again."
                        );
                    }
                    AppError::Core {
                        source: BoothError::MissingField { field, .. },
                        ..
                    } => {
                        self.status.finish_line();
                        let verb = if *field == "fullName" { "name" } else { *field };
                        println!(
                            "Missing {}. Set it with `{} <text>`, then `submit`.",
                            field, verb
                        );
                    }
                    _ => {}
                }
                return Err(e);
            }
        };

        self.controller.lock().await.re_record()?;
        self.status.reset();
        clear_clip_details(&mut self.form);
        self.report_submitted(id.as_deref());

        Ok(())
    }

    /// Render an existing audio file and submit it as an upload.
    #[instrument(skip(self))]
    async fn upload_file(&mut self, path: PathBuf) -> AppResult<()> {
        let metadata = tokio::fs::metadata(&path).await?;
        check_upload_size(
            usize::try_from(metadata.len()).unwrap_or(usize::MAX),
            self.config.submission.max_upload_bytes,
        )?;

        let bytes = tokio::fs::read(&path).await?;
        let blob = EncodedBlob::new(mime_for_path(&path), bytes);

        self.status.update_state(StatusIndicator::Submitting);
        let result = self
            .render_and_send(blob, TrimSelection::FULL, SubmissionSource::Upload)
            .await;
        let state = self.controller.lock().await.state();
        self.status.update_state(StatusIndicator::from(state));

        let id = result?;
        clear_clip_details(&mut self.form);
        self.report_submitted(id.as_deref());

        Ok(())
    }

    /// Decode, trim and encode off the async threads, then post.
    async fn render_and_send(
        &self,
        blob: EncodedBlob,
        trim: TrimSelection,
        source: SubmissionSource,
    ) -> AppResult<Option<String>> {
        let form = self.form.clone();

        let submission = tokio::task::spawn_blocking(move || {
            TrimEncodeEngine::new(source).render(&blob, trim, form)
        })
        .await
        .map_err(|e| AppError::SubmissionFailed {
            reason: format!("Render task failed: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })??;

        info!(
            duration_ms = submission.duration_ms,
            frames = submission.frames,
            sample_rate = submission.sample_rate,
            channels = submission.channels,
            "Submitting recording"
        );

        self.submitter.submit(&submission).await
    }

    fn form_value(&self, field: FormField) -> Option<&str> {
        let value = match field {
            FormField::Name => Some(self.form.full_name.as_str()),
            FormField::Email => self.form.email.as_deref(),
            FormField::Title => Some(self.form.title.as_str()),
            FormField::Category => Some(self.form.category.as_str()),
            FormField::Description => self.form.description.as_deref(),
        };
        value.filter(|v| !v.is_empty())
    }

    fn report_submitted(&self, id: Option<&str>) {
        self.status.finish_line();
        match id {
            Some(id) => println!("Submitted for review (id {}).", id),
            None => println!("Submitted for review."),
        }
        println!("Library: {}", self.config.submission.library_url());
    }

    async fn print_status(&self) {
        let controller = self.controller.lock().await;

        self.status.finish_line();
        println!("{}", render_line(&self.status.snapshot()));
        println!(
            "State: {:?}  Time: {}  Paused: {}",
            controller.state(),
            format_clock(controller.elapsed_ms()),
            format_clock(controller.accumulated_pause_ms())
        );
        println!(
            "Name: {}  Title: {}  Category: {}",
            self.form_value(FormField::Name).unwrap_or("-"),
            self.form_value(FormField::Title).unwrap_or("-"),
            self.form_value(FormField::Category).unwrap_or("-")
        );
        if let Some(recording) = controller.finalized() {
            let trim = controller.trim();
            println!(
                "Recording: {} ({} bytes)  Trim: {:.0}% to {:.0}%",
                format_clock(recording.recorded_duration_ms),
                recording.blob.len(),
                trim.start() * 100.0,
                trim.end() * 100.0
            );
        }
    }

    /// Timer and meter tasks. Both end on their own once capture stops.
    fn spawn_background(&mut self, tap: Option<SignalTap>) {
        self.abort_background();

        let controller = Arc::clone(&self.controller);
        let status = Arc::clone(&self.status);
        let interval = self.config.recording.timer_interval();
        self.tasks.push(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let mut guard = controller.lock().await;
                if !matches!(guard.state(), SessionState::Recording | SessionState::Paused) {
                    break;
                }
                if let Some(reading) = guard.tick_timer() {
                    status.update_clock(&reading);
                }
            }
            debug!("Timer task finished");
        }));

        let Some(tap) = tap else {
            return;
        };
        let status = Arc::clone(&self.status);
        let frame = self.config.recording.meter_frame();
        self.tasks.push(tokio::spawn(async move {
            let mut meter = LevelMeter::new();
            let mut ticker = tokio::time::interval(frame);
            loop {
                ticker.tick().await;
                match meter.sample(&tap) {
                    Some(level) => status.update_level(level),
                    None => break,
                }
            }
            debug!("Meter task finished");
        }));
    }

    fn abort_background(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

/// MIME hint for an uploaded file, from its extension.
///
/// Unknown extensions give an empty hint and the decoder probes the bytes.
pub(crate) fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "wav" | "wave" => WAV_MIME_TYPE,
        "mp3" => "audio/mpeg",
        "flac" => "audio/flac",
        "ogg" | "oga" => "audio/ogg",
        "m4a" | "mp4" | "aac" => "audio/mp4",
        _ => "",
    }
}
