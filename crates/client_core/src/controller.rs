//! Top-level controller: serializes user commands and poll ticks over one
//! owned [`UiSession`] and publishes view events.

use std::{path::PathBuf, sync::Arc, time::Duration};

use shared::domain::{InputMode, StepId, StepStatus};
use tokio::{
    sync::{broadcast, mpsc},
    time::MissedTickBehavior,
};
use tracing::{debug, warn};

use crate::{
    dispatch, preview, reconcile, session::UiSession, PipelineBackend, PreviewView,
};

#[derive(Debug)]
pub enum ControllerCommand {
    SwitchMode(InputMode),
    SetKeyword(String),
    SetUrl(String),
    SetRawText(String),
    SetNumJobs(u32),
    UploadCv(PathBuf),
    RunStep(StepId),
    RefreshPreview(StepId),
    Shutdown,
}

impl ControllerCommand {
    fn name(&self) -> &'static str {
        match self {
            ControllerCommand::SwitchMode(_) => "switch_mode",
            ControllerCommand::SetKeyword(_) => "set_keyword",
            ControllerCommand::SetUrl(_) => "set_url",
            ControllerCommand::SetRawText(_) => "set_raw_text",
            ControllerCommand::SetNumJobs(_) => "set_num_jobs",
            ControllerCommand::UploadCv(_) => "upload_cv",
            ControllerCommand::RunStep(_) => "run_step",
            ControllerCommand::RefreshPreview(_) => "refresh_preview",
            ControllerCommand::Shutdown => "shutdown",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    StatusChanged { step: StepId, status: StepStatus },
    LogsReplaced(Vec<String>),
    PreviewUpdated { step: StepId, view: PreviewView },
    /// Blocking user-facing warning (e.g. a failed precondition).
    Warning(String),
    Info(String),
}

pub struct PipelineController {
    backend: Arc<dyn PipelineBackend>,
    session: UiSession,
    poll_interval: Duration,
    events: broadcast::Sender<ControllerEvent>,
}

impl PipelineController {
    pub fn new(
        backend: Arc<dyn PipelineBackend>,
        session: UiSession,
        poll_interval: Duration,
    ) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            backend,
            session,
            poll_interval,
            events,
        }
    }

    pub fn session(&self) -> &UiSession {
        &self.session
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    /// Runs until a `Shutdown` command arrives or the command channel closes,
    /// then hands the session back.
    pub async fn run(mut self, mut commands: mpsc::Receiver<ControllerCommand>) -> UiSession {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.tick().await,
                command = commands.recv() => {
                    let Some(command) = command else {
                        debug!("command channel closed");
                        break;
                    };
                    if !self.handle_command(command).await {
                        break;
                    }
                }
            }
        }

        self.session
    }

    /// Runs one reconciliation pass. Failures are logged and retried on the
    /// next tick.
    pub async fn tick(&mut self) {
        let report = match reconcile::reconcile_tick(&mut self.session, self.backend.as_ref()).await
        {
            Ok(report) => report,
            Err(error) => {
                warn!(%error, "log polling failed");
                return;
            }
        };

        self.emit(ControllerEvent::LogsReplaced(
            self.session.logs.lines().to_vec(),
        ));
        if let Some(correction) = report.correction {
            self.emit(ControllerEvent::StatusChanged {
                step: correction.step,
                status: correction.status,
            });
            if report.preview_applied {
                self.emit_preview(correction.step);
            }
        }
    }

    /// Applies one user command. Returns `false` when the controller should stop.
    pub async fn handle_command(&mut self, command: ControllerCommand) -> bool {
        debug!(command = command.name(), "handling ui command");
        match command {
            ControllerCommand::SwitchMode(mode) => self.session.mode = mode,
            ControllerCommand::SetKeyword(keyword) => self.session.keyword = keyword,
            ControllerCommand::SetUrl(url) => self.session.url = url,
            ControllerCommand::SetRawText(text) => self.session.raw_text = text,
            ControllerCommand::SetNumJobs(num_jobs) => self.session.num_jobs = num_jobs,
            ControllerCommand::UploadCv(path) => {
                match dispatch::upload_cv(&mut self.session, self.backend.as_ref(), &path).await {
                    Ok(filename) => self.emit(ControllerEvent::Info(format!(
                        "Fichier chargé : {filename}"
                    ))),
                    Err(error) => {
                        warn!(path = %path.display(), %error, "cv upload failed");
                        let message = format!("Erreur upload: {error}");
                        self.session.logs.push_local(message.clone());
                        self.emit(ControllerEvent::Warning(message));
                    }
                }
            }
            ControllerCommand::RunStep(step) => {
                match dispatch::run_step(&mut self.session, Arc::clone(&self.backend), step) {
                    Ok(_start_task) => self.emit(ControllerEvent::StatusChanged {
                        step,
                        status: StepStatus::Running,
                    }),
                    Err(error) => self.emit(ControllerEvent::Warning(error.to_string())),
                }
            }
            ControllerCommand::RefreshPreview(step) => {
                if preview::fetch_preview(self.backend.as_ref(), &mut self.session.board, step)
                    .await
                {
                    self.emit_preview(step);
                }
            }
            ControllerCommand::Shutdown => return false,
        }
        true
    }

    fn emit_preview(&self, step: StepId) {
        if let Some(view) = self.session.board.view(step).preview() {
            self.emit(ControllerEvent::PreviewUpdated {
                step,
                view: view.clone(),
            });
        }
    }

    fn emit(&self, event: ControllerEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
