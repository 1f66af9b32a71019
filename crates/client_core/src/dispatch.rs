//! Starting steps on the server and uploading the CV used by step 3.

use std::{path::Path, sync::Arc};

use shared::{
    domain::{InputMode, StepId, StepStatus},
    protocol::{Step1Mode, Step1Request, Step3Request, StepRequest},
};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{session::UiSession, ClientError, PipelineBackend};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("Veuillez sélectionner un fichier PDF d'abord.")]
    MissingUpload,
}

/// Builds the start request for `step` from the current session inputs.
pub fn build_request(session: &UiSession, step: StepId) -> Result<StepRequest, DispatchError> {
    if step == StepId::SCRAPE {
        return Ok(StepRequest::Scrape(step1_request(session)));
    }
    if step.requires_upload() {
        let filename = session
            .uploaded_file
            .clone()
            .ok_or(DispatchError::MissingUpload)?;
        return Ok(StepRequest::ConvertCv(Step3Request { filename }));
    }
    Ok(StepRequest::Empty(step))
}

fn step1_request(session: &UiSession) -> Step1Request {
    let (mode, keyword, text) = match session.mode {
        InputMode::Keyword => (Step1Mode::Scrape, session.keyword.clone(), String::new()),
        InputMode::Url => (Step1Mode::Scrape, session.url.clone(), String::new()),
        InputMode::RawText => (Step1Mode::Text, String::new(), session.raw_text.clone()),
    };
    Step1Request {
        mode,
        keyword,
        num_jobs: session.num_jobs,
        text,
    }
}

/// Marks `step` as running and fires its start request.
///
/// The status change and preview reset happen before the request is sent.
/// The returned task only logs the outcome; completion is learned by polling.
pub fn run_step(
    session: &mut UiSession,
    backend: Arc<dyn PipelineBackend>,
    step: StepId,
) -> Result<JoinHandle<()>, DispatchError> {
    let request = build_request(session, step)?;
    session.mark_rerun(step);
    session.board.render_status(step, StepStatus::Running);
    info!(%step, "dispatching step");

    Ok(tokio::spawn(async move {
        match backend.start_step(&request).await {
            Ok(()) => debug!(%step, "step start acknowledged"),
            Err(error) => warn!(%step, %error, "step start request failed"),
        }
    }))
}

/// Uploads a local CV and records the server-side filename in the session.
pub async fn upload_cv(
    session: &mut UiSession,
    backend: &dyn PipelineBackend,
    path: &Path,
) -> Result<String, ClientError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ClientError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cv.pdf".to_string());

    let stored = backend.upload_cv(&filename, bytes).await?;
    session.uploaded_file = Some(stored.clone());
    session.logs.push_local(format!("Fichier chargé : {stored}"));
    Ok(stored)
}

#[cfg(test)]
#[path = "tests/dispatch_tests.rs"]
mod tests;
