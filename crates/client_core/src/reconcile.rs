//! Periodic reconciliation of displayed step state against server snapshots.

use std::time::Duration;

use shared::{
    domain::{StepId, StepStatus, TaskState},
    protocol::LogsSnapshot,
};
use tracing::{debug, info};

use crate::{
    preview,
    session::{ServerObservation, UiSession},
    ClientError, PipelineBackend,
};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// A forced update of one step's displayed status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Correction {
    pub step: StepId,
    pub status: StepStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TickReport {
    pub observed: ServerObservation,
    pub correction: Option<Correction>,
    pub preview_applied: bool,
}

/// Status the displayed step must be forced to, if it diverges from the server.
pub fn required_status(displayed: StepStatus, server: TaskState) -> Option<StepStatus> {
    let target = match server {
        TaskState::Completed => StepStatus::Completed,
        TaskState::Error => StepStatus::Error,
        TaskState::Idle | TaskState::Running => return None,
    };
    (displayed != target).then_some(target)
}

/// Applies a snapshot to the session without any network access.
///
/// Logs are replaced wholesale, the active step is corrected if it diverges,
/// and the observation becomes the new last-known state. A snapshot that still
/// describes the run preceding a re-dispatch corrects nothing.
pub fn apply_snapshot(session: &mut UiSession, snapshot: LogsSnapshot) -> Option<Correction> {
    let observed = ServerObservation {
        task_state: snapshot.task_state,
        active_task: snapshot.active_step(),
    };
    let previous_run = session
        .stale
        .as_ref()
        .is_some_and(|stale| stale.matches(&observed, &snapshot.logs));
    if session.stale.is_some() && !previous_run {
        debug!("server moved past the previous run");
        session.stale = None;
    }
    session.logs.replace(snapshot.logs);

    if observed != session.last_known {
        debug!(
            task_state = %observed.task_state,
            active_task = ?observed.active_task,
            "server state changed"
        );
    }

    let correction = observed.active_task.filter(|_| !previous_run).and_then(|step| {
        let displayed = session.board.status(step);
        required_status(displayed, observed.task_state).map(|status| Correction { step, status })
    });
    if let Some(correction) = correction {
        info!(
            step = %correction.step,
            status = ?correction.status,
            "display diverged from server; forcing update"
        );
        session
            .board
            .render_status(correction.step, correction.status);
    }

    session.last_known = observed;
    correction
}

/// One poll: fetch the snapshot, reconcile, and load the preview of a step
/// that was just forced to completed.
pub async fn reconcile_tick(
    session: &mut UiSession,
    backend: &dyn PipelineBackend,
) -> Result<TickReport, ClientError> {
    let snapshot = backend.fetch_logs().await?;
    let correction = apply_snapshot(session, snapshot);

    let preview_applied = match correction {
        Some(Correction {
            step,
            status: StepStatus::Completed,
        }) => preview::fetch_preview(backend, &mut session.board, step).await,
        _ => false,
    };

    Ok(TickReport {
        observed: session.last_known,
        correction,
        preview_applied,
    })
}

#[cfg(test)]
#[path = "tests/reconcile_tests.rs"]
mod tests;
