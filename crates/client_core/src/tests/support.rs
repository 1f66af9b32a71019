use std::{
    collections::{HashMap, VecDeque},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use shared::{
    domain::{StepId, TaskState},
    protocol::{LogsSnapshot, PreviewPayload, StepRequest},
};

use crate::{ClientError, PipelineBackend};

/// Scripted in-memory backend recording every call it receives.
#[derive(Default)]
pub(crate) struct FakeBackend {
    snapshots: Mutex<VecDeque<LogsSnapshot>>,
    last_snapshot: Mutex<LogsSnapshot>,
    previews: Mutex<HashMap<StepId, PreviewPayload>>,
    pub(crate) started: Mutex<Vec<StepRequest>>,
    pub(crate) preview_calls: Mutex<Vec<StepId>>,
    pub(crate) uploads: Mutex<Vec<(String, usize)>>,
    pub(crate) log_calls: Mutex<usize>,
    fail_logs: AtomicBool,
    fail_previews: AtomicBool,
}

impl FakeBackend {
    /// Queues a snapshot; once the queue drains the last one repeats.
    pub(crate) fn push_snapshot(&self, snapshot: LogsSnapshot) {
        self.snapshots.lock().expect("snapshots").push_back(snapshot);
    }

    pub(crate) fn set_preview(&self, step: StepId, payload: PreviewPayload) {
        self.previews
            .lock()
            .expect("previews")
            .insert(step, payload);
    }

    pub(crate) fn fail_logs(&self, fail: bool) {
        self.fail_logs.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_previews(&self, fail: bool) {
        self.fail_previews.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn preview_count(&self, step: StepId) -> usize {
        self.preview_calls
            .lock()
            .expect("preview calls")
            .iter()
            .filter(|called| **called == step)
            .count()
    }

    pub(crate) fn started_steps(&self) -> Vec<StepId> {
        self.started
            .lock()
            .expect("started")
            .iter()
            .map(StepRequest::step)
            .collect()
    }
}

#[async_trait]
impl PipelineBackend for FakeBackend {
    async fn start_step(&self, request: &StepRequest) -> Result<(), ClientError> {
        self.started.lock().expect("started").push(request.clone());
        Ok(())
    }

    async fn upload_cv(&self, filename: &str, bytes: Vec<u8>) -> Result<String, ClientError> {
        self.uploads
            .lock()
            .expect("uploads")
            .push((filename.to_string(), bytes.len()));
        Ok(filename.to_string())
    }

    async fn fetch_logs(&self) -> Result<LogsSnapshot, ClientError> {
        *self.log_calls.lock().expect("log calls") += 1;
        if self.fail_logs.load(Ordering::SeqCst) {
            return Err(ClientError::UnexpectedResponse(
                "connection refused".to_string(),
            ));
        }
        let mut last = self.last_snapshot.lock().expect("last snapshot");
        if let Some(next) = self.snapshots.lock().expect("snapshots").pop_front() {
            *last = next;
        }
        Ok(last.clone())
    }

    async fn fetch_preview(&self, step: StepId) -> Result<PreviewPayload, ClientError> {
        self.preview_calls.lock().expect("preview calls").push(step);
        if self.fail_previews.load(Ordering::SeqCst) {
            return Err(ClientError::UnexpectedResponse("malformed json".to_string()));
        }
        Ok(self
            .previews
            .lock()
            .expect("previews")
            .get(&step)
            .cloned()
            .unwrap_or(PreviewPayload::Empty))
    }
}

pub(crate) fn snapshot(task_state: TaskState, active_task: Option<&str>, logs: &[&str]) -> LogsSnapshot {
    LogsSnapshot {
        logs: logs.iter().map(|line| line.to_string()).collect(),
        task_state,
        active_task: active_task.map(str::to_string),
        status: logs.last().map(|line| line.to_string()),
    }
}
