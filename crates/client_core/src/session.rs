//! UI-session context owned by the controller.

use shared::domain::{InputMode, StepId, TaskState};

use crate::status::StepBoard;

/// Label shown while no CV has been uploaded.
pub const NO_FILE_LABEL: &str = "Aucun fichier";
pub const DEFAULT_NUM_JOBS: u32 = 5;

/// Last server state observed by the reconciliation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServerObservation {
    pub task_state: TaskState,
    pub active_task: Option<StepId>,
}

/// Terminal observation that was current when its step was dispatched again.
/// Snapshots matching it still describe the previous run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleObservation {
    pub observation: ServerObservation,
    pub server_logs: Vec<String>,
}

impl StaleObservation {
    /// True while the server reports the same state, task and log as before
    /// the re-run was dispatched.
    pub fn matches(&self, observed: &ServerObservation, logs: &[String]) -> bool {
        self.observation == *observed && self.server_logs == logs
    }
}

/// Log window content. Always holds the latest server snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogView {
    lines: Vec<String>,
    server_len: usize,
    scrolled_to: Option<usize>,
}

impl LogView {
    pub fn replace(&mut self, lines: Vec<String>) {
        self.server_len = lines.len();
        self.lines = lines;
        self.scroll_to_newest();
    }

    /// Appends a client-side notice; the next snapshot overwrites it.
    pub fn push_local(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
        self.scroll_to_newest();
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines of the last server snapshot, without local notices.
    pub fn server_lines(&self) -> &[String] {
        &self.lines[..self.server_len]
    }

    /// Index of the line the view is scrolled to.
    pub fn scrolled_to(&self) -> Option<usize> {
        self.scrolled_to
    }

    pub fn rendered(&self) -> impl Iterator<Item = String> + '_ {
        self.lines.iter().map(|line| format!("> {line}"))
    }

    fn scroll_to_newest(&mut self) {
        self.scrolled_to = self.lines.len().checked_sub(1);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UiSession {
    pub mode: InputMode,
    pub keyword: String,
    pub url: String,
    pub raw_text: String,
    pub num_jobs: u32,
    pub uploaded_file: Option<String>,
    pub board: StepBoard,
    pub logs: LogView,
    pub last_known: ServerObservation,
    pub stale: Option<StaleObservation>,
}

impl Default for UiSession {
    fn default() -> Self {
        Self::new(DEFAULT_NUM_JOBS)
    }
}

impl UiSession {
    pub fn new(num_jobs: u32) -> Self {
        Self {
            mode: InputMode::default(),
            keyword: String::new(),
            url: String::new(),
            raw_text: String::new(),
            num_jobs,
            uploaded_file: None,
            board: StepBoard::new(),
            logs: LogView::default(),
            last_known: ServerObservation::default(),
            stale: None,
        }
    }

    pub fn uploaded_file_label(&self) -> &str {
        self.uploaded_file.as_deref().unwrap_or(NO_FILE_LABEL)
    }

    /// Remembers the current terminal observation as stale when `step` is the
    /// step it reports on.
    pub fn mark_rerun(&mut self, step: StepId) {
        let last = self.last_known;
        if last.active_task == Some(step)
            && matches!(last.task_state, TaskState::Completed | TaskState::Error)
        {
            self.stale = Some(StaleObservation {
                observation: last,
                server_logs: self.logs.server_lines().to_vec(),
            });
        }
    }
}
