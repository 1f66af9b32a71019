//! Per-step status indicators and preview areas.

use shared::domain::{StepId, StepStatus};

use crate::preview::PreviewView;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepView {
    status: StepStatus,
    preview: Option<PreviewView>,
}

impl StepView {
    pub fn status(&self) -> StepStatus {
        self.status
    }

    pub fn label(&self) -> &'static str {
        self.status.label()
    }

    /// The preview area is only shown once it has been populated.
    pub fn preview(&self) -> Option<&PreviewView> {
        self.preview.as_ref()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepBoard {
    steps: [StepView; StepId::LAST as usize],
}

impl StepBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self, step: StepId) -> &StepView {
        &self.steps[slot(step)]
    }

    pub fn status(&self, step: StepId) -> StepStatus {
        self.view(step).status
    }

    pub fn iter(&self) -> impl Iterator<Item = (StepId, &StepView)> {
        StepId::all().zip(self.steps.iter())
    }

    /// Sets the displayed status of `step`. Returns whether the status changed.
    ///
    /// Entering `Running` always clears the preview area so results from a
    /// previous run are never shown alongside a new one.
    pub fn render_status(&mut self, step: StepId, status: StepStatus) -> bool {
        let view = self.view_mut(step);
        let changed = view.status != status;
        view.status = status;
        if status == StepStatus::Running {
            view.preview = None;
        }
        changed
    }

    pub fn set_preview(&mut self, step: StepId, preview: PreviewView) {
        self.view_mut(step).preview = Some(preview);
    }

    fn view_mut(&mut self, step: StepId) -> &mut StepView {
        &mut self.steps[slot(step)]
    }
}

fn slot(step: StepId) -> usize {
    usize::from(step.number() - StepId::FIRST)
}

#[cfg(test)]
#[path = "tests/status_tests.rs"]
mod tests;
