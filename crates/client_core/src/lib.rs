use async_trait::async_trait;
use shared::{
    domain::StepId,
    protocol::{LogsSnapshot, PreviewPayload, StepRequest},
};

pub mod controller;
pub mod dispatch;
pub mod error;
pub mod preview;
pub mod reconcile;
pub mod session;
pub mod status;
pub mod transport;

pub use controller::{ControllerCommand, ControllerEvent, PipelineController};
pub use dispatch::DispatchError;
pub use error::ClientError;
pub use preview::PreviewView;
pub use session::{LogView, ServerObservation, StaleObservation, UiSession};
pub use status::StepBoard;
pub use transport::HttpPipelineBackend;

/// Backend HTTP surface consumed by the controller.
#[async_trait]
pub trait PipelineBackend: Send + Sync {
    /// Starts a step server-side. The response carries no completion evidence.
    async fn start_step(&self, request: &StepRequest) -> Result<(), ClientError>;
    /// Uploads a CV for step 3 and returns the filename the server stored.
    async fn upload_cv(&self, filename: &str, bytes: Vec<u8>) -> Result<String, ClientError>;
    async fn fetch_logs(&self) -> Result<LogsSnapshot, ClientError>;
    async fn fetch_preview(&self, step: StepId) -> Result<PreviewPayload, ClientError>;
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
