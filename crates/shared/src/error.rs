use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("unknown pipeline step '{0}'")]
    InvalidStep(String),
    #[error("unknown task state '{0}'")]
    InvalidTaskState(String),
    #[error("unknown input mode '{0}'")]
    InvalidInputMode(String),
}
