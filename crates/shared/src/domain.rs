use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// One stage of the pipeline, numbered `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StepId(u8);

impl StepId {
    pub const FIRST: u8 = 1;
    pub const LAST: u8 = 6;

    pub const SCRAPE: StepId = StepId(1);
    pub const REWRITE_JOBS: StepId = StepId(2);
    pub const CONVERT_CV: StepId = StepId(3);
    pub const REWRITE_CV: StepId = StepId(4);
    pub const MATCH: StepId = StepId(5);
    pub const CROSS_MATCH: StepId = StepId(6);

    pub fn new(number: u8) -> Result<Self, DomainError> {
        if (Self::FIRST..=Self::LAST).contains(&number) {
            Ok(Self(number))
        } else {
            Err(DomainError::InvalidStep(number.to_string()))
        }
    }

    pub fn all() -> impl Iterator<Item = StepId> {
        (Self::FIRST..=Self::LAST).map(StepId)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Wire name used by the backend (`step1`..`step6`).
    pub fn name(self) -> String {
        format!("step{}", self.0)
    }

    /// Steps whose preview is a list of scored candidate records.
    pub fn renders_match_cards(self) -> bool {
        self == Self::MATCH || self == Self::CROSS_MATCH
    }

    pub fn requires_upload(self) -> bool {
        self == Self::CONVERT_CV
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step{}", self.0)
    }
}

impl FromStr for StepId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidStep(s.to_string());
        let digits = s.trim().strip_prefix("step").ok_or_else(invalid)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let number = digits.parse::<u8>().map_err(|_| invalid())?;
        Self::new(number).map_err(|_| invalid())
    }
}

impl TryFrom<String> for StepId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StepId> for String {
    fn from(value: StepId) -> Self {
        value.name()
    }
}

/// Locally displayed status of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    #[default]
    Idle,
    Running,
    Completed,
    Error,
}

impl StepStatus {
    pub fn label(self) -> &'static str {
        match self {
            StepStatus::Idle => "Prêt",
            StepStatus::Running => "En cours...",
            StepStatus::Completed => "Terminé",
            StepStatus::Error => "Erreur",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            StepStatus::Idle => "status-idle",
            StepStatus::Running => "status-running",
            StepStatus::Completed => "status-completed",
            StepStatus::Error => "status-error",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::Error)
    }
}

/// Aggregated pipeline state as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    #[default]
    Idle,
    Running,
    Completed,
    Error,
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskState::Idle => "IDLE",
            TaskState::Running => "RUNNING",
            TaskState::Completed => "COMPLETED",
            TaskState::Error => "ERROR",
        };
        f.write_str(name)
    }
}

impl FromStr for TaskState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IDLE" => Ok(TaskState::Idle),
            "RUNNING" => Ok(TaskState::Running),
            "COMPLETED" => Ok(TaskState::Completed),
            "ERROR" => Ok(TaskState::Error),
            _ => Err(DomainError::InvalidTaskState(s.to_string())),
        }
    }
}

/// Source of the job offers fed to step 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    #[default]
    Keyword,
    Url,
    RawText,
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputMode::Keyword => "keyword",
            InputMode::Url => "url",
            InputMode::RawText => "raw_text",
        };
        f.write_str(name)
    }
}

impl FromStr for InputMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyword" => Ok(InputMode::Keyword),
            "url" => Ok(InputMode::Url),
            "raw_text" | "text" => Ok(InputMode::RawText),
            _ => Err(DomainError::InvalidInputMode(s.to_string())),
        }
    }
}

/// Discrete bucket derived from a match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    High,
    Mid,
    Low,
}

impl ScoreTier {
    pub fn from_score(score: f64) -> Self {
        if score > 70.0 {
            ScoreTier::High
        } else if score > 50.0 {
            ScoreTier::Mid
        } else {
            ScoreTier::Low
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            ScoreTier::High => "score-high",
            ScoreTier::Mid => "score-mid",
            ScoreTier::Low => "score-low",
        }
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
