//! Parsing of terminal input lines into controller commands.

use std::path::PathBuf;

use client_core::ControllerCommand;
use shared::{
    domain::{InputMode, StepId},
    error::DomainError,
};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  mode keyword|url|raw_text   select the step 1 input mode
  keyword <words>             set the search keyword
  url <url>                   set the job offer url
  text <raw text>             set the raw job description
  jobs <n>                    number of offers to scrape
  upload <path>               upload the CV used by step 3
  run <1-6>                   start a step
  preview <1-6>               reload a step's preview
  help                        show this message
  quit                        stop the controller";

#[derive(Debug)]
pub enum Input {
    Command(ControllerCommand),
    Help,
    Blank,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command '{0}' (type 'help')")]
    UnknownCommand(String),
    #[error("'{0}' expects an argument")]
    MissingArgument(&'static str),
    #[error("invalid job count '{0}'")]
    InvalidNumber(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

pub fn parse_line(line: &str) -> Result<Input, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Input::Blank);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    let argument = |name: &'static str| {
        if rest.is_empty() {
            Err(ParseError::MissingArgument(name))
        } else {
            Ok(rest.to_string())
        }
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "help" | "?" => return Ok(Input::Help),
        "quit" | "exit" => ControllerCommand::Shutdown,
        "mode" => ControllerCommand::SwitchMode(argument("mode")?.parse::<InputMode>()?),
        "keyword" => ControllerCommand::SetKeyword(argument("keyword")?),
        "url" => ControllerCommand::SetUrl(argument("url")?),
        "text" => ControllerCommand::SetRawText(argument("text")?),
        "jobs" => {
            let raw = argument("jobs")?;
            let num_jobs = raw
                .parse::<u32>()
                .map_err(|_| ParseError::InvalidNumber(raw.clone()))?;
            ControllerCommand::SetNumJobs(num_jobs)
        }
        "upload" => ControllerCommand::UploadCv(PathBuf::from(argument("upload")?)),
        "run" => ControllerCommand::RunStep(parse_step(&argument("run")?)?),
        "preview" => ControllerCommand::RefreshPreview(parse_step(&argument("preview")?)?),
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(Input::Command(command))
}

/// Accepts `3` as shorthand for `step3` at the prompt.
fn parse_step(raw: &str) -> Result<StepId, DomainError> {
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        format!("step{raw}").parse()
    } else {
        raw.parse()
    }
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
