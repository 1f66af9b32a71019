use super::{parse_line, Input, ParseError};

use client_core::ControllerCommand;
use shared::domain::{InputMode, StepId};

fn command(line: &str) -> ControllerCommand {
    match parse_line(line).expect("parse") {
        Input::Command(command) => command,
        other => panic!("expected a command, got {other:?}"),
    }
}

#[test]
fn blank_and_help_lines() {
    assert!(matches!(parse_line("   "), Ok(Input::Blank)));
    assert!(matches!(parse_line("help"), Ok(Input::Help)));
    assert!(matches!(parse_line("?"), Ok(Input::Help)));
}

#[test]
fn run_accepts_number_or_step_name() {
    assert!(matches!(
        command("run 3"),
        ControllerCommand::RunStep(step) if step == StepId::CONVERT_CV
    ));
    assert!(matches!(
        command("RUN step5"),
        ControllerCommand::RunStep(step) if step == StepId::MATCH
    ));
    assert!(matches!(
        command("preview 6"),
        ControllerCommand::RefreshPreview(step) if step == StepId::CROSS_MATCH
    ));
}

#[test]
fn text_arguments_keep_inner_spaces() {
    assert!(matches!(
        command("keyword  rust engineer "),
        ControllerCommand::SetKeyword(ref keyword) if keyword == "rust engineer"
    ));
    assert!(matches!(
        command("text Senior dev, Paris"),
        ControllerCommand::SetRawText(ref text) if text == "Senior dev, Paris"
    ));
}

#[test]
fn mode_and_jobs() {
    assert!(matches!(
        command("mode url"),
        ControllerCommand::SwitchMode(InputMode::Url)
    ));
    assert!(matches!(command("jobs 10"), ControllerCommand::SetNumJobs(10)));
    assert!(matches!(command("quit"), ControllerCommand::Shutdown));
}

#[test]
fn reports_bad_input() {
    assert_eq!(
        parse_line("dance").unwrap_err(),
        ParseError::UnknownCommand("dance".to_string())
    );
    assert_eq!(
        parse_line("keyword").unwrap_err(),
        ParseError::MissingArgument("keyword")
    );
    assert_eq!(
        parse_line("jobs many").unwrap_err(),
        ParseError::InvalidNumber("many".to_string())
    );
    assert!(matches!(parse_line("run 9"), Err(ParseError::Domain(_))));
    assert!(matches!(parse_line("run +5"), Err(ParseError::Domain(_))));
    assert!(matches!(parse_line("mode fax"), Err(ParseError::Domain(_))));
}
