use super::{format_event, LogPrinter};

use client_core::{ControllerEvent, PreviewView};
use shared::domain::{StepId, StepStatus};

fn lines(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|line| line.to_string()).collect()
}

#[test]
fn log_snapshots_print_only_new_lines() {
    let mut printer = LogPrinter::default();

    let first = format_event(
        &ControllerEvent::LogsReplaced(lines(&["a", "b"])),
        &mut printer,
    );
    assert_eq!(first, vec!["> a", "> b"]);

    let second = format_event(
        &ControllerEvent::LogsReplaced(lines(&["a", "b", "c"])),
        &mut printer,
    );
    assert_eq!(second, vec!["> c"]);

    let unchanged = format_event(
        &ControllerEvent::LogsReplaced(lines(&["a", "b", "c"])),
        &mut printer,
    );
    assert!(unchanged.is_empty());
}

#[test]
fn rewritten_log_prints_a_reset_marker() {
    let mut printer = LogPrinter::default();
    format_event(
        &ControllerEvent::LogsReplaced(lines(&["a", "b"])),
        &mut printer,
    );

    let out = format_event(&ControllerEvent::LogsReplaced(lines(&["x"])), &mut printer);
    assert_eq!(out, vec!["-- logs --", "> x"]);

    let cleared = format_event(&ControllerEvent::LogsReplaced(Vec::new()), &mut printer);
    assert_eq!(cleared, vec!["-- logs --"]);
}

#[test]
fn status_preview_and_warnings() {
    let mut printer = LogPrinter::default();

    assert_eq!(
        format_event(
            &ControllerEvent::StatusChanged {
                step: StepId::SCRAPE,
                status: StepStatus::Completed,
            },
            &mut printer,
        ),
        vec!["[step1] Terminé"]
    );

    assert_eq!(
        format_event(
            &ControllerEvent::PreviewUpdated {
                step: StepId::REWRITE_JOBS,
                view: PreviewView::Text("line one\nline two".to_string()),
            },
            &mut printer,
        ),
        vec!["[step2] preview:", "  line one", "  line two"]
    );

    assert_eq!(
        format_event(
            &ControllerEvent::Warning("Veuillez sélectionner un fichier PDF d'abord.".into()),
            &mut printer,
        ),
        vec!["!! Veuillez sélectionner un fichier PDF d'abord."]
    );
}
