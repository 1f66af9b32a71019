//! Prints controller events to the terminal.

use client_core::ControllerEvent;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::warn;

/// Tracks the printed log window so each snapshot only prints what is new.
#[derive(Debug, Default)]
pub struct LogPrinter {
    printed: Vec<String>,
}

impl LogPrinter {
    /// Returns the lines to print for `snapshot`, and whether the server
    /// cleared or rewrote the log since the last print.
    pub fn update<'a>(&mut self, snapshot: &'a [String]) -> (bool, &'a [String]) {
        let extends = snapshot.len() >= self.printed.len()
            && snapshot[..self.printed.len()] == self.printed[..];
        let fresh = if extends {
            &snapshot[self.printed.len()..]
        } else {
            snapshot
        };
        self.printed = snapshot.to_vec();
        (!extends, fresh)
    }
}

pub fn format_event(event: &ControllerEvent, logs: &mut LogPrinter) -> Vec<String> {
    match event {
        ControllerEvent::LogsReplaced(lines) => {
            let (reset, fresh) = logs.update(lines);
            let mut out = Vec::with_capacity(fresh.len() + 1);
            if reset {
                out.push("-- logs --".to_string());
            }
            out.extend(fresh.iter().map(|line| format!("> {line}")));
            out
        }
        ControllerEvent::StatusChanged { step, status } => {
            vec![format!("[{step}] {}", status.label())]
        }
        ControllerEvent::PreviewUpdated { step, view } => {
            let mut out = vec![format!("[{step}] preview:")];
            out.extend(view.to_string().lines().map(|line| format!("  {line}")));
            out
        }
        ControllerEvent::Warning(message) => vec![format!("!! {message}")],
        ControllerEvent::Info(message) => vec![message.clone()],
    }
}

pub async fn print_events(mut events: broadcast::Receiver<ControllerEvent>) {
    let mut logs = LogPrinter::default();
    loop {
        match events.recv().await {
            Ok(event) => {
                for line in format_event(&event, &mut logs) {
                    println!("{line}");
                }
            }
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "terminal fell behind controller events"),
            Err(RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
