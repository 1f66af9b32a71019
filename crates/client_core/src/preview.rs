//! Preview fetching and rendering of a completed step's result payload.

use std::fmt;

use serde_json::{Map, Value};
use shared::{
    domain::{ScoreTier, StepId},
    protocol::{display_value, PreviewPayload},
};
use tracing::{debug, warn};

use crate::{status::StepBoard, PipelineBackend};

const SUMMARY_FIELD: &str = "Resume_IA";
const SUMMARY_LABEL: &str = "Résumé IA";

#[derive(Debug, Clone, PartialEq)]
pub enum PreviewView {
    /// Server-side preview error, already prefixed for display.
    Failed(String),
    MatchCards(Vec<MatchCard>),
    Records(Vec<RecordView>),
    Text(String),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchCard {
    pub title: String,
    pub company: String,
    /// Score rounded to one decimal, `None` when the field is not numeric.
    pub score: Option<f64>,
    pub tier: ScoreTier,
    pub summary: String,
    pub link: String,
}

impl MatchCard {
    pub fn score_text(&self) -> String {
        match self.score {
            Some(score) => format!("{score:.1}%"),
            None => "N/A".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordView {
    pub fields: Vec<RecordField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordField {
    pub label: String,
    pub value: String,
    pub emphasized: bool,
}

/// Picks the rendering strategy from the step and the payload shape.
pub fn render_payload(step: StepId, payload: PreviewPayload) -> PreviewView {
    match payload {
        PreviewPayload::Error(message) => {
            PreviewView::Failed(format!("Erreur preview: {message}"))
        }
        PreviewPayload::Records(rows) if step.renders_match_cards() => {
            PreviewView::MatchCards(rows.iter().map(match_card).collect())
        }
        PreviewPayload::Records(rows) => {
            PreviewView::Records(rows.iter().map(record_view).collect())
        }
        PreviewPayload::Content(content) => PreviewView::Text(content),
        PreviewPayload::Empty => PreviewView::Empty,
    }
}

pub fn match_card(record: &Map<String, Value>) -> MatchCard {
    let score = record
        .get("match_score")
        .and_then(parse_score)
        .map(round_to_tenth);
    let summary = field_text(record, SUMMARY_FIELD);
    MatchCard {
        title: field_text(record, "Poste"),
        company: field_text(record, "Entreprise"),
        score,
        // Tier follows the displayed value so that "70.0%" is never shown as high.
        tier: score.map_or(ScoreTier::Low, ScoreTier::from_score),
        summary: if summary.is_empty() {
            "N/A".to_string()
        } else {
            summary
        },
        link: field_text(record, "Lien"),
    }
}

pub fn record_view(record: &Map<String, Value>) -> RecordView {
    let fields = record
        .iter()
        .map(|(key, value)| {
            let emphasized = key == SUMMARY_FIELD;
            RecordField {
                label: if emphasized {
                    SUMMARY_LABEL.to_string()
                } else {
                    key.clone()
                },
                value: display_value(value),
                emphasized,
            }
        })
        .collect();
    RecordView { fields }
}

fn field_text(record: &Map<String, Value>, key: &str) -> String {
    record.get(key).map(display_value).unwrap_or_default()
}

fn parse_score(value: &Value) -> Option<f64> {
    let score = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    score.filter(|score| score.is_finite())
}

fn round_to_tenth(score: f64) -> f64 {
    (score * 10.0).round() / 10.0
}

/// Fetches and renders the preview for `step` into the board.
///
/// Transport and decode failures are logged and leave the preview untouched;
/// they never reach the caller. Returns whether a new preview was applied.
pub async fn fetch_preview(
    backend: &dyn PipelineBackend,
    board: &mut StepBoard,
    step: StepId,
) -> bool {
    match backend.fetch_preview(step).await {
        Ok(payload) => {
            let view = render_payload(step, payload);
            debug!(%step, "applying preview");
            board.set_preview(step, view);
            true
        }
        Err(error) => {
            warn!(%step, %error, "preview fetch failed");
            false
        }
    }
}

impl fmt::Display for PreviewView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreviewView::Failed(message) => writeln!(f, "{message}"),
            PreviewView::MatchCards(cards) => {
                for card in cards {
                    writeln!(
                        f,
                        "[{} {}] {} | {}",
                        card.score_text(),
                        card.tier.css_class(),
                        card.title,
                        card.company
                    )?;
                    writeln!(f, "    IA Résumé: {}", card.summary)?;
                    writeln!(f, "    Voir l'offre -> {}", card.link)?;
                }
                Ok(())
            }
            PreviewView::Records(records) => {
                for record in records {
                    for field in &record.fields {
                        if field.emphasized {
                            writeln!(f, "  ** {}: {} **", field.label, field.value)?;
                        } else {
                            writeln!(f, "  {}: {}", field.label, field.value)?;
                        }
                    }
                    writeln!(f)?;
                }
                Ok(())
            }
            PreviewView::Text(content) => writeln!(f, "{content}"),
            PreviewView::Empty => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "tests/preview_tests.rs"]
mod tests;
