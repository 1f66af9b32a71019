use super::*;

#[test]
fn parses_wire_step_names() {
    assert_eq!("step1".parse::<StepId>(), Ok(StepId::SCRAPE));
    assert_eq!("step6".parse::<StepId>(), Ok(StepId::CROSS_MATCH));
    assert_eq!(" step4 ".parse::<StepId>(), Ok(StepId::REWRITE_CV));
}

#[test]
fn wire_step_names_require_the_prefix() {
    assert!("5".parse::<StepId>().is_err());
    assert!("+5".parse::<StepId>().is_err());
    assert!("step+5".parse::<StepId>().is_err());
    assert!("step".parse::<StepId>().is_err());
    assert!("step300".parse::<StepId>().is_err());
}

#[test]
fn rejects_steps_outside_pipeline() {
    assert!("step0".parse::<StepId>().is_err());
    assert!("step7".parse::<StepId>().is_err());
    assert!("logs".parse::<StepId>().is_err());
    assert_eq!(
        StepId::new(9),
        Err(DomainError::InvalidStep("9".to_string()))
    );
}

#[test]
fn step_serializes_as_wire_name() {
    let json = serde_json::to_string(&StepId::MATCH).expect("serialize");
    assert_eq!(json, "\"step5\"");
    let parsed: StepId = serde_json::from_str("\"step2\"").expect("deserialize");
    assert_eq!(parsed, StepId::REWRITE_JOBS);
}

#[test]
fn only_matching_steps_render_match_cards() {
    let match_steps: Vec<u8> = StepId::all()
        .filter(|step| step.renders_match_cards())
        .map(StepId::number)
        .collect();
    assert_eq!(match_steps, vec![5, 6]);
    assert!(StepId::CONVERT_CV.requires_upload());
    assert!(!StepId::SCRAPE.requires_upload());
}

#[test]
fn score_tier_boundaries_are_exclusive() {
    assert_eq!(ScoreTier::from_score(71.0), ScoreTier::High);
    assert_eq!(ScoreTier::from_score(70.0), ScoreTier::Mid);
    assert_eq!(ScoreTier::from_score(50.1), ScoreTier::Mid);
    assert_eq!(ScoreTier::from_score(50.0), ScoreTier::Low);
    assert_eq!(ScoreTier::from_score(0.0), ScoreTier::Low);
}

#[test]
fn task_state_uses_uppercase_wire_names() {
    let state: TaskState = serde_json::from_str("\"COMPLETED\"").expect("deserialize");
    assert_eq!(state, TaskState::Completed);
    assert_eq!("error".parse::<TaskState>(), Ok(TaskState::Error));
    assert_eq!(TaskState::Running.to_string(), "RUNNING");
}

#[test]
fn input_mode_accepts_tab_names() {
    assert_eq!("url".parse::<InputMode>(), Ok(InputMode::Url));
    assert_eq!("raw_text".parse::<InputMode>(), Ok(InputMode::RawText));
    assert!("pdf".parse::<InputMode>().is_err());
}
