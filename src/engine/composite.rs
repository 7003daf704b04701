use crate::types::config::ScoringParams;
use crate::types::scoring::{Score, ScoreResult, Signals};

pub const ACTION_ALIGN_RESUME: &str =
    "Tailor your resume and talking points to the role's keywords.";
pub const ACTION_RESEARCH_COMPANY: &str =
    "Research the company: mission, products, recent news and interviewers.";
pub const ACTION_PRACTICE_MOCK: &str = "Schedule a mock interview or a timed practice session.";
pub const ACTION_WELL_PREPARED: &str = "Well prepared. Focus on delivery, pacing and rest.";

const ROLE_MATCH_ACTION_BELOW: Score = 50;
const PRACTICE_ACTION_BELOW_MINUTES: u32 = 60;
const ROLE_MATCH_PRESENT_ABOVE: Score = 40;

fn to_score(value: f64) -> Score {
    value.round().clamp(0.0, 100.0) as Score
}

pub fn practice_score(practice_minutes: u32, ceiling_minutes: u32) -> Score {
    if ceiling_minutes == 0 {
        return if practice_minutes > 0 { 100 } else { 0 };
    }
    to_score(f64::from(practice_minutes) / f64::from(ceiling_minutes) * 100.0)
}

pub fn history_factor(historical_offer_rate: f64) -> Score {
    if !historical_offer_rate.is_finite() {
        return 0;
    }
    to_score(historical_offer_rate * 1000.0)
}

/// How many of role match, research and practice are non-trivially present (0-3).
pub fn completeness(signals: &Signals) -> u8 {
    [
        signals.role_match > ROLE_MATCH_PRESENT_ABOVE,
        signals.research_done,
        signals.practice_minutes > 0,
    ]
    .into_iter()
    .filter(|present| *present)
    .count() as u8
}

pub fn confidence(signals: &Signals) -> Score {
    (40 + 20 * completeness(signals)).min(100)
}

pub fn actions(signals: &Signals) -> Vec<String> {
    let mut actions = Vec::new();
    if signals.role_match < ROLE_MATCH_ACTION_BELOW {
        actions.push(ACTION_ALIGN_RESUME.to_string());
    }
    if !signals.research_done {
        actions.push(ACTION_RESEARCH_COMPANY.to_string());
    }
    if signals.practice_minutes < PRACTICE_ACTION_BELOW_MINUTES {
        actions.push(ACTION_PRACTICE_MOCK.to_string());
    }
    if actions.is_empty() {
        actions.push(ACTION_WELL_PREPARED.to_string());
    }
    actions
}

pub fn score(signals: &Signals, params: &ScoringParams) -> ScoreResult {
    let weights = &params.weights;
    let research = if signals.research_done { 100.0 } else { 0.0 };
    let practice = f64::from(practice_score(
        signals.practice_minutes,
        params.practice_ceiling_minutes,
    ));
    let history = f64::from(history_factor(params.historical_offer_rate));

    let weighted = weights.role_match * f64::from(signals.role_match.min(100))
        + weights.research * research
        + weights.practice * practice
        + weights.mock * f64::from(signals.mock_boost.min(100))
        + weights.history * history;

    ScoreResult {
        raw_probability: to_score(weighted),
        confidence: confidence(signals),
        role_match: signals.role_match.min(100),
        practice_minutes: signals.practice_minutes,
        actions: actions(signals),
    }
}
