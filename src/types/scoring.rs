use chrono::{DateTime, Utc};
use serde::Serialize;

pub type Score = u8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringWeights {
    pub role_match: f64,
    pub research: f64,
    pub practice: f64,
    pub mock: f64,
    pub history: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            role_match: 0.30,
            research: 0.18,
            practice: 0.22,
            mock: 0.18,
            history: 0.12,
        }
    }
}

impl ScoringWeights {
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.role_match,
            self.research,
            self.practice,
            self.mock,
            self.history,
        ]
    }

    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }
}

/// The four per-interview signals fed into the composite scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Signals {
    pub role_match: Score,
    pub research_done: bool,
    pub practice_minutes: u32,
    pub mock_count: u32,
    pub mock_boost: Score,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreResult {
    pub raw_probability: Score,
    pub confidence: Score,
    pub role_match: Score,
    pub practice_minutes: u32,
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterviewScore {
    pub interview_id: String,
    pub title: String,
    pub start: Option<DateTime<Utc>>,
    pub signals: Signals,
    pub result: ScoreResult,
}
