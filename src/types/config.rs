use crate::error::ReadinessError;
use crate::types::scoring::ScoringWeights;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadinessConfig {
    pub scoring: Option<ScoringConfig>,
    pub sources: Option<SourcesConfig>,
    pub cache: Option<CacheConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    pub historical_offer_rate: Option<f64>,
    pub window_days: Option<u32>,
    pub practice_ceiling_minutes: Option<u32>,
    pub mock_decay: Option<f64>,
    pub weights: Option<HashMap<String, f64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    pub interviews: Option<String>,
    pub jobs: Option<String>,
    pub activities: Option<String>,
    pub attempts: Option<String>,
    pub checklists: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub staleness_secs: Option<u64>,
}

/// Resolved scoring parameters with every default filled in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringParams {
    pub historical_offer_rate: f64,
    pub window_days: u32,
    pub practice_ceiling_minutes: u32,
    pub mock_decay: f64,
    pub weights: ScoringWeights,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            historical_offer_rate: 0.03,
            window_days: 90,
            practice_ceiling_minutes: 300,
            mock_decay: 0.7,
            weights: ScoringWeights::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub interviews: String,
    pub jobs: String,
    pub activities: String,
    pub attempts: String,
    pub checklists: String,
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self {
            interviews: "interviews.json".to_string(),
            jobs: "jobs.json".to_string(),
            activities: "activities.json".to_string(),
            attempts: "attempts.json".to_string(),
            checklists: "checklists".to_string(),
        }
    }
}

pub const DEFAULT_STALENESS_SECS: u64 = 3600;

const ALLOWED_WEIGHT_KEYS: [&str; 5] = ["role_match", "research", "practice", "mock", "history"];

impl ReadinessConfig {
    pub fn weights(&self) -> ScoringWeights {
        let defaults = ScoringWeights::default();
        match self
            .scoring
            .as_ref()
            .and_then(|scoring| scoring.weights.as_ref())
        {
            Some(weights) => ScoringWeights {
                role_match: *weights.get("role_match").unwrap_or(&defaults.role_match),
                research: *weights.get("research").unwrap_or(&defaults.research),
                practice: *weights.get("practice").unwrap_or(&defaults.practice),
                mock: *weights.get("mock").unwrap_or(&defaults.mock),
                history: *weights.get("history").unwrap_or(&defaults.history),
            },
            None => defaults,
        }
    }

    pub fn scoring_params(&self) -> ScoringParams {
        let defaults = ScoringParams::default();
        let weights = self.weights();
        match &self.scoring {
            Some(scoring) => ScoringParams {
                historical_offer_rate: scoring
                    .historical_offer_rate
                    .unwrap_or(defaults.historical_offer_rate),
                window_days: scoring.window_days.unwrap_or(defaults.window_days),
                practice_ceiling_minutes: scoring
                    .practice_ceiling_minutes
                    .unwrap_or(defaults.practice_ceiling_minutes),
                mock_decay: scoring.mock_decay.unwrap_or(defaults.mock_decay),
                weights,
            },
            None => defaults,
        }
    }

    pub fn source_paths(&self) -> SourcePaths {
        let defaults = SourcePaths::default();
        match &self.sources {
            Some(sources) => SourcePaths {
                interviews: sources.interviews.clone().unwrap_or(defaults.interviews),
                jobs: sources.jobs.clone().unwrap_or(defaults.jobs),
                activities: sources.activities.clone().unwrap_or(defaults.activities),
                attempts: sources.attempts.clone().unwrap_or(defaults.attempts),
                checklists: sources.checklists.clone().unwrap_or(defaults.checklists),
            },
            None => defaults,
        }
    }

    pub fn staleness_secs(&self) -> u64 {
        self.cache
            .as_ref()
            .and_then(|cache| cache.staleness_secs)
            .unwrap_or(DEFAULT_STALENESS_SECS)
    }

    pub fn validate(&self) -> Result<(), ReadinessError> {
        if let Some(weights) = self
            .scoring
            .as_ref()
            .and_then(|scoring| scoring.weights.as_ref())
        {
            let mut unknown = weights
                .keys()
                .filter(|key| !ALLOWED_WEIGHT_KEYS.contains(&key.as_str()))
                .cloned()
                .collect::<Vec<_>>();
            if !unknown.is_empty() {
                unknown.sort();
                return Err(ReadinessError::ConfigParse(format!(
                    "scoring.weights contains unknown key(s): {}",
                    unknown.join(", ")
                )));
            }
        }

        let weights = self.weights();
        if weights
            .as_array()
            .iter()
            .any(|weight| !(0.0..=1.0).contains(weight))
        {
            return Err(ReadinessError::ConfigParse(
                "scoring.weights values must be between 0.0 and 1.0".to_string(),
            ));
        }
        let weight_sum = weights.sum();
        if (weight_sum - 1.0).abs() > 0.001 {
            return Err(ReadinessError::ConfigParse(format!(
                "scoring.weights must sum to 1.0 (found {:.3})",
                weight_sum
            )));
        }

        let params = self.scoring_params();
        if !(0.0..=1.0).contains(&params.historical_offer_rate) {
            return Err(ReadinessError::ConfigParse(
                "scoring.historical_offer_rate must be between 0.0 and 1.0".to_string(),
            ));
        }
        if params.window_days == 0 {
            return Err(ReadinessError::ConfigParse(
                "scoring.window_days must be greater than 0".to_string(),
            ));
        }
        if params.practice_ceiling_minutes == 0 {
            return Err(ReadinessError::ConfigParse(
                "scoring.practice_ceiling_minutes must be greater than 0".to_string(),
            ));
        }
        if !(params.mock_decay > 0.0 && params.mock_decay < 1.0) {
            return Err(ReadinessError::ConfigParse(
                "scoring.mock_decay must be strictly between 0.0 and 1.0".to_string(),
            ));
        }

        let paths = self.source_paths();
        for (key, value) in [
            ("interviews", &paths.interviews),
            ("jobs", &paths.jobs),
            ("activities", &paths.activities),
            ("attempts", &paths.attempts),
            ("checklists", &paths.checklists),
        ] {
            if value.trim().is_empty() {
                return Err(ReadinessError::ConfigParse(format!(
                    "sources.{key} must be a non-empty path"
                )));
            }
        }

        if self.staleness_secs() == 0 {
            return Err(ReadinessError::ConfigParse(
                "cache.staleness_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
