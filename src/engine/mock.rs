use super::matcher::{MatchPolicy, MatchTarget};
use super::practice::{activity_candidate, attempt_candidate, is_mock_flagged};
use crate::types::records::{PracticeAttempt, PreparationActivity};
use crate::types::scoring::Score;

/// Mock/interview-flagged records from either source that belong to the interview.
pub fn count_mock_sessions(
    target: &MatchTarget,
    activities: &[PreparationActivity],
    attempts: &[PracticeAttempt],
    policy: &MatchPolicy,
) -> u32 {
    let from_activities = activities
        .iter()
        .filter(|activity| is_mock_flagged(&activity.activity_type))
        .filter(|activity| policy.matches(target, &activity_candidate(activity), true))
        .count();
    let from_attempts = attempts
        .iter()
        .filter(|attempt| is_mock_flagged(&attempt.origin))
        .filter(|attempt| policy.matches(target, &attempt_candidate(attempt), true))
        .count();

    u32::try_from(from_activities + from_attempts).unwrap_or(u32::MAX)
}

/// Unrounded diminishing-returns curve `(1 - decay^n) * 100`.
pub fn mock_curve(count: u32, decay: f64) -> f64 {
    let exponent = i32::try_from(count).unwrap_or(i32::MAX);
    (1.0 - decay.powi(exponent)) * 100.0
}

pub fn mock_boost(count: u32, decay: f64) -> Score {
    mock_curve(count, decay).round().clamp(0.0, 100.0) as Score
}
