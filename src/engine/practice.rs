use super::matcher::{Candidate, MatchPolicy, MatchTarget};
use crate::types::records::{PracticeAttempt, PreparationActivity};
use chrono::{DateTime, Duration, Utc};

const MOCK_TYPE_MARKERS: [&str; 3] = ["interview", "mock", "mock_interview"];

pub(crate) fn is_mock_flagged(label: &str) -> bool {
    let label = label.to_lowercase();
    MOCK_TYPE_MARKERS.iter().any(|marker| label.contains(marker))
}

pub(crate) fn activity_candidate(activity: &PreparationActivity) -> Candidate {
    Candidate::new(
        activity.job_id,
        [activity.description.as_str(), activity.notes.as_str()],
    )
}

pub(crate) fn attempt_candidate(attempt: &PracticeAttempt) -> Candidate {
    Candidate::new(
        attempt.job_id,
        [
            attempt.text.as_str(),
            attempt.question.as_str(),
            attempt.origin.as_str(),
            attempt.code.as_str(),
        ],
    )
}

pub fn window_cutoff(now: DateTime<Utc>, window_days: u32) -> DateTime<Utc> {
    now - Duration::days(i64::from(window_days))
}

fn within_window(activity: &PreparationActivity, cutoff: DateTime<Utc>) -> bool {
    activity.activity_date.map_or(true, |date| date >= cutoff)
}

/// Minutes of matching preparation inside the trailing window, across both sources.
///
/// Activities fall back to text matching only when their type is mock/interview
/// flagged; attempts always may. The same session logged in both sources is
/// counted twice.
pub fn practice_minutes(
    target: &MatchTarget,
    activities: &[PreparationActivity],
    attempts: &[PracticeAttempt],
    now: DateTime<Utc>,
    window_days: u32,
    policy: &MatchPolicy,
) -> u32 {
    let cutoff = window_cutoff(now, window_days);

    let activity_minutes: f64 = activities
        .iter()
        .filter(|activity| within_window(activity, cutoff))
        .filter(|activity| {
            policy.matches(
                target,
                &activity_candidate(activity),
                is_mock_flagged(&activity.activity_type),
            )
        })
        .map(|activity| activity.time_spent_minutes)
        .filter(|minutes| minutes.is_finite())
        .sum();

    let attempt_minutes: f64 = attempts
        .iter()
        .filter(|attempt| policy.matches(target, &attempt_candidate(attempt), true))
        .map(|attempt| attempt.elapsed_ms / 60_000.0)
        .filter(|minutes| minutes.is_finite())
        .sum();

    let total = (activity_minutes + attempt_minutes).round();
    if total <= 0.0 {
        0
    } else {
        total.min(f64::from(u32::MAX)) as u32
    }
}
