use crate::types::records::{Interview, JobRecord};
use crate::types::scoring::Score;
use std::collections::{BTreeSet, HashMap};

fn tokens(input: &str) -> BTreeSet<String> {
    input
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Shared tokens over the larger token set, as a 0-100 score.
pub fn role_match(left: &str, right: &str) -> Score {
    let left = tokens(left);
    let right = tokens(right);
    let denominator = left.len().max(right.len());
    if left.is_empty() || right.is_empty() || denominator == 0 {
        return 0;
    }

    let shared = left.intersection(&right).count();
    let score = (100.0 * shared as f64 / denominator as f64).round();
    score.clamp(0.0, 100.0) as Score
}

/// Title the interview is compared against: the directory title when the link
/// resolves, otherwise whatever text the link holds.
pub fn linked_title(interview: &Interview, jobs: &HashMap<i64, JobRecord>) -> String {
    let Some(linked) = interview.linked_job.as_ref() else {
        return String::new();
    };
    linked
        .job_id()
        .and_then(|id| jobs.get(&id))
        .map(|job| job.title.clone())
        .unwrap_or_else(|| linked.raw_text())
}
