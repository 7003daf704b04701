use crate::types::scoring::InterviewScore;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ReadinessReport {
    pub generated_at: DateTime<Utc>,
    pub historical_offer_rate: f64,
    pub interviews: Vec<InterviewScore>,
}

impl ReadinessReport {
    pub fn new(
        generated_at: DateTime<Utc>,
        historical_offer_rate: f64,
        mut interviews: Vec<InterviewScore>,
    ) -> Self {
        // Undated interviews go last.
        interviews.sort_by(|left, right| {
            left.start
                .is_none()
                .cmp(&right.start.is_none())
                .then_with(|| left.start.cmp(&right.start))
                .then_with(|| left.interview_id.cmp(&right.interview_id))
        });
        Self {
            generated_at,
            historical_offer_rate,
            interviews,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::scoring::{ScoreResult, Signals};
    use chrono::TimeZone;

    fn scored(id: &str, start: Option<DateTime<Utc>>) -> InterviewScore {
        InterviewScore {
            interview_id: id.to_string(),
            title: id.to_string(),
            start,
            signals: Signals::default(),
            result: ScoreResult {
                raw_probability: 4,
                confidence: 40,
                role_match: 0,
                practice_minutes: 0,
                actions: Vec::new(),
            },
        }
    }

    #[test]
    fn interviews_sort_by_start_with_undated_last() {
        let day = |d: u32| Utc.with_ymd_and_hms(2026, 6, d, 9, 0, 0).single();
        let report = ReadinessReport::new(
            Utc::now(),
            0.03,
            vec![
                scored("undated", None),
                scored("later", day(9)),
                scored("b-sooner", day(2)),
                scored("a-sooner", day(2)),
            ],
        );

        let order: Vec<&str> = report
            .interviews
            .iter()
            .map(|score| score.interview_id.as_str())
            .collect();
        assert_eq!(order, vec!["a-sooner", "b-sooner", "later", "undated"]);
    }
}
