pub mod composite;
pub mod matcher;
pub mod mock;
pub mod practice;
pub mod research;
pub mod role_match;

use crate::sources::{ReadinessSource, SourceSnapshot};
use crate::types::config::ScoringParams;
use crate::types::records::{
    ChecklistItem, Interview, JobRecord, PracticeAttempt, PreparationActivity,
};
use crate::types::report::ReadinessReport;
use crate::types::scoring::{InterviewScore, ScoreResult, Signals};
use chrono::{DateTime, Utc};
use matcher::{MatchPolicy, MatchTarget};
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{debug, info};

#[derive(Debug, Default)]
pub struct ReadinessEngine {
    params: ScoringParams,
    policy: MatchPolicy,
}

impl ReadinessEngine {
    pub fn new(params: ScoringParams) -> Self {
        Self::with_policy(params, MatchPolicy::default())
    }

    pub fn with_policy(params: ScoringParams, policy: MatchPolicy) -> Self {
        Self { params, policy }
    }

    pub fn signals(
        &self,
        interview: &Interview,
        jobs: &HashMap<i64, JobRecord>,
        activities: &[PreparationActivity],
        attempts: &[PracticeAttempt],
        checklist: Option<&[ChecklistItem]>,
        now: DateTime<Utc>,
    ) -> Signals {
        let job = interview.linked_job_id().and_then(|id| jobs.get(&id));
        let target = MatchTarget::for_interview(interview, job);

        let role_match = role_match::role_match(
            &interview.title,
            &role_match::linked_title(interview, jobs),
        );
        let research_done = research::research_done(checklist);
        let practice_minutes = practice::practice_minutes(
            &target,
            activities,
            attempts,
            now,
            self.params.window_days,
            &self.policy,
        );
        let mock_count = mock::count_mock_sessions(&target, activities, attempts, &self.policy);
        let mock_boost = mock::mock_boost(mock_count, self.params.mock_decay);

        debug!(
            interview = %interview.id,
            role_match,
            research_done,
            practice_minutes,
            mock_count,
            mock_boost,
            "collected readiness signals"
        );

        Signals {
            role_match,
            research_done,
            practice_minutes,
            mock_count,
            mock_boost,
        }
    }

    pub fn compute_readiness(
        &self,
        interview: &Interview,
        jobs: &HashMap<i64, JobRecord>,
        activities: &[PreparationActivity],
        attempts: &[PracticeAttempt],
        checklist: Option<&[ChecklistItem]>,
        now: DateTime<Utc>,
    ) -> ScoreResult {
        let signals = self.signals(interview, jobs, activities, attempts, checklist, now);
        composite::score(&signals, &self.params)
    }

    pub fn score_interview(
        &self,
        interview: &Interview,
        snapshot: &SourceSnapshot,
        checklist: Option<&[ChecklistItem]>,
        now: DateTime<Utc>,
    ) -> InterviewScore {
        let signals = self.signals(
            interview,
            &snapshot.jobs,
            &snapshot.activities,
            &snapshot.attempts,
            checklist,
            now,
        );
        InterviewScore {
            interview_id: interview.id.clone(),
            title: interview.title.clone(),
            start: interview.start,
            signals,
            result: composite::score(&signals, &self.params),
        }
    }

    /// Scores every scheduled interview against one snapshot of the shared sources.
    pub fn score_all(&self, source: &dyn ReadinessSource, now: DateTime<Utc>) -> ReadinessReport {
        let snapshot = SourceSnapshot::capture(source);
        let scores: Vec<InterviewScore> = snapshot
            .interviews
            .par_iter()
            .map(|interview| {
                let checklist = source.read_checklist(&interview.id);
                self.score_interview(interview, &snapshot, checklist.as_deref(), now)
            })
            .collect();

        info!(
            interviews = scores.len(),
            jobs = snapshot.jobs.len(),
            activities = snapshot.activities.len(),
            attempts = snapshot.attempts.len(),
            "scoring pass complete"
        );
        ReadinessReport::new(now, self.params.historical_offer_rate, scores)
    }
}

/// Scores one interview with the default matching strategies.
pub fn compute_readiness(
    interview: &Interview,
    jobs: &HashMap<i64, JobRecord>,
    activities: &[PreparationActivity],
    attempts: &[PracticeAttempt],
    checklist: Option<&[ChecklistItem]>,
    now: DateTime<Utc>,
    params: &ScoringParams,
) -> ScoreResult {
    ReadinessEngine::new(*params)
        .compute_readiness(interview, jobs, activities, attempts, checklist, now)
}
