//! Cross-source record matching.
//!
//! Preparation records reach the engine from sources that only loosely
//! reference the interview they belong to. A record is tied to an interview
//! either by an exact job id or, failing that, by a free-text heuristic over
//! its description fields. Both strategies sit behind [`RecordMatcher`] so the
//! heuristic can be hardened without touching aggregation or counting.

use crate::types::records::{Interview, JobRecord};

/// What a record is matched against: the interview's job id and its lowercased
/// title/company needles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchTarget {
    pub job_id: Option<i64>,
    pub needles: Vec<String>,
}

impl MatchTarget {
    pub fn for_interview(interview: &Interview, job: Option<&JobRecord>) -> Self {
        let company = job.and_then(|job| job.company.as_deref());
        let needles = [Some(interview.title.as_str()), company]
            .into_iter()
            .flatten()
            .map(|value| value.trim().to_lowercase())
            .filter(|value| !value.is_empty())
            .collect();

        Self {
            job_id: interview.linked_job_id(),
            needles,
        }
    }
}

/// A preparation record reduced to what matchers look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub job_id: Option<i64>,
    pub haystack: String,
}

impl Candidate {
    pub fn new<'a>(job_id: Option<i64>, fields: impl IntoIterator<Item = &'a str>) -> Self {
        let haystack = fields
            .into_iter()
            .filter(|field| !field.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        Self { job_id, haystack }
    }
}

pub trait RecordMatcher: Send + Sync {
    fn name(&self) -> &'static str;
    fn matches(&self, target: &MatchTarget, candidate: &Candidate) -> bool;
}

/// Exact match on the numeric job id. Records or interviews without one never match.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByJobId;

impl RecordMatcher for ByJobId {
    fn name(&self) -> &'static str {
        "job_id"
    }

    fn matches(&self, target: &MatchTarget, candidate: &Candidate) -> bool {
        matches!((target.job_id, candidate.job_id), (Some(left), Some(right)) if left == right)
    }
}

/// Case-insensitive substring containment of the interview title or company.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByTextHeuristic;

impl RecordMatcher for ByTextHeuristic {
    fn name(&self) -> &'static str {
        "text_heuristic"
    }

    fn matches(&self, target: &MatchTarget, candidate: &Candidate) -> bool {
        if candidate.haystack.is_empty() {
            return false;
        }
        target
            .needles
            .iter()
            .any(|needle| !needle.is_empty() && candidate.haystack.contains(needle.as_str()))
    }
}

/// Preferred strategy first, fallback only when the caller's gate allows it.
pub struct MatchPolicy {
    primary: Box<dyn RecordMatcher>,
    fallback: Box<dyn RecordMatcher>,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self::new(Box::new(ByJobId), Box::new(ByTextHeuristic))
    }
}

impl std::fmt::Debug for MatchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchPolicy")
            .field("primary", &self.primary.name())
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

impl MatchPolicy {
    pub fn new(primary: Box<dyn RecordMatcher>, fallback: Box<dyn RecordMatcher>) -> Self {
        Self { primary, fallback }
    }

    pub fn matches(
        &self,
        target: &MatchTarget,
        candidate: &Candidate,
        fallback_allowed: bool,
    ) -> bool {
        self.primary.matches(target, candidate)
            || (fallback_allowed && self.fallback.matches(target, candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::records::{InterviewStatus, LinkedJobRef};

    fn interview(title: &str, linked: Option<LinkedJobRef>) -> Interview {
        Interview {
            id: "int-1".to_string(),
            title: title.to_string(),
            start: None,
            linked_job: linked,
            status: InterviewStatus::Scheduled,
        }
    }

    #[test]
    fn target_collects_title_and_company_needles() {
        let job = JobRecord {
            id: 7,
            title: "Platform Engineer".to_string(),
            company: Some("Acme Corp".to_string()),
        };
        let target = MatchTarget::for_interview(
            &interview("Onsite Loop", Some(LinkedJobRef::Text("7".to_string()))),
            Some(&job),
        );

        assert_eq!(target.job_id, Some(7));
        assert_eq!(target.needles, vec!["onsite loop", "acme corp"]);
    }

    #[test]
    fn blank_title_produces_no_needles() {
        let target = MatchTarget::for_interview(&interview("   ", None), None);
        assert!(target.needles.is_empty());
        assert!(!ByTextHeuristic.matches(&target, &Candidate::new(None, ["anything at all"])));
    }

    #[test]
    fn job_id_matcher_requires_both_sides() {
        let target = MatchTarget {
            job_id: Some(3),
            needles: vec![],
        };
        assert!(ByJobId.matches(&target, &Candidate::new(Some(3), [])));
        assert!(!ByJobId.matches(&target, &Candidate::new(Some(4), [])));
        assert!(!ByJobId.matches(&target, &Candidate::new(None, [])));
        assert!(!ByJobId.matches(&MatchTarget::default(), &Candidate::new(None, [])));
    }

    #[test]
    fn text_heuristic_is_case_insensitive_across_fields() {
        let target = MatchTarget {
            job_id: None,
            needles: vec!["acme corp".to_string()],
        };
        let candidate = Candidate::new(None, ["Mock round", "Notes about ACME Corp culture"]);
        assert!(ByTextHeuristic.matches(&target, &candidate));
    }

    #[test]
    fn policy_applies_fallback_only_when_gate_allows() {
        let policy = MatchPolicy::default();
        let target = MatchTarget {
            job_id: Some(1),
            needles: vec!["backend".to_string()],
        };
        let text_only = Candidate::new(Some(2), ["backend prep"]);

        assert!(policy.matches(&target, &text_only, true));
        assert!(!policy.matches(&target, &text_only, false));
        assert!(policy.matches(&target, &Candidate::new(Some(1), []), false));
    }
}
