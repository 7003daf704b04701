use super::ReadinessSource;
use crate::refresh::Invalidation;
use crate::types::records::{
    ChecklistItem, Interview, JobRecord, PracticeAttempt, PreparationActivity,
};
use moka::sync::Cache;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// One entry per shared source, keyed by the unit type.
fn source_cache<V>(staleness: Duration) -> Cache<(), V>
where
    V: Clone + Send + Sync + 'static,
{
    Cache::builder()
        .max_capacity(1)
        .time_to_live(staleness)
        .build()
}

/// Caches the shared directory sources for a staleness window.
///
/// Attempts and checklists are local reads and always go to the inner source.
pub struct CachedSource<S> {
    inner: S,
    staleness: Duration,
    interviews: Cache<(), Vec<Interview>>,
    jobs: Cache<(), HashMap<i64, JobRecord>>,
    activities: Cache<(), Vec<PreparationActivity>>,
}

impl<S: ReadinessSource> CachedSource<S> {
    pub fn new(inner: S, staleness: Duration) -> Self {
        Self {
            inner,
            staleness,
            interviews: source_cache(staleness),
            jobs: source_cache(staleness),
            activities: source_cache(staleness),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn invalidate(&self, signal: &Invalidation) {
        match signal {
            Invalidation::Interviews => self.interviews.invalidate(&()),
            Invalidation::Jobs => self.jobs.invalidate(&()),
            Invalidation::Activities => self.activities.invalidate(&()),
            Invalidation::Attempts | Invalidation::Checklist(_) => return,
            Invalidation::All => {
                self.interviews.invalidate_all();
                self.jobs.invalidate_all();
                self.activities.invalidate_all();
            }
        }
        debug!(?signal, "source cache invalidated");
    }

    fn cached<V>(&self, cache: &Cache<(), V>, name: &'static str, fetch: impl FnOnce() -> V) -> V
    where
        V: Clone + Send + Sync + 'static,
    {
        if self.staleness.is_zero() {
            return fetch();
        }
        cache.get_with((), || {
            debug!(source = name, "cache miss, fetching");
            fetch()
        })
    }
}

impl<S: ReadinessSource> ReadinessSource for CachedSource<S> {
    fn list_scheduled_interviews(&self) -> Vec<Interview> {
        self.cached(&self.interviews, "interviews", || {
            self.inner.list_scheduled_interviews()
        })
    }

    fn list_jobs(&self) -> HashMap<i64, JobRecord> {
        self.cached(&self.jobs, "jobs", || self.inner.list_jobs())
    }

    fn list_preparation_activities(&self) -> Vec<PreparationActivity> {
        self.cached(&self.activities, "activities", || {
            self.inner.list_preparation_activities()
        })
    }

    fn read_checklist(&self, interview_id: &str) -> Option<Vec<ChecklistItem>> {
        self.inner.read_checklist(interview_id)
    }

    fn read_local_practice_attempts(&self) -> Vec<PracticeAttempt> {
        self.inner.read_local_practice_attempts()
    }
}
