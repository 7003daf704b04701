pub mod cache;
pub mod files;
pub mod filesystem;
pub mod fingerprint;

use crate::types::records::{
    ChecklistItem, Interview, JobRecord, PracticeAttempt, PreparationActivity,
};
use std::collections::HashMap;

/// Read contracts the engine depends on.
///
/// Implementations absorb their own failures: a source that cannot be read
/// returns an empty collection (or `None` for checklists) and logs why.
pub trait ReadinessSource: Send + Sync {
    fn list_scheduled_interviews(&self) -> Vec<Interview>;
    fn list_jobs(&self) -> HashMap<i64, JobRecord>;
    fn list_preparation_activities(&self) -> Vec<PreparationActivity>;
    fn read_checklist(&self, interview_id: &str) -> Option<Vec<ChecklistItem>>;
    fn read_local_practice_attempts(&self) -> Vec<PracticeAttempt>;
}

/// Read-only view of every shared source, taken once per scoring pass.
#[derive(Debug, Clone, Default)]
pub struct SourceSnapshot {
    pub interviews: Vec<Interview>,
    pub jobs: HashMap<i64, JobRecord>,
    pub activities: Vec<PreparationActivity>,
    pub attempts: Vec<PracticeAttempt>,
}

impl SourceSnapshot {
    pub fn capture(source: &dyn ReadinessSource) -> Self {
        Self {
            interviews: source.list_scheduled_interviews(),
            jobs: source.list_jobs(),
            activities: source.list_preparation_activities(),
            attempts: source.read_local_practice_attempts(),
        }
    }
}
