use super::filesystem::{file_exists, read_to_string_if_exists};
use super::ReadinessSource;
use crate::types::config::SourcePaths;
use crate::types::records::{
    null_as_default, ChecklistItem, Interview, InterviewStatus, JobRecord, LinkedJobRef,
    PracticeAttempt, PreparationActivity,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS` (read as UTC) or a bare `YYYY-MM-DD`.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S") {
        return Some(parsed.and_utc());
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            Self::Number(id) => id.to_string(),
            Self::Text(text) => text,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawInterview {
    id: RawId,
    #[serde(default, deserialize_with = "null_as_default")]
    title: String,
    #[serde(default, alias = "startsAt", alias = "start_time")]
    start: Option<String>,
    #[serde(default, alias = "linkedJobRef", alias = "job")]
    linked_job: Option<LinkedJobRef>,
    #[serde(default)]
    status: Option<InterviewStatus>,
}

#[derive(Debug, Deserialize)]
struct RawJob {
    id: LinkedJobRef,
    #[serde(default, deserialize_with = "null_as_default")]
    title: String,
    #[serde(default)]
    company: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawActivity {
    #[serde(default, alias = "jobId")]
    job_id: Option<LinkedJobRef>,
    #[serde(default, alias = "activityType", deserialize_with = "null_as_default")]
    activity_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    notes: String,
    #[serde(default, alias = "timeSpentMinutes")]
    time_spent_minutes: Option<f64>,
    #[serde(default, alias = "activityDate")]
    activity_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAttempt {
    #[serde(default, alias = "jobId")]
    job_id: Option<LinkedJobRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    question: String,
    #[serde(default, deserialize_with = "null_as_default")]
    origin: String,
    #[serde(default, deserialize_with = "null_as_default")]
    code: String,
    #[serde(default, alias = "elapsedMs")]
    elapsed_ms: Option<f64>,
}

/// Records parsed from one file plus what had to be dropped on the way.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub skipped: usize,
    pub missing: bool,
    pub error: Option<String>,
}

impl<T> Loaded<T> {
    fn empty() -> Self {
        Self {
            records: Vec::new(),
            skipped: 0,
            missing: false,
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::empty()
        }
    }

    fn missing() -> Self {
        Self {
            missing: true,
            ..Self::empty()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceStats {
    pub name: &'static str,
    pub path: String,
    pub loaded: usize,
    pub skipped: usize,
    pub missing: bool,
    pub error: Option<String>,
}

impl SourceStats {
    fn from_loaded<T>(name: &'static str, path: &Path, loaded: &Loaded<T>) -> Self {
        Self {
            name,
            path: path.display().to_string(),
            loaded: loaded.records.len(),
            skipped: loaded.skipped,
            missing: loaded.missing,
            error: loaded.error.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceHealth {
    pub sources: Vec<SourceStats>,
    pub scheduled_interviews: usize,
    pub checklists_found: usize,
}

/// JSON files in a data directory, one file per read contract.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
    paths: SourcePaths,
}

impl FileSource {
    pub fn new(root: &Path, paths: SourcePaths) -> Self {
        Self {
            root: root.to_path_buf(),
            paths,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn paths(&self) -> &SourcePaths {
        &self.paths
    }

    fn path_of(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn checklist_path(&self, interview_id: &str) -> Option<PathBuf> {
        let id = interview_id.trim();
        if id.is_empty() || id.contains("..") || id.contains('/') || id.contains('\\') {
            return None;
        }
        Some(self.path_of(&self.paths.checklists).join(format!("{id}.json")))
    }

    pub fn load_interviews(&self) -> Loaded<Interview> {
        read_records(&self.path_of(&self.paths.interviews), |raw: RawInterview| {
            let start = raw.start.as_deref().and_then(parse_timestamp);
            let linked_job = raw.linked_job.filter(|linked| match linked {
                LinkedJobRef::Text(text) => !text.trim().is_empty(),
                LinkedJobRef::Id(_) => true,
            });
            Some(Interview {
                id: raw.id.into_string(),
                title: raw.title,
                start,
                linked_job,
                status: raw.status.unwrap_or(InterviewStatus::Scheduled),
            })
        })
    }

    pub fn load_jobs(&self) -> Loaded<JobRecord> {
        read_records(&self.path_of(&self.paths.jobs), |raw: RawJob| {
            raw.id.job_id().map(|id| JobRecord {
                id,
                title: raw.title,
                company: raw.company.filter(|company| !company.trim().is_empty()),
            })
        })
    }

    pub fn load_activities(&self) -> Loaded<PreparationActivity> {
        read_records(&self.path_of(&self.paths.activities), |raw: RawActivity| {
            let activity_date = match raw.activity_date.as_deref().map(str::trim) {
                None | Some("") => None,
                Some(text) => Some(parse_timestamp(text)?),
            };
            Some(PreparationActivity {
                job_id: raw.job_id.as_ref().and_then(LinkedJobRef::job_id),
                activity_type: raw.activity_type,
                description: raw.description,
                notes: raw.notes,
                time_spent_minutes: raw.time_spent_minutes.unwrap_or(0.0),
                activity_date,
            })
        })
    }

    pub fn load_attempts(&self) -> Loaded<PracticeAttempt> {
        read_records(&self.path_of(&self.paths.attempts), |raw: RawAttempt| {
            Some(PracticeAttempt {
                job_id: raw.job_id.as_ref().and_then(LinkedJobRef::job_id),
                text: raw.text,
                question: raw.question,
                origin: raw.origin,
                code: raw.code,
                elapsed_ms: raw.elapsed_ms.unwrap_or(0.0),
            })
        })
    }

    pub fn health(&self) -> SourceHealth {
        let interviews = self.load_interviews();
        let jobs = self.load_jobs();
        let activities = self.load_activities();
        let attempts = self.load_attempts();

        let scheduled_interviews = interviews
            .records
            .iter()
            .filter(|interview| interview.status == InterviewStatus::Scheduled)
            .count();
        let checklists_found = interviews
            .records
            .iter()
            .filter_map(|interview| self.checklist_path(&interview.id))
            .filter(|path| file_exists(path))
            .count();

        SourceHealth {
            sources: vec![
                SourceStats::from_loaded(
                    "interviews",
                    &self.path_of(&self.paths.interviews),
                    &interviews,
                ),
                SourceStats::from_loaded("jobs", &self.path_of(&self.paths.jobs), &jobs),
                SourceStats::from_loaded(
                    "activities",
                    &self.path_of(&self.paths.activities),
                    &activities,
                ),
                SourceStats::from_loaded(
                    "attempts",
                    &self.path_of(&self.paths.attempts),
                    &attempts,
                ),
            ],
            scheduled_interviews,
            checklists_found,
        }
    }
}

impl ReadinessSource for FileSource {
    fn list_scheduled_interviews(&self) -> Vec<Interview> {
        self.load_interviews()
            .records
            .into_iter()
            .filter(|interview| interview.status == InterviewStatus::Scheduled)
            .collect()
    }

    fn list_jobs(&self) -> HashMap<i64, JobRecord> {
        self.load_jobs()
            .records
            .into_iter()
            .map(|job| (job.id, job))
            .collect()
    }

    fn list_preparation_activities(&self) -> Vec<PreparationActivity> {
        self.load_activities().records
    }

    fn read_checklist(&self, interview_id: &str) -> Option<Vec<ChecklistItem>> {
        let path = self.checklist_path(interview_id)?;
        let content = match read_to_string_if_exists(&path)? {
            Ok(content) => content,
            Err(error) => {
                warn!(path = %path.display(), %error, "checklist unreadable");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(items) => Some(items),
            Err(error) => {
                warn!(path = %path.display(), %error, "checklist is corrupt, treating as missing");
                None
            }
        }
    }

    fn read_local_practice_attempts(&self) -> Vec<PracticeAttempt> {
        self.load_attempts().records
    }
}

/// Reads a JSON array, converting each element on its own so one bad record
/// does not take the whole file down with it.
fn read_records<R, T>(path: &Path, convert: impl Fn(R) -> Option<T>) -> Loaded<T>
where
    R: DeserializeOwned,
{
    let content = match read_to_string_if_exists(path) {
        None => {
            debug!(path = %path.display(), "source file missing");
            return Loaded::missing();
        }
        Some(Err(error)) => {
            warn!(path = %path.display(), %error, "source file unreadable");
            return Loaded::failed(error.to_string());
        }
        Some(Ok(content)) => content,
    };

    let values: Vec<Value> = match serde_json::from_str(&content) {
        Ok(values) => values,
        Err(error) => {
            warn!(path = %path.display(), %error, "source file is not a JSON array");
            return Loaded::failed(format!("{}: {}", path.display(), error));
        }
    };

    let mut loaded = Loaded::empty();
    for value in values {
        match serde_json::from_value::<R>(value).ok().and_then(&convert) {
            Some(record) => loaded.records.push(record),
            None => loaded.skipped += 1,
        }
    }
    if loaded.skipped > 0 {
        warn!(path = %path.display(), skipped = loaded.skipped, "skipped malformed records");
    }
    loaded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn source(dir: &TempDir) -> FileSource {
        FileSource::new(dir.path(), SourcePaths::default())
    }

    #[test]
    fn parse_timestamp_accepts_common_shapes() {
        assert!(parse_timestamp("2026-02-10T09:30:00Z").is_some());
        assert!(parse_timestamp("2026-02-10T09:30:00+02:00").is_some());
        assert!(parse_timestamp("2026-02-10T09:30:00").is_some());
        assert_eq!(
            parse_timestamp("2026-02-10").map(|date| date.to_rfc3339()),
            Some("2026-02-10T00:00:00+00:00".to_string())
        );
        assert!(parse_timestamp("last tuesday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn missing_files_yield_empty_sources() {
        let dir = TempDir::new().expect("temp dir should be created");
        let source = source(&dir);
        assert!(source.list_scheduled_interviews().is_empty());
        assert!(source.list_jobs().is_empty());
        assert!(source.list_preparation_activities().is_empty());
        assert!(source.read_local_practice_attempts().is_empty());
        assert!(source.read_checklist("int-1").is_none());
        assert!(source.load_jobs().missing);
    }

    #[test]
    fn only_scheduled_interviews_are_listed() {
        let dir = TempDir::new().expect("temp dir should be created");
        fs::write(
            dir.path().join("interviews.json"),
            r#"[
  {"id": 1, "title": "Backend Engineer", "start": "2026-03-02T15:00:00Z", "linkedJobRef": "4", "status": "scheduled"},
  {"id": "b", "title": "Old loop", "status": "cancelled"},
  {"id": "c", "title": "Done", "status": "completed"},
  {"id": "d", "title": "No status", "linked_job": ""}
]"#,
        )
        .expect("interviews should write");

        let interviews = source(&dir).list_scheduled_interviews();
        assert_eq!(interviews.len(), 2);
        assert_eq!(interviews[0].id, "1");
        assert_eq!(interviews[0].linked_job_id(), Some(4));
        assert!(interviews[0].start.is_some());
        assert_eq!(interviews[1].id, "d");
        assert!(interviews[1].linked_job.is_none());
    }

    #[test]
    fn corrupt_file_is_treated_as_empty() {
        let dir = TempDir::new().expect("temp dir should be created");
        fs::write(dir.path().join("jobs.json"), "{not json").expect("jobs should write");

        let source = source(&dir);
        assert!(source.list_jobs().is_empty());
        assert!(source.load_jobs().error.is_some());
    }

    #[test]
    fn activities_with_malformed_dates_are_skipped() {
        let dir = TempDir::new().expect("temp dir should be created");
        fs::write(
            dir.path().join("activities.json"),
            r#"[
  {"jobId": "4", "activityType": "mock_interview", "timeSpentMinutes": 45, "activityDate": "2026-02-20"},
  {"job_id": 4, "activity_type": "reading", "time_spent_minutes": 10, "activity_date": "someday"},
  {"activity_type": "mock", "notes": "undated"},
  "not an object"
]"#,
        )
        .expect("activities should write");

        let loaded = source(&dir).load_activities();
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.skipped, 2);
        assert_eq!(loaded.records[0].job_id, Some(4));
        assert_eq!(loaded.records[0].time_spent_minutes, 45.0);
        assert!(loaded.records[1].activity_date.is_none());
        assert_eq!(loaded.records[1].time_spent_minutes, 0.0);
    }

    #[test]
    fn jobs_with_non_numeric_ids_are_skipped() {
        let dir = TempDir::new().expect("temp dir should be created");
        fs::write(
            dir.path().join("jobs.json"),
            r#"[{"id": 4, "title": "Backend Engineer", "company": "Acme"}, {"id": "x", "title": "?"}]"#,
        )
        .expect("jobs should write");

        let jobs = source(&dir).list_jobs();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[&4].company.as_deref(), Some("Acme"));
    }

    #[test]
    fn checklist_reads_and_rejects_traversal() {
        let dir = TempDir::new().expect("temp dir should be created");
        fs::create_dir_all(dir.path().join("checklists")).expect("checklists dir should create");
        fs::write(
            dir.path().join("checklists/int-1.json"),
            r#"[{"id": "int-1-research", "text": "Research", "done": true}]"#,
        )
        .expect("checklist should write");
        fs::write(dir.path().join("checklists/int-2.json"), "[{").expect("corrupt should write");

        let source = source(&dir);
        let items = source.read_checklist("int-1").expect("checklist should load");
        assert_eq!(items.len(), 1);
        assert!(items[0].done);
        assert!(source.read_checklist("int-2").is_none());
        assert!(source.read_checklist("../int-1").is_none());
        assert!(source.read_checklist("").is_none());
    }

    #[test]
    fn null_text_fields_read_as_empty() {
        let dir = TempDir::new().expect("temp dir should be created");
        fs::write(
            dir.path().join("activities.json"),
            r#"[{"jobId": 4, "activityType": "mock_interview", "description": null, "notes": null, "timeSpentMinutes": 90, "activityDate": null}]"#,
        )
        .expect("activities should write");
        fs::write(
            dir.path().join("attempts.json"),
            r#"[{"jobId": 4, "text": null, "question": "two-sum", "origin": null, "code": null, "elapsedMs": 120000}]"#,
        )
        .expect("attempts should write");
        fs::write(
            dir.path().join("interviews.json"),
            r#"[{"id": "a", "title": null, "status": null}]"#,
        )
        .expect("interviews should write");

        let source = source(&dir);
        let activities = source.load_activities();
        assert_eq!(activities.skipped, 0);
        assert_eq!(activities.records.len(), 1);
        assert_eq!(activities.records[0].notes, "");
        assert_eq!(activities.records[0].time_spent_minutes, 90.0);

        let attempts = source.load_attempts();
        assert_eq!(attempts.skipped, 0);
        assert_eq!(attempts.records.len(), 1);
        assert_eq!(attempts.records[0].code, "");
        assert_eq!(attempts.records[0].elapsed_ms, 120_000.0);

        let interviews = source.list_scheduled_interviews();
        assert_eq!(interviews.len(), 1);
        assert_eq!(interviews[0].title, "");
    }

    #[test]
    fn checklist_items_with_null_fields_still_load() {
        let dir = TempDir::new().expect("temp dir should be created");
        fs::create_dir_all(dir.path().join("checklists")).expect("checklists dir should create");
        fs::write(
            dir.path().join("checklists/int-1.json"),
            r#"[{"id": "int-1-resume", "text": null, "done": null}, {"id": "int-1-research", "text": "Research", "done": true}]"#,
        )
        .expect("checklist should write");

        let items = source(&dir)
            .read_checklist("int-1")
            .expect("checklist should load");
        assert_eq!(items.len(), 2);
        assert!(!items[0].done);
        assert_eq!(items[0].text, "");
        assert!(items[1].done);
    }

    #[test]
    fn health_counts_loaded_and_skipped_records() {
        let dir = TempDir::new().expect("temp dir should be created");
        fs::create_dir_all(dir.path().join("checklists")).expect("checklists dir should create");
        fs::write(
            dir.path().join("interviews.json"),
            r#"[{"id": "a", "title": "SRE"}, {"id": "b", "title": "SRE", "status": "completed"}]"#,
        )
        .expect("interviews should write");
        fs::write(dir.path().join("checklists/a.json"), "[]").expect("checklist should write");
        fs::write(dir.path().join("attempts.json"), r#"[{"elapsedMs": 1000}, 3]"#)
            .expect("attempts should write");

        let health = source(&dir).health();
        assert_eq!(health.scheduled_interviews, 1);
        assert_eq!(health.checklists_found, 1);
        let attempts = health
            .sources
            .iter()
            .find(|stats| stats.name == "attempts")
            .expect("attempts stats should exist");
        assert_eq!(attempts.loaded, 1);
        assert_eq!(attempts.skipped, 1);
        assert!(health
            .sources
            .iter()
            .any(|stats| stats.name == "jobs" && stats.missing));
    }
}
