//! Polling refresh loop behind `readiness watch`.
//!
//! Each cycle diffs the data directory fingerprint, publishes one
//! [`Invalidation`] per changed file and rescoring happens only when the
//! board has been marked stale.

use crate::engine::ReadinessEngine;
use crate::refresh::{Invalidation, InvalidationHub, ReadinessBoard, SubscriptionId};
use crate::sources::cache::CachedSource;
use crate::sources::files::FileSource;
use crate::sources::fingerprint::SourceFingerprint;
use crate::types::report::ReadinessReport;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct WatchLoop {
    engine: ReadinessEngine,
    cached: Arc<CachedSource<FileSource>>,
    board: Arc<ReadinessBoard>,
    hub: InvalidationHub,
    subscriptions: Vec<SubscriptionId>,
    fingerprint: SourceFingerprint,
}

impl WatchLoop {
    pub fn new(engine: ReadinessEngine, source: FileSource, staleness: Duration) -> Self {
        let fingerprint = SourceFingerprint::capture(&source);
        let cached = Arc::new(CachedSource::new(source, staleness));
        let board = Arc::new(ReadinessBoard::new());
        let hub = InvalidationHub::new();

        let cache_listener = Arc::clone(&cached);
        let board_listener = Arc::clone(&board);
        let subscriptions = vec![
            hub.subscribe(move |signal| cache_listener.invalidate(signal)),
            hub.subscribe(move |_| board_listener.invalidate()),
        ];

        Self {
            engine,
            cached,
            board,
            hub,
            subscriptions,
            fingerprint,
        }
    }

    pub fn board(&self) -> &ReadinessBoard {
        &self.board
    }

    /// Runs a scoring pass when the board is stale. Returns the applied report.
    pub fn rescore_if_stale(&self, now: DateTime<Utc>) -> Option<ReadinessReport> {
        if !self.board.needs_refresh() {
            return None;
        }
        let ticket = self.board.begin_pass();
        let report = self.engine.score_all(&*self.cached, now);
        if self.board.apply(ticket, report) {
            self.board.latest()
        } else {
            None
        }
    }

    /// Publishes what changed on disk since the previous poll.
    pub fn poll_changes(&mut self) -> Vec<Invalidation> {
        let current = SourceFingerprint::capture(self.cached.inner());
        let changes = current.changes_since(&self.fingerprint);
        for signal in &changes {
            info!(?signal, "data changed");
            self.hub.publish(signal);
        }
        self.fingerprint = current;
        changes
    }

    /// Stops listening and drops any pass still in flight.
    pub fn finish(&mut self) {
        for id in self.subscriptions.drain(..) {
            self.hub.unsubscribe(id);
        }
        self.board.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::config::{ScoringParams, SourcePaths};
    use chrono::TimeZone;
    use std::fs;
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0)
            .single()
            .expect("valid date")
    }

    fn write_activities(dir: &TempDir, minutes: u32) {
        fs::write(
            dir.path().join("activities.json"),
            format!(r#"[{{"job_id": 10, "activity_type": "study", "time_spent_minutes": {minutes}}}]"#),
        )
        .expect("activities should write");
    }

    fn seeded_loop(dir: &TempDir) -> WatchLoop {
        fs::write(
            dir.path().join("interviews.json"),
            r#"[{"id": "int-a", "title": "Backend Engineer", "linked_job": 10}]"#,
        )
        .expect("interviews should write");
        fs::write(
            dir.path().join("jobs.json"),
            r#"[{"id": 10, "title": "Backend Engineer"}]"#,
        )
        .expect("jobs should write");
        write_activities(dir, 30);

        WatchLoop::new(
            ReadinessEngine::new(ScoringParams::default()),
            FileSource::new(dir.path(), SourcePaths::default()),
            Duration::from_secs(3600),
        )
    }

    fn practice_minutes(report: &ReadinessReport) -> u32 {
        report.interviews[0].result.practice_minutes
    }

    #[test]
    fn edited_activities_trigger_a_fresh_pass() {
        let dir = TempDir::new().expect("temp dir should be created");
        let mut watch = seeded_loop(&dir);

        let first = watch.rescore_if_stale(now()).expect("first pass should apply");
        assert_eq!(practice_minutes(&first), 30);

        write_activities(&dir, 120);
        assert_eq!(watch.poll_changes(), vec![Invalidation::Activities]);

        let second = watch
            .rescore_if_stale(now())
            .expect("invalidation should force a new pass");
        assert_eq!(practice_minutes(&second), 120);
        let latest = watch.board().latest().expect("board should hold a report");
        assert_eq!(practice_minutes(&latest), 120);
    }

    #[test]
    fn quiet_cycle_does_not_rescore() {
        let dir = TempDir::new().expect("temp dir should be created");
        let mut watch = seeded_loop(&dir);
        assert!(watch.rescore_if_stale(now()).is_some());

        assert!(watch.poll_changes().is_empty());
        assert!(watch.rescore_if_stale(now()).is_none());
    }

    #[test]
    fn finished_loop_ignores_later_changes() {
        let dir = TempDir::new().expect("temp dir should be created");
        let mut watch = seeded_loop(&dir);
        assert!(watch.rescore_if_stale(now()).is_some());

        watch.finish();
        write_activities(&dir, 200);
        assert_eq!(watch.poll_changes(), vec![Invalidation::Activities]);
        assert!(watch.rescore_if_stale(now()).is_none());
        let latest = watch.board().latest().expect("board keeps last report");
        assert_eq!(practice_minutes(&latest), 30);
    }
}
