//! Change propagation between data collaborators and the scoring view.
//!
//! Collaborators publish [`Invalidation`] signals on an [`InvalidationHub`];
//! subscribers (source caches, the [`ReadinessBoard`]) react to them. The
//! board hands out a [`PassTicket`] per scoring pass and refuses results from
//! passes that were superseded or finished after the board was detached.

use crate::types::report::ReadinessReport;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invalidation {
    Interviews,
    Jobs,
    Activities,
    Attempts,
    Checklist(String),
    All,
}

pub type SubscriptionId = u64;

type Callback = Arc<dyn Fn(&Invalidation) + Send + Sync>;

#[derive(Default)]
pub struct InvalidationHub {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<(SubscriptionId, Callback)>>,
}

impl InvalidationHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &self,
        callback: impl Fn(&Invalidation) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(callback)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    /// Delivers the signal to every subscriber; returns how many received it.
    /// Callbacks run outside the lock and may subscribe or unsubscribe.
    pub fn publish(&self, signal: &Invalidation) -> usize {
        let callbacks: Vec<Callback> = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        debug!(?signal, subscribers = callbacks.len(), "publishing invalidation");
        for callback in &callbacks {
            callback(signal);
        }
        callbacks.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassTicket {
    generation: u64,
}

#[derive(Debug)]
pub struct ReadinessBoard {
    generation: AtomicU64,
    attached: AtomicBool,
    stale: AtomicBool,
    latest: Mutex<Option<ReadinessReport>>,
}

impl Default for ReadinessBoard {
    fn default() -> Self {
        Self {
            generation: AtomicU64::new(0),
            attached: AtomicBool::new(true),
            stale: AtomicBool::new(true),
            latest: Mutex::new(None),
        }
    }
}

impl ReadinessBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks current results stale and orphans any pass still in flight.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.stale.store(true, Ordering::SeqCst);
    }

    pub fn needs_refresh(&self) -> bool {
        self.is_attached() && self.stale.load(Ordering::SeqCst)
    }

    pub fn begin_pass(&self) -> PassTicket {
        PassTicket {
            generation: self.generation.load(Ordering::SeqCst),
        }
    }

    pub fn is_current(&self, ticket: PassTicket) -> bool {
        self.is_attached() && self.generation.load(Ordering::SeqCst) == ticket.generation
    }

    /// Stores the pass result if nothing superseded it; otherwise drops it.
    pub fn apply(&self, ticket: PassTicket, report: ReadinessReport) -> bool {
        let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.is_current(ticket) {
            debug!(
                ticket = ticket.generation,
                attached = self.is_attached(),
                "discarding superseded scoring pass"
            );
            return false;
        }
        *latest = Some(report);
        self.stale.store(false, Ordering::SeqCst);
        true
    }

    pub fn detach(&self) {
        self.attached.store(false, Ordering::SeqCst);
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    pub fn latest(&self) -> Option<ReadinessReport> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
