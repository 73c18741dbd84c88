//! Analysis sessions and their store
//!
//! Each session id owns one slot. A slot serializes writers with a guard
//! mutex and publishes the committed value behind a read-write lock, so
//! readers observe either the previous session or the new one, never a
//! partial result. Slots without a committed session are removed from the
//! store: on reset, and when the first build for an id fails.

use super::report::AnalysisReport;
use crate::aggregate::AggregateResult;
use crate::ingest::RowError;
use crate::recommend::Recommendation;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Identifier of an analysis session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Create a session id from caller-supplied text
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a random session id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Id as text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// The committed result of one successful analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSession {
    /// Session this result belongs to
    pub id: SessionId,
    /// Cost rollups
    pub aggregate: AggregateResult,
    /// Ranked recommendations
    pub recommendations: Vec<Recommendation>,
    /// Rows skipped during ingestion
    pub row_errors: Vec<RowError>,
    /// Non-blank data rows seen
    pub total_rows: usize,
}

impl AnalysisSession {
    /// Rows converted into records
    pub fn processed_rows(&self) -> usize {
        self.aggregate.row_count
    }

    /// Rows skipped
    pub fn skipped_rows(&self) -> usize {
        self.row_errors.len()
    }

    /// Look up a recommendation by id
    pub fn recommendation(&self, id: u32) -> Option<&Recommendation> {
        self.recommendations.iter().find(|r| r.id == id)
    }

    /// Result boundary value with amounts rounded to cents
    pub fn report(&self) -> AnalysisReport {
        AnalysisReport::from_session(self)
    }
}

#[derive(Default)]
struct Slot {
    guard: Mutex<()>,
    current: RwLock<Option<Arc<AnalysisSession>>>,
}

/// Owns the latest [`AnalysisSession`] for every session id
#[derive(Default)]
pub struct SessionStore {
    slots: Mutex<HashMap<SessionId, Arc<Slot>>>,
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, id: &SessionId) -> Arc<Slot> {
        Arc::clone(self.slots.lock().entry(id.clone()).or_default())
    }

    fn is_live(&self, id: &SessionId, slot: &Arc<Slot>) -> bool {
        self.slots
            .lock()
            .get(id)
            .is_some_and(|live| Arc::ptr_eq(live, slot))
    }

    /// Drop `slot` from the store unless it was already replaced
    fn retire(&self, id: &SessionId, slot: &Arc<Slot>) {
        let mut slots = self.slots.lock();
        if slots.get(id).is_some_and(|live| Arc::ptr_eq(live, slot)) {
            slots.remove(id);
        }
    }

    /// Current session for `id`, if one was committed
    pub fn current(&self, id: &SessionId) -> Option<Arc<AnalysisSession>> {
        let slot = self.slots.lock().get(id).cloned()?;
        let current = slot.current.read().clone();
        current
    }

    /// Build and commit a new session for `id`
    ///
    /// Concurrent builds for the same id run one at a time. On error the
    /// previous session stays current.
    pub fn commit_with<F, E>(&self, id: &SessionId, build: F) -> Result<Arc<AnalysisSession>, E>
    where
        F: FnOnce() -> Result<AnalysisSession, E>,
    {
        loop {
            let slot = self.slot(id);
            let _guard = slot.guard.lock();
            // Retired while waiting for the guard
            if !self.is_live(id, &slot) {
                continue;
            }

            return match build() {
                Ok(session) => {
                    let session = Arc::new(session);
                    *slot.current.write() = Some(Arc::clone(&session));
                    Ok(session)
                }
                Err(e) => {
                    if slot.current.read().is_none() {
                        self.retire(id, &slot);
                    }
                    Err(e)
                }
            };
        }
    }

    /// Discard the session for `id`; returns whether one existed
    ///
    /// Waits for an in-flight build of the same id to finish first.
    pub fn reset(&self, id: &SessionId) -> bool {
        let Some(slot) = self.slots.lock().get(id).cloned() else {
            return false;
        };
        let _guard = slot.guard.lock();
        let previous = slot.current.write().take();
        self.retire(id, &slot);
        previous.is_some()
    }

    /// Number of sessions holding a committed result
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| slot.current.read().is_some())
            .count()
    }

    /// True when no session holds a result
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    fn session(id: &SessionId, total_rows: usize) -> AnalysisSession {
        AnalysisSession {
            id: id.clone(),
            aggregate: AggregateResult::default(),
            recommendations: Vec::new(),
            row_errors: Vec::new(),
            total_rows,
        }
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(SessionId::generate(), SessionId::generate());
        assert_eq!(SessionId::from("abc").as_str(), "abc");
    }

    #[test]
    fn test_commit_replaces_previous_session() {
        let store = SessionStore::new();
        let id = SessionId::new("s1");

        store.commit_with::<_, ()>(&id, || Ok(session(&id, 1))).unwrap();
        store.commit_with::<_, ()>(&id, || Ok(session(&id, 2))).unwrap();

        assert_eq!(store.current(&id).unwrap().total_rows, 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_failed_commit_keeps_previous_session() {
        let store = SessionStore::new();
        let id = SessionId::new("s1");
        store.commit_with::<_, &str>(&id, || Ok(session(&id, 7))).unwrap();

        let result = store.commit_with(&id, || Err("boom"));
        assert_eq!(result.unwrap_err(), "boom");
        assert_eq!(store.current(&id).unwrap().total_rows, 7);
    }

    #[test]
    fn test_reset_discards_session() {
        let store = SessionStore::new();
        let id = SessionId::new("s1");
        assert!(!store.reset(&id));

        store.commit_with::<_, ()>(&id, || Ok(session(&id, 1))).unwrap();
        assert!(store.reset(&id));
        assert!(store.current(&id).is_none());
        assert!(store.is_empty());
        assert!(store.slots.lock().is_empty());
    }

    #[test]
    fn test_failed_first_commit_leaves_no_slot() {
        let store = SessionStore::new();
        let id = SessionId::new("never-committed");

        assert!(store.commit_with::<_, &str>(&id, || Err("bad input")).is_err());
        assert!(store.slots.lock().is_empty());

        store.commit_with::<_, ()>(&id, || Ok(session(&id, 3))).unwrap();
        assert_eq!(store.current(&id).unwrap().total_rows, 3);
    }

    #[test]
    fn test_reset_racing_commits_keeps_store_consistent() {
        let store = Arc::new(SessionStore::new());
        let id = SessionId::new("churn");

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                let id = id.clone();
                thread::spawn(move || {
                    if i % 2 == 0 {
                        store.commit_with::<_, ()>(&id, || Ok(session(&id, i))).unwrap();
                    } else {
                        store.reset(&id);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let slots = store.slots.lock().len();
        assert_eq!(slots, usize::from(store.current(&id).is_some()));
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        let a = SessionId::new("a");
        let b = SessionId::new("b");
        store.commit_with::<_, ()>(&a, || Ok(session(&a, 1))).unwrap();

        assert!(store.current(&b).is_none());
        store.reset(&b);
        assert!(store.current(&a).is_some());
    }

    #[test]
    fn test_concurrent_commits_for_one_session_are_serialized() {
        let store = Arc::new(SessionStore::new());
        let id = SessionId::new("shared");
        let active = Arc::new(AtomicUsize::new(0));
        let max_active = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..6)
            .map(|i| {
                let store = Arc::clone(&store);
                let id = id.clone();
                let active = Arc::clone(&active);
                let max_active = Arc::clone(&max_active);
                thread::spawn(move || {
                    store
                        .commit_with::<_, ()>(&id, || {
                            let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                            max_active.fetch_max(now, Ordering::SeqCst);
                            thread::sleep(Duration::from_millis(5));
                            active.fetch_sub(1, Ordering::SeqCst);
                            Ok(session(&id, i))
                        })
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(max_active.load(Ordering::SeqCst), 1);
        assert!(store.current(&id).is_some());
    }
}
