use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::{ErpId, RequestState};

/// Per-user submission state; at most one submission per user is pending.
#[derive(Debug, Default)]
pub struct SubmissionTracker {
    states: Mutex<HashMap<ErpId, RequestState>>,
}

impl SubmissionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, id: &ErpId) -> RequestState {
        self.lock().get(id).copied().unwrap_or_default()
    }

    /// Mark the user's submission as pending. Returns `None` when one is
    /// already in flight.
    pub fn begin(&self, id: &ErpId) -> Option<PendingSubmission<'_>> {
        let mut states = self.lock();
        let state = states.entry(id.clone()).or_default();
        if state.is_pending() {
            return None;
        }
        *state = RequestState::Pending;

        Some(PendingSubmission {
            tracker: self,
            id: id.clone(),
            outcome: RequestState::Failed,
        })
    }

    fn settle(&self, id: &ErpId, outcome: RequestState) {
        self.lock().insert(id.clone(), outcome);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ErpId, RequestState>> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Guard for an in-flight submission. Dropping it settles the state, as
/// `Failed` unless [`PendingSubmission::succeed`] was called.
#[derive(Debug)]
pub struct PendingSubmission<'a> {
    tracker: &'a SubmissionTracker,
    id: ErpId,
    outcome: RequestState,
}

impl PendingSubmission<'_> {
    pub fn succeed(mut self) {
        self.outcome = RequestState::Succeeded;
    }

    pub fn fail(self) {}
}

impl Drop for PendingSubmission<'_> {
    fn drop(&mut self) {
        self.tracker.settle(&self.id, self.outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_begin_while_pending_is_refused() {
        let tracker = SubmissionTracker::new();
        let id = ErpId::new("111111");

        let pending = tracker.begin(&id).unwrap();
        assert_eq!(tracker.state(&id), RequestState::Pending);
        assert!(tracker.begin(&id).is_none());

        pending.succeed();
        assert_eq!(tracker.state(&id), RequestState::Succeeded);
        assert!(tracker.begin(&id).is_some());
    }

    #[test]
    fn dropped_guard_settles_as_failed() {
        let tracker = SubmissionTracker::new();
        let id = ErpId::new("111111");

        drop(tracker.begin(&id).unwrap());
        assert_eq!(tracker.state(&id), RequestState::Failed);

        tracker.begin(&id).unwrap().fail();
        assert_eq!(tracker.state(&id), RequestState::Failed);
    }

    #[test]
    fn users_are_tracked_separately() {
        let tracker = SubmissionTracker::new();
        let first = ErpId::new("1");
        let second = ErpId::new("2");

        let _pending = tracker.begin(&first).unwrap();
        assert!(tracker.begin(&second).is_some());
        assert_eq!(tracker.state(&ErpId::new("3")), RequestState::Idle);
    }
}
