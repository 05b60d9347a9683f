//! Single-flight coordination of credential refreshes.
//!
//! The first request to see a 401 becomes the leader and performs the refresh;
//! every request that sees a 401 while the leader is working is parked as a
//! follower and woken, in arrival order, with the leader's outcome.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;

use crate::error::AdminError;

/// Outcome handed to every follower: the new access credential or the failure.
pub(crate) type RefreshOutcome = Result<String, AdminError>;

#[derive(Debug)]
struct Waiter {
    seq: u64,
    tx: oneshot::Sender<RefreshOutcome>,
}

#[derive(Debug, Default)]
struct RefreshState {
    refreshing: bool,
    next_seq: u64,
    queue: VecDeque<Waiter>,
}

/// Role assigned to a request that needs a fresh credential.
pub(crate) enum Ticket<'a> {
    /// Perform the refresh, then settle it through the guard.
    Leader(LeaderGuard<'a>),
    /// A refresh is already in flight; wait for its outcome.
    Follower(oneshot::Receiver<RefreshOutcome>),
}

/// Refresh state owned by one session.
#[derive(Debug, Default)]
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
    #[cfg(test)]
    woken: Mutex<Vec<u64>>,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a refresh is currently in flight.
    pub fn is_refreshing(&self) -> bool {
        self.lock().refreshing
    }

    /// Number of requests parked behind the in-flight refresh.
    pub fn pending(&self) -> usize {
        self.lock().queue.len()
    }

    /// Become the leader if idle, otherwise enqueue as a follower.
    ///
    /// The flag flips inside the same critical section that observed idle,
    /// so two callers can never both lead.
    pub(crate) fn join(&self) -> Ticket<'_> {
        let mut state = self.lock();
        if state.refreshing {
            let (tx, rx) = oneshot::channel();
            let seq = state.next_seq;
            state.next_seq += 1;
            state.queue.push_back(Waiter { seq, tx });
            tracing::debug!(seq, queued = state.queue.len(), "refresh in flight; request queued");
            return Ticket::Follower(rx);
        }
        state.refreshing = true;
        Ticket::Leader(LeaderGuard {
            coordinator: self,
            settled: false,
        })
    }

    /// Return to idle and wake every follower with `outcome`, oldest first.
    fn settle(&self, outcome: RefreshOutcome) -> usize {
        let waiters = {
            let mut state = self.lock();
            state.refreshing = false;
            std::mem::take(&mut state.queue)
        };
        let drained = waiters.len();
        for waiter in waiters {
            tracing::trace!(seq = waiter.seq, "waking queued request");
            #[cfg(test)]
            self.woken
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(waiter.seq);
            // A follower whose future was dropped has nobody left to notify.
            let _ = waiter.tx.send(outcome.clone());
        }
        drained
    }

    fn lock(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Proof of leadership for one refresh cycle.
///
/// Dropping it unsettled (the leader's future was dropped mid-refresh) fails
/// the followers instead of leaving them parked forever.
pub(crate) struct LeaderGuard<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl LeaderGuard<'_> {
    pub(crate) fn settle(mut self, outcome: RefreshOutcome) -> usize {
        self.settled = true;
        self.coordinator.settle(outcome)
    }
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!("refresh abandoned before settling; failing queued requests");
            self.coordinator.settle(Err(AdminError::InvalidState(
                "credential refresh abandoned".to_string(),
            )));
        }
    }
}
