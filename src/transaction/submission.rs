//! Keeps one rendered form from creating more than one transaction.
//!
//! Every rendered form carries a token issued by a [SubmissionTracker].
//! Submitting the form claims the token, and a token can only be claimed by
//! one request at a time. Once a submission succeeds its token is retired, so
//! a double click or a replayed request cannot add the transaction twice.
//!
//! Only the most recent completed tokens are remembered. When one is
//! forgotten, every token up to it expires, so a form cannot be replayed
//! after its token has dropped out of the list.

use std::{
    collections::{HashSet, VecDeque},
    sync::{Arc, Mutex, MutexGuard},
};

use crate::Error;

/// Identifies one rendered form.
pub type SubmissionToken = u64;

/// How many completed tokens are remembered.
pub(crate) const COMPLETED_CAPACITY: usize = 256;

#[derive(Debug, Default)]
struct TrackerState {
    last_issued: SubmissionToken,
    /// Tokens at or below this were issued before a forgotten completed token.
    expired_through: SubmissionToken,
    in_flight: HashSet<SubmissionToken>,
    completed: VecDeque<SubmissionToken>,
}

/// Issues submission tokens and tracks which are in flight or completed.
#[derive(Debug, Default)]
pub struct SubmissionTracker {
    state: Mutex<TrackerState>,
}

impl SubmissionTracker {
    /// Create a tracker that has not issued any tokens.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new token, greater than every token issued before it.
    pub fn issue(&self) -> SubmissionToken {
        let mut state = self.lock();
        state.last_issued += 1;

        state.last_issued
    }

    /// Claim `token` for a submission.
    ///
    /// The token is released when the returned guard is dropped, unless
    /// [SubmissionGuard::complete] was called, in which case it is retired.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::UnknownSubmission] if `token` was never issued,
    /// - [Error::SubmissionInProgress] if another request holds `token`,
    /// - [Error::SubmissionAlreadyCompleted] if `token` has been retired,
    /// - or [Error::SubmissionExpired] if `token` is too old to tell whether
    ///   it was retired.
    pub fn claim(self: &Arc<Self>, token: SubmissionToken) -> Result<SubmissionGuard, Error> {
        let mut state = self.lock();

        if token == 0 || token > state.last_issued {
            return Err(Error::UnknownSubmission(token));
        }

        if state.in_flight.contains(&token) {
            return Err(Error::SubmissionInProgress);
        }

        if state.completed.contains(&token) {
            return Err(Error::SubmissionAlreadyCompleted);
        }

        if token <= state.expired_through {
            return Err(Error::SubmissionExpired(token));
        }

        state.in_flight.insert(token);

        Ok(SubmissionGuard {
            tracker: Arc::clone(self),
            token,
            completed: false,
        })
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        // The state is a set of plain integers that is never left half
        // updated, so it is still usable after a panic elsewhere.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Holds a claimed submission token.
#[derive(Debug)]
pub struct SubmissionGuard {
    tracker: Arc<SubmissionTracker>,
    token: SubmissionToken,
    completed: bool,
}

impl SubmissionGuard {
    /// The claimed token.
    pub fn token(&self) -> SubmissionToken {
        self.token
    }

    /// Retire the token so it can never be claimed again.
    pub fn complete(mut self) {
        self.completed = true;
    }
}

impl Drop for SubmissionGuard {
    fn drop(&mut self) {
        let mut state = self.tracker.lock();
        state.in_flight.remove(&self.token);

        if self.completed {
            if state.completed.len() == COMPLETED_CAPACITY
                && let Some(forgotten) = state.completed.pop_front()
            {
                state.expired_through = state.expired_through.max(forgotten);
            }

            state.completed.push_back(self.token);
        }
    }
}
