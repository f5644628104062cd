//! Job progress polling.
//!
//! A [`ProgressPoller`] repeatedly asks a [`StatusSource`] for the status of a
//! job until the job completes or a request fails.
//!
//! ```text
//!            start()                 completed snapshot
//!   Idle ─────────────▶ Polling ───────────────────────▶ Completed
//!    ▲                     │
//!    │      stop()         │ transport / server error
//!    └─────────────────────┴───────────────────────────▶ Failed
//! ```
//!
//! The next request is scheduled only after the previous response arrived,
//! so a slow server never causes requests to pile up. Each run is wrapped in
//! an [`Abortable`] future whose [`PollHandle`] doubles as the "still active"
//! guard: a response that arrives after [`ProgressPoller::stop`] is dropped
//! without invoking any callback.
//!
//! The poller does not spawn anything itself. [`ProgressPoller::start`]
//! returns a [`PollTask`] that the caller drives on its executor
//! (`spawn_local` in the browser, `.await` natively).

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::{AbortHandle, Abortable, FutureExt, LocalBoxFuture};

use crate::config::POLL_INTERVAL;
use crate::error::{PollError, PollResult};
use crate::models::{JobId, ProgressSnapshot};

// =============================================================================
// Seams
// =============================================================================

/// Fetches one status observation for a job.
#[async_trait(?Send)]
pub trait StatusSource {
    async fn fetch_status(&self, job_id: &JobId) -> PollResult<ProgressSnapshot>;
}

/// Suspends the polling task between two requests.
#[async_trait(?Send)]
pub trait Timer {
    async fn sleep(&self, duration: Duration);
}

// =============================================================================
// State & Outcome
// =============================================================================

/// Lifecycle of a poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Polling,
    Completed,
    Failed,
}

/// How a polling run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The job reported `completed`; carries the final snapshot.
    Completed(ProgressSnapshot),
    /// A status request failed.
    Failed(PollError),
    /// The run was cancelled; no finish callback was invoked.
    Stopped,
}

/// Cancellation token for one polling run.
#[derive(Debug, Clone)]
pub struct PollHandle {
    abort: AbortHandle,
}

impl PollHandle {
    /// Cancel the run. Safe to call any number of times.
    pub fn cancel(&self) {
        self.abort.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.abort.is_aborted()
    }
}

/// Future driving one polling run.
pub type PollTask = LocalBoxFuture<'static, PollOutcome>;

// =============================================================================
// Poller
// =============================================================================

/// Polls a job until completion, failure or [`ProgressPoller::stop`].
///
/// At most one run is active per poller: starting a new run cancels the
/// previous one.
pub struct ProgressPoller<S, T> {
    source: Rc<S>,
    timer: Rc<T>,
    interval: Duration,
    state: Rc<Cell<PollState>>,
    /// Bumped by every `start`; identifies the current run
    generation: Rc<Cell<u64>>,
    handle: Option<PollHandle>,
}

impl<S, T> ProgressPoller<S, T>
where
    S: StatusSource + 'static,
    T: Timer + 'static,
{
    /// Create an idle poller using [`POLL_INTERVAL`].
    pub fn new(source: S, timer: T) -> Self {
        Self {
            source: Rc::new(source),
            timer: Rc::new(timer),
            interval: POLL_INTERVAL,
            state: Rc::new(Cell::new(PollState::Idle)),
            generation: Rc::new(Cell::new(0)),
            handle: None,
        }
    }

    /// Set the delay between two requests.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn state(&self) -> PollState {
        self.state.get()
    }

    /// Token of the current run, if any.
    pub fn handle(&self) -> Option<PollHandle> {
        self.handle.clone()
    }

    /// Begin polling `job_id`.
    ///
    /// `on_update` receives every successful snapshot in order. `on_finish`
    /// is invoked exactly once when the run completes or fails, and never
    /// when it is stopped. The returned task must be driven to make progress;
    /// cancelling it through its [`PollHandle`] or dropping it returns the
    /// poller to `Idle`.
    pub fn start<U, F>(&mut self, job_id: JobId, on_update: U, on_finish: F) -> PollTask
    where
        U: FnMut(&ProgressSnapshot) + 'static,
        F: FnOnce(PollOutcome) + 'static,
    {
        self.stop();

        let (abort, registration) = AbortHandle::new_pair();
        let token = PollHandle { abort };
        self.handle = Some(token.clone());
        self.state.set(PollState::Polling);

        let run_id = self.generation.get().wrapping_add(1);
        self.generation.set(run_id);
        let guard = RunGuard {
            state: Rc::clone(&self.state),
            generation: Rc::clone(&self.generation),
            run_id,
        };

        log::info!("Polling job {} every {:?}", job_id, self.interval);

        let run = poll_loop(
            Rc::clone(&self.source),
            Rc::clone(&self.timer),
            self.interval,
            Rc::clone(&self.state),
            token,
            job_id,
            on_update,
            on_finish,
        );

        Abortable::new(run, registration)
            .map(move |result| {
                let _guard = guard;
                result.unwrap_or(PollOutcome::Stopped)
            })
            .boxed_local()
    }

    /// Cancel the current run (if any) and return to `Idle`.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if !handle.is_cancelled() {
                log::debug!("Stopping progress poller");
            }
            handle.cancel();
        }
        self.state.set(PollState::Idle);
    }
}

impl<S, T> Drop for ProgressPoller<S, T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
    }
}

/// Returns the poller to `Idle` when its run ends without an outcome:
/// cancelled through a [`PollHandle`], or the task dropped undriven.
struct RunGuard {
    state: Rc<Cell<PollState>>,
    generation: Rc<Cell<u64>>,
    run_id: u64,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if self.generation.get() == self.run_id && self.state.get() == PollState::Polling {
            self.state.set(PollState::Idle);
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn poll_loop<S, T, U, F>(
    source: Rc<S>,
    timer: Rc<T>,
    interval: Duration,
    state: Rc<Cell<PollState>>,
    token: PollHandle,
    job_id: JobId,
    mut on_update: U,
    on_finish: F,
) -> PollOutcome
where
    S: StatusSource,
    T: Timer,
    U: FnMut(&ProgressSnapshot),
    F: FnOnce(PollOutcome),
{
    let mut tick: u64 = 0;

    loop {
        timer.sleep(interval).await;
        if token.is_cancelled() {
            return PollOutcome::Stopped;
        }

        tick += 1;
        log::debug!("Status request #{} for job {}", tick, job_id);
        let result = source.fetch_status(&job_id).await;

        if token.is_cancelled() {
            log::warn!("Discarding status of job {} received after stop", job_id);
            return PollOutcome::Stopped;
        }

        match result {
            Ok(snapshot) => {
                on_update(&snapshot);
                if token.is_cancelled() {
                    return PollOutcome::Stopped;
                }
                if snapshot.completed {
                    log::info!("Job {} completed after {} request(s)", job_id, tick);
                    state.set(PollState::Completed);
                    let outcome = PollOutcome::Completed(snapshot);
                    on_finish(outcome.clone());
                    return outcome;
                }
            }
            Err(err) => {
                log::error!("Polling job {} failed: {}", job_id, err);
                state.set(PollState::Failed);
                let outcome = PollOutcome::Failed(err);
                on_finish(outcome.clone());
                return outcome;
            }
        }
    }
}
