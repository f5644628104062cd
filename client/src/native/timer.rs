use std::time::Duration;

use async_trait::async_trait;

use crate::poller::Timer;

/// [`Timer`] backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

#[async_trait(?Send)]
impl Timer for TokioTimer {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PollResult;
    use crate::models::{JobId, ProgressSnapshot};
    use crate::poller::{PollOutcome, ProgressPoller, StatusSource};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use tokio::time::Instant;

    /// Completes on the `remaining`-th request and records when each arrived.
    struct Countdown {
        remaining: Cell<u32>,
        started: Instant,
        seen_at: Rc<RefCell<Vec<Duration>>>,
    }

    #[async_trait(?Send)]
    impl StatusSource for Countdown {
        async fn fetch_status(&self, _job_id: &JobId) -> PollResult<ProgressSnapshot> {
            self.seen_at.borrow_mut().push(self.started.elapsed());
            let left = self.remaining.get().saturating_sub(1);
            self.remaining.set(left);
            Ok(ProgressSnapshot {
                percentage: if left == 0 { 100.0 } else { 50.0 },
                message: String::new(),
                completed: left == 0,
                error_message: None,
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_requests_follow_interval() {
        let seen_at = Rc::new(RefCell::new(Vec::new()));
        let source = Countdown {
            remaining: Cell::new(3),
            started: Instant::now(),
            seen_at: Rc::clone(&seen_at),
        };

        let mut poller = ProgressPoller::new(source, TokioTimer);
        let outcome = poller.start(JobId::new("j").unwrap(), |_| {}, |_| {}).await;

        assert!(matches!(outcome, PollOutcome::Completed(_)));
        let seen = seen_at.borrow();
        assert_eq!(seen.len(), 3);
        for (i, at) in seen.iter().enumerate() {
            let expected = Duration::from_millis(1500) * (i as u32 + 1);
            assert!(*at >= expected, "request {} at {:?}", i, at);
            assert!(*at < expected + Duration::from_millis(50), "request {} at {:?}", i, at);
        }
    }
}
