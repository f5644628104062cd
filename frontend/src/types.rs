//! Common types used across the frontend application.
//!
//! # Categories
//!
//! - **Job Types** - Where the current detection job stands
//! - **Toast Types** - Notifications on screen

use seisweb::{JobId, Notification};

// =============================================================================
// Job Types
// =============================================================================

/// Phase of the job shown on the page.
#[derive(Clone, Debug, PartialEq)]
pub enum JobPhase {
    /// Nothing uploaded yet
    Idle,
    /// Upload accepted, progress being polled
    Processing(JobId),
    /// Detection finished, results available
    Completed(JobId),
    /// Detection or polling failed
    Failed(JobId, String),
}

impl JobPhase {
    pub fn job_id(&self) -> Option<&JobId> {
        match self {
            JobPhase::Idle => None,
            JobPhase::Processing(id) | JobPhase::Completed(id) | JobPhase::Failed(id, _) => Some(id),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, JobPhase::Idle)
    }
}

// =============================================================================
// Toast Types
// =============================================================================

/// A notification currently on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    /// Key for rendering and removal
    pub id: u64,
    pub notification: Notification,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_phase_job_id() {
        let id = JobId::new("job-7").unwrap();
        assert_eq!(JobPhase::Idle.job_id(), None);
        assert_eq!(JobPhase::Processing(id.clone()).job_id(), Some(&id));
        assert_eq!(JobPhase::Failed(id.clone(), "boom".into()).job_id(), Some(&id));
        assert!(JobPhase::Idle.is_idle());
        assert!(!JobPhase::Completed(id).is_idle());
    }
}
