//! Cooperative cancellation.
//!
//! An analysis run checks its [`CancellationToken`] between phases and bails
//! out with [`AnalysisError::Cancelled`] instead of returning a partial graph.
//! [`AnalysisScheduler`] provides the cancel-and-restart policy used when a
//! new run supersedes one still in flight.

use log::debug;
use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use crate::error::AnalysisError;

#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Returns `Err(AnalysisError::Cancelled)` once [`cancel`](Self::cancel) was called.
    pub fn check(&self) -> Result<(), AnalysisError> {
        if self.is_cancelled() { Err(AnalysisError::Cancelled) } else { Ok(()) }
    }
}

/// Checks an optional token; `None` never cancels.
pub(crate) fn check(token: Option<&CancellationToken>) -> Result<(), AnalysisError> {
    token.map_or(Ok(()), CancellationToken::check)
}

/// Handle for one scheduled run.
#[derive(Debug, Clone)]
pub struct Ticket {
    pub token: CancellationToken,
    pub generation: u64,
}

/// Serializes overlapping analyses: starting a run cancels the previous one.
#[derive(Debug, Default)]
pub struct AnalysisScheduler {
    current: Mutex<Option<CancellationToken>>,
    generation: AtomicU64,
}

impl AnalysisScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels the in-flight run (if any) and hands out a fresh ticket.
    pub fn begin(&self) -> Ticket {
        let token = CancellationToken::new();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let previous = self.current.lock().replace(token.clone());
        if let Some(previous) = previous {
            debug!("Cancelling superseded analysis before starting generation {}", generation);
            previous.cancel();
        }
        Ticket { token, generation }
    }

    /// Whether `ticket` belongs to the most recently started run.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_cancel_is_shared_between_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(clone.check().is_ok());
        token.cancel();
        assert!(clone.is_cancelled());
        assert!(clone.check().unwrap_err().is_cancelled());
    }

    #[test]
    fn test_check_without_token_never_cancels() {
        assert!(check(None).is_ok());
    }

    #[test]
    fn test_scheduler_cancels_previous_run() {
        let scheduler = AnalysisScheduler::new();
        let first = scheduler.begin();
        assert!(scheduler.is_current(&first));

        let second = scheduler.begin();
        assert!(first.token.is_cancelled());
        assert!(!second.token.is_cancelled());
        assert!(!scheduler.is_current(&first));
        assert!(scheduler.is_current(&second));
        assert!(second.generation > first.generation);
    }
}
