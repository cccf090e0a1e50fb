//! Caller-facing handle for a scheduled tree build.
//!
//! A handle resolves exactly once, to a completed tree, a cancellation, or a
//! failure. Cancellation is a distinguished outcome, not an error: a
//! superseded or cancelled build never delivers a partial tree.

use crate::tree::StackTree;
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Terminal outcome of a scheduled build
///
/// **Public** - returned from `BuildHandle::result`
#[derive(Debug, Clone)]
pub enum BuildOutcome {
    /// The build ran to completion and was still the most recent request
    Completed(StackTree),

    /// The request was superseded or explicitly cancelled
    Cancelled,

    /// The build task faulted; the message describes the failure
    Failed(String),
}

impl BuildOutcome {
    /// Unwrap the tree, if the build completed
    pub fn tree(self) -> Option<StackTree> {
        match self {
            BuildOutcome::Completed(tree) => Some(tree),
            _ => None,
        }
    }
}

/// Shared slot between a handle, the scheduler, and the worker
pub(crate) struct HandleInner {
    cancelled: AtomicBool,
    outcome: Mutex<Option<BuildOutcome>>,
    done: Condvar,
}

impl HandleInner {
    pub(crate) fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
            outcome: Mutex::new(None),
            done: Condvar::new(),
        }
    }

    /// The flag the build checks at its safe points
    pub(crate) fn cancel_flag(&self) -> &AtomicBool {
        &self.cancelled
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Mark cancelled and resolve immediately if still unresolved
    ///
    /// A running build keeps going until its next safe point, but its result
    /// is already committed to be discarded.
    pub(crate) fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
        self.complete(BuildOutcome::Cancelled);
    }

    /// Resolve the handle; only the first resolution counts
    pub(crate) fn complete(&self, outcome: BuildOutcome) {
        let mut slot = self.outcome.lock();
        if slot.is_none() {
            *slot = Some(outcome);
            self.done.notify_all();
        }
    }

    pub(crate) fn is_done(&self) -> bool {
        self.outcome.lock().is_some()
    }

    pub(crate) fn wait(&self) -> BuildOutcome {
        let mut slot = self.outcome.lock();
        while slot.is_none() {
            self.done.wait(&mut slot);
        }
        // resolved outcomes are immutable once set
        slot.clone().unwrap_or(BuildOutcome::Cancelled)
    }
}

/// Cancelable handle to the eventual result of a submitted build
///
/// **Public** - returned from `TreeScheduler::submit`
pub struct BuildHandle {
    inner: Arc<HandleInner>,
}

impl BuildHandle {
    pub(crate) fn new(inner: Arc<HandleInner>) -> Self {
        Self { inner }
    }

    /// Request cancellation
    ///
    /// A not-yet-started (still debouncing) build is guaranteed never to
    /// run; a running build is asked to stop at its next safe point. The
    /// handle resolves as cancelled either way.
    pub fn cancel(&self) {
        self.inner.cancel();
    }

    /// True once cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }

    /// True once the handle has resolved (any outcome)
    pub fn is_done(&self) -> bool {
        self.inner.is_done()
    }

    /// Block until the build completes, is cancelled, or fails
    pub fn result(&self) -> BuildOutcome {
        self.inner.wait()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_resolves_immediately() {
        let handle = BuildHandle::new(Arc::new(HandleInner::new()));
        assert!(!handle.is_done());
        handle.cancel();
        assert!(handle.is_cancelled());
        assert!(handle.is_done());
        assert!(matches!(handle.result(), BuildOutcome::Cancelled));
    }

    #[test]
    fn test_first_resolution_wins() {
        let inner = Arc::new(HandleInner::new());
        inner.complete(BuildOutcome::Failed("boom".to_string()));
        inner.complete(BuildOutcome::Cancelled);
        let handle = BuildHandle::new(inner);
        assert!(matches!(handle.result(), BuildOutcome::Failed(_)));
    }
}
