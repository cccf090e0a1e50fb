//! Debounced, single-flight scheduling of tree builds.
//!
//! One component combines a resettable debounce deadline with a one-slot
//! pending request and a single dedicated worker thread. A new submission
//! always replaces whatever is pending and signals whatever is running;
//! only the most recent request can ever deliver a result.

use crate::frame::FramePolicy;
use crate::input::StackSample;
use crate::scheduler::handle::{BuildHandle, BuildOutcome, HandleInner};
use crate::tree::build_tree_cancellable;
use crate::utils::config::DEFAULT_DEBOUNCE;
use log::{debug, warn};
use parking_lot::{Condvar, Mutex};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// A request sitting in the debounce window
struct PendingBuild {
    samples: Vec<StackSample>,
    policy: FramePolicy,
    handle: Arc<HandleInner>,
    due: Instant,
}

/// State shared between submitters and the worker
///
/// `active` is the only handle allowed to publish a completed tree; the
/// completing task checks it under this mutex, atomically with respect to
/// new submissions.
struct SchedulerState {
    pending: Option<PendingBuild>,
    active: Option<Arc<HandleInner>>,
    shutdown: bool,
}

struct Shared {
    state: Mutex<SchedulerState>,
    wakeup: Condvar,
}

/// Debounced single-flight scheduler for tree builds
///
/// **Public** - sits in front of the tree builder
///
/// Coalesces bursts of submissions within the debounce window, runs at most
/// one build at a time on a dedicated worker thread, and cancels superseded
/// scheduled or running builds. Last-request-wins; there is no queue.
pub struct TreeScheduler {
    shared: Arc<Shared>,
    debounce: Duration,
    worker: Option<thread::JoinHandle<()>>,
}

impl TreeScheduler {
    /// Create a scheduler with the default debounce window
    pub fn new() -> Self {
        Self::with_debounce(DEFAULT_DEBOUNCE)
    }

    /// Create a scheduler with an explicit debounce window
    pub fn with_debounce(debounce: Duration) -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(SchedulerState {
                pending: None,
                active: None,
                shutdown: false,
            }),
            wakeup: Condvar::new(),
        });

        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name("flametree-builder".to_string())
            .spawn(move || worker_loop(worker_shared))
            .ok();
        if worker.is_none() {
            warn!("Failed to spawn builder thread; submissions will never resolve");
        }

        Self {
            shared,
            debounce,
            worker,
        }
    }

    /// Submit a build request
    ///
    /// **Public** - the scheduler's single entry point
    ///
    /// Replaces any request still inside the debounce window (its handle
    /// resolves cancelled and its build never starts) and signals cooperative
    /// cancellation to any running build, whose result is discarded even if
    /// it completes. Returns a handle to the eventual result.
    pub fn submit(&self, samples: Vec<StackSample>, policy: FramePolicy) -> BuildHandle {
        let inner = Arc::new(HandleInner::new());

        {
            let mut state = self.shared.state.lock();
            if let Some(previous) = state.pending.take() {
                debug!("Superseding debouncing request");
                previous.handle.cancel();
            }
            if let Some(active) = &state.active {
                debug!("Signalling cancellation to running build");
                active.cancel();
            }
            state.pending = Some(PendingBuild {
                samples,
                policy,
                handle: Arc::clone(&inner),
                due: Instant::now() + self.debounce,
            });
        }
        self.shared.wakeup.notify_all();

        BuildHandle::new(inner)
    }
}

impl Default for TreeScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TreeScheduler {
    fn drop(&mut self) {
        {
            let mut state = self.shared.state.lock();
            state.shutdown = true;
            if let Some(pending) = state.pending.take() {
                pending.handle.cancel();
            }
            if let Some(active) = &state.active {
                active.cancel();
            }
        }
        self.shared.wakeup.notify_all();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// Worker: wait out the debounce window, run the build, publish if still active
fn worker_loop(shared: Arc<Shared>) {
    loop {
        // Phase 1: claim a due request. The active slot is set in the same
        // critical section that takes the pending request, so a submission
        // can never slip between the two and miss the cancellation signal.
        let job = {
            let mut state = shared.state.lock();
            loop {
                if state.shutdown {
                    if let Some(pending) = state.pending.take() {
                        pending.handle.cancel();
                    }
                    return;
                }
                if matches!(&state.pending, Some(p) if p.handle.is_cancelled()) {
                    // cancelled while debouncing: guaranteed never to run
                    state.pending = None;
                    continue;
                }
                match state.pending.as_ref().map(|p| p.due) {
                    None => {
                        shared.wakeup.wait(&mut state);
                    }
                    Some(due) if Instant::now() >= due => {
                        let job = state.pending.take();
                        if let Some(job) = &job {
                            state.active = Some(Arc::clone(&job.handle));
                        }
                        break job;
                    }
                    Some(due) => {
                        let _ = shared.wakeup.wait_until(&mut state, due);
                    }
                }
            }
        };

        let Some(job) = job else { continue };

        debug!("Starting build for {} samples", job.samples.len());
        let built = catch_unwind(AssertUnwindSafe(|| {
            build_tree_cancellable(&job.samples, &job.policy, job.handle.cancel_flag())
        }));

        // Phase 2: publish, atomically with respect to new submissions.
        // The active slot is cleared regardless of outcome.
        let mut state = shared.state.lock();
        let still_active = state
            .active
            .as_ref()
            .map(|h| Arc::ptr_eq(h, &job.handle))
            .unwrap_or(false);
        if still_active {
            state.active = None;
        }

        let outcome = match built {
            Ok(Some(tree)) if still_active && !job.handle.is_cancelled() => {
                debug!("Publishing tree with {} nodes", tree.node_count());
                BuildOutcome::Completed(tree)
            }
            Ok(Some(_)) => {
                debug!("Discarding superseded build result");
                BuildOutcome::Cancelled
            }
            Ok(None) => BuildOutcome::Cancelled,
            Err(panic) => {
                let message = panic_message(panic);
                warn!("Build task faulted: {}", message);
                BuildOutcome::Failed(message)
            }
        };
        job.handle.complete(outcome);
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        match panic.downcast_ref::<String>() {
            Some(message) => message.clone(),
            None => "build task panicked".to_string(),
        }
    }
}
