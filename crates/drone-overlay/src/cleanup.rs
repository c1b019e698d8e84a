//! Main-thread cleanup queue.
//!
//! Code running outside the step loop (worker threads, drop paths of handles
//! moved elsewhere) must not touch render resources directly. It enqueues a
//! closure instead, and the step loop runs every pending closure, in enqueue
//! order, before doing anything else.

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::debug;

/// A deferred cleanup action run against the step loop's context.
pub type CleanupTask<C> = Box<dyn FnOnce(&mut C) + Send>;

/// Consumer side, owned by the step loop.
pub struct CleanupQueue<C> {
    sender: Sender<CleanupTask<C>>,
    receiver: Receiver<CleanupTask<C>>,
}

impl<C> Default for CleanupQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> CleanupQueue<C> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Returns a producer handle that can be sent to other threads.
    #[must_use]
    pub fn handle(&self) -> CleanupHandle<C> {
        CleanupHandle {
            sender: self.sender.clone(),
        }
    }

    /// Number of tasks waiting.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Runs every pending task against `context`. Returns how many ran.
    pub fn drain(&self, context: &mut C) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.receiver.try_recv() {
            task(context);
            ran += 1;
        }
        if ran > 0 {
            debug!(ran, "Drained cleanup queue");
        }
        ran
    }
}

impl<C> std::fmt::Debug for CleanupQueue<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleanupQueue")
            .field("pending", &self.pending())
            .finish()
    }
}

/// Producer side of a [`CleanupQueue`].
pub struct CleanupHandle<C> {
    sender: Sender<CleanupTask<C>>,
}

impl<C> Clone for CleanupHandle<C> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<C> std::fmt::Debug for CleanupHandle<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleanupHandle").finish_non_exhaustive()
    }
}

impl<C> CleanupHandle<C> {
    /// Queues `task` for the next step. Returns `false` if the queue's owner
    /// is gone, in which case the task is dropped without running.
    pub fn enqueue(&self, task: impl FnOnce(&mut C) + Send + 'static) -> bool {
        self.sender.send(Box::new(task)).is_ok()
    }
}
