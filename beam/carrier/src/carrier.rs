/*!
    The asynchronous operation carrier.

    A carrier owns one in-flight operation: the deferred half of its future
    handle and the handle of its background work. Its life has three
    phases:

    1. Execute, on a blocking thread: the operation runs its native call
       sequence and records success or the first failure.
    2. Complete, on the runtime: a successful operation converts its state
       into an output that resolves the future. A failed operation is
       dropped, releasing any partial native allocation, and the future is
       rejected.
    3. Dispose: the carrier is dropped exactly once, on every path.

    Complete always starts after execute has returned, and the two never
    touch the operation at the same time: the operation moves into the
    blocking thread and comes back through the join handle.
*/

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::runtime::Handle;
use tokio::task::{JoinError, JoinHandle};

use beam_types::{Error, Result};

use crate::pending::{Deferred, Pending, deferred};

/**
    A unit of blocking native work with a conversion step.
*/
pub trait Operation: Send + 'static {
    type Output: Send + 'static;

    /// Resource name used in diagnostics, e.g. `"Encoder"`.
    fn resource(&self) -> &'static str;

    /**
        Run the native call sequence. Stops at the first failure without
        releasing what was already allocated; dropping the operation does.
    */
    fn execute(&mut self) -> Result<()>;

    /**
        Convert a successfully executed operation into its output.
    */
    fn complete(self) -> Result<Self::Output>;
}

/**
    Counters shared by every carrier of a bridge.
*/
#[derive(Debug, Default)]
pub(crate) struct Counters {
    scheduled: AtomicU64,
    resolved: AtomicU64,
    rejected: AtomicU64,
    disposed: AtomicU64,
}

/**
    A snapshot of a bridge's operation counters.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BridgeStats {
    pub scheduled: u64,
    pub resolved: u64,
    pub rejected: u64,
    pub disposed: u64,
}

impl BridgeStats {
    /**
        Operations scheduled but not yet disposed.
    */
    pub fn in_flight(&self) -> u64 {
        self.scheduled.saturating_sub(self.disposed)
    }
}

impl Counters {
    pub(crate) fn snapshot(&self) -> BridgeStats {
        // Disposal follows scheduling, so disposed is loaded first.
        let disposed = self.disposed.load(Ordering::SeqCst);
        let rejected = self.rejected.load(Ordering::SeqCst);
        let resolved = self.resolved.load(Ordering::SeqCst);
        BridgeStats {
            scheduled: self.scheduled.load(Ordering::SeqCst),
            resolved,
            rejected,
            disposed,
        }
    }
}

type Work<O> = JoinHandle<(O, Result<()>)>;

struct Carrier<O: Operation> {
    id: u64,
    resource: &'static str,
    deferred: Option<Deferred<O::Output>>,
    work: Option<Work<O>>,
    counters: Arc<Counters>,
}

/**
    Schedule an operation on `handle` and return its future handle.
*/
pub(crate) fn schedule<O: Operation>(handle: &Handle, counters: &Arc<Counters>, op: O) -> Pending<O::Output> {
    let (deferred, pending) = deferred();
    let resource = op.resource();
    let id = counters.scheduled.fetch_add(1, Ordering::SeqCst) + 1;

    let work = handle.spawn_blocking(move || {
        let mut op = op;
        let result = op.execute();
        (op, result)
    });

    let carrier = Carrier::<O> {
        id,
        resource,
        deferred: Some(deferred),
        work: Some(work),
        counters: Arc::clone(counters),
    };
    tracing::debug!(id, resource, "scheduled operation");

    handle.spawn(carrier.run());
    pending
}

impl<O: Operation> Carrier<O> {
    async fn run(mut self) {
        let Some(work) = self.work.take() else {
            return;
        };
        let result = match work.await {
            Ok((op, Ok(()))) => op.complete(),
            Ok((op, Err(error))) => {
                drop(op);
                Err(error)
            }
            Err(join) => Err(self.incomplete(&join)),
        };
        self.settle(result);
    }

    fn incomplete(&self, join: &JoinError) -> Error {
        let message = format!("{} failed to complete.", self.resource);
        if join.is_cancelled() {
            Error::cancelled(message)
        } else {
            Error::runtime(message)
        }
    }

    fn settle(&mut self, result: Result<O::Output>) {
        let Some(deferred) = self.deferred.take() else {
            return;
        };
        let counter = match &result {
            Ok(_) => {
                tracing::debug!(id = self.id, resource = self.resource, "operation resolved");
                &self.counters.resolved
            }
            Err(error) => {
                tracing::warn!(
                    id = self.id,
                    resource = self.resource,
                    status = %error.status(),
                    "operation rejected: {}",
                    error.message()
                );
                &self.counters.rejected
            }
        };
        counter.fetch_add(1, Ordering::SeqCst);
        if !deferred.settle(result) {
            tracing::trace!(id = self.id, "future handle dropped before settlement");
        }
    }
}

impl<O: Operation> Drop for Carrier<O> {
    fn drop(&mut self) {
        // Reached without settling only when the runtime drops the completion task.
        if self.deferred.is_some() {
            let error = Error::cancelled(format!("{} failed to complete.", self.resource));
            self.settle(Err(error));
        }
        self.counters.disposed.fetch_add(1, Ordering::SeqCst);
        tracing::trace!(id = self.id, resource = self.resource, "disposed carrier");
    }
}
